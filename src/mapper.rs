//! Mapper driver (§4.9): owns the archive reader, in-memory index, memory
//! probe, and flusher across one corpus. Flushes are triggered by the memory
//! probe after each document and once more for any remainder at end of input.

use std::path::Path;

use crate::archive::ArchiveReader;
use crate::document::parse_document;
use crate::error::Result;
use crate::index::InMemoryIndex;
use crate::memory::{default_probe, EstimateMemory};
use crate::run_writer::{self, FlushedShard};
use crate::stemmer::Stemmer;

pub struct MapperConfig {
    pub num_reducers: u32,
    pub kb_mem_limit: u64,
}

/// Runs one mapper generation end to end. Returns every shard file flushed,
/// in the order the flushes happened (a caller prints the `=>` marker per
/// entry as the original CLI does).
pub fn run(input_archive: &Path, output_dir: &Path, config: MapperConfig) -> Result<Vec<FlushedShard>> {
    let mut archive = ArchiveReader::open(input_archive)?;
    let stemmer = Stemmer::english();
    let mut index = InMemoryIndex::new();
    let mut probe = default_probe();
    let mut flushed = Vec::new();

    let mut flush_err: Option<crate::error::IndexError> = None;
    archive.for_each_document(|doc| {
        if flush_err.is_some() {
            return;
        }
        parse_document(doc.docid, &doc.bytes, &stemmer, &mut index);
        probe.sync_with_index_estimate(index.memory_estimate());

        if probe.estimate_kb() >= config.kb_mem_limit {
            match run_writer::flush(&mut index, output_dir, config.num_reducers) {
                Ok(shards) => flushed.extend(shards),
                Err(err) => flush_err = Some(err),
            }
        }
    })?;

    if let Some(err) = flush_err {
        return Err(err);
    }

    let remainder = run_writer::flush(&mut index, output_dir, config.num_reducers)?;
    flushed.extend(remainder);

    Ok(flushed)
}
