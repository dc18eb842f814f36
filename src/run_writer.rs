//! Sorted-run flusher (§4.4): serializes the mapper's in-memory index to one
//! run file per reducer shard, partitioned by a stable hash of the term.

use std::fs::File;
use std::io::{BufWriter, Seek};
use std::path::Path;

use twox_hash::XxHash64;

use crate::error::Result;
use crate::fileid;
use crate::format::{backpatch_count, write_lf, write_posting, write_term_header};
use crate::index::InMemoryIndex;

const SHARD_BUFFER_BYTES: usize = 8 * 1024;

/// One shard's worth of output from a single flush, as printed in its
/// `=> <filename> <shard_idx> <byte_length>` marker line.
#[derive(Debug, PartialEq, Eq)]
pub struct FlushedShard {
    pub file_name: String,
    pub shard_idx: u32,
    pub bytes: u64,
}

/// `XxHash64` with a fixed seed, so the partition is stable across processes
/// rather than subject to `std`'s per-process randomized hasher.
fn shard_for(term: &[u8], num_reducers: u32) -> u32 {
    use std::hash::Hasher;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(term);
    (hasher.finish() % num_reducers as u64) as u32
}

/// Flushes `index` to `dir` — always one file per reducer shard, `num_reducers`
/// files total, regardless of whether a given shard received any terms this
/// generation — then clears `index`. Returns the flushed shards in
/// shard-index order — callers print the `=>` marker for each.
pub fn flush(index: &mut InMemoryIndex, dir: &Path, num_reducers: u32) -> Result<Vec<FlushedShard>> {
    if index.is_empty() {
        return Ok(Vec::new());
    }

    let docids = index.sorted_docids();
    let terms = index.sorted_terms();

    let mut shard_writers: Vec<(BufWriter<File>, String)> = Vec::with_capacity(num_reducers as usize);
    for shard_idx in 0..num_reducers {
        let alloc = fileid::allocate(dir, shard_idx)?;
        shard_writers.push((
            BufWriter::with_capacity(SHARD_BUFFER_BYTES, alloc.file),
            alloc.file_name,
        ));
    }

    for term in terms {
        let shard_idx = shard_for(term, num_reducers);
        let (writer, _) = &mut shard_writers[shard_idx as usize];

        let placeholder_pos = write_term_header(writer, term)?;
        let mut count = 0u32;
        for &docid in &docids {
            if let Some(occurrence) = index.occurrence(term, docid) {
                write_posting(writer, docid, occurrence)?;
                count += 1;
            }
        }
        backpatch_count(writer, placeholder_pos, count)?;
        write_lf(writer)?;
    }

    let mut flushed = Vec::with_capacity(num_reducers as usize);
    for (shard_idx, (mut writer, file_name)) in shard_writers.into_iter().enumerate() {
        use std::io::Write;
        writer.flush()?;
        let bytes = writer.stream_position()?;
        log::info!("flushed shard {shard_idx} to {file_name} ({bytes} bytes)");
        flushed.push(FlushedShard {
            file_name,
            shard_idx: shard_idx as u32,
            bytes,
        });
    }

    index.clear();
    Ok(flushed)
}
