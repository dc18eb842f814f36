//! Reducer driver (§4.10): opens one run reader per given run id, merges
//! them, and writes the consolidated shard output through the reduce writer.

use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::fileid;
use crate::merge::KWayMerger;
use crate::reduce::ReduceWriter;
use crate::run_reader::RunReader;

const OUTPUT_BUFFER_BYTES: usize = 8 * 1024;

pub struct ReducedShard {
    pub file_name: String,
    pub bytes: u64,
}

/// Merges every run belonging to `reducer_idx` named by `run_ids` under
/// `dir`, writing one consolidated output file allocated through the same
/// exclusive-create allocator the mapper uses for its run files.
pub fn run(dir: &Path, reducer_idx: u32, run_ids: &[u32]) -> Result<ReducedShard> {
    let mut readers = Vec::with_capacity(run_ids.len());
    for &run_id in run_ids {
        let (_file, name) = fileid::open_run(dir, reducer_idx, run_id)?;
        let path = dir.join(&name);
        readers.push(RunReader::open(path.to_str().unwrap())?);
    }

    let merger = KWayMerger::new(readers)?;

    let alloc = fileid::allocate(dir, reducer_idx)?;
    let file_name = alloc.file_name.clone();
    let writer = BufWriter::with_capacity(OUTPUT_BUFFER_BYTES, alloc.file);
    let mut reduce_writer = ReduceWriter::new(writer);

    merger.run(|posting| reduce_writer.feed(posting))?;

    let bytes = fs_len(dir.join(&file_name))?;
    log::info!("reduced shard {reducer_idx} to {file_name} ({bytes} bytes)");
    Ok(ReducedShard { file_name, bytes })
}

fn fs_len(path: std::path::PathBuf) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}
