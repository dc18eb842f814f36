//! Mapper CLI: `mapper <master-id> <worker-id> <num-reducers> <input-archive> <output-path> <kb-mem-limit>`
//!
//! Prints one `=> <filename> <shard_idx> <bytes>` marker line per shard
//! flushed. These lines are the only channel the external orchestrator reads
//! from stdout and are never routed through the logger.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use shardex::mapper::{self, MapperConfig};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 7 {
        anyhow::bail!(
            "usage: {} <master-id> <worker-id> <num-reducers> <input-archive> <output-path> <kb-mem-limit>",
            args.first().map(String::as_str).unwrap_or("mapper")
        );
    }

    let _master_id = &args[1];
    let _worker_id = &args[2];
    let num_reducers: u32 = args[3]
        .parse()
        .context("num-reducers must be a positive integer")?;
    let input_archive = Path::new(&args[4]);
    let output_path = Path::new(&args[5]);
    let kb_mem_limit: u64 = args[6]
        .parse()
        .context("kb-mem-limit must be a non-negative integer")?;

    let flushed = mapper::run(
        input_archive,
        output_path,
        MapperConfig {
            num_reducers,
            kb_mem_limit,
        },
    )
    .with_context(|| format!("mapping {}", input_archive.display()))?;

    for shard in flushed {
        println!("=> {} {} {}", shard.file_name, shard.shard_idx, shard.bytes);
    }

    Ok(())
}
