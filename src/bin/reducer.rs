//! Reducer CLI: `reducer <master-id> <worker-id> <path> <reducer-idx> <run-id>...`
//!
//! Prints one terminal `=> <filename> <bytes>` marker line on success.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use shardex::reducer;

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
    if args.len() < 6 {
        anyhow::bail!(
            "usage: {} <master-id> <worker-id> <path> <reducer-idx> <run-id>...",
            args.first().map(String::as_str).unwrap_or("reducer")
        );
    }

    let _master_id = &args[1];
    let _worker_id = &args[2];
    let dir = Path::new(&args[3]);
    let reducer_idx: u32 = args[4].parse().context("reducer-idx must be an integer")?;
    let run_ids: Vec<u32> = args[5..]
        .iter()
        .map(|s| s.parse().context("run-id must be an integer"))
        .collect::<Result<_>>()?;

    let shard = reducer::run(dir, reducer_idx, &run_ids)
        .with_context(|| format!("reducing shard {reducer_idx}"))?;

    println!("=> {} {}", shard.file_name, shard.bytes);

    Ok(())
}
