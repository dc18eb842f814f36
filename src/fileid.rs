//! Exclusive-create output file naming, per §4.8.
//!
//! `output-r<reducer_idx:06>-p<6 digits, each '1'..'9'>`. The digit range
//! excludes `'0'` so the numeric run id round-trips through `atoi`-style
//! parsing without a leading-zero ambiguity, matching the original C
//! allocator's `'1' + rand() % 9`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{IndexError, Result};

pub struct Allocation {
    pub file: File,
    pub file_name: String,
    pub run_id: u32,
}

fn random_suffix() -> (String, u32) {
    let mut rng = rand::thread_rng();
    let mut digits = String::with_capacity(6);
    let mut run_id: u32 = 0;

    for _ in 0..6 {
        let d = rng.gen_range(1..=9u32);
        digits.push(char::from_digit(d, 10).unwrap());
        run_id = run_id * 10 + d;
    }

    (digits, run_id)
}

pub fn file_name(reducer_idx: u32, run_id: u32) -> String {
    format!("output-r{reducer_idx:06}-p{run_id:06}")
}

/// Allocates a new output file for `reducer_idx` under `dir`, retrying on
/// `O_CREAT|O_EXCL` collisions.
pub fn allocate(dir: &Path, reducer_idx: u32) -> Result<Allocation> {
    const MAX_ATTEMPTS: u32 = 1_000_000;

    for _ in 0..MAX_ATTEMPTS {
        let (suffix, run_id) = random_suffix();
        let file_name = format!("output-r{reducer_idx:06}-p{suffix}");
        let path: PathBuf = dir.join(&file_name);

        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => {
                return Ok(Allocation {
                    file,
                    file_name,
                    run_id,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(IndexError::Io(err)),
        }
    }

    Err(IndexError::AllocationExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// Reopens a run file a reducer already knows the `(reducer_idx, run_id)` of.
pub fn open_run(dir: &Path, reducer_idx: u32, run_id: u32) -> Result<(File, String)> {
    let name = file_name(reducer_idx, run_id);
    let path = dir.join(&name);
    let file = File::open(&path).map_err(|_| IndexError::RunFileMissing {
        path: path.display().to_string(),
    })?;
    Ok((file, name))
}
