use std::io;

use thiserror::Error;

/// Library-level error conditions. Binaries wrap these with `anyhow::Context`
/// before printing and exiting.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to open archive {path}")]
    ArchiveOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("run file missing: {path}")]
    RunFileMissing { path: String },

    #[error("corrupt run record in {path} at offset {offset}: {reason}")]
    CorruptRecord {
        path: String,
        offset: u64,
        reason: &'static str,
    },

    #[error("exclusive file creation did not converge after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
