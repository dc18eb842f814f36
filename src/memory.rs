//! Memory probing that drives the mapper's flush decision.
//!
//! `/proc/self/status` is Linux-specific; non-Linux builds fall back to an
//! explicit byte-accounting probe fed by [`crate::index::InMemoryIndex`]'s
//! own estimate, as the design notes prescribe.

pub trait EstimateMemory {
    /// Current memory usage in kilobytes, best-effort. `0` if unavailable.
    fn estimate_kb(&mut self) -> u64;

    /// Lets a probe that has no platform signal of its own (`ByteCounterProbe`)
    /// stay in sync with `InMemoryIndex::memory_estimate()`. A no-op on probes
    /// that read real process state.
    fn sync_with_index_estimate(&mut self, _bytes: u64) {}
}

#[cfg(target_os = "linux")]
pub struct ProcStatusProbe;

#[cfg(target_os = "linux")]
impl ProcStatusProbe {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "linux")]
impl EstimateMemory for ProcStatusProbe {
    fn estimate_kb(&mut self) -> u64 {
        let contents = match std::fs::read_to_string("/proc/self/status") {
            Ok(c) => c,
            Err(_) => return 0,
        };

        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("VmSize:") {
                let digits: String = rest.trim().split_whitespace().next().unwrap_or("").into();
                if let Ok(kb) = digits.parse() {
                    return kb;
                }
            }
        }

        0
    }
}

/// Portable fallback: accumulates an explicit byte estimate on each call to
/// [`record`](ByteCounterProbe::record), reported in KB.
#[derive(Default)]
pub struct ByteCounterProbe {
    bytes: u64,
}

impl ByteCounterProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, bytes: u64) {
        self.bytes += bytes;
    }

    pub fn reset(&mut self) {
        self.bytes = 0;
    }
}

impl EstimateMemory for ByteCounterProbe {
    fn estimate_kb(&mut self) -> u64 {
        self.bytes / 1024
    }

    fn sync_with_index_estimate(&mut self, bytes: u64) {
        self.bytes = bytes;
    }
}

/// The probe a mapper binary actually uses: the platform probe on Linux,
/// the byte counter everywhere else.
#[cfg(target_os = "linux")]
pub type DefaultProbe = ProcStatusProbe;

#[cfg(not(target_os = "linux"))]
pub type DefaultProbe = ByteCounterProbe;

#[cfg(target_os = "linux")]
pub fn default_probe() -> DefaultProbe {
    ProcStatusProbe::new()
}

#[cfg(not(target_os = "linux"))]
pub fn default_probe() -> DefaultProbe {
    ByteCounterProbe::new()
}
