// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Best-effort load time and memory usage logging.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::info;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Navigation and load timestamps for the current session.
#[derive(Debug, Clone, Copy)]
pub struct NavigationTiming {
    pub navigation_start: Instant,
    pub load_end: Instant,
}

impl NavigationTiming {
    #[must_use]
    pub fn load_time(&self) -> Duration {
        self.load_end.saturating_duration_since(self.navigation_start)
    }
}

/// Memory usage sample in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemoryUsage {
    #[must_use]
    pub fn used_mb(&self) -> u64 {
        round_mb(self.used_bytes)
    }

    #[must_use]
    pub fn total_mb(&self) -> u64 {
        round_mb(self.total_bytes)
    }
}

fn round_mb(bytes: u64) -> u64 {
    bytes.saturating_add(BYTES_PER_MB / 2) / BYTES_PER_MB
}

/// Memory introspection capability. Absent or unsupported probes return `None`.
pub trait MemoryProbe: Send + Sync {
    fn sample(&self) -> Option<MemoryUsage>;
}

/// Probe reading the process's own `/proc/self/status`.
///
/// `VmRSS` is reported as used and `VmSize` as total. On platforms without
/// procfs every sample is `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcMemoryProbe;

impl MemoryProbe for ProcMemoryProbe {
    fn sample(&self) -> Option<MemoryUsage> {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_proc_status(&status)
    }
}

fn parse_kb(line: &str, key: &str) -> Option<u64> {
    let rest = line.strip_prefix(key)?.strip_prefix(':')?;
    let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
    Some(kb * 1024)
}

/// Extract `VmRSS` and `VmSize` from procfs status text.
#[must_use]
pub fn parse_proc_status(status: &str) -> Option<MemoryUsage> {
    let mut used = None;
    let mut total = None;

    for line in status.lines() {
        if let Some(bytes) = parse_kb(line, "VmRSS") {
            used = Some(bytes);
        } else if let Some(bytes) = parse_kb(line, "VmSize") {
            total = Some(bytes);
        }
    }

    Some(MemoryUsage {
        used_bytes: used?,
        total_bytes: total?,
    })
}

/// Log a memory sample, rounded to whole megabytes.
pub fn log_memory(usage: MemoryUsage) {
    info!("[perf] memory: {} MB used / {} MB total", usage.used_mb(), usage.total_mb());
}

/// One-shot load time logger.
#[derive(Debug, Default)]
pub struct PerfLogger {
    load_logged: AtomicBool,
}

impl PerfLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log total load time the first time it is called; later calls return `None`.
    pub fn log_load_time(&self, timing: &NavigationTiming) -> Option<Duration> {
        if self.load_logged.swap(true, Ordering::SeqCst) {
            return None;
        }

        let load_time = timing.load_time();
        info!("[perf] page load time: {}ms", load_time.as_millis());
        Some(load_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tmatchday\nVmPeak:\t  300000 kB\nVmSize:\t  262144 kB\nVmRSS:\t   51712 kB\nThreads:\t8\n";

    #[test]
    fn test_parse_proc_status() {
        let usage = parse_proc_status(STATUS).unwrap();
        assert_eq!(usage.used_bytes, 51712 * 1024);
        assert_eq!(usage.total_mb(), 256);
        // 50.5 MB rounds up
        assert_eq!(usage.used_mb(), 51);
    }

    #[test]
    fn test_parse_missing_fields() {
        assert!(parse_proc_status("Name:\tmatchday\nVmRSS:\t 10 kB\n").is_none());
        assert!(parse_proc_status("").is_none());
    }

    #[test]
    fn test_load_time_logged_once() {
        let start = Instant::now();
        let timing = NavigationTiming {
            navigation_start: start,
            load_end: start + Duration::from_millis(850),
        };

        let perf = PerfLogger::new();
        assert_eq!(perf.log_load_time(&timing), Some(Duration::from_millis(850)));
        assert_eq!(perf.log_load_time(&timing), None);
    }
}
