//! CPU time retrieval from the /proc filesystem.
//!
//! This module provides the [`CpuTimeSource`] seam the sampler measures
//! against, plus the default `/proc/stat` implementation. Counters are
//! accumulated over all time categories and all cores, then averaged per
//! logical core, so snapshots are comparable across machines with different
//! core counts.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Error;

/// Cumulative CPU times at a single instant, averaged per logical core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuSnapshot {
    /// Accumulated time over all categories (user, nice, system, idle, ...).
    pub total: f64,
    /// Accumulated idle time.
    pub idle: f64,
}

/// Source of cumulative CPU time counters.
///
/// Counters must grow monotonically within the process's uptime, modulo
/// wraparound in the underlying kernel counters; the sampler compensates
/// for wrapped counters itself.
pub trait CpuTimeSource: Send + Sync {
    /// Reads the counters at the current instant.
    fn snapshot(&self) -> Result<CpuSnapshot, Error>;
}

/// CPU time source backed by `/proc/stat`.
pub struct ProcStatSource {
    path: PathBuf,
}

impl ProcStatSource {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/stat"),
        }
    }

    /// Reads from an alternative stat file instead of `/proc/stat`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuTimeSource for ProcStatSource {
    fn snapshot(&self) -> Result<CpuSnapshot, Error> {
        let content = fs::read_to_string(&self.path)?;
        parse_stat(&content).map_err(Error::from)
    }
}

/// Parses the aggregate "cpu" line from /proc/stat and averages it over the
/// number of "cpuN" per-core lines.
///
/// Format: "cpu  user nice system idle iowait irq softirq steal guest guest_nice"
fn parse_stat(content: &str) -> Result<CpuSnapshot, io::Error> {
    let mut aggregate: Option<(f64, f64)> = None;
    let mut cores = 0usize;

    for line in content.lines() {
        if !line.starts_with("cpu") {
            continue;
        }

        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or("");

        if name == "cpu" {
            let fields: Vec<f64> = parts.map(|p| p.parse::<f64>().unwrap_or(0.0)).collect();
            if fields.len() < 4 {
                return Err(io::Error::other(
                    "invalid aggregate cpu line: expected at least 4 time fields",
                ));
            }
            let total: f64 = fields.iter().sum();
            let idle = fields[3];
            aggregate = Some((total, idle));
        } else {
            cores += 1;
        }
    }

    let (total, idle) =
        aggregate.ok_or_else(|| io::Error::other("no aggregate cpu line found"))?;

    let cores = cores.max(1) as f64;
    Ok(CpuSnapshot {
        total: total / cores,
        idle: idle / cores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STAT_CONTENT: &str = "\
cpu  100 0 100 800 0 0 0 0 0 0
cpu0 50 0 50 400 0 0 0 0 0 0
cpu1 50 0 50 400 0 0 0 0 0 0
intr 12345
ctxt 67890
btime 1700000000
";

    #[test]
    fn test_parse_stat_averages_per_core() {
        let snapshot = parse_stat(STAT_CONTENT).unwrap();

        // Aggregate total 1000 and idle 800, over two cores.
        assert_eq!(snapshot.total, 500.0);
        assert_eq!(snapshot.idle, 400.0);
    }

    #[test]
    fn test_parse_stat_single_core_fallback() {
        // No cpuN lines at all; aggregate is taken as-is.
        let snapshot = parse_stat("cpu  10 0 10 80 0 0 0 0 0 0\n").unwrap();
        assert_eq!(snapshot.total, 100.0);
        assert_eq!(snapshot.idle, 80.0);
    }

    #[test]
    fn test_parse_stat_missing_cpu_line() {
        let result = parse_stat("intr 12345\nctxt 67890\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_stat_truncated_cpu_line() {
        let result = parse_stat("cpu  10 0 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_proc_stat_source_reads_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let stat_path = dir.path().join("stat");
        std::fs::write(&stat_path, STAT_CONTENT).expect("Failed to write stat file");

        let source = ProcStatSource::with_path(&stat_path);
        let snapshot = source.snapshot().unwrap();

        assert_eq!(snapshot.total, 500.0);
        assert_eq!(snapshot.idle, 400.0);
    }

    #[test]
    fn test_proc_stat_source_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");

        let source = ProcStatSource::with_path(dir.path().join("stat"));
        let result = source.snapshot();
        assert!(matches!(result, Err(Error::CpuTimes(_))));
    }
}
