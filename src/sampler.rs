//! Point-in-time load measurement.
//!
//! A measurement takes two CPU time snapshots separated by a timer wait and
//! derives the utilization percentage from the idle/total deltas.

use std::time::Duration;

use crate::cputime::{CpuSnapshot, CpuTimeSource};
use crate::error::Error;

/// Default duration for one-shot measurements.
pub const DEFAULT_MEASURE_DURATION: Duration = Duration::from_millis(100);

/// Largest counter value assumed representable by a CPU time source
/// (2^53 - 1, the exact-integer limit of an f64).
///
/// Used by the wraparound guard in [`load_between`]; a best-effort
/// heuristic, not an exact modular computation.
const MAX_SAFE_COUNTER: f64 = 9_007_199_254_740_991.0;

/// Measures system load over `duration`, in percent with one decimal.
///
/// The wait is a timer suspend; other tasks keep running while the
/// measurement window elapses. The result is usually within [0, 100] but is
/// not clamped: snapshot skew across cores can push it slightly outside.
/// A degenerate measurement with no elapsed CPU time reports 0.0.
pub async fn measure<S>(source: &S, duration: Duration) -> Result<f64, Error>
where
    S: CpuTimeSource + ?Sized,
{
    let start = source.snapshot()?;
    tokio::time::sleep(duration).await;
    let end = source.snapshot()?;
    Ok(load_between(start, end))
}

/// Derives the load percentage from two snapshots.
fn load_between(start: CpuSnapshot, end: CpuSnapshot) -> f64 {
    let (delta_total, delta_idle) = if end.total > start.total {
        (end.total - start.total, end.idle - start.idle)
    } else {
        // counter wrapped in the source
        (
            MAX_SAFE_COUNTER - start.total + end.total,
            MAX_SAFE_COUNTER - start.idle + end.idle,
        )
    };

    if delta_total == 0.0 {
        return 0.0;
    }

    truncate_tenths(100.0 - 100.0 * delta_idle / delta_total)
}

/// Truncates toward zero at one decimal place: 42.37 becomes 42.3.
pub(crate) fn truncate_tenths(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}
