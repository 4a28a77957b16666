//! CPU load sampling with rolling averages over configurable time windows.
//!
//! Similar in spirit to the Unix load average, but computed from direct
//! CPU-time deltas rather than scheduler run-queue statistics. Two pieces:
//!
//! - [`measure`]: a one-shot utilization measurement between two CPU-time
//!   snapshots separated by a timer wait.
//! - [`SysLoad`]: a continuous averager that samples once per second and
//!   keeps a bounded sliding window of samples per configured time slot.
//!
//! CPU times come from `/proc/stat` by default; anything implementing
//! [`CpuTimeSource`] can be substituted.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use sysload::{SlotConfig, SysLoad};
//!
//! # async fn demo() -> Result<(), sysload::Error> {
//! let sysload = SysLoad::new(SlotConfig::unix());
//!
//! // One-shot measurement over 100ms.
//! let load = sysload.measure(Duration::from_millis(100)).await?;
//! println!("current load: {}%", load);
//!
//! // Continuous averaging.
//! sysload.start()?;
//! // ...sometime later...
//! for (slot, load) in sysload.average()? {
//!     println!("{}: {}%", slot, load);
//! }
//! sysload.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod averager;
pub mod config;
pub mod cputime;
pub mod error;
mod history;
pub mod sampler;

// Re-export main types for convenience
pub use averager::{SysLoad, SAMPLING_CADENCE};
pub use config::SlotConfig;
pub use cputime::{CpuSnapshot, CpuTimeSource, ProcStatSource};
pub use error::Error;
pub use sampler::{measure, DEFAULT_MEASURE_DURATION};
