//! CLI arguments for the sysload demo binary.

use clap::{Parser, ValueEnum};

use sysload::DEFAULT_MEASURE_DURATION;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "sysload",
    about = "Samples aggregate CPU load and reports rolling averages per time slot",
    version
)]
pub struct Args {
    /// Time slot preset for continuous averaging ("standard" or "unix")
    #[arg(long, default_value = "standard")]
    pub slots: String,

    /// Seconds between printed average reports
    #[arg(long, default_value_t = 1)]
    pub report_interval: u64,

    /// Take a single measurement, print it, and exit
    #[arg(long)]
    pub once: bool,

    /// Duration of the one-shot measurement in milliseconds
    #[arg(long, default_value_t = DEFAULT_MEASURE_DURATION.as_millis() as u64)]
    pub duration_ms: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
