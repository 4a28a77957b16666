//! sysload - CPU load sampling demo.
//!
//! Takes a one-shot measurement, or runs the continuous averager and prints
//! per-slot averages as JSON lines until interrupted.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, Level};

use cli::{Args, LogLevel};
use sysload::{SlotConfig, SysLoad};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    let config = SlotConfig::preset(&args.slots)?;
    let sysload = SysLoad::new(config.clone());

    if args.once {
        let load = sysload
            .measure(Duration::from_millis(args.duration_ms))
            .await?;
        println!("{}", load);
        return Ok(());
    }

    info!(
        "slot configuration: {}",
        serde_json::to_string(&config).context("serializing slot configuration")?
    );

    sysload.start()?;

    let mut report = tokio::time::interval(Duration::from_secs(args.report_interval.max(1)));
    report.tick().await; // the first tick fires immediately

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };
    tokio::pin!(shutdown_signal);

    loop {
        tokio::select! {
            _ = report.tick() => {
                let averages = sysload.average()?;
                println!(
                    "{}",
                    serde_json::to_string(&averages).context("serializing averages")?
                );
            }
            _ = &mut shutdown_signal => break,
        }
    }

    sysload.stop()?;
    Ok(())
}
