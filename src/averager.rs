//! Continuous load averaging over configured time slots.
//!
//! [`SysLoad`] owns one bounded history per configured slot. While running,
//! a background task measures load once per [`SAMPLING_CADENCE`] and feeds
//! every slot's history from that single measurement stream; `average`
//! reads the per-slot means on demand.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::config::SlotConfig;
use crate::cputime::{CpuTimeSource, ProcStatSource};
use crate::error::Error;
use crate::history::LoadHistory;
use crate::sampler::{self, truncate_tenths};

/// Interval between two samples of the continuous loop.
pub const SAMPLING_CADENCE: Duration = Duration::from_millis(1000);

/// Continuous CPU load averager.
///
/// Lifecycle: idle after construction, running after [`start`], idle again
/// after [`stop`]. Each `start` reinitializes all histories. Instances
/// share nothing; dropping the last handle ends the sampling loop at its
/// next checkpoint.
///
/// [`start`]: SysLoad::start
/// [`stop`]: SysLoad::stop
pub struct SysLoad {
    inner: Arc<Inner>,
}

struct Inner {
    config: SlotConfig,
    source: Arc<dyn CpuTimeSource>,
    histories: DashMap<String, LoadHistory>,
    running: AtomicBool,
    /// Bumped on every `start`; a loop spawned under an older value exits
    /// instead of feeding a restarted instance.
    generation: AtomicU64,
}

impl SysLoad {
    /// Creates an averager reading CPU times from `/proc/stat`.
    pub fn new(config: SlotConfig) -> Self {
        Self::with_source(config, ProcStatSource::new())
    }

    /// Creates an averager with a custom CPU time source.
    pub fn with_source<S>(config: SlotConfig, source: S) -> Self
    where
        S: CpuTimeSource + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                config,
                source: Arc::new(source),
                histories: DashMap::new(),
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Measures load once over `duration` without touching the histories.
    ///
    /// See [`sampler::measure`] for the measurement semantics.
    pub async fn measure(&self, duration: Duration) -> Result<f64, Error> {
        sampler::measure(&*self.inner.source, duration).await
    }

    /// Starts the continuous sampling loop.
    ///
    /// Allocates an empty history for every configured slot and spawns the
    /// loop on the current tokio runtime (must be called from within one).
    /// Fails with [`Error::AlreadyRunning`] if sampling is in progress.
    pub fn start(&self) -> Result<(), Error> {
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.histories.clear();
        for (slot, secs) in self.inner.config.iter() {
            self.inner.histories.insert(
                slot.to_string(),
                LoadHistory::new(slot_capacity(secs, SAMPLING_CADENCE)),
            );
        }

        info!(
            "starting continuous load sampling over {} slots",
            self.inner.config.len()
        );

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sampling_loop(inner, generation).await;
        });

        Ok(())
    }

    /// Stops the continuous sampling loop.
    ///
    /// An in-flight measurement is not cancelled; the loop observes the
    /// flag at its next checkpoint and exits. Fails with
    /// [`Error::NotRunning`] if sampling was not started.
    pub fn stop(&self) -> Result<(), Error> {
        if self
            .inner
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::NotRunning);
        }

        info!("stopping continuous load sampling");
        Ok(())
    }

    /// Returns the averaged load per slot, truncated to one decimal.
    ///
    /// Slots without any samples yet report 0.0. May be called repeatedly
    /// and concurrently with the sampling loop. Fails with
    /// [`Error::NotRunning`] while idle.
    pub fn average(&self) -> Result<BTreeMap<String, f64>, Error> {
        if !self.inner.running.load(Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }

        let mut result = BTreeMap::new();
        for (slot, _) in self.inner.config.iter() {
            let mean = self
                .inner
                .histories
                .get(slot)
                .map(|history| history.mean())
                .unwrap_or(0.0);
            result.insert(slot.to_string(), truncate_tenths(mean));
        }
        Ok(result)
    }
}

impl Drop for SysLoad {
    fn drop(&mut self) {
        // The loop holds its own Arc to the shared state; lowering the flag
        // here lets it exit at its next checkpoint instead of leaking.
        self.inner.running.store(false, Ordering::SeqCst);
    }
}

/// Number of samples a slot's window holds at the given cadence.
fn slot_capacity(slot_secs: u64, cadence: Duration) -> usize {
    ((slot_secs * 1000) as f64 / cadence.as_millis() as f64).round() as usize
}

/// The self-paced sampling loop: each iteration fully completes (including
/// the measurement's own timer wait) before the next begins, so successive
/// starts are spaced by roughly the cadence without ever overlapping.
async fn sampling_loop(inner: Arc<Inner>, generation: u64) {
    loop {
        if !inner.running.load(Ordering::SeqCst)
            || inner.generation.load(Ordering::SeqCst) != generation
        {
            debug!("sampling loop exiting");
            return;
        }

        let load = match sampler::measure(&*inner.source, SAMPLING_CADENCE).await {
            Ok(load) => load,
            Err(e) => {
                warn!("load measurement failed, skipping sample: {}", e);
                tokio::time::sleep(SAMPLING_CADENCE).await;
                continue;
            }
        };

        // A loop retired while measuring must not feed the fresh histories
        // of a restarted instance.
        if inner.generation.load(Ordering::SeqCst) != generation {
            return;
        }

        for (slot, _) in inner.config.iter() {
            if let Some(mut history) = inner.histories.get_mut(slot) {
                history.push(load);
            }
        }
        debug!("recorded load sample: {}", load);
    }
}
