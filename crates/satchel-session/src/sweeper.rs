//! Background task that sweeps idle sessions on a timer.
//!
//! The store never schedules itself. A host that wants periodic cleanup
//! spawns a [`Sweeper`] over its provider; each tick calls
//! [`SessionProvider::gc`] with the configured lifetime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::provider::SessionProvider;

/// A sweep holding the store lock longer than this is logged as slow.
const SLOW_SWEEP: Duration = Duration::from_millis(50);

/// Sweeper timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Time between sweeps.
    pub interval: Duration,

    /// Idle lifetime passed to each sweep.
    pub max_lifetime: Duration,
}

/// Handle to a running sweeper task.
///
/// Dropping the handle aborts the task; [`shutdown`](Self::shutdown) stops
/// it cleanly and waits for it to finish.
pub struct Sweeper {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    sweeps: Arc<AtomicU64>,
}

impl Sweeper {
    /// Spawn a sweeper on the current Tokio runtime.
    ///
    /// The first sweep runs one full interval after spawning.
    pub fn spawn(provider: Arc<dyn SessionProvider>, config: SweeperConfig) -> Result<Self> {
        if config.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        let (stop, mut stopped) = watch::channel(false);
        let sweeps = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&sweeps);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the immediate tick
            ticker.tick().await;

            info!(
                provider = provider.name(),
                interval_ms = config.interval.as_millis() as u64,
                max_lifetime_secs = config.max_lifetime.as_secs(),
                "Session sweeper started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let started = Instant::now();
                        let evicted = provider.gc(config.max_lifetime);
                        let elapsed = started.elapsed();
                        counter.fetch_add(1, Ordering::Relaxed);

                        if elapsed > SLOW_SWEEP {
                            warn!(
                                evicted,
                                elapsed_ms = elapsed.as_millis() as u64,
                                "Slow session sweep"
                            );
                        } else if evicted > 0 {
                            debug!(evicted, "Session sweep complete");
                        }
                    }
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }

            info!(provider = provider.name(), "Session sweeper stopped");
        });

        Ok(Self {
            stop,
            task: Some(task),
            sweeps,
        })
    }

    /// Number of completed sweeps.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Stop the sweeper and wait for the task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Session sweeper task failed");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("sweeps", &self.sweeps())
            .field("running", &self.task.is_some())
            .finish()
    }
}
