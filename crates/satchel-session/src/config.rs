//! Configuration for the session store and its sweeper.

use std::time::Duration;

use crate::sweeper::SweeperConfig;

/// Default idle lifetime before a session becomes eligible for sweeping.
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Default interval between sweeper passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Name of the built-in in-memory provider.
pub const MEMORY_PROVIDER: &str = "memory";

/// Configuration for a session store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Provider name used for registry lookup.
    pub provider: String,

    /// Sessions idle for at least this long are removed by a sweep.
    pub max_lifetime: Duration,

    /// Whether the host should run a background sweeper.
    /// If false, expired sessions stay until `sweep_expired` is called.
    pub enable_sweeper: bool,

    /// Interval between sweeper passes (if enabled).
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: MEMORY_PROVIDER.to_string(),
            max_lifetime: DEFAULT_MAX_LIFETIME,
            enable_sweeper: true,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider name.
    pub fn with_provider(mut self, name: impl Into<String>) -> Self {
        self.provider = name.into();
        self
    }

    /// Set the idle lifetime.
    pub fn with_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Enable or disable the background sweeper.
    pub fn with_sweeper(mut self, enabled: bool) -> Self {
        self.enable_sweeper = enabled;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sweeper settings derived from this configuration, or `None` when
    /// the sweeper is disabled.
    pub fn sweeper_config(&self) -> Option<SweeperConfig> {
        self.enable_sweeper.then(|| SweeperConfig {
            interval: self.sweep_interval,
            max_lifetime: self.max_lifetime,
        })
    }
}
