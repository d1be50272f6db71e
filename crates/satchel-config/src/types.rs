//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [session]
//! provider = "memory"
//! max_lifetime_secs = 3600
//! sweep_interval_secs = 60
//! sweeper_enabled = true
//! ```

use std::time::Duration;

use satchel_session::{MEMORY_PROVIDER, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SatchelConfig {
    /// Session store configuration.
    pub session: Option<SessionConfig>,
}

impl SatchelConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: SatchelConfig = toml::from_str(toml_str)?;
        if let Some(ref session) = config.session {
            session.validate()?;
        }
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: SatchelConfig) {
        if other.session.is_some() {
            self.session = other.session;
        }
    }

    /// Session settings, falling back to defaults when `[session]` is absent.
    pub fn session_or_default(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session store configuration.
///
/// Controls which backend is used, how long idle sessions live, and how
/// often the sweeper runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Registered provider name.
    pub provider: String,
    /// Idle time in seconds after which a session is swept.
    pub max_lifetime_secs: u64,
    /// Interval in seconds between sweeper runs.
    pub sweep_interval_secs: u64,
    /// Whether the host runs a background sweeper.
    pub sweeper_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            provider: MEMORY_PROVIDER.to_string(),
            max_lifetime_secs: 3600,
            sweep_interval_secs: 60,
            sweeper_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Reject values the store cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.provider".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.sweeper_enabled && self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.sweep_interval_secs".to_string(),
                reason: "must be greater than zero when the sweeper is enabled".to_string(),
            });
        }
        Ok(())
    }

    /// Convert into the store's runtime configuration.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .with_provider(self.provider.clone())
            .with_max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
            .with_sweeper(self.sweeper_enabled)
    }
}
