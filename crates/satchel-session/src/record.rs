//! Per-session state held by the store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Key/value state for one session id plus its last access time.
///
/// Records have no locking of their own; the owning store mediates every
/// access and refreshes `last_access` as part of it.
#[derive(Debug)]
pub(crate) struct SessionRecord {
    /// Caller-assigned session id.
    pub(crate) id: String,

    /// Distinguishes this record from earlier ones created under the same id.
    pub(crate) generation: u64,

    /// Wall-clock creation time, for diagnostics only.
    pub(crate) created_at: DateTime<Utc>,

    /// Monotonic time of the last get/set/delete.
    pub(crate) last_access: Instant,

    pub(crate) attributes: HashMap<String, Value>,
}

impl SessionRecord {
    pub(crate) fn new(id: impl Into<String>, generation: u64) -> Self {
        Self {
            id: id.into(),
            generation,
            created_at: Utc::now(),
            last_access: Instant::now(),
            attributes: HashMap::new(),
        }
    }

    /// How long the record has been idle as of `now`.
    pub(crate) fn idle_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }

    pub(crate) fn is_expired_at(&self, now: Instant, max_idle: Duration) -> bool {
        self.idle_at(now) >= max_idle
    }
}
