//! Backend-neutral session interfaces.
//!
//! A session-management host talks to storage through [`SessionProvider`]
//! and to individual sessions through [`SessionHandle`]. The in-memory
//! [`MemoryStore`](crate::MemoryStore) is one implementation; disk or remote
//! backends plug in behind the same traits and are selected by name through
//! the [`ProviderRegistry`](crate::ProviderRegistry).

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;

/// Key/value access to one session.
///
/// Implementations refresh the session's recency on every call.
pub trait SessionHandle: Send + Sync {
    /// Value stored under `key`, or `None` if unset.
    fn get(&self, key: &str) -> Option<Value>;

    /// Insert or overwrite `key`.
    fn set(&self, key: &str, value: Value);

    /// Remove `key`. No-op if absent.
    fn delete(&self, key: &str);

    /// The session id.
    fn id(&self) -> &str;
}

/// Storage backend for sessions.
///
/// The `Result` on [`init`](Self::init) and [`read`](Self::read) exists for
/// backends that can fail (a networked store, say); the in-memory backend
/// always returns `Ok`.
pub trait SessionProvider: Send + Sync {
    /// Start a fresh session for `id`, replacing any existing one.
    fn init(&self, id: &str) -> Result<Arc<dyn SessionHandle>>;

    /// Return the session for `id`, starting one if absent.
    fn read(&self, id: &str) -> Result<Arc<dyn SessionHandle>>;

    /// Remove the session for `id`. No-op if absent.
    fn destroy(&self, id: &str);

    /// Remove sessions idle for at least `max_lifetime`.
    /// Returns the number removed.
    fn gc(&self, max_lifetime: Duration) -> usize;

    /// Name this backend is registered under.
    fn name(&self) -> &str;
}
