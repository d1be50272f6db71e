//! In-memory session store with recency ordering and idle-time sweeping.
//!
//! This crate provides volatile per-client key/value state with:
//! - A hash index over an arena-backed recency list (O(1) lookup and promote)
//! - Recency refresh on every key access through a [`Session`] handle
//! - Early-terminating sweeps that reclaim idle sessions from the cold end
//! - Backend-neutral [`SessionProvider`] traits and a name-based registry
//! - An optional background [`Sweeper`] task
//!
//! # Example
//!
//! ```rust,ignore
//! use satchel_session::{MemoryStore, StoreConfig};
//! use std::time::Duration;
//!
//! let store = MemoryStore::with_config(
//!     StoreConfig::default().with_max_lifetime(Duration::from_secs(1800)),
//! );
//!
//! let session = store.read_or_create("c0ffee");
//! session.set("cart", serde_json::json!([42]));
//!
//! // Called from a timer
//! let evicted = store.sweep();
//! ```

mod config;
mod error;
mod handle;
mod provider;
mod recency;
mod record;
mod registry;
mod store;
mod sweeper;

pub use config::{DEFAULT_MAX_LIFETIME, DEFAULT_SWEEP_INTERVAL, MEMORY_PROVIDER, StoreConfig};
pub use error::{Error, Result};
pub use handle::Session;
pub use provider::{SessionHandle, SessionProvider};
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use store::{MemoryStore, StoreStats};
pub use sweeper::{Sweeper, SweeperConfig};
