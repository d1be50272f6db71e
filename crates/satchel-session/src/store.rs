//! In-memory session store with recency ordering and idle-time sweeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::{MEMORY_PROVIDER, StoreConfig};
use crate::error::Result;
use crate::handle::Session;
use crate::provider::{SessionHandle, SessionProvider};
use crate::recency::{RecencyList, SlotId};
use crate::record::SessionRecord;

/// Index and recency list, always mutated together under one lock.
#[derive(Debug, Default)]
struct StoreInner {
    /// Session id to its slot in `order`.
    index: HashMap<String, SlotId>,

    /// Records, most recently touched first.
    order: RecencyList<SessionRecord>,

    /// Last generation handed out.
    generation: u64,
}

impl StoreInner {
    /// Insert a fresh record at the head, replacing any live record for `id`.
    fn insert_fresh(&mut self, id: &str) -> u64 {
        if let Some(slot) = self.index.remove(id) {
            self.order.remove(slot);
            debug!(session_id = %id, "Replacing live session");
        }

        self.generation += 1;
        let generation = self.generation;
        let slot = self.order.push_front(SessionRecord::new(id, generation));
        self.index.insert(id.to_string(), slot);
        generation
    }

    /// Slot of the live record for `id`, if it is still `generation`.
    fn live_slot(&self, id: &str, generation: u64) -> Option<SlotId> {
        let slot = *self.index.get(id)?;
        let record = self.order.get(slot)?;
        (record.generation == generation).then_some(slot)
    }

    fn promote(&mut self, slot: SlotId, now: Instant) {
        if let Some(record) = self.order.get_mut(slot) {
            record.last_access = now;
        }
        self.order.move_to_front(slot);
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.index.remove(id) {
            Some(slot) => {
                self.order.remove(slot);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len());
        for (slot, record) in self.order.iter() {
            assert_eq!(self.index.get(&record.id), Some(&slot));
        }
        let mut previous: Option<Instant> = None;
        for (_, record) in self.order.iter() {
            if let Some(newer) = previous {
                assert!(record.last_access <= newer, "recency order broken");
            }
            previous = Some(record.last_access);
        }
    }
}

/// In-memory session store.
///
/// Sessions are kept in a hash index over an arena-backed recency list:
/// - O(1) lookup, creation, removal and recency promotion
/// - [`sweep_expired`](Self::sweep_expired) walks from the least recently
///   used end and stops at the first live session, so its cost is
///   proportional to the number of sessions evicted
/// - a single mutex serializes every operation, reads included, since every
///   read promotes recency
///
/// Cloning is cheap and shares the underlying store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
    config: StoreConfig,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("sessions", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

impl MemoryStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::default())),
            config,
        }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create a new, empty session for `id`.
    ///
    /// A live session under the same id is discarded, attributes included;
    /// outstanding handles to it stop taking effect.
    pub fn create(&self, id: &str) -> Session {
        let generation = self.inner.lock().insert_fresh(id);
        debug!(session_id = %id, generation, "Session created");
        Session::new(id, generation, self.clone())
    }

    /// Return the live session for `id`, creating it if absent.
    ///
    /// Lookup does not refresh recency; the first key access does.
    pub fn read_or_create(&self, id: &str) -> Session {
        let mut inner = self.inner.lock();

        let existing = inner
            .index
            .get(id)
            .and_then(|slot| inner.order.get(*slot))
            .map(|record| record.generation);

        let generation = match existing {
            Some(generation) => {
                trace!(session_id = %id, "Session found");
                generation
            }
            None => {
                let generation = inner.insert_fresh(id);
                debug!(session_id = %id, generation, "Session created on read");
                generation
            }
        };
        drop(inner);

        Session::new(id, generation, self.clone())
    }

    /// Remove the session for `id`. No-op if absent.
    pub fn destroy(&self, id: &str) {
        if self.inner.lock().remove(id) {
            debug!(session_id = %id, "Session destroyed");
        }
    }

    /// Mark the session as just accessed and move it to the head of the
    /// recency order. Returns false if `id` is not live.
    pub fn touch(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.index.get(id).copied() {
            Some(slot) => {
                inner.promote(slot, Instant::now());
                trace!(session_id = %id, "Session touched");
                true
            }
            None => false,
        }
    }

    /// Remove every session idle for at least `max_idle`.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_expired(&self, max_idle: Duration) -> usize {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let mut evicted = 0;

        loop {
            let Some((slot, expired)) = inner
                .order
                .back()
                .map(|(slot, record)| (slot, record.is_expired_at(now, max_idle)))
            else {
                break;
            };

            // Everything closer to the head was touched more recently.
            if !expired {
                break;
            }

            if let Some(record) = inner.order.remove(slot) {
                inner.index.remove(&record.id);
                debug!(
                    session_id = %record.id,
                    idle_ms = record.idle_at(now).as_millis() as u64,
                    "Evicting expired session"
                );
                evicted += 1;
            }
        }

        if evicted > 0 {
            debug!(count = evicted, remaining = inner.order.len(), "Swept expired sessions");
        }

        evicted
    }

    /// Sweep with the configured `max_lifetime`.
    pub fn sweep(&self) -> usize {
        self.sweep_expired(self.config.max_lifetime)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// Check if the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().order.is_empty()
    }

    /// Check if `id` is live, without touching it.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().index.contains_key(id)
    }

    /// Live session ids, most recently touched first.
    pub fn ids_by_recency(&self) -> Vec<String> {
        self.inner
            .lock()
            .order
            .iter()
            .map(|(_, record)| record.id.clone())
            .collect()
    }

    /// Store statistics.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        StoreStats {
            live: inner.order.len(),
            slots: inner.order.slot_count(),
            free_slots: inner.order.free_count(),
        }
    }

    /// Run `f` on the record behind a handle, refreshing its recency.
    ///
    /// Returns `None` when the handle's record is no longer live.
    pub(crate) fn access<R>(
        &self,
        id: &str,
        generation: u64,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> Option<R> {
        let mut inner = self.inner.lock();
        let slot = inner.live_slot(id, generation)?;
        inner.promote(slot, Instant::now());
        trace!(session_id = %id, "Session accessed");
        inner.order.get_mut(slot).map(f)
    }

    /// Read from the record behind a handle without refreshing recency.
    pub(crate) fn peek<R>(
        &self,
        id: &str,
        generation: u64,
        f: impl FnOnce(&SessionRecord) -> R,
    ) -> Option<R> {
        let inner = self.inner.lock();
        let slot = inner.live_slot(id, generation)?;
        inner.order.get(slot).map(f)
    }

    pub(crate) fn created_at(&self, id: &str, generation: u64) -> Option<DateTime<Utc>> {
        self.peek(id, generation, |record| record.created_at)
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        self.inner.lock().assert_consistent();
    }
}

impl SessionProvider for MemoryStore {
    fn init(&self, id: &str) -> Result<Arc<dyn SessionHandle>> {
        Ok(Arc::new(self.create(id)))
    }

    fn read(&self, id: &str) -> Result<Arc<dyn SessionHandle>> {
        Ok(Arc::new(self.read_or_create(id)))
    }

    fn destroy(&self, id: &str) {
        MemoryStore::destroy(self, id);
    }

    fn gc(&self, max_lifetime: Duration) -> usize {
        self.sweep_expired(max_lifetime)
    }

    fn name(&self) -> &str {
        MEMORY_PROVIDER
    }
}

/// Store statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of live sessions.
    pub live: usize,

    /// Allocated arena slots.
    pub slots: usize,

    /// Arena slots waiting for reuse.
    pub free_slots: usize,
}
