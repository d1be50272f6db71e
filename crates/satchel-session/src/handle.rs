//! Caller-facing session handle.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::provider::SessionHandle;
use crate::store::MemoryStore;

/// Handle to one session in a [`MemoryStore`].
///
/// Every accessor goes back through the store, so reading or writing a key
/// also marks the session as just accessed. A handle outlives its session
/// safely: once the session is destroyed, swept or replaced by a newer
/// `create`, reads return `None` and writes are dropped.
#[derive(Clone)]
pub struct Session {
    id: String,
    generation: u64,
    store: MemoryStore,
}

impl Session {
    pub(crate) fn new(id: &str, generation: u64, store: MemoryStore) -> Self {
        Self {
            id: id.to_string(),
            generation,
            store,
        }
    }

    /// The session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store
            .access(&self.id, self.generation, |record| {
                record.attributes.get(key).cloned()
            })
            .flatten()
    }

    /// Insert or overwrite `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.store.access(&self.id, self.generation, |record| {
            record.attributes.insert(key, value);
        });
    }

    /// Remove `key`. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        self.store.access(&self.id, self.generation, |record| {
            record.attributes.remove(key);
        });
    }

    /// Check whether this handle still refers to a live session.
    /// Does not refresh recency.
    pub fn is_live(&self) -> bool {
        self.store.peek(&self.id, self.generation, |_| ()).is_some()
    }

    /// When the session was created, if it is still live.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.store.created_at(&self.id, self.generation)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .finish()
    }
}

impl SessionHandle for Session {
    fn get(&self, key: &str) -> Option<Value> {
        Session::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        Session::set(self, key, value);
    }

    fn delete(&self, key: &str) {
        Session::delete(self, key);
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        let session = store.create("s1");

        assert_eq!(session.get("cart"), None);

        session.set("cart", json!([42]));
        assert_eq!(session.get("cart"), Some(json!([42])));

        session.set("cart", json!([42, 43]));
        assert_eq!(session.get("cart"), Some(json!([42, 43])));

        session.delete("cart");
        assert_eq!(session.get("cart"), None);

        // Deleting again is fine
        session.delete("cart");
    }

    #[test]
    fn test_set_accepts_plain_values() {
        let store = MemoryStore::new();
        let session = store.create("s1");

        session.set("name", "alice");
        session.set(String::from("visits"), 3);

        assert_eq!(session.get("name"), Some(json!("alice")));
        assert_eq!(session.get("visits"), Some(json!(3)));
    }

    #[test]
    fn test_handles_share_state() {
        let store = MemoryStore::new();
        let first = store.create("s1");
        let second = store.read_or_create("s1");

        first.set("k", json!("v"));
        assert_eq!(second.get("k"), Some(json!("v")));
    }

    #[test]
    fn test_created_at_and_liveness() {
        let store = MemoryStore::new();
        let before = Utc::now();
        let session = store.create("s1");

        assert!(session.is_live());
        assert!(session.created_at().unwrap() >= before);

        store.destroy("s1");
        assert!(!session.is_live());
        assert!(session.created_at().is_none());
    }

    #[test]
    fn test_trait_object_access() {
        let store = MemoryStore::new();
        let handle: Box<dyn SessionHandle> = Box::new(store.create("s1"));

        handle.set("k", json!(1));
        assert_eq!(handle.get("k"), Some(json!(1)));
        handle.delete("k");
        assert_eq!(handle.get("k"), None);
        assert_eq!(handle.id(), "s1");
    }
}
