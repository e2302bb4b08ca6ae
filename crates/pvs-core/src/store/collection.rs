// ── Generic keyed entity collection ──
//
// Concurrent storage with O(1) lookups by registration key. Re-registering
// a key replaces the entity, so registration is idempotent.

use std::sync::Arc;

use dashmap::DashMap;

/// A concurrent, keyed collection for a single entity kind.
///
/// Uses `DashMap` so builders may register from several threads within a
/// pass; the outcome depends only on the set of keys, never on the order
/// registrations arrive in.
pub struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: registration key -> entity.
    by_key: DashMap<String, Arc<T>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        Self {
            by_key: DashMap::new(),
        }
    }

    /// Insert or replace an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        self.by_key.insert(key, Arc::new(entity)).is_none()
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.remove(key).map(|(_, v)| v)
    }

    /// Look up an entity by its registration key.
    pub(crate) fn get_by_key(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All entries, sorted by key.
    pub(crate) fn snapshot(&self) -> Vec<(String, Arc<T>)> {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.by_key.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Return all current keys in the collection.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.by_key.iter().map(|r| r.key().clone()).collect()
    }
}
