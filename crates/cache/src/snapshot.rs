//! Read-through snapshot cache keyed by query identity, backed by DashMap
//! for lock-free concurrent access. Holds immutable query results; the
//! aggregation core itself stays stateless.

use dashmap::DashMap;
use remindhub_core::RemindResult;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which upstream collection a cached snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Leads,
    AuditLog,
    Chats,
}

/// Cache key: query kind plus its serialized parameters (filter values,
/// date bounds). Identical parameters hit the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: QueryKind,
    pub params: String,
}

impl QueryKey {
    pub fn new(kind: QueryKind, params: impl Into<String>) -> Self {
        Self {
            kind,
            params: params.into(),
        }
    }
}

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// Keyed snapshot cache with externally triggered invalidation. The TTL is
/// a backstop against a missed invalidation, not the primary freshness
/// mechanism: mutations to the store invalidate the affected kind.
pub struct SnapshotCache<T> {
    store: Arc<DashMap<QueryKey, Entry<T>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<T: Clone> SnapshotCache<T> {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::with_capacity(max_entries)),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Get a snapshot, returns None if missing or past the TTL backstop.
    pub fn get(&self, key: &QueryKey) -> Option<T> {
        let entry = self.store.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.store.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert or refresh a snapshot. When over capacity, a brand-new key
    /// is skipped rather than evicting (expired entries free the space).
    pub fn put(&self, key: QueryKey, value: T) {
        if self.store.len() >= self.max_entries && !self.store.contains_key(&key) {
            return;
        }
        self.store.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Read-through: return the cached snapshot or load, store, and
    /// return a fresh one.
    pub fn get_or_insert_with(&self, key: &QueryKey, load: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = load();
        self.put(key.clone(), value.clone());
        value
    }

    /// Fallible read-through for loaders that hit the network. A load
    /// failure is propagated unchanged and nothing is cached.
    pub fn get_or_try_insert_with(
        &self,
        key: &QueryKey,
        load: impl FnOnce() -> RemindResult<T>,
    ) -> RemindResult<T> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = load()?;
        self.put(key.clone(), value.clone());
        Ok(value)
    }

    /// Drop one entry. Returns true if it was present.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.store.remove(key).is_some()
    }

    /// Drop every entry for one query kind. Called when the underlying
    /// collection changes. Returns the number of entries dropped.
    pub fn invalidate_kind(&self, kind: QueryKind) -> usize {
        let before = self.store.len();
        self.store.retain(|key, _| key.kind != kind);
        before - self.store.len()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Remove expired entries. Call periodically from a maintenance task.
    pub fn evict_expired(&self) -> usize {
        let before = self.store.len();
        self.store
            .retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        before - self.store.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindhub_core::RemindError;

    fn leads_key(params: &str) -> QueryKey {
        QueryKey::new(QueryKind::Leads, params)
    }

    #[test]
    fn test_read_through_loads_once() {
        let cache: SnapshotCache<Vec<u32>> = SnapshotCache::new(3600, 16);
        let key = leads_key("range=2025-12");

        let mut loads = 0;
        for _ in 0..3 {
            let value = cache.get_or_insert_with(&key, || {
                loads += 1;
                vec![1, 2, 3]
            });
            assert_eq!(value, vec![1, 2, 3]);
        }
        assert_eq!(loads, 1);
    }

    #[test]
    fn test_distinct_params_are_distinct_entries() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(3600, 16);
        cache.put(leads_key("a"), 1);
        cache.put(leads_key("b"), 2);
        assert_eq!(cache.get(&leads_key("a")), Some(1));
        assert_eq!(cache.get(&leads_key("b")), Some(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_kind_drops_only_that_kind() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(3600, 16);
        cache.put(leads_key("a"), 1);
        cache.put(QueryKey::new(QueryKind::Chats, "all"), 2);

        assert_eq!(cache.invalidate_kind(QueryKind::Leads), 1);
        assert!(cache.get(&leads_key("a")).is_none());
        assert_eq!(cache.get(&QueryKey::new(QueryKind::Chats, "all")), Some(2));
    }

    #[test]
    fn test_over_capacity_skips_new_keys() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(3600, 1);
        cache.put(leads_key("a"), 1);
        cache.put(leads_key("b"), 2);
        assert_eq!(cache.len(), 1);
        // Existing keys still refresh.
        cache.put(leads_key("a"), 9);
        assert_eq!(cache.get(&leads_key("a")), Some(9));
    }

    #[test]
    fn test_failed_load_is_propagated_and_not_cached() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(3600, 16);
        let key = leads_key("a");

        let result =
            cache.get_or_try_insert_with(&key, || Err(RemindError::Fetch("timeout".into())));
        assert!(matches!(result, Err(RemindError::Fetch(_))));
        assert!(cache.is_empty());

        let result = cache.get_or_try_insert_with(&key, || Ok(7));
        assert_eq!(result.ok(), Some(7));
        assert_eq!(cache.get(&key), Some(7));
    }
}
