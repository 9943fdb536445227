//! Cache Store Module
//!
//! Top-level owner→namespace registry.

use dashmap::mapref::one::Ref;
use dashmap::DashMap;

use crate::cache::{canonical, Namespace, StoreStats};

/// Read guard on a namespace held by the store.
///
/// While a guard is alive the namespace cannot be removed, so inserts made
/// through it are never lost to a concurrent [`Store::remove_if_empty`].
/// Guards must not be held across `.await` points or while calling back into
/// the store.
pub type NamespaceRef<'a> = Ref<'a, String, Namespace>;

// == Cache Store ==
/// Process-wide owner→namespace registry.
///
/// Created once at startup and shared through the application state.
#[derive(Debug, Default)]
pub struct Store {
    /// Namespaces keyed by canonical owner
    namespaces: DashMap<String, Namespace>,
}

impl Store {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Namespace ==
    /// Returns the owner's namespace without creating it.
    pub fn namespace(&self, owner: &str) -> Option<NamespaceRef<'_>> {
        self.namespaces.get(&canonical(owner))
    }

    // == Namespace Or Create ==
    /// Returns the owner's namespace, creating an empty one if absent.
    pub fn namespace_or_create(&self, owner: &str) -> NamespaceRef<'_> {
        self.namespaces
            .entry(canonical(owner))
            .or_default()
            .downgrade()
    }

    // == Remove If Empty ==
    /// Drops the owner's namespace iff it holds no entries.
    ///
    /// The emptiness check runs under the shard write lock, which excludes
    /// every outstanding [`NamespaceRef`] for this owner.
    pub fn remove_if_empty(&self, owner: &str) -> bool {
        self.namespaces
            .remove_if(&canonical(owner), |_, namespace| namespace.is_empty())
            .is_some()
    }

    // == Stats ==
    /// Returns a snapshot of namespace and entry counts.
    pub fn stats(&self) -> StoreStats {
        let entries = self.namespaces.iter().map(|namespace| namespace.len()).sum();
        StoreStats::new(self.namespaces.len(), entries)
    }

    // == Length ==
    /// Returns the number of owners with at least one entry.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = Store::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert!(store.namespace("nobody").is_none());
    }

    #[test]
    fn test_namespace_or_create() {
        let store = Store::new();

        {
            let ns = store.namespace_or_create("Alice");
            ns.upsert("Alice", "k", "v".to_string(), None, None, None, at(0));
        }

        assert_eq!(store.len(), 1);
        let ns = store.namespace("ALICE").unwrap();
        assert_eq!(ns.get("k", at(0)).unwrap().owner, "Alice");
    }

    #[test]
    fn test_namespace_or_create_reuses_existing() {
        let store = Store::new();

        store
            .namespace_or_create("o")
            .upsert("o", "a", "1".to_string(), None, None, None, at(0));
        store
            .namespace_or_create("O")
            .upsert("O", "b", "2".to_string(), None, None, None, at(0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.namespace("o").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_if_empty() {
        let store = Store::new();
        store
            .namespace_or_create("o")
            .upsert("o", "k", "v".to_string(), None, None, None, at(0));

        assert!(!store.remove_if_empty("o"), "Non-empty namespace must stay");

        let deleted = store.namespace("o").unwrap().delete_key("k");
        assert!(deleted);

        assert!(store.remove_if_empty("O"));
        assert!(store.namespace("o").is_none());
        assert!(!store.remove_if_empty("o"));
    }

    #[test]
    fn test_stats_counts_expired_entries() {
        let store = Store::new();
        store
            .namespace_or_create("a")
            .upsert("a", "k1", "v".to_string(), None, Some(1), None, at(0));
        store
            .namespace_or_create("b")
            .upsert("b", "k2", "v".to_string(), None, None, None, at(0));

        let stats = store.stats();
        assert_eq!(stats.owners, 2);
        assert_eq!(stats.entries, 2);
    }

    #[test]
    fn test_concurrent_insert_and_cleanup() {
        let store = Arc::new(Store::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("k{}-{}", worker, i);
                    store
                        .namespace_or_create("shared")
                        .upsert("shared", &key, "v".to_string(), None, None, None, at(0));

                    let removed = store
                        .namespace("shared")
                        .map(|ns| ns.delete_key(&key))
                        .unwrap_or(false);
                    assert!(removed, "Freshly inserted entry must still be present");
                    store.remove_if_empty("shared");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.namespace("shared").map_or(true, |ns| ns.is_empty()));
    }
}
