//! In-memory dedup store
//!
//! A single `RwLock` guards the map: lookups share the read lock, while `put`,
//! `claim`, `delete`, and `reset_all` take the write lock.

use crate::state::PageState;
use crate::store::traits::{ClaimOutcome, DedupStore, StoreResult};
use crate::store::PageRecord;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, PageRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records
    pub fn with_records(records: impl IntoIterator<Item = PageRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.url.clone(), record))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }

    // A panic in another task while holding the lock cannot leave a record half
    // written (every write is a single map operation), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PageRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PageRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DedupStore for MemoryStore {
    fn get(&self, url: &str) -> StoreResult<Option<PageRecord>> {
        Ok(self.read().get(url).cloned())
    }

    fn put(&self, record: PageRecord) -> StoreResult<()> {
        let mut records = self.write();
        let previous = records
            .get(&record.url)
            .map(|r| r.state())
            .unwrap_or(PageState::Unseen);
        let next = record.state();

        if previous != next && !previous.can_transition_to(next) {
            tracing::debug!(
                url = %record.url,
                "Overwriting record out of order: {} -> {}",
                previous,
                next
            );
        }

        records.insert(record.url.clone(), record);
        Ok(())
    }

    fn claim(&self, url: &str) -> StoreResult<ClaimOutcome> {
        match self.write().entry(url.to_string()) {
            Entry::Occupied(entry) => Ok(ClaimOutcome::Existing(entry.get().clone())),
            Entry::Vacant(entry) => {
                entry.insert(PageRecord::claimed(url));
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    fn delete(&self, url: &str) -> StoreResult<()> {
        self.write().remove(url);
        Ok(())
    }

    fn reset_all(&self) -> StoreResult<()> {
        let mut records = self.write();
        tracing::info!("Resetting dedup store ({} records)", records.len());
        records.clear();
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get("http://a.test").unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_put_then_get() {
        let store = MemoryStore::new();
        let freq = HashMap::from([("dog".to_string(), 1)]);
        store
            .put(PageRecord::resolved("http://a.test", freq.clone()))
            .unwrap();

        let record = store.get("http://a.test").unwrap().unwrap();
        assert_eq!(record.word_frequency, Some(freq));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_put_overwrites_same_key() {
        let store = MemoryStore::new();
        store.put(PageRecord::claimed("http://a.test")).unwrap();
        store
            .put(PageRecord::resolved("http://a.test", HashMap::new()))
            .unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert!(store.get("http://a.test").unwrap().unwrap().state().has_result());
    }

    #[test]
    fn test_claim_absent_url() {
        let store = MemoryStore::new();
        assert_eq!(store.claim("http://a.test").unwrap(), ClaimOutcome::Claimed);

        let record = store.get("http://a.test").unwrap().unwrap();
        assert!(record.claimed);
        assert!(record.word_frequency.is_none());
    }

    #[test]
    fn test_claim_existing_url_returns_record() {
        let store = MemoryStore::new();
        store.claim("http://a.test").unwrap();

        match store.claim("http://a.test").unwrap() {
            ClaimOutcome::Existing(record) => assert!(record.claimed),
            ClaimOutcome::Claimed => panic!("second claim must not win"),
        }

        let resolved = PageRecord::resolved("http://b.test", HashMap::new());
        store.put(resolved.clone()).unwrap();
        assert_eq!(
            store.claim("http://b.test").unwrap(),
            ClaimOutcome::Existing(resolved)
        );
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if store.claim("http://race.test").unwrap() == ClaimOutcome::Claimed {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_delete_and_reset() {
        let store = MemoryStore::with_records([
            PageRecord::claimed("http://a.test"),
            PageRecord::claimed("http://b.test"),
        ]);

        store.delete("http://a.test").unwrap();
        assert!(!store.contains("http://a.test").unwrap());
        assert!(store.contains("http://b.test").unwrap());

        store.reset_all().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_default_admin_ops_are_unsupported() {
        struct ReadOnlyStore;

        impl DedupStore for ReadOnlyStore {
            fn get(&self, _url: &str) -> StoreResult<Option<PageRecord>> {
                Ok(None)
            }
            fn put(&self, _record: PageRecord) -> StoreResult<()> {
                Ok(())
            }
            fn claim(&self, _url: &str) -> StoreResult<ClaimOutcome> {
                Ok(ClaimOutcome::Claimed)
            }
            fn len(&self) -> StoreResult<usize> {
                Ok(0)
            }
        }

        let store = ReadOnlyStore;
        assert!(matches!(
            store.delete("http://a.test"),
            Err(StoreError::Unsupported("delete"))
        ));
        assert!(matches!(
            store.reset_all(),
            Err(StoreError::Unsupported("reset_all"))
        ));
    }
}
