//! Transactional overlay over another [`KvStore`].
//!
//! Writes are buffered in memory and reach the parent only on
//! [`CacheStore::commit`], as a single [`KvStore::write_batch`]. If the cache
//! is dropped without committing, every buffered write is discarded. Reads see
//! the buffered writes layered over the parent.
//!
//! ```ignore
//! let cache = CacheStore::new(&store);
//! cache.put(b"k", b"v")?;
//! cache.commit()?; // or drop(cache) to roll back
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::kv::{BatchOp, KvPair, KvStore, ScanOrder};
use crate::StoreError;

/// Buffered writes: `Some(value)` for a put, `None` for a delete.
type Overlay = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

pub struct CacheStore<'a> {
    parent: &'a dyn KvStore,
    writes: RefCell<Overlay>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a dyn KvStore) -> Self {
        Self {
            parent,
            writes: RefCell::new(BTreeMap::new()),
        }
    }

    /// Number of buffered writes (puts and deletes).
    pub fn pending_writes(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Flush every buffered write to the parent in one batch.
    pub fn commit(self) -> Result<(), StoreError> {
        let ops = self
            .writes
            .into_inner()
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOp::Put(key, value),
                None => BatchOp::Delete(key),
            })
            .collect::<Vec<_>>();
        if ops.is_empty() {
            return Ok(());
        }
        self.parent.write_batch(ops)
    }

    /// Drop every buffered write.
    pub fn discard(self) {}
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(buffered) = self.writes.borrow().get(key) {
            return Ok(buffered.clone());
        }
        self.parent.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.writes
            .borrow_mut()
            .insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.borrow_mut().insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], order: ScanOrder) -> Result<Vec<KvPair>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .parent
            .scan_prefix(prefix, ScanOrder::Ascending)?
            .into_iter()
            .collect();
        for (key, value) in self.writes.borrow().iter() {
            if !key.starts_with(prefix) {
                continue;
            }
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        let pairs = merged.into_iter();
        Ok(match order {
            ScanOrder::Ascending => pairs.collect(),
            ScanOrder::Descending => pairs.rev().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal backing store for exercising the overlay.
    #[derive(Default)]
    struct MapStore(RefCell<BTreeMap<Vec<u8>, Vec<u8>>>);

    impl KvStore for MapStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(self.0.borrow().get(key).cloned())
        }
        fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
            self.0.borrow_mut().insert(key.to_vec(), value.to_vec());
            Ok(())
        }
        fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
            self.0.borrow_mut().remove(key);
            Ok(())
        }
        fn scan_prefix(&self, prefix: &[u8], order: ScanOrder) -> Result<Vec<KvPair>, StoreError> {
            let pairs = self
                .0
                .borrow()
                .iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>();
            Ok(match order {
                ScanOrder::Ascending => pairs,
                ScanOrder::Descending => pairs.into_iter().rev().collect(),
            })
        }
    }

    #[test]
    fn test_drop_discards_writes() {
        let base = MapStore::default();
        base.put(b"a", b"1").unwrap();
        {
            let cache = CacheStore::new(&base);
            cache.put(b"a", b"2").unwrap();
            cache.put(b"b", b"3").unwrap();
            assert_eq!(cache.get(b"a").unwrap(), Some(b"2".to_vec()));
        }
        assert_eq!(base.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(base.get(b"b").unwrap(), None);
    }

    #[test]
    fn test_commit_applies_puts_and_deletes() {
        let base = MapStore::default();
        base.put(b"a", b"1").unwrap();
        let cache = CacheStore::new(&base);
        cache.delete(b"a").unwrap();
        cache.put(b"b", b"2").unwrap();
        assert_eq!(cache.get(b"a").unwrap(), None);
        assert_eq!(cache.pending_writes(), 2);
        cache.commit().unwrap();
        assert_eq!(base.get(b"a").unwrap(), None);
        assert_eq!(base.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_scan_merges_overlay() {
        let base = MapStore::default();
        base.put(b"p1", b"x").unwrap();
        base.put(b"p2", b"y").unwrap();
        base.put(b"q1", b"z").unwrap();
        let cache = CacheStore::new(&base);
        cache.delete(b"p1").unwrap();
        cache.put(b"p3", b"w").unwrap();

        let keys: Vec<Vec<u8>> = cache
            .scan_prefix(b"p", ScanOrder::Ascending)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"p2".to_vec(), b"p3".to_vec()]);

        let last = cache.first_in_prefix(b"p", ScanOrder::Descending).unwrap();
        assert_eq!(last, Some((b"p3".to_vec(), b"w".to_vec())));
    }

    #[test]
    fn test_nested_caches() {
        let base = MapStore::default();
        let outer = CacheStore::new(&base);
        outer.put(b"k", b"outer").unwrap();
        {
            let inner = CacheStore::new(&outer);
            inner.put(b"k", b"inner").unwrap();
            inner.discard();
        }
        assert_eq!(outer.get(b"k").unwrap(), Some(b"outer".to_vec()));
        let inner = CacheStore::new(&outer);
        inner.put(b"j", b"1").unwrap();
        inner.commit().unwrap();
        outer.commit().unwrap();
        assert_eq!(base.get(b"j").unwrap(), Some(b"1".to_vec()));
        assert_eq!(base.get(b"k").unwrap(), Some(b"outer".to_vec()));
    }
}
