//! Ordered key/value storage trait.

use crate::StoreError;

/// A raw key/value pair as returned by prefix scans.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Direction of a prefix scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    Ascending,
    Descending,
}

/// A single write inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// A byte-ordered key/value store.
///
/// Keys sort lexicographically by bytes, so composite keys built from
/// big-endian integers iterate in numeric order. Methods take `&self`;
/// implementations use interior mutability.
pub trait KvStore {
    /// Point lookup.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite a value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// All pairs whose key starts with `prefix`, in the requested order.
    fn scan_prefix(&self, prefix: &[u8], order: ScanOrder) -> Result<Vec<KvPair>, StoreError>;

    /// The first pair under `prefix` in the requested order.
    ///
    /// Backends with cursors should override this to avoid a full scan.
    fn first_in_prefix(
        &self,
        prefix: &[u8],
        order: ScanOrder,
    ) -> Result<Option<KvPair>, StoreError> {
        Ok(self.scan_prefix(prefix, order)?.into_iter().next())
    }

    /// Apply several writes. Backends with transactions should apply them atomically.
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        for op in ops {
            match op {
                BatchOp::Put(key, value) => self.put(&key, &value)?,
                BatchOp::Delete(key) => self.delete(&key)?,
            }
        }
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
