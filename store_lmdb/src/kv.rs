//! LMDB implementation of KvStore.
//!
//! Single operations each run in their own write transaction; batches run in
//! one transaction, so a committed [`agora_store::CacheStore`] lands atomically.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use agora_store::{BatchOp, KvPair, KvStore, ScanOrder, StoreError};

use crate::LmdbError;

pub struct LmdbKvStore {
    pub(crate) env: Arc<Env>,
    pub(crate) state_db: Database<Bytes, Bytes>,
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .state_db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .map(|v| v.to_vec());
        Ok(val)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.state_db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.state_db
            .delete(&mut wtxn, key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], order: ScanOrder) -> Result<Vec<KvPair>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        match order {
            ScanOrder::Ascending => {
                let iter = self
                    .state_db
                    .prefix_iter(&rtxn, prefix)
                    .map_err(LmdbError::from)?;
                for result in iter {
                    let (key, val) = result.map_err(LmdbError::from)?;
                    results.push((key.to_vec(), val.to_vec()));
                }
            }
            ScanOrder::Descending => {
                let iter = self
                    .state_db
                    .rev_prefix_iter(&rtxn, prefix)
                    .map_err(LmdbError::from)?;
                for result in iter {
                    let (key, val) = result.map_err(LmdbError::from)?;
                    results.push((key.to_vec(), val.to_vec()));
                }
            }
        }
        Ok(results)
    }

    fn first_in_prefix(
        &self,
        prefix: &[u8],
        order: ScanOrder,
    ) -> Result<Option<KvPair>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let first = match order {
            ScanOrder::Ascending => self
                .state_db
                .prefix_iter(&rtxn, prefix)
                .map_err(LmdbError::from)?
                .next(),
            ScanOrder::Descending => self
                .state_db
                .rev_prefix_iter(&rtxn, prefix)
                .map_err(LmdbError::from)?
                .next(),
        };
        match first {
            Some(result) => {
                let (key, val) = result.map_err(LmdbError::from)?;
                Ok(Some((key.to_vec(), val.to_vec())))
            }
            None => Ok(None),
        }
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for op in &ops {
            match op {
                BatchOp::Put(key, value) => self
                    .state_db
                    .put(&mut wtxn, key.as_slice(), value.as_slice())
                    .map_err(LmdbError::from)?,
                BatchOp::Delete(key) => {
                    self.state_db
                        .delete(&mut wtxn, key.as_slice())
                        .map_err(LmdbError::from)?;
                }
            }
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops = ops.len(), "committed write batch");
        Ok(())
    }
}
