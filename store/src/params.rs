//! Parameter storage trait.

use crate::kv::KvStore;
use crate::StoreError;

/// Key prefix under which every parameter lives in the key/value store.
pub const PARAMS_PREFIX: &[u8] = b"params/";

/// Trait for storing module parameters as opaque encoded values.
///
/// Parameters live in the same transactional store as the state they
/// govern, so a parameter change and the proposal that caused it commit
/// together.
pub trait ParamStore {
    /// Store an encoded parameter value.
    fn set_param(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve an encoded parameter value, if set.
    fn get_param(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Retrieve a parameter that must exist.
    fn require_param(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get_param(key)?
            .ok_or_else(|| StoreError::NotFound(format!("param '{}'", key)))
    }
}

fn param_key(key: &str) -> Vec<u8> {
    let mut full = Vec::with_capacity(PARAMS_PREFIX.len() + key.len());
    full.extend_from_slice(PARAMS_PREFIX);
    full.extend_from_slice(key.as_bytes());
    full
}

impl<T: KvStore + ?Sized> ParamStore for T {
    fn set_param(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.put(&param_key(key), value)
    }

    fn get_param(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(&param_key(key))
    }
}
