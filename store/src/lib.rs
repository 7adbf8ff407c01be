//! Abstract storage traits for the Agora governance chain.
//!
//! Every storage backend (LMDB, in-memory for testing) implements [`KvStore`].
//! The rest of the codebase depends only on the traits. The bank and staking
//! capabilities consumed by governance are declared here too, so that both
//! the governance core and the test nullables can depend on them without a
//! cycle.

pub mod bank;
pub mod cache;
pub mod error;
pub mod kv;
pub mod params;
pub mod stake;

pub use bank::{BankError, BankKeeper};
pub use cache::CacheStore;
pub use error::StoreError;
pub use kv::{BatchOp, KvPair, KvStore, ScanOrder};
pub use params::ParamStore;
pub use stake::{Delegation, StakeError, StakeKeeper, Validator};
