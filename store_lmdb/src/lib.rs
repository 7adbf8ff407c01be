//! LMDB storage backend for the Agora governance chain.
//!
//! Implements [`agora_store::KvStore`] using the `heed` LMDB bindings. All
//! module state lives in one named database inside a single environment, so
//! governance, bank and staking keys share one ordered key space and one
//! write transaction per committed batch.

pub mod environment;
pub mod error;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use kv::LmdbKvStore;
