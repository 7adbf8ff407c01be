//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators of the governance core (storage, bank,
//! staking) are abstracted behind traits in `agora-store`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! The bank and staking nullables keep their state inside the [`KvStore`]
//! they are handed, so a rolled-back message also rolls back its transfers.
//!
//! Usage: swap real implementations for nullables in tests.
//!
//! [`KvStore`]: agora_store::KvStore

pub mod bank;
pub mod stake;
pub mod store;

pub use bank::NullBank;
pub use stake::{NullStake, SlashRecord};
pub use store::MemoryStore;
