//! On-chain governance for the Agora chain.
//!
//! Proposals collect deposits until a minimum is reached, are voted on by
//! bonded validators and their delegators for a fixed number of blocks, and
//! are tallied at the end of the block in which their voting period expires.
//! Passed proposals take effect immediately (parameter changes, upgrade
//! scheduling); validators that did not vote are slashed.
//!
//! All state lives in a [`KvStore`](agora_store::KvStore) passed in through a
//! [`Context`]. Messages and the end-of-block pass each run inside a
//! [`CacheStore`](agora_store::CacheStore) so they apply completely or not at all.

pub mod ballot;
pub mod codec;
pub mod config;
pub mod context;
pub mod deposit;
pub mod engine;
pub mod error;
pub mod event;
pub mod execute;
pub mod genesis;
pub mod handler;
pub mod keys;
pub mod msg;
pub mod params;
pub mod processor;
pub mod proposal;
pub mod query;
pub mod queue;
pub mod registry;
pub mod tally;
pub mod vote;

pub use ballot::VoteBallot;
pub use config::{ConfigError, GenesisConfig, GovernanceConfig, LoggingConfig};
pub use context::Context;
pub use deposit::{DepositExpiryPolicy, DepositLedger};
pub use engine::{GovernanceEngine, MODULE_NAME};
pub use error::GovernanceError;
pub use event::{Tag, Tags};
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use handler::{handle_msg, MsgResult};
pub use msg::Msg;
pub use params::{
    DepositProcedure, GovParams, GovernableParam, ParamChange, TallyProcedure, VotingProcedure,
};
pub use processor::{EndBlockResult, GovernanceProcessor};
pub use proposal::{Proposal, ProposalKind, ProposalStatus, TallyResult, UpgradePlan};
pub use query::ProposalFilter;
pub use queue::{DualQueueScheduler, QueueEntry, QueueKind};
pub use registry::{ProposalDraft, ProposalRegistry};
pub use tally::{passes, tally, TallyOutcome};
pub use vote::{Deposit, Vote, VoteOption};
