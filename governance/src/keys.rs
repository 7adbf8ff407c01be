//! Persistent key layout of the governance module.
//!
//! Integers are big-endian so that byte order equals numeric order:
//!
//! | prefix | key suffix | value |
//! |---|---|---|
//! | `gov/next_id` | - | next proposal id (u64 BE) |
//! | `gov/p/` | id | `Proposal` |
//! | `gov/d/` | id ++ sequence | `Deposit` |
//! | `gov/v/` | id ++ voter | `Vote` |
//! | `gov/qi/` | deposit end height ++ id | empty (inactive queue) |
//! | `gov/qa/` | voting end height ++ id | empty (active queue) |
//! | `gov/upgrade` | - | `UpgradePlan` |

use agora_types::{Address, BlockHeight};

use crate::GovernanceError;

pub const NEXT_PROPOSAL_ID_KEY: &[u8] = b"gov/next_id";
pub const PROPOSAL_PREFIX: &[u8] = b"gov/p/";
pub const DEPOSIT_PREFIX: &[u8] = b"gov/d/";
pub const VOTE_PREFIX: &[u8] = b"gov/v/";
pub const INACTIVE_QUEUE_PREFIX: &[u8] = b"gov/qi/";
pub const ACTIVE_QUEUE_PREFIX: &[u8] = b"gov/qa/";
pub const UPGRADE_PLAN_KEY: &[u8] = b"gov/upgrade";

fn with_prefix(prefix: &[u8], extra: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + extra);
    key.extend_from_slice(prefix);
    key
}

pub fn proposal_key(proposal_id: u64) -> Vec<u8> {
    let mut key = with_prefix(PROPOSAL_PREFIX, 8);
    key.extend_from_slice(&proposal_id.to_be_bytes());
    key
}

/// Prefix of every deposit of one proposal.
pub fn deposits_prefix(proposal_id: u64) -> Vec<u8> {
    let mut key = with_prefix(DEPOSIT_PREFIX, 16);
    key.extend_from_slice(&proposal_id.to_be_bytes());
    key
}

pub fn deposit_key(proposal_id: u64, sequence: u64) -> Vec<u8> {
    let mut key = deposits_prefix(proposal_id);
    key.extend_from_slice(&sequence.to_be_bytes());
    key
}

/// The sequence number at the end of a deposit key.
pub fn deposit_sequence(key: &[u8]) -> Result<u64, GovernanceError> {
    trailing_u64(key).ok_or_else(|| GovernanceError::Codec("malformed deposit key".into()))
}

/// Prefix of every vote on one proposal.
pub fn votes_prefix(proposal_id: u64) -> Vec<u8> {
    let mut key = with_prefix(VOTE_PREFIX, 8);
    key.extend_from_slice(&proposal_id.to_be_bytes());
    key
}

pub fn vote_key(proposal_id: u64, voter: &Address) -> Vec<u8> {
    let mut key = votes_prefix(proposal_id);
    key.extend_from_slice(voter.as_bytes());
    key
}

pub fn queue_key(prefix: &[u8], expiry: BlockHeight, proposal_id: u64) -> Vec<u8> {
    let mut key = with_prefix(prefix, 16);
    key.extend_from_slice(&expiry.to_be_bytes());
    key.extend_from_slice(&proposal_id.to_be_bytes());
    key
}

/// Split a queue key back into (expiry, proposal id).
pub fn split_queue_key(prefix: &[u8], key: &[u8]) -> Result<(BlockHeight, u64), GovernanceError> {
    let body = key
        .strip_prefix(prefix)
        .filter(|body| body.len() == 16)
        .ok_or_else(|| GovernanceError::Codec("malformed queue key".into()))?;
    let mut expiry = [0u8; 8];
    let mut id = [0u8; 8];
    expiry.copy_from_slice(&body[..8]);
    id.copy_from_slice(&body[8..]);
    Ok((BlockHeight::from_be_bytes(expiry), u64::from_be_bytes(id)))
}

fn trailing_u64(key: &[u8]) -> Option<u64> {
    let start = key.len().checked_sub(8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[start..]);
    Some(u64::from_be_bytes(bytes))
}
