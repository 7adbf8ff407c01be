//! Staking capability: the bonded validator set, delegations and slashing.

use crate::kv::KvStore;
use crate::StoreError;
use agora_types::{Address, BlockHeight, Bps};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("validator {0} not found")]
    ValidatorNotFound(Address),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// A bonded validator as seen by governance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Operator address; a validator votes with this address.
    pub address: Address,
    /// Consensus voting power.
    pub voting_power: u64,
    /// Total delegator shares issued by this validator.
    pub delegator_shares: u128,
}

/// A delegation of shares from a delegator to a validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    pub shares: u128,
}

/// The validator/staking registry, owned by the stake module.
pub trait StakeKeeper {
    /// Currently bonded validators, ordered by address.
    fn bonded_validators(&self, store: &dyn KvStore) -> Result<Vec<Validator>, StakeError>;

    /// Delegations made to `validator`, ordered by delegator address.
    fn delegators_of(
        &self,
        store: &dyn KvStore,
        validator: &Address,
    ) -> Result<Vec<Delegation>, StakeError>;

    /// Slash `fraction` of `power` from `validator` for an infraction at `height`.
    fn slash(
        &self,
        store: &dyn KvStore,
        validator: &Address,
        height: BlockHeight,
        power: u64,
        fraction: Bps,
    ) -> Result<(), StakeError>;
}
