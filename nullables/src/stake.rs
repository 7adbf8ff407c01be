//! Nullable staking registry: validators and delegations kept in the caller's store.

use agora_store::{Delegation, KvStore, ScanOrder, StakeError, StakeKeeper, StoreError, Validator};
use agora_types::{Address, BlockHeight, Bps};
use serde::{Deserialize, Serialize};

const VALIDATOR_PREFIX: &[u8] = b"stake/validator/";
const DELEGATION_PREFIX: &[u8] = b"stake/delegation/";
const SLASHES_KEY: &[u8] = b"stake/slashes";

/// A slash applied through [`StakeKeeper::slash`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashRecord {
    pub validator: Address,
    pub height: BlockHeight,
    pub power: u64,
    pub fraction: Bps,
    pub slashed_power: u64,
}

/// A deterministic in-store staking registry for testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStake;

fn validator_key(address: &Address) -> Vec<u8> {
    let mut key = VALIDATOR_PREFIX.to_vec();
    key.extend_from_slice(address.as_bytes());
    key
}

/// `prefix ++ validator ++ 0x00`; addresses are ASCII so the separator never collides.
fn delegation_prefix(validator: &Address) -> Vec<u8> {
    let mut key = DELEGATION_PREFIX.to_vec();
    key.extend_from_slice(validator.as_bytes());
    key.push(0);
    key
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl NullStake {
    pub fn new() -> Self {
        Self
    }

    /// Register (or replace) a bonded validator.
    pub fn add_validator(
        &self,
        store: &dyn KvStore,
        address: &Address,
        voting_power: u64,
        delegator_shares: u128,
    ) -> Result<(), StoreError> {
        let validator = Validator {
            address: address.clone(),
            voting_power,
            delegator_shares,
        };
        store.put(&validator_key(address), &encode(&validator)?)
    }

    /// Record a delegation of `shares` from `delegator` to `validator`.
    pub fn add_delegation(
        &self,
        store: &dyn KvStore,
        delegator: &Address,
        validator: &Address,
        shares: u128,
    ) -> Result<(), StoreError> {
        let delegation = Delegation {
            delegator: delegator.clone(),
            validator: validator.clone(),
            shares,
        };
        let mut key = delegation_prefix(validator);
        key.extend_from_slice(delegator.as_bytes());
        store.put(&key, &encode(&delegation)?)
    }

    /// Look up a single validator.
    pub fn validator(
        &self,
        store: &dyn KvStore,
        address: &Address,
    ) -> Result<Option<Validator>, StoreError> {
        store
            .get(&validator_key(address))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Every slash applied so far, oldest first.
    pub fn slashes(&self, store: &dyn KvStore) -> Result<Vec<SlashRecord>, StoreError> {
        match store.get(SLASHES_KEY)? {
            Some(bytes) => decode(&bytes),
            None => Ok(Vec::new()),
        }
    }
}

impl StakeKeeper for NullStake {
    fn bonded_validators(&self, store: &dyn KvStore) -> Result<Vec<Validator>, StakeError> {
        let mut validators = Vec::new();
        for (_key, bytes) in store.scan_prefix(VALIDATOR_PREFIX, ScanOrder::Ascending)? {
            let validator: Validator = decode(&bytes)?;
            if validator.voting_power > 0 {
                validators.push(validator);
            }
        }
        Ok(validators)
    }

    fn delegators_of(
        &self,
        store: &dyn KvStore,
        validator: &Address,
    ) -> Result<Vec<Delegation>, StakeError> {
        let mut delegations = Vec::new();
        for (_key, bytes) in store.scan_prefix(&delegation_prefix(validator), ScanOrder::Ascending)? {
            delegations.push(decode(&bytes)?);
        }
        Ok(delegations)
    }

    fn slash(
        &self,
        store: &dyn KvStore,
        validator: &Address,
        height: BlockHeight,
        power: u64,
        fraction: Bps,
    ) -> Result<(), StakeError> {
        let mut record = self
            .validator(store, validator)?
            .ok_or_else(|| StakeError::ValidatorNotFound(validator.clone()))?;
        let slashed_power = fraction.apply(power as u128) as u64;
        record.voting_power = record.voting_power.saturating_sub(slashed_power);
        store.put(&validator_key(validator), &encode(&record)?)?;

        let mut slashes = self.slashes(store)?;
        slashes.push(SlashRecord {
            validator: validator.clone(),
            height,
            power,
            fraction,
            slashed_power,
        });
        store.put(SLASHES_KEY, &encode(&slashes)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn addr(name: &str) -> Address {
        Address::new(format!("agr_{}", name))
    }

    #[test]
    fn test_bonded_validators_sorted_and_nonzero() {
        let store = MemoryStore::new();
        let stake = NullStake::new();
        stake.add_validator(&store, &addr("val_b"), 10, 10).unwrap();
        stake.add_validator(&store, &addr("val_a"), 20, 20).unwrap();
        stake.add_validator(&store, &addr("val_c"), 0, 0).unwrap();

        let bonded = stake.bonded_validators(&store).unwrap();
        let names: Vec<&str> = bonded.iter().map(|v| v.address.as_str()).collect();
        assert_eq!(names, vec!["agr_val_a", "agr_val_b"]);
    }

    #[test]
    fn test_delegators_scoped_to_validator() {
        let store = MemoryStore::new();
        let stake = NullStake::new();
        stake.add_delegation(&store, &addr("d1"), &addr("val"), 5).unwrap();
        stake.add_delegation(&store, &addr("d2"), &addr("val2"), 5).unwrap();
        let delegations = stake.delegators_of(&store, &addr("val")).unwrap();
        assert_eq!(delegations.len(), 1);
        assert_eq!(delegations[0].delegator, addr("d1"));
    }

    #[test]
    fn test_slash_reduces_power() {
        let store = MemoryStore::new();
        let stake = NullStake::new();
        stake.add_validator(&store, &addr("val"), 1_000, 1_000).unwrap();
        stake
            .slash(&store, &addr("val"), BlockHeight::new(7), 1_000, Bps::new(100).unwrap())
            .unwrap();
        assert_eq!(stake.validator(&store, &addr("val")).unwrap().unwrap().voting_power, 990);
        let slashes = stake.slashes(&store).unwrap();
        assert_eq!(slashes.len(), 1);
        assert_eq!(slashes[0].slashed_power, 10);

        assert!(matches!(
            stake.slash(&store, &addr("ghost"), BlockHeight::new(7), 1, Bps::ONE),
            Err(StakeError::ValidatorNotFound(_))
        ));
    }
}
