//! Nullable bank: balances kept in the caller's key/value store.

use agora_store::{BankError, BankKeeper, KvStore, StoreError};
use agora_types::{Address, CoinBag};

const BALANCE_PREFIX: &[u8] = b"bank/balance/";
const BURNED_KEY: &[u8] = b"bank/burned";

/// A deterministic in-store bank for testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBank;

fn balance_key(address: &Address) -> Vec<u8> {
    let mut key = BALANCE_PREFIX.to_vec();
    key.extend_from_slice(address.as_bytes());
    key
}

fn read_bag(store: &dyn KvStore, key: &[u8]) -> Result<CoinBag, StoreError> {
    match store.get(key)? {
        Some(bytes) => bincode::deserialize(&bytes)
            .map_err(|e| StoreError::Serialization(e.to_string())),
        None => Ok(CoinBag::new()),
    }
}

fn write_bag(store: &dyn KvStore, key: &[u8], bag: &CoinBag) -> Result<(), StoreError> {
    if bag.is_zero() {
        return store.delete(key);
    }
    let bytes = bincode::serialize(bag).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.put(key, &bytes)
}

impl NullBank {
    pub fn new() -> Self {
        Self
    }

    /// Overwrite the balance of `address`.
    pub fn set_balance(
        &self,
        store: &dyn KvStore,
        address: &Address,
        amount: &CoinBag,
    ) -> Result<(), StoreError> {
        write_bag(store, &balance_key(address), amount)
    }

    /// Total amount destroyed through [`BankKeeper::burn_coins`].
    pub fn total_burned(&self, store: &dyn KvStore) -> Result<CoinBag, StoreError> {
        read_bag(store, BURNED_KEY)
    }

    fn debit(
        &self,
        store: &dyn KvStore,
        from: &Address,
        amount: &CoinBag,
    ) -> Result<(), BankError> {
        let key = balance_key(from);
        let available = read_bag(store, &key)?;
        let left = available
            .checked_sub(amount)
            .ok_or_else(|| BankError::InsufficientFunds {
                address: from.clone(),
                needed: amount.clone(),
                available: available.clone(),
            })?;
        write_bag(store, &key, &left)?;
        Ok(())
    }

    fn credit(&self, store: &dyn KvStore, key: &[u8], amount: &CoinBag) -> Result<(), BankError> {
        let current = read_bag(store, key)?;
        let updated = current
            .checked_add(amount)
            .map_err(|e| StoreError::Corruption(e.to_string()))?;
        write_bag(store, key, &updated)?;
        Ok(())
    }
}

impl BankKeeper for NullBank {
    fn send_coins(
        &self,
        store: &dyn KvStore,
        from: &Address,
        to: &Address,
        amount: &CoinBag,
    ) -> Result<(), BankError> {
        self.debit(store, from, amount)?;
        self.credit(store, &balance_key(to), amount)
    }

    fn burn_coins(
        &self,
        store: &dyn KvStore,
        from: &Address,
        amount: &CoinBag,
    ) -> Result<(), BankError> {
        self.debit(store, from, amount)?;
        self.credit(store, BURNED_KEY, amount)
    }

    fn balance(&self, store: &dyn KvStore, address: &Address) -> Result<CoinBag, BankError> {
        Ok(read_bag(store, &balance_key(address))?)
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
    fn test_send_and_insufficient_funds() {
        let store = MemoryStore::new();
        let bank = NullBank::new();
        bank.set_balance(&store, &addr("alice"), &CoinBag::single("agr", 10))
            .unwrap();

        bank.send_coins(&store, &addr("alice"), &addr("bob"), &CoinBag::single("agr", 4))
            .unwrap();
        assert_eq!(bank.balance(&store, &addr("alice")).unwrap(), CoinBag::single("agr", 6));
        assert_eq!(bank.balance(&store, &addr("bob")).unwrap(), CoinBag::single("agr", 4));

        let err = bank
            .send_coins(&store, &addr("bob"), &addr("alice"), &CoinBag::single("agr", 5))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_burn_tracks_total() {
        let store = MemoryStore::new();
        let bank = NullBank::new();
        bank.set_balance(&store, &addr("escrow"), &CoinBag::single("agr", 10))
            .unwrap();
        bank.burn_coins(&store, &addr("escrow"), &CoinBag::single("agr", 10))
            .unwrap();
        assert!(bank.balance(&store, &addr("escrow")).unwrap().is_zero());
        assert_eq!(bank.total_burned(&store).unwrap(), CoinBag::single("agr", 10));
    }
}
