//! Bank capability: coin transfers and burns.

use crate::kv::KvStore;
use crate::StoreError;
use agora_types::{Address, CoinBag};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds in {address}: need {needed}, have {available}")]
    InsufficientFunds {
        address: Address,
        needed: CoinBag,
        available: CoinBag,
    },

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Account balance bookkeeping, owned by the bank module.
///
/// Every method receives the store of the enclosing operation so that coin
/// movements commit or roll back together with the governance writes that
/// caused them.
pub trait BankKeeper {
    /// Move `amount` from `from` to `to`.
    fn send_coins(
        &self,
        store: &dyn KvStore,
        from: &Address,
        to: &Address,
        amount: &CoinBag,
    ) -> Result<(), BankError>;

    /// Destroy `amount` held by `from`.
    fn burn_coins(
        &self,
        store: &dyn KvStore,
        from: &Address,
        amount: &CoinBag,
    ) -> Result<(), BankError>;

    /// Current balance of `address`.
    fn balance(&self, store: &dyn KvStore, address: &Address) -> Result<CoinBag, BankError>;
}
