//! Coin amounts and multi-denomination coin bags.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! A [`CoinBag`] never stores zero entries, so two bags holding the same
//! value always compare equal.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single amount of one denomination.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins keyed by denomination, kept sorted by denom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinBag(BTreeMap<String, u128>);

impl CoinBag {
    /// The empty bag.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A bag holding a single coin.
    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        let mut bag = Self::new();
        if amount > 0 {
            bag.0.insert(denom.into(), amount);
        }
        bag
    }

    /// Build a bag from coins, merging duplicate denominations.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, TypesError> {
        let mut bag = Self::new();
        for coin in coins {
            bag = bag.checked_add(&Self::single(coin.denom, coin.amount))?;
        }
        Ok(bag)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount held of `denom` (zero when absent).
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// Coins in denomination order.
    pub fn coins(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, TypesError> {
        let mut out = self.0.clone();
        for (denom, amount) in &other.0 {
            let entry = out.entry(denom.clone()).or_insert(0);
            *entry = entry.checked_add(*amount).ok_or(TypesError::Overflow)?;
        }
        Ok(Self(out))
    }

    /// Subtract `other`, returning `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let mut out = self.0.clone();
        for (denom, amount) in &other.0 {
            let have = out.get(denom).copied().unwrap_or(0);
            let left = have.checked_sub(*amount)?;
            if left == 0 {
                out.remove(denom);
            } else {
                out.insert(denom.clone(), left);
            }
        }
        Some(Self(out))
    }

    /// Whether this bag holds at least `other` in every denomination of `other`.
    ///
    /// Always true for an empty `other`.
    pub fn is_all_gte(&self, other: &Self) -> bool {
        other
            .0
            .iter()
            .all(|(denom, amount)| self.amount_of(denom) >= *amount)
    }
}

impl fmt::Display for CoinBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (denom, amount) in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}{}", amount, denom)?;
            first = false;
        }
        Ok(())
    }
}

/// Parses `"10agr,5atom"`. The empty string is the empty bag.
impl FromStr for CoinBag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coins = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let split = part
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| TypesError::InvalidCoin(part.to_string()))?;
            let (amount, denom) = part.split_at(split);
            let amount: u128 = amount
                .parse()
                .map_err(|_| TypesError::InvalidCoin(part.to_string()))?;
            let valid_denom = denom.len() >= 2
                && denom.starts_with(|c: char| c.is_ascii_lowercase())
                && denom
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '/');
            if !valid_denom {
                return Err(TypesError::InvalidCoin(part.to_string()));
            }
            coins.push(Coin::new(denom, amount));
        }
        Self::from_coins(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_entries_are_dropped() {
        let bag = CoinBag::single("agr", 0);
        assert!(bag.is_zero());
        let a = CoinBag::single("agr", 5);
        assert_eq!(a.checked_sub(&a), Some(CoinBag::new()));
    }

    #[test]
    fn test_sub_underflow() {
        let a = CoinBag::single("agr", 5);
        let b = CoinBag::single("agr", 6);
        assert_eq!(a.checked_sub(&b), None);
        assert_eq!(a.checked_sub(&CoinBag::single("atom", 1)), None);
    }

    #[test]
    fn test_is_all_gte() {
        let bag: CoinBag = "10agr,5atom".parse().unwrap();
        assert!(bag.is_all_gte(&"10agr".parse().unwrap()));
        assert!(!bag.is_all_gte(&"11agr".parse().unwrap()));
        assert!(!bag.is_all_gte(&"1btc".parse().unwrap()));
        assert!(bag.is_all_gte(&CoinBag::new()));
    }

    #[test]
    fn test_parse_and_display() {
        let bag: CoinBag = "5atom, 10agr,3agr".parse().unwrap();
        assert_eq!(bag.amount_of("agr"), 13);
        assert_eq!(bag.to_string(), "13agr,5atom");
        assert!("".parse::<CoinBag>().unwrap().is_zero());
        assert!("agr".parse::<CoinBag>().is_err());
        assert!("10".parse::<CoinBag>().is_err());
        assert!("10A".parse::<CoinBag>().is_err());
    }
}
