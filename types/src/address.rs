//! Account and validator address type with `agr_` prefix.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An Agora account address, always prefixed with `agr_`.
///
/// Validators are identified by the address of their operator account, so the
/// same type is used for depositors, voters and validators. Ordering is the
/// byte order of the string, which is what deterministic iteration relies on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Agora addresses.
    pub const PREFIX: &'static str = "agr_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `agr_`. Use [`Address::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with agr_");
        Self(s)
    }

    /// Parse an address, rejecting a missing prefix or an empty body.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let addr = Self(raw.to_string());
        if addr.is_valid() {
            Ok(addr)
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// The address of a module account (e.g. the governance escrow).
    pub fn module(name: &str) -> Self {
        Self(format!("{}module_{}", Self::PREFIX, name))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes used inside composite store keys.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
