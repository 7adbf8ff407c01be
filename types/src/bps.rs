//! Fractions expressed in basis points (1 bps = 0.01%).
//!
//! All threshold and penalty arithmetic is done on integers so that every
//! node computes bit-identical results.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 10000 basis points = 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// A fraction in the closed range [0, 1], stored as basis points.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Bps(u32);

impl Bps {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(10_000);

    /// Create a fraction, rejecting values above 100%.
    pub fn new(bps: u32) -> Result<Self, TypesError> {
        if bps as u128 > BPS_DENOMINATOR {
            return Err(TypesError::InvalidFraction(bps));
        }
        Ok(Self(bps))
    }

    /// Create a fraction, clamping values above 100% to 100%.
    pub const fn clamped(bps: u32) -> Self {
        if bps > 10_000 {
            Self(10_000)
        } else {
            Self(bps)
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Whether this fraction is strictly above `numerator / denominator`.
    ///
    /// Compares by cross-multiplication; `denominator` must be non-zero.
    pub fn is_above_ratio(&self, numerator: u128, denominator: u128) -> bool {
        numerator.saturating_mul(BPS_DENOMINATOR) < (self.0 as u128).saturating_mul(denominator)
    }

    /// Whether `numerator / denominator` is strictly above this fraction.
    pub fn is_exceeded_by(&self, numerator: u128, denominator: u128) -> bool {
        numerator.saturating_mul(BPS_DENOMINATOR) > (self.0 as u128).saturating_mul(denominator)
    }

    /// `value * self`, rounded down.
    pub fn apply(&self, value: u128) -> u128 {
        value.saturating_mul(self.0 as u128) / BPS_DENOMINATOR
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
