//! Block height type used throughout the protocol.
//!
//! Governance never looks at wall-clock time: every window (deposit period,
//! voting period) is measured in blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The genesis height.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The height `blocks` after this one (saturating).
    pub fn plus(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// The next block.
    pub fn next(&self) -> Self {
        self.plus(1)
    }

    /// Blocks elapsed since this height (relative to `now`).
    pub fn elapsed_since(&self, now: BlockHeight) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this height + period has been reached at `now`.
    pub fn has_expired(&self, period: u64, now: BlockHeight) -> bool {
        now.0 >= self.0.saturating_add(period)
    }

    /// Big-endian encoding, so that byte order matches numeric order in keys.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
