//! Votes, vote options and deposits.

use agora_types::{Address, CoinBag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GovernanceError;

/// A vote on a governance proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    /// In favor of the proposal.
    Yes,
    /// Against the proposal.
    No,
    /// Counted towards participation but not towards the pass ratio.
    Abstain,
    /// Against, and counted towards the veto threshold.
    NoWithVeto,
}

impl VoteOption {
    pub const ALL: [VoteOption; 4] = [Self::Yes, Self::No, Self::Abstain, Self::NoWithVeto];

    /// Wire byte of this option.
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 2,
            Self::Abstain => 3,
            Self::NoWithVeto => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Abstain => "abstain",
            Self::NoWithVeto => "no_with_veto",
        }
    }
}

impl TryFrom<u8> for VoteOption {
    type Error = GovernanceError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            1 => Ok(Self::Yes),
            2 => Ok(Self::No),
            3 => Ok(Self::Abstain),
            4 => Ok(Self::NoWithVeto),
            other => Err(GovernanceError::InvalidVoteOption(format!("byte {}", other))),
        }
    }
}

impl FromStr for VoteOption {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "abstain" => Ok(Self::Abstain),
            "no_with_veto" | "nowithveto" => Ok(Self::NoWithVeto),
            other => Err(GovernanceError::InvalidVoteOption(other.to_string())),
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recorded vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: u64,
    pub voter: Address,
    pub option: VoteOption,
}

/// A single deposit. Never mutated; removed when refunded or burned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub proposal_id: u64,
    pub depositor: Address,
    pub amount: CoinBag,
}
