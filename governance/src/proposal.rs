//! Governance proposals and their lifecycle.

use agora_types::{Address, BlockHeight, CoinBag};
use serde::{Deserialize, Serialize};

use crate::params::ParamChange;

/// Lifecycle status of a proposal.
///
/// Transitions are monotonic: `DepositPeriod → VotingPeriod → {Passed | Rejected}`,
/// or `DepositPeriod → dropped` (the record is deleted).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Collecting deposits until the minimum deposit is reached.
    DepositPeriod,
    /// Bonded validators and delegators vote.
    VotingPeriod,
    /// Tallied and accepted; the proposal's effect has been executed.
    Passed,
    /// Tallied and not accepted.
    Rejected,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Rejected)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DepositPeriod => "deposit_period",
            Self::VotingPeriod => "voting_period",
            Self::Passed => "passed",
            Self::Rejected => "rejected",
        }
    }
}

/// A scheduled software upgrade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    /// Upgrade name, used by node operators to match binaries.
    pub name: String,
    /// Height at which the upgrade takes effect.
    pub height: BlockHeight,
    /// Free-form information (release link, checksums).
    pub info: String,
}

/// What a proposal does if it passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Signalling only; no on-chain effect.
    Text,
    /// Change one or more governance parameters.
    ParameterChange(Vec<ParamChange>),
    /// Schedule a software upgrade.
    SoftwareUpgrade(UpgradePlan),
}

impl ProposalKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ParameterChange(_) => "parameter_change",
            Self::SoftwareUpgrade(_) => "software_upgrade",
        }
    }
}

/// Voting power per option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub yes: u128,
    pub no: u128,
    pub abstain: u128,
    pub no_with_veto: u128,
}

impl TallyResult {
    pub fn total(&self) -> u128 {
        self.yes
            .saturating_add(self.no)
            .saturating_add(self.abstain)
            .saturating_add(self.no_with_veto)
    }
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Monotonic identifier.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: ProposalKind,
    /// Who submitted it.
    pub proposer: Address,
    pub status: ProposalStatus,
    /// Height of the block containing the submission.
    pub submit_height: BlockHeight,
    /// Height at which the deposit period ends (its inactive-queue key).
    pub deposit_end_height: BlockHeight,
    /// Set when the minimum deposit is reached.
    pub voting_start_height: Option<BlockHeight>,
    /// Height at which voting ends (its active-queue key).
    pub voting_end_height: Option<BlockHeight>,
    /// Sum of all live deposits.
    pub total_deposit: CoinBag,
    /// Set once tallied.
    pub final_tally: Option<TallyResult>,
}
