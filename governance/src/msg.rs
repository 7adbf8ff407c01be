//! Governance messages and their stateless validation.

use agora_types::{Address, CoinBag};
use serde::{Deserialize, Serialize};

use crate::params::validate_changes;
use crate::proposal::ProposalKind;
use crate::vote::VoteOption;
use crate::GovernanceError;

pub const MAX_TITLE_LENGTH: usize = 140;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Create a proposal and bond its initial deposit.
    SubmitProposal {
        title: String,
        description: String,
        kind: ProposalKind,
        proposer: Address,
        initial_deposit: CoinBag,
    },
    /// Add to the deposit of a proposal in its deposit period.
    Deposit {
        proposal_id: u64,
        depositor: Address,
        amount: CoinBag,
    },
    /// Vote on a proposal in its voting period. `option` is the wire byte.
    Vote {
        proposal_id: u64,
        voter: Address,
        option: u8,
    },
}

fn check_address(role: &str, address: &Address) -> Result<(), GovernanceError> {
    if !address.is_valid() {
        return Err(GovernanceError::InvalidProposal(format!(
            "{} '{}' is not a valid address",
            role, address
        )));
    }
    Ok(())
}

fn check_text(field: &str, value: &str, max: usize) -> Result<(), GovernanceError> {
    if value.trim().is_empty() {
        return Err(GovernanceError::InvalidProposal(format!("{} is empty", field)));
    }
    let length = value.chars().count();
    if length > max {
        return Err(GovernanceError::InvalidProposal(format!(
            "{} is {} characters, limit is {}",
            field, length, max
        )));
    }
    Ok(())
}

impl Msg {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitProposal { .. } => "submit_proposal",
            Self::Deposit { .. } => "deposit",
            Self::Vote { .. } => "vote",
        }
    }

    /// Checks that need no state.
    pub fn validate_basic(&self) -> Result<(), GovernanceError> {
        match self {
            Self::SubmitProposal {
                title,
                description,
                kind,
                proposer,
                ..
            } => {
                check_text("title", title, MAX_TITLE_LENGTH)?;
                check_text("description", description, MAX_DESCRIPTION_LENGTH)?;
                check_address("proposer", proposer)?;
                match kind {
                    ProposalKind::Text => Ok(()),
                    ProposalKind::ParameterChange(changes) => validate_changes(changes),
                    ProposalKind::SoftwareUpgrade(plan) => {
                        if plan.name.trim().is_empty() {
                            return Err(GovernanceError::InvalidProposal(
                                "upgrade name is empty".into(),
                            ));
                        }
                        Ok(())
                    }
                }
            }
            Self::Deposit {
                depositor, amount, ..
            } => {
                check_address("depositor", depositor)?;
                if amount.is_zero() {
                    return Err(GovernanceError::InvalidDeposit(
                        "deposit amount is zero".into(),
                    ));
                }
                Ok(())
            }
            Self::Vote { voter, option, .. } => {
                check_address("voter", voter)?;
                VoteOption::try_from(*option).map(|_| ())
            }
        }
    }
}
