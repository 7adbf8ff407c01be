use agora_store::{BankError, StakeError, StoreError};
use agora_types::{Address, CoinBag, TypesError};
use thiserror::Error;

use crate::proposal::ProposalStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("proposal {proposal_id} is in {status:?}, which does not accept this action")]
    InvalidProposalStatus {
        proposal_id: u64,
        status: ProposalStatus,
    },

    #[error("invalid vote option: {0}")]
    InvalidVoteOption(String),

    #[error("insufficient funds in {address}: need {needed}, have {available}")]
    InsufficientFunds {
        address: Address,
        needed: CoinBag,
        available: CoinBag,
    },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("invalid deposit: {0}")]
    InvalidDeposit(String),

    #[error("staking error: {0}")]
    Stake(#[from] StakeError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("invalid value: {0}")]
    Types(TypesError),
}

impl From<BankError> for GovernanceError {
    fn from(e: BankError) -> Self {
        match e {
            BankError::InsufficientFunds {
                address,
                needed,
                available,
            } => Self::InsufficientFunds {
                address,
                needed,
                available,
            },
            BankError::Store(e) => Self::Store(e),
        }
    }
}

impl From<TypesError> for GovernanceError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::Overflow => Self::Overflow(e.to_string()),
            TypesError::InvalidFraction(bps) => {
                Self::InvalidParameters(format!("{} basis points exceeds 10000", bps))
            }
            other => Self::Types(other),
        }
    }
}
