//! Read-only queries over governance state.

use agora_store::{KvStore, StakeKeeper};
use agora_types::{Address, CoinBag};
use serde::{Deserialize, Serialize};

use crate::ballot::VoteBallot;
use crate::deposit::{deposited_by, live_deposits};
use crate::execute;
use crate::params::GovParams;
use crate::proposal::{Proposal, ProposalStatus, UpgradePlan};
use crate::registry::ProposalRegistry;
use crate::tally::{tally, TallyOutcome};
use crate::vote::{Deposit, Vote};
use crate::GovernanceError;

/// Selects proposals in [`proposals`]. Every set field must match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalFilter {
    pub status: Option<ProposalStatus>,
    /// Has a live deposit on the proposal.
    pub depositor: Option<Address>,
    /// Has a live vote on the proposal.
    pub voter: Option<Address>,
    /// Return at most this many, lowest ids first.
    pub limit: Option<usize>,
}

pub fn proposal(store: &dyn KvStore, proposal_id: u64) -> Result<Proposal, GovernanceError> {
    ProposalRegistry::new(store).get(proposal_id)
}

pub fn proposals(
    store: &dyn KvStore,
    filter: &ProposalFilter,
) -> Result<Vec<Proposal>, GovernanceError> {
    let ballot = VoteBallot::new(store);
    let mut matched = Vec::new();
    let candidates = ProposalRegistry::new(store)
        .iterate(|p| filter.status.map_or(true, |status| p.status == status))?;
    for candidate in candidates {
        if filter.limit.is_some_and(|limit| matched.len() >= limit) {
            break;
        }
        let proposal = candidate?;
        if let Some(depositor) = &filter.depositor {
            if deposited_by(store, proposal.id, depositor)?.is_zero() {
                continue;
            }
        }
        if let Some(voter) = &filter.voter {
            if ballot.vote(proposal.id, voter)?.is_none() {
                continue;
            }
        }
        matched.push(proposal);
    }
    Ok(matched)
}

/// Sum of what `depositor` has live on a proposal.
pub fn deposit(
    store: &dyn KvStore,
    proposal_id: u64,
    depositor: &Address,
) -> Result<CoinBag, GovernanceError> {
    ProposalRegistry::new(store).get(proposal_id)?;
    deposited_by(store, proposal_id, depositor)
}

pub fn deposits(store: &dyn KvStore, proposal_id: u64) -> Result<Vec<Deposit>, GovernanceError> {
    ProposalRegistry::new(store).get(proposal_id)?;
    live_deposits(store, proposal_id)
}

pub fn vote(
    store: &dyn KvStore,
    proposal_id: u64,
    voter: &Address,
) -> Result<Option<Vote>, GovernanceError> {
    ProposalRegistry::new(store).get(proposal_id)?;
    VoteBallot::new(store).vote(proposal_id, voter)
}

pub fn votes(store: &dyn KvStore, proposal_id: u64) -> Result<Vec<Vote>, GovernanceError> {
    ProposalRegistry::new(store).get(proposal_id)?;
    VoteBallot::new(store).votes(proposal_id)
}

/// What the tally would be if the voting period ended now. Writes nothing.
pub fn tally_preview(
    store: &dyn KvStore,
    stake: &dyn StakeKeeper,
    proposal_id: u64,
) -> Result<TallyOutcome, GovernanceError> {
    let proposal = ProposalRegistry::new(store).get(proposal_id)?;
    if proposal.status != ProposalStatus::VotingPeriod {
        return Err(GovernanceError::InvalidProposalStatus {
            proposal_id,
            status: proposal.status,
        });
    }
    let params = GovParams::load(store)?;
    tally(store, stake, &params.tally, proposal_id)
}

pub fn params(store: &dyn KvStore) -> Result<GovParams, GovernanceError> {
    GovParams::load(store)
}

pub fn scheduled_upgrade(store: &dyn KvStore) -> Result<Option<UpgradePlan>, GovernanceError> {
    execute::scheduled_upgrade(store)
}
