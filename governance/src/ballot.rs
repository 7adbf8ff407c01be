//! One vote per (proposal, voter), overwritable until the proposal is tallied.

use agora_store::{KvStore, ScanOrder};
use agora_types::Address;

use crate::codec::{decode, encode};
use crate::keys::{vote_key, votes_prefix};
use crate::proposal::ProposalStatus;
use crate::registry::ProposalRegistry;
use crate::vote::{Vote, VoteOption};
use crate::GovernanceError;

pub struct VoteBallot<'a> {
    store: &'a dyn KvStore,
}

impl<'a> VoteBallot<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// Record `voter`'s choice, replacing any earlier vote on the same proposal.
    pub fn add_vote(
        &self,
        proposal_id: u64,
        voter: &Address,
        option: VoteOption,
    ) -> Result<(), GovernanceError> {
        let proposal = ProposalRegistry::new(self.store).get(proposal_id)?;
        if proposal.status != ProposalStatus::VotingPeriod {
            return Err(GovernanceError::InvalidProposalStatus {
                proposal_id,
                status: proposal.status,
            });
        }
        let vote = Vote {
            proposal_id,
            voter: voter.clone(),
            option,
        };
        self.store
            .put(&vote_key(proposal_id, voter), &encode(&vote)?)?;
        Ok(())
    }

    pub fn vote(&self, proposal_id: u64, voter: &Address) -> Result<Option<Vote>, GovernanceError> {
        self.store
            .get(&vote_key(proposal_id, voter))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Every vote on a proposal, ordered by voter address.
    pub fn votes(&self, proposal_id: u64) -> Result<Vec<Vote>, GovernanceError> {
        self.store
            .scan_prefix(&votes_prefix(proposal_id), ScanOrder::Ascending)?
            .into_iter()
            .map(|(_key, bytes)| decode(&bytes))
            .collect()
    }

    pub fn delete_votes(&self, proposal_id: u64) -> Result<(), GovernanceError> {
        for (key, _) in self
            .store
            .scan_prefix(&votes_prefix(proposal_id), ScanOrder::Ascending)?
        {
            self.store.delete(&key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::ProposalKind;
    use crate::registry::ProposalDraft;
    use agora_nullables::MemoryStore;
    use agora_types::BlockHeight;

    fn proposal(store: &MemoryStore, status: ProposalStatus) -> u64 {
        let registry = ProposalRegistry::new(store);
        let mut proposal = registry
            .create(
                ProposalDraft {
                    title: "t".into(),
                    description: "d".into(),
                    kind: ProposalKind::Text,
                    proposer: Address::new("agr_alice"),
                },
                BlockHeight::new(1),
                10,
            )
            .unwrap();
        proposal.status = status;
        registry.set(&proposal).unwrap();
        proposal.id
    }

    #[test]
    fn test_last_vote_wins() {
        let store = MemoryStore::new();
        let id = proposal(&store, ProposalStatus::VotingPeriod);
        let ballot = VoteBallot::new(&store);
        let voter = Address::new("agr_val");
        ballot.add_vote(id, &voter, VoteOption::No).unwrap();
        ballot.add_vote(id, &voter, VoteOption::Yes).unwrap();

        let votes = ballot.votes(id).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].option, VoteOption::Yes);

        ballot.delete_votes(id).unwrap();
        assert!(ballot.vote(id, &voter).unwrap().is_none());
    }

    #[test]
    fn test_vote_outside_voting_period() {
        let store = MemoryStore::new();
        let id = proposal(&store, ProposalStatus::DepositPeriod);
        let ballot = VoteBallot::new(&store);
        assert_eq!(
            ballot.add_vote(id, &Address::new("agr_val"), VoteOption::Yes),
            Err(GovernanceError::InvalidProposalStatus {
                proposal_id: id,
                status: ProposalStatus::DepositPeriod
            })
        );
        assert_eq!(
            ballot.add_vote(99, &Address::new("agr_val"), VoteOption::Yes),
            Err(GovernanceError::ProposalNotFound(99))
        );
    }
}
