//! Durable store of proposal records, keyed by monotonic id.

use agora_store::{KvStore, ScanOrder};
use agora_types::{Address, BlockHeight, CoinBag};

use crate::codec::{decode, encode};
use crate::keys::{proposal_key, NEXT_PROPOSAL_ID_KEY, PROPOSAL_PREFIX};
use crate::proposal::{Proposal, ProposalKind, ProposalStatus};
use crate::GovernanceError;

/// The first id handed out when genesis did not set one.
pub const DEFAULT_STARTING_PROPOSAL_ID: u64 = 1;

/// The caller-supplied part of a new proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    pub kind: ProposalKind,
    pub proposer: Address,
}

pub struct ProposalRegistry<'a> {
    store: &'a dyn KvStore,
}

impl<'a> ProposalRegistry<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// The id the next [`create`](Self::create) will assign.
    pub fn next_id(&self) -> Result<u64, GovernanceError> {
        match self.store.get(NEXT_PROPOSAL_ID_KEY)? {
            Some(bytes) => decode(&bytes),
            None => Ok(DEFAULT_STARTING_PROPOSAL_ID),
        }
    }

    pub fn set_next_id(&self, id: u64) -> Result<(), GovernanceError> {
        self.store.put(NEXT_PROPOSAL_ID_KEY, &encode(&id)?)?;
        Ok(())
    }

    /// Create a proposal in its deposit period with an empty deposit.
    pub fn create(
        &self,
        draft: ProposalDraft,
        submit_height: BlockHeight,
        max_deposit_period: u64,
    ) -> Result<Proposal, GovernanceError> {
        let id = self.next_id()?;
        let next = id
            .checked_add(1)
            .ok_or_else(|| GovernanceError::Overflow("proposal id".into()))?;
        self.set_next_id(next)?;

        let proposal = Proposal {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            proposer: draft.proposer,
            status: ProposalStatus::DepositPeriod,
            submit_height,
            deposit_end_height: submit_height.plus(max_deposit_period),
            voting_start_height: None,
            voting_end_height: None,
            total_deposit: CoinBag::new(),
            final_tally: None,
        };
        self.set(&proposal)?;
        Ok(proposal)
    }

    /// Look up a proposal, failing with `ProposalNotFound`.
    pub fn get(&self, id: u64) -> Result<Proposal, GovernanceError> {
        self.find(id)?.ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn find(&self, id: u64) -> Result<Option<Proposal>, GovernanceError> {
        self.store
            .get(&proposal_key(id))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Insert or overwrite.
    pub fn set(&self, proposal: &Proposal) -> Result<(), GovernanceError> {
        self.store
            .put(&proposal_key(proposal.id), &encode(proposal)?)?;
        Ok(())
    }

    pub fn delete(&self, id: u64) -> Result<(), GovernanceError> {
        self.store.delete(&proposal_key(id))?;
        Ok(())
    }

    /// Proposals matching `predicate`, in id order.
    ///
    /// The raw records are read from the store up front; decoding and
    /// filtering happen as the iterator advances. Call again to restart
    /// from the beginning.
    pub fn iterate<P>(
        &self,
        predicate: P,
    ) -> Result<impl Iterator<Item = Result<Proposal, GovernanceError>>, GovernanceError>
    where
        P: Fn(&Proposal) -> bool,
    {
        let raw = self.store.scan_prefix(PROPOSAL_PREFIX, ScanOrder::Ascending)?;
        Ok(raw
            .into_iter()
            .map(|(_key, bytes)| decode::<Proposal>(&bytes))
            .filter(move |decoded| match decoded {
                Ok(proposal) => predicate(proposal),
                Err(_) => true,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::MemoryStore;

    fn draft(title: &str) -> ProposalDraft {
        ProposalDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            kind: ProposalKind::Text,
            proposer: Address::new("agr_alice"),
        }
    }

    #[test]
    fn test_create_assigns_monotonic_ids() {
        let store = MemoryStore::new();
        let registry = ProposalRegistry::new(&store);
        let a = registry.create(draft("a"), BlockHeight::new(5), 100).unwrap();
        let b = registry.create(draft("b"), BlockHeight::new(6), 100).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.status, ProposalStatus::DepositPeriod);
        assert_eq!(a.deposit_end_height, BlockHeight::new(105));
        assert!(a.total_deposit.is_zero());
        assert_eq!(registry.get(2).unwrap(), b);
    }

    #[test]
    fn test_get_missing_and_delete() {
        let store = MemoryStore::new();
        let registry = ProposalRegistry::new(&store);
        assert_eq!(registry.get(9), Err(GovernanceError::ProposalNotFound(9)));
        let p = registry.create(draft("a"), BlockHeight::new(1), 10).unwrap();
        registry.delete(p.id).unwrap();
        assert!(registry.find(p.id).unwrap().is_none());
    }

    #[test]
    fn test_iterate_filters_and_restarts() {
        let store = MemoryStore::new();
        let registry = ProposalRegistry::new(&store);
        registry.set_next_id(254).unwrap();
        for title in ["a", "b", "c"] {
            registry.create(draft(title), BlockHeight::new(1), 10).unwrap();
        }
        let titles = || -> Vec<String> {
            registry
                .iterate(|p| p.title != "b")
                .unwrap()
                .map(|p| p.unwrap().title)
                .collect()
        };
        // ids 254, 255, 256 still iterate in numeric order
        assert_eq!(titles(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(titles(), titles());
    }
}
