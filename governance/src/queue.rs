//! The two time-ordered proposal queues that drive end-of-block processing.
//!
//! Both queues are key ranges in the persistent store: the key is the expiry
//! height followed by the proposal id, both big-endian, so an ascending prefix
//! scan yields entries by expiry and, for equal expiry, by ascending id. Every
//! node therefore drains proposals in the same order.

use agora_store::{KvStore, ScanOrder};
use agora_types::BlockHeight;

use crate::keys::{queue_key, split_queue_key, ACTIVE_QUEUE_PREFIX, INACTIVE_QUEUE_PREFIX};
use crate::GovernanceError;

/// Which of the two queues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueKind {
    /// Proposals in their deposit period, by deposit end height.
    Inactive,
    /// Proposals in their voting period, by voting end height.
    Active,
}

impl QueueKind {
    fn prefix(&self) -> &'static [u8] {
        match self {
            Self::Inactive => INACTIVE_QUEUE_PREFIX,
            Self::Active => ACTIVE_QUEUE_PREFIX,
        }
    }
}

/// The head (or any entry) of a queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueEntry {
    pub expiry: BlockHeight,
    pub proposal_id: u64,
}

pub struct DualQueueScheduler<'a> {
    store: &'a dyn KvStore,
}

impl<'a> DualQueueScheduler<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn insert(
        &self,
        queue: QueueKind,
        expiry: BlockHeight,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        self.store
            .put(&queue_key(queue.prefix(), expiry, proposal_id), &[])?;
        Ok(())
    }

    pub fn remove(
        &self,
        queue: QueueKind,
        expiry: BlockHeight,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        self.store
            .delete(&queue_key(queue.prefix(), expiry, proposal_id))?;
        Ok(())
    }

    pub fn contains(
        &self,
        queue: QueueKind,
        expiry: BlockHeight,
        proposal_id: u64,
    ) -> Result<bool, GovernanceError> {
        Ok(self
            .store
            .contains(&queue_key(queue.prefix(), expiry, proposal_id))?)
    }

    /// The entry with the lowest (expiry, id), if any.
    pub fn peek(&self, queue: QueueKind) -> Result<Option<QueueEntry>, GovernanceError> {
        match self
            .store
            .first_in_prefix(queue.prefix(), ScanOrder::Ascending)?
        {
            Some((key, _)) => {
                let (expiry, proposal_id) = split_queue_key(queue.prefix(), &key)?;
                Ok(Some(QueueEntry {
                    expiry,
                    proposal_id,
                }))
            }
            None => Ok(None),
        }
    }

    /// Remove and return the head.
    pub fn pop(&self, queue: QueueKind) -> Result<Option<QueueEntry>, GovernanceError> {
        let head = self.peek(queue)?;
        if let Some(entry) = head {
            self.remove(queue, entry.expiry, entry.proposal_id)?;
        }
        Ok(head)
    }

    /// Every entry in drain order.
    pub fn entries(&self, queue: QueueKind) -> Result<Vec<QueueEntry>, GovernanceError> {
        self.store
            .scan_prefix(queue.prefix(), ScanOrder::Ascending)?
            .into_iter()
            .map(|(key, _)| {
                split_queue_key(queue.prefix(), &key).map(|(expiry, proposal_id)| QueueEntry {
                    expiry,
                    proposal_id,
                })
            })
            .collect()
    }

    pub fn peek_inactive(&self) -> Result<Option<QueueEntry>, GovernanceError> {
        self.peek(QueueKind::Inactive)
    }

    pub fn pop_inactive(&self) -> Result<Option<QueueEntry>, GovernanceError> {
        self.pop(QueueKind::Inactive)
    }

    pub fn peek_active(&self) -> Result<Option<QueueEntry>, GovernanceError> {
        self.peek(QueueKind::Active)
    }

    pub fn pop_active(&self) -> Result<Option<QueueEntry>, GovernanceError> {
        self.pop(QueueKind::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::MemoryStore;

    #[test]
    fn test_pop_order_expiry_then_id() {
        let store = MemoryStore::new();
        let queues = DualQueueScheduler::new(&store);
        queues.insert(QueueKind::Active, BlockHeight::new(20), 1).unwrap();
        queues.insert(QueueKind::Active, BlockHeight::new(10), 7).unwrap();
        queues.insert(QueueKind::Active, BlockHeight::new(10), 3).unwrap();

        let drained: Vec<u64> = std::iter::from_fn(|| queues.pop_active().unwrap())
            .map(|e| e.proposal_id)
            .collect();
        assert_eq!(drained, vec![3, 7, 1]);
        assert!(queues.peek_active().unwrap().is_none());
    }

    #[test]
    fn test_queues_are_independent() {
        let store = MemoryStore::new();
        let queues = DualQueueScheduler::new(&store);
        queues.insert(QueueKind::Inactive, BlockHeight::new(5), 1).unwrap();
        assert!(queues.peek_active().unwrap().is_none());
        assert_eq!(
            queues.peek_inactive().unwrap(),
            Some(QueueEntry {
                expiry: BlockHeight::new(5),
                proposal_id: 1
            })
        );
        queues.remove(QueueKind::Inactive, BlockHeight::new(5), 1).unwrap();
        assert!(queues.pop_inactive().unwrap().is_none());
    }
}
