//! Deposit bonding: escrow, the minimum-deposit threshold and payout.

use agora_store::{BankKeeper, KvStore, ScanOrder};
use agora_types::{Address, CoinBag};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::{decode, encode};
use crate::context::Context;
use crate::keys::{deposit_key, deposit_sequence, deposits_prefix};
use crate::params::GovParams;
use crate::proposal::ProposalStatus;
use crate::queue::{DualQueueScheduler, QueueKind};
use crate::registry::ProposalRegistry;
use crate::vote::Deposit;
use crate::GovernanceError;

/// What happens to the deposits of a proposal that never reached the minimum deposit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositExpiryPolicy {
    /// Return them to their depositors.
    #[default]
    Refund,
    /// Destroy them.
    Burn,
}

/// Where the escrowed coins of a proposal go when it is settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Payout {
    Refund,
    Burn,
}

pub fn live_deposits(
    store: &dyn KvStore,
    proposal_id: u64,
) -> Result<Vec<Deposit>, GovernanceError> {
    store
        .scan_prefix(&deposits_prefix(proposal_id), ScanOrder::Ascending)?
        .into_iter()
        .map(|(_key, bytes)| decode(&bytes))
        .collect()
}

pub fn deposited_by(
    store: &dyn KvStore,
    proposal_id: u64,
    depositor: &Address,
) -> Result<CoinBag, GovernanceError> {
    let mut sum = CoinBag::new();
    for deposit in live_deposits(store, proposal_id)? {
        if &deposit.depositor == depositor {
            sum = sum.checked_add(&deposit.amount)?;
        }
    }
    Ok(sum)
}

pub struct DepositLedger<'a> {
    ctx: Context<'a>,
    bank: &'a dyn BankKeeper,
    escrow: &'a Address,
}

impl<'a> DepositLedger<'a> {
    pub fn new(ctx: Context<'a>, bank: &'a dyn BankKeeper, escrow: &'a Address) -> Self {
        Self { ctx, bank, escrow }
    }

    /// Escrow `amount` from `depositor` against `proposal_id`.
    ///
    /// Returns `true` when this deposit moved the proposal into its voting
    /// period. A zero amount records nothing but still checks the threshold,
    /// so a proposal submitted with no deposit under a zero minimum starts
    /// voting immediately.
    pub fn add_deposit(
        &self,
        params: &GovParams,
        proposal_id: u64,
        depositor: &Address,
        amount: &CoinBag,
    ) -> Result<bool, GovernanceError> {
        let registry = ProposalRegistry::new(self.ctx.store);
        let mut proposal = registry.get(proposal_id)?;
        if proposal.status != ProposalStatus::DepositPeriod {
            return Err(GovernanceError::InvalidProposalStatus {
                proposal_id,
                status: proposal.status,
            });
        }

        if !amount.is_zero() {
            self.bank
                .send_coins(self.ctx.store, depositor, self.escrow, amount)?;
            let sequence = self.next_sequence(proposal_id)?;
            let deposit = Deposit {
                proposal_id,
                depositor: depositor.clone(),
                amount: amount.clone(),
            };
            self.ctx
                .store
                .put(&deposit_key(proposal_id, sequence), &encode(&deposit)?)?;
            proposal.total_deposit = proposal.total_deposit.checked_add(amount)?;
        }

        let voting_started = proposal
            .total_deposit
            .is_all_gte(&params.deposit.min_deposit);
        if voting_started {
            let queues = DualQueueScheduler::new(self.ctx.store);
            let voting_end = self.ctx.height.plus(params.voting.voting_period);
            queues.remove(QueueKind::Inactive, proposal.deposit_end_height, proposal_id)?;
            queues.insert(QueueKind::Active, voting_end, proposal_id)?;
            proposal.status = ProposalStatus::VotingPeriod;
            proposal.voting_start_height = Some(self.ctx.height);
            proposal.voting_end_height = Some(voting_end);
            info!(
                proposal_id,
                height = self.ctx.height.get(),
                voting_end = voting_end.get(),
                total_deposit = %proposal.total_deposit,
                "voting period started"
            );
        }
        registry.set(&proposal)?;
        Ok(voting_started)
    }

    /// Return every live deposit of `proposal_id` to its depositor.
    pub fn refund_all(&self, proposal_id: u64) -> Result<CoinBag, GovernanceError> {
        self.settle(proposal_id, Payout::Refund)
    }

    /// Destroy every live deposit of `proposal_id`.
    pub fn burn_all(&self, proposal_id: u64) -> Result<CoinBag, GovernanceError> {
        self.settle(proposal_id, Payout::Burn)
    }

    /// Settle the deposits of a proposal dropped at the end of its deposit period.
    pub fn settle_expired(
        &self,
        proposal_id: u64,
        policy: DepositExpiryPolicy,
    ) -> Result<CoinBag, GovernanceError> {
        match policy {
            DepositExpiryPolicy::Refund => self.refund_all(proposal_id),
            DepositExpiryPolicy::Burn => self.burn_all(proposal_id),
        }
    }

    /// Live deposits of a proposal, in the order they were made.
    pub fn deposits(&self, proposal_id: u64) -> Result<Vec<Deposit>, GovernanceError> {
        live_deposits(self.ctx.store, proposal_id)
    }

    /// Sum of the live deposits `depositor` made on a proposal.
    pub fn deposited_by(
        &self,
        proposal_id: u64,
        depositor: &Address,
    ) -> Result<CoinBag, GovernanceError> {
        deposited_by(self.ctx.store, proposal_id, depositor)
    }

    fn next_sequence(&self, proposal_id: u64) -> Result<u64, GovernanceError> {
        match self
            .ctx
            .store
            .first_in_prefix(&deposits_prefix(proposal_id), ScanOrder::Descending)?
        {
            Some((key, _)) => deposit_sequence(&key)?
                .checked_add(1)
                .ok_or_else(|| GovernanceError::Overflow("deposit sequence".into())),
            None => Ok(0),
        }
    }

    fn settle(&self, proposal_id: u64, payout: Payout) -> Result<CoinBag, GovernanceError> {
        let prefix = deposits_prefix(proposal_id);
        let mut settled = CoinBag::new();
        for (key, bytes) in self.ctx.store.scan_prefix(&prefix, ScanOrder::Ascending)? {
            let deposit: Deposit = decode(&bytes)?;
            match payout {
                Payout::Refund => self.bank.send_coins(
                    self.ctx.store,
                    self.escrow,
                    &deposit.depositor,
                    &deposit.amount,
                )?,
                Payout::Burn => {
                    self.bank
                        .burn_coins(self.ctx.store, self.escrow, &deposit.amount)?
                }
            }
            self.ctx.store.delete(&key)?;
            settled = settled.checked_add(&deposit.amount)?;
        }

        let registry = ProposalRegistry::new(self.ctx.store);
        if let Some(mut proposal) = registry.find(proposal_id)? {
            proposal.total_deposit = CoinBag::new();
            registry.set(&proposal)?;
        }
        Ok(settled)
    }
}
