//! End-of-block driver: drains both queues and settles what expired.

use std::collections::BTreeMap;

use agora_store::{BankKeeper, CacheStore, StakeKeeper};
use agora_types::Address;
use tracing::{info, warn};

use crate::ballot::VoteBallot;
use crate::context::Context;
use crate::deposit::{DepositExpiryPolicy, DepositLedger};
use crate::event::{
    Tags, ACTION, ACTION_EXECUTION_FAILED, ACTION_PROPOSAL_DROPPED, ACTION_PROPOSAL_PASSED,
    ACTION_PROPOSAL_REJECTED, PROPOSAL_ID,
};
use crate::execute::execute;
use crate::params::GovParams;
use crate::proposal::ProposalStatus;
use crate::queue::{DualQueueScheduler, QueueKind};
use crate::registry::ProposalRegistry;
use crate::tally::tally;
use crate::GovernanceError;

/// What one end-of-block pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndBlockResult {
    pub tags: Tags,
    /// Validators slashed for not voting, per tallied proposal in drain order.
    pub non_voting: Vec<Address>,
}

pub struct GovernanceProcessor<'a> {
    bank: &'a dyn BankKeeper,
    stake: &'a dyn StakeKeeper,
    escrow: &'a Address,
    expiry_policy: DepositExpiryPolicy,
}

impl<'a> GovernanceProcessor<'a> {
    pub fn new(
        bank: &'a dyn BankKeeper,
        stake: &'a dyn StakeKeeper,
        escrow: &'a Address,
        expiry_policy: DepositExpiryPolicy,
    ) -> Self {
        Self {
            bank,
            stake,
            escrow,
            expiry_policy,
        }
    }

    /// Drop expired deposit-period proposals, then tally expired voting-period ones.
    ///
    /// Runs against a cache over `ctx.store` that is committed only if the
    /// whole pass succeeds. An error here means an invariant was broken (a
    /// refund or slash could not be applied) and must halt the node.
    pub fn end_block(&self, ctx: Context<'_>) -> Result<EndBlockResult, GovernanceError> {
        let cache = CacheStore::new(ctx.store);
        let result = self.drain(ctx.with_store(&cache))?;
        cache.commit()?;
        Ok(result)
    }

    fn drain(&self, ctx: Context<'_>) -> Result<EndBlockResult, GovernanceError> {
        let params = GovParams::load(ctx.store)?;
        let mut result = EndBlockResult::default();
        self.drain_inactive(ctx, &mut result)?;
        self.drain_active(ctx, &params, &mut result)?;
        Ok(result)
    }

    fn drain_inactive(
        &self,
        ctx: Context<'_>,
        result: &mut EndBlockResult,
    ) -> Result<(), GovernanceError> {
        let queues = DualQueueScheduler::new(ctx.store);
        let registry = ProposalRegistry::new(ctx.store);
        let ledger = DepositLedger::new(ctx, self.bank, self.escrow);

        while let Some(head) = queues.peek_inactive()? {
            let pending = registry
                .find(head.proposal_id)?
                .map_or(false, |p| p.status == ProposalStatus::DepositPeriod);
            if pending && head.expiry > ctx.height {
                break;
            }
            queues.remove(QueueKind::Inactive, head.expiry, head.proposal_id)?;
            if !pending {
                continue;
            }

            let settled = ledger.settle_expired(head.proposal_id, self.expiry_policy)?;
            registry.delete(head.proposal_id)?;
            result.tags.push(ACTION, ACTION_PROPOSAL_DROPPED);
            result.tags.push(PROPOSAL_ID, head.proposal_id);
            info!(
                proposal_id = head.proposal_id,
                height = ctx.height.get(),
                deposits = %settled,
                policy = ?self.expiry_policy,
                "proposal dropped without reaching the minimum deposit"
            );
        }
        Ok(())
    }

    fn drain_active(
        &self,
        ctx: Context<'_>,
        params: &GovParams,
        result: &mut EndBlockResult,
    ) -> Result<(), GovernanceError> {
        let queues = DualQueueScheduler::new(ctx.store);
        let registry = ProposalRegistry::new(ctx.store);
        let ledger = DepositLedger::new(ctx, self.bank, self.escrow);
        let ballot = VoteBallot::new(ctx.store);

        while let Some(head) = queues.peek_active()? {
            if head.expiry > ctx.height {
                break;
            }
            queues.remove(QueueKind::Active, head.expiry, head.proposal_id)?;

            let proposal = registry.get(head.proposal_id)?;
            if proposal.status != ProposalStatus::VotingPeriod {
                return Err(GovernanceError::InvalidProposalStatus {
                    proposal_id: proposal.id,
                    status: proposal.status,
                });
            }

            let outcome = tally(ctx.store, self.stake, &params.tally, proposal.id)?;
            ledger.refund_all(proposal.id)?;
            ballot.delete_votes(proposal.id)?;

            let mut proposal = registry.get(proposal.id)?;
            proposal.final_tally = Some(outcome.result);
            proposal.status = if outcome.passed {
                ProposalStatus::Passed
            } else {
                ProposalStatus::Rejected
            };
            let action = if outcome.passed {
                ACTION_PROPOSAL_PASSED
            } else {
                ACTION_PROPOSAL_REJECTED
            };
            result.tags.push(ACTION, action);
            result.tags.push(PROPOSAL_ID, proposal.id);
            info!(
                proposal_id = proposal.id,
                height = ctx.height.get(),
                status = proposal.status.name(),
                "proposal tallied"
            );

            if outcome.passed {
                let scratch = CacheStore::new(ctx.store);
                match execute(ctx.with_store(&scratch), &proposal) {
                    Ok(()) => scratch.commit()?,
                    Err(e) => {
                        scratch.discard();
                        warn!(
                            proposal_id = proposal.id,
                            kind = proposal.kind.name(),
                            error = %e,
                            "passed proposal failed to execute"
                        );
                        result.tags.push(ACTION, ACTION_EXECUTION_FAILED);
                        result.tags.push(PROPOSAL_ID, proposal.id);
                    }
                }
            }
            registry.set(&proposal)?;

            self.slash_absent(ctx, params, &outcome.non_voting)?;
            result.non_voting.extend(outcome.non_voting);
        }
        Ok(())
    }

    fn slash_absent(
        &self,
        ctx: Context<'_>,
        params: &GovParams,
        non_voting: &[Address],
    ) -> Result<(), GovernanceError> {
        if non_voting.is_empty() {
            return Ok(());
        }
        let powers: BTreeMap<Address, u64> = self
            .stake
            .bonded_validators(ctx.store)?
            .into_iter()
            .map(|v| (v.address, v.voting_power))
            .collect();
        let mut sorted = non_voting.to_vec();
        sorted.sort();
        for validator in &sorted {
            let power = powers.get(validator).copied().unwrap_or(0);
            self.stake.slash(
                ctx.store,
                validator,
                ctx.height,
                power,
                params.tally.governance_penalty,
            )?;
            info!(
                validator = %validator,
                height = ctx.height.get(),
                power,
                fraction = %params.tally.governance_penalty,
                "validator slashed for not voting"
            );
        }
        Ok(())
    }
}
