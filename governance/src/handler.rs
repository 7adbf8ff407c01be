//! Atomic message handling.

use agora_store::{BankKeeper, CacheStore};
use agora_types::Address;
use tracing::debug;

use crate::ballot::VoteBallot;
use crate::context::Context;
use crate::deposit::DepositLedger;
use crate::event::{
    Tags, ACTION, ACTION_DEPOSIT, ACTION_SUBMIT_PROPOSAL, ACTION_VOTE, DEPOSITER, PROPOSAL_ID,
    PROPOSER, VOTER, VOTING_PERIOD_START,
};
use crate::execute::check_upgrade_height;
use crate::msg::Msg;
use crate::params::GovParams;
use crate::proposal::ProposalKind;
use crate::queue::{DualQueueScheduler, QueueKind};
use crate::registry::{ProposalDraft, ProposalRegistry};
use crate::vote::VoteOption;
use crate::GovernanceError;

/// The successful result of a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MsgResult {
    /// `SubmitProposal`: the new proposal id, 8 bytes big-endian. Empty otherwise.
    pub data: Vec<u8>,
    pub tags: Tags,
}

impl MsgResult {
    /// The proposal id carried in `data`, if any.
    pub fn proposal_id(&self) -> Option<u64> {
        let bytes: [u8; 8] = self.data.as_slice().try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }
}

/// Validate and apply `msg` to `ctx.store`.
///
/// Every write (including coin transfers made through `bank`) goes to a cache
/// that is committed only when the whole message succeeds; on error the store
/// is left exactly as it was.
pub fn handle_msg(
    ctx: Context<'_>,
    bank: &dyn BankKeeper,
    escrow: &Address,
    msg: &Msg,
) -> Result<MsgResult, GovernanceError> {
    msg.validate_basic()?;
    let cache = CacheStore::new(ctx.store);
    let result = apply(ctx.with_store(&cache), bank, escrow, msg);
    match result {
        Ok(result) => {
            cache.commit()?;
            debug!(msg = msg.name(), height = ctx.height.get(), "message applied");
            Ok(result)
        }
        Err(e) => {
            cache.discard();
            debug!(msg = msg.name(), height = ctx.height.get(), error = %e, "message rejected");
            Err(e)
        }
    }
}

fn apply(
    ctx: Context<'_>,
    bank: &dyn BankKeeper,
    escrow: &Address,
    msg: &Msg,
) -> Result<MsgResult, GovernanceError> {
    let params = GovParams::load(ctx.store)?;
    let ledger = DepositLedger::new(ctx, bank, escrow);

    match msg {
        Msg::SubmitProposal {
            title,
            description,
            kind,
            proposer,
            initial_deposit,
        } => {
            if let ProposalKind::SoftwareUpgrade(plan) = kind {
                check_upgrade_height(ctx, plan)?;
            }
            let draft = ProposalDraft {
                title: title.clone(),
                description: description.clone(),
                kind: kind.clone(),
                proposer: proposer.clone(),
            };
            let proposal = ProposalRegistry::new(ctx.store).create(
                draft,
                ctx.height,
                params.deposit.max_deposit_period,
            )?;
            DualQueueScheduler::new(ctx.store).insert(
                QueueKind::Inactive,
                proposal.deposit_end_height,
                proposal.id,
            )?;
            let voting_started =
                ledger.add_deposit(&params, proposal.id, proposer, initial_deposit)?;

            let mut tags = Tags::new()
                .with(ACTION, ACTION_SUBMIT_PROPOSAL)
                .with(PROPOSER, proposer)
                .with(PROPOSAL_ID, proposal.id);
            if voting_started {
                tags.push(VOTING_PERIOD_START, proposal.id);
            }
            Ok(MsgResult {
                data: proposal.id.to_be_bytes().to_vec(),
                tags,
            })
        }
        Msg::Deposit {
            proposal_id,
            depositor,
            amount,
        } => {
            let voting_started = ledger.add_deposit(&params, *proposal_id, depositor, amount)?;
            let mut tags = Tags::new()
                .with(ACTION, ACTION_DEPOSIT)
                .with(DEPOSITER, depositor)
                .with(PROPOSAL_ID, proposal_id);
            if voting_started {
                tags.push(VOTING_PERIOD_START, proposal_id);
            }
            Ok(MsgResult {
                data: Vec::new(),
                tags,
            })
        }
        Msg::Vote {
            proposal_id,
            voter,
            option,
        } => {
            let option = VoteOption::try_from(*option)?;
            VoteBallot::new(ctx.store).add_vote(*proposal_id, voter, option)?;
            Ok(MsgResult {
                data: Vec::new(),
                tags: Tags::new()
                    .with(ACTION, ACTION_VOTE)
                    .with(VOTER, voter)
                    .with(PROPOSAL_ID, proposal_id),
            })
        }
    }
}
