//! The on-chain effect of a passed proposal, selected by its kind.

use agora_store::KvStore;
use tracing::info;

use crate::codec::{decode, encode};
use crate::context::Context;
use crate::keys::UPGRADE_PLAN_KEY;
use crate::params::GovParams;
use crate::proposal::{Proposal, ProposalKind, UpgradePlan};
use crate::GovernanceError;

/// Apply `proposal`'s effect to the state in `ctx`.
///
/// On error the caller must discard whatever this call wrote.
pub fn execute(ctx: Context<'_>, proposal: &Proposal) -> Result<(), GovernanceError> {
    match &proposal.kind {
        ProposalKind::Text => Ok(()),
        ProposalKind::ParameterChange(changes) => {
            let mut params = GovParams::load(ctx.store)?;
            for change in changes {
                change.apply_to(&mut params)?;
            }
            params.validate()?;
            params.version = params
                .version
                .checked_add(1)
                .ok_or_else(|| GovernanceError::Overflow("params version".into()))?;
            params.save(ctx.store)?;
            info!(
                proposal_id = proposal.id,
                version = params.version,
                changes = changes.len(),
                "governance parameters changed"
            );
            Ok(())
        }
        ProposalKind::SoftwareUpgrade(plan) => {
            check_upgrade_height(ctx, plan)?;
            ctx.store.put(UPGRADE_PLAN_KEY, &encode(plan)?)?;
            info!(
                proposal_id = proposal.id,
                name = %plan.name,
                upgrade_height = plan.height.get(),
                "software upgrade scheduled"
            );
            Ok(())
        }
    }
}

/// An upgrade must be scheduled strictly after the current block.
pub fn check_upgrade_height(ctx: Context<'_>, plan: &UpgradePlan) -> Result<(), GovernanceError> {
    if plan.height <= ctx.height {
        return Err(GovernanceError::InvalidProposal(format!(
            "upgrade '{}' at {} is not after the current height {}",
            plan.name, plan.height, ctx.height
        )));
    }
    Ok(())
}

/// The most recently scheduled upgrade, if any.
pub fn scheduled_upgrade(store: &dyn KvStore) -> Result<Option<UpgradePlan>, GovernanceError> {
    store
        .get(UPGRADE_PLAN_KEY)?
        .map(|bytes| decode(&bytes))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{GovernableParam, ParamChange};
    use crate::proposal::ProposalStatus;
    use agora_nullables::MemoryStore;
    use agora_types::{Address, BlockHeight, CoinBag};

    fn proposal(kind: ProposalKind) -> Proposal {
        Proposal {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            kind,
            proposer: Address::new("agr_alice"),
            status: ProposalStatus::Passed,
            submit_height: BlockHeight::new(1),
            deposit_end_height: BlockHeight::new(201),
            voting_start_height: Some(BlockHeight::new(2)),
            voting_end_height: Some(BlockHeight::new(202)),
            total_deposit: CoinBag::new(),
            final_tally: None,
        }
    }

    #[test]
    fn test_parameter_change_bumps_version() {
        let store = MemoryStore::new();
        GovParams::default().save(&store).unwrap();
        let ctx = Context::new(&store, BlockHeight::new(10));
        let changes = vec![ParamChange::new(GovernableParam::VotingPeriod, "7")];
        execute(ctx, &proposal(ProposalKind::ParameterChange(changes))).unwrap();

        let params = GovParams::load(&store).unwrap();
        assert_eq!(params.voting.voting_period, 7);
        assert_eq!(params.version, 2);
    }

    #[test]
    fn test_upgrade_must_be_in_future() {
        let store = MemoryStore::new();
        let plan = UpgradePlan {
            name: "v2".into(),
            height: BlockHeight::new(10),
            info: String::new(),
        };
        let kind = ProposalKind::SoftwareUpgrade(plan.clone());

        let late = Context::new(&store, BlockHeight::new(10));
        assert!(matches!(
            execute(late, &proposal(kind.clone())),
            Err(GovernanceError::InvalidProposal(_))
        ));
        assert!(scheduled_upgrade(&store).unwrap().is_none());

        let early = Context::new(&store, BlockHeight::new(9));
        execute(early, &proposal(kind)).unwrap();
        assert_eq!(scheduled_upgrade(&store).unwrap(), Some(plan));
    }
}
