//! Weighted tally of a proposal's votes over the bonded validator set.
//!
//! A validator's voting power is split across its delegators by share. A
//! delegator who voted moves its slice of the power to its own option; the
//! validator's vote (if any) carries whatever power its delegators did not
//! claim. A validator that cast no vote is reported as non-voting even when its
//! delegators voted in its place.

use std::collections::BTreeMap;

use agora_store::{KvStore, StakeKeeper};
use agora_types::Address;
use tracing::debug;

use crate::ballot::VoteBallot;
use crate::params::TallyProcedure;
use crate::proposal::TallyResult;
use crate::vote::VoteOption;
use crate::GovernanceError;

/// The outcome of tallying one proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyOutcome {
    pub passed: bool,
    pub result: TallyResult,
    /// Bonded validators subject to the absence penalty, ordered by address.
    pub non_voting: Vec<Address>,
}

fn add_power(result: &mut TallyResult, option: VoteOption, power: u128) {
    let slot = match option {
        VoteOption::Yes => &mut result.yes,
        VoteOption::No => &mut result.no,
        VoteOption::Abstain => &mut result.abstain,
        VoteOption::NoWithVeto => &mut result.no_with_veto,
    };
    *slot = slot.saturating_add(power);
}

/// Apply the pass and veto thresholds to a tally.
///
/// Passes iff something was cast, `no_with_veto / total` is below the veto
/// threshold and `yes / (total - abstain)` is above the pass threshold.
pub fn passes(result: &TallyResult, procedure: &TallyProcedure) -> bool {
    let total = result.total();
    if total == 0 {
        return false;
    }
    if !procedure
        .veto_threshold
        .is_above_ratio(result.no_with_veto, total)
    {
        return false;
    }
    let participating = total - result.abstain;
    participating > 0
        && procedure
            .pass_threshold
            .is_exceeded_by(result.yes, participating)
}

/// Tally the votes currently recorded for `proposal_id`. Reads only.
pub fn tally(
    store: &dyn KvStore,
    stake: &dyn StakeKeeper,
    procedure: &TallyProcedure,
    proposal_id: u64,
) -> Result<TallyOutcome, GovernanceError> {
    let votes: BTreeMap<Address, VoteOption> = VoteBallot::new(store)
        .votes(proposal_id)?
        .into_iter()
        .map(|vote| (vote.voter, vote.option))
        .collect();

    let mut result = TallyResult::default();
    let mut non_voting = Vec::new();

    for validator in stake.bonded_validators(store)? {
        let power = validator.voting_power as u128;
        let mut uncovered_power = power;

        for delegation in stake.delegators_of(store, &validator.address)? {
            if delegation.delegator == validator.address {
                continue;
            }
            let Some(option) = votes.get(&delegation.delegator) else {
                continue;
            };
            let delegated_power = if validator.delegator_shares == 0 {
                0
            } else {
                delegation.shares.saturating_mul(power) / validator.delegator_shares
            };
            add_power(&mut result, *option, delegated_power);
            uncovered_power = uncovered_power.saturating_sub(delegated_power);
        }

        match votes.get(&validator.address) {
            Some(option) => add_power(&mut result, *option, uncovered_power),
            None => non_voting.push(validator.address.clone()),
        }
    }

    non_voting.sort();
    let passed = passes(&result, procedure);
    debug!(
        proposal_id,
        yes = result.yes,
        no = result.no,
        abstain = result.abstain,
        no_with_veto = result.no_with_veto,
        passed,
        non_voting = non_voting.len(),
        "tallied proposal"
    );
    Ok(TallyOutcome {
        passed,
        result,
        non_voting,
    })
}
