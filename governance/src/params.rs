//! Governance parameters and the parameter-change key space.
//!
//! Parameters are a versioned struct stored through the [`ParamStore`] and
//! loaded at the start of every operation. Every field can be changed by a
//! parameter-change proposal, including the thresholds that decide such
//! proposals.

use agora_store::{KvStore, ParamStore};
use agora_types::{Bps, CoinBag, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};

use crate::codec::{decode, encode};
use crate::GovernanceError;

const DEPOSIT_PROCEDURE_KEY: &str = "gov/deposit_procedure";
const VOTING_PROCEDURE_KEY: &str = "gov/voting_procedure";
const TALLY_PROCEDURE_KEY: &str = "gov/tally_procedure";
const VERSION_KEY: &str = "gov/params_version";

/// Rules for the deposit period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositProcedure {
    /// Total deposit that moves a proposal into its voting period.
    pub min_deposit: CoinBag,
    /// Blocks a proposal may wait for the minimum deposit before being dropped.
    pub max_deposit_period: u64,
}

/// Rules for the voting period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingProcedure {
    /// Length of the voting period in blocks.
    pub voting_period: u64,
}

/// Rules for tallying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyProcedure {
    /// Minimum `yes / (total - abstain)`, exclusive.
    pub pass_threshold: Bps,
    /// `no_with_veto / total` at or above which the proposal is rejected.
    pub veto_threshold: Bps,
    /// Fraction of voting power slashed from bonded validators that did not vote.
    pub governance_penalty: Bps,
}

/// The full, versioned governance configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovParams {
    /// Incremented on every accepted parameter change.
    pub version: u64,
    pub deposit: DepositProcedure,
    pub voting: VotingProcedure,
    pub tally: TallyProcedure,
}

impl Default for GovParams {
    fn default() -> Self {
        Self {
            version: 1,
            deposit: DepositProcedure {
                min_deposit: CoinBag::single("agr", 10),
                max_deposit_period: 200,
            },
            voting: VotingProcedure { voting_period: 200 },
            tally: TallyProcedure {
                pass_threshold: Bps::clamped(5000),
                veto_threshold: Bps::clamped(3340),
                governance_penalty: Bps::clamped(100),
            },
        }
    }
}

fn check_bps(name: &str, value: Bps) -> Result<(), GovernanceError> {
    if value.get() as u128 > BPS_DENOMINATOR {
        return Err(GovernanceError::InvalidParameters(format!(
            "{} is {} bps, above 10000",
            name,
            value.get()
        )));
    }
    Ok(())
}

impl GovParams {
    /// Load the current parameters.
    pub fn load(store: &dyn KvStore) -> Result<Self, GovernanceError> {
        Ok(Self {
            version: decode(&store.require_param(VERSION_KEY)?)?,
            deposit: decode(&store.require_param(DEPOSIT_PROCEDURE_KEY)?)?,
            voting: decode(&store.require_param(VOTING_PROCEDURE_KEY)?)?,
            tally: decode(&store.require_param(TALLY_PROCEDURE_KEY)?)?,
        })
    }

    /// Persist these parameters.
    pub fn save(&self, store: &dyn KvStore) -> Result<(), GovernanceError> {
        store.set_param(VERSION_KEY, &encode(&self.version)?)?;
        store.set_param(DEPOSIT_PROCEDURE_KEY, &encode(&self.deposit)?)?;
        store.set_param(VOTING_PROCEDURE_KEY, &encode(&self.voting)?)?;
        store.set_param(TALLY_PROCEDURE_KEY, &encode(&self.tally)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.deposit.max_deposit_period == 0 {
            return Err(GovernanceError::InvalidParameters(
                "max_deposit_period must be positive".into(),
            ));
        }
        if self.voting.voting_period == 0 {
            return Err(GovernanceError::InvalidParameters(
                "voting_period must be positive".into(),
            ));
        }
        check_bps("pass_threshold", self.tally.pass_threshold)?;
        check_bps("veto_threshold", self.tally.veto_threshold)?;
        check_bps("governance_penalty", self.tally.governance_penalty)?;
        Ok(())
    }
}

/// Every parameter a parameter-change proposal may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernableParam {
    MinDeposit,
    MaxDepositPeriod,
    VotingPeriod,
    PassThreshold,
    VetoThreshold,
    GovernancePenalty,
}

impl GovernableParam {
    pub const ALL: [GovernableParam; 6] = [
        Self::MinDeposit,
        Self::MaxDepositPeriod,
        Self::VotingPeriod,
        Self::PassThreshold,
        Self::VetoThreshold,
        Self::GovernancePenalty,
    ];

    /// Key used in parameter-change payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinDeposit => "min_deposit",
            Self::MaxDepositPeriod => "max_deposit_period",
            Self::VotingPeriod => "voting_period",
            Self::PassThreshold => "pass_threshold_bps",
            Self::VetoThreshold => "veto_threshold_bps",
            Self::GovernancePenalty => "governance_penalty_bps",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// One `key = value` change carried by a parameter-change proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamChange {
    pub key: String,
    pub value: String,
}

impl ParamChange {
    pub fn new(param: GovernableParam, value: impl Into<String>) -> Self {
        Self {
            key: param.name().to_string(),
            value: value.into(),
        }
    }

    /// Parse the value and write it into `params`.
    ///
    /// Fails with `InvalidParameters` on an unknown key, an unparsable value
    /// or a value out of range; `params` is left untouched on failure.
    pub fn apply_to(&self, params: &mut GovParams) -> Result<(), GovernanceError> {
        let param = GovernableParam::from_name(&self.key).ok_or_else(|| {
            GovernanceError::InvalidParameters(format!("unknown parameter '{}'", self.key))
        })?;
        let invalid = |reason: &str| {
            GovernanceError::InvalidParameters(format!(
                "{} = '{}': {}",
                self.key, self.value, reason
            ))
        };
        match param {
            GovernableParam::MinDeposit => {
                params.deposit.min_deposit =
                    self.value.parse().map_err(|_| invalid("not a coin list"))?;
            }
            GovernableParam::MaxDepositPeriod | GovernableParam::VotingPeriod => {
                let blocks: u64 = self
                    .value
                    .parse()
                    .map_err(|_| invalid("not a block count"))?;
                if blocks == 0 {
                    return Err(invalid("must be positive"));
                }
                if param == GovernableParam::MaxDepositPeriod {
                    params.deposit.max_deposit_period = blocks;
                } else {
                    params.voting.voting_period = blocks;
                }
            }
            GovernableParam::PassThreshold
            | GovernableParam::VetoThreshold
            | GovernableParam::GovernancePenalty => {
                let bps: u32 = self
                    .value
                    .parse()
                    .map_err(|_| invalid("not a basis-point value"))?;
                let fraction = Bps::new(bps).map_err(|_| invalid("above 10000 bps"))?;
                match param {
                    GovernableParam::PassThreshold => params.tally.pass_threshold = fraction,
                    GovernableParam::VetoThreshold => params.tally.veto_threshold = fraction,
                    _ => params.tally.governance_penalty = fraction,
                }
            }
        }
        Ok(())
    }
}

/// Check a set of changes without touching any stored state.
pub fn validate_changes(changes: &[ParamChange]) -> Result<(), GovernanceError> {
    if changes.is_empty() {
        return Err(GovernanceError::InvalidParameters(
            "parameter change proposal carries no changes".into(),
        ));
    }
    let mut scratch = GovParams::default();
    for change in changes {
        change.apply_to(&mut scratch)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::MemoryStore;

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        assert!(GovParams::load(&store).is_err());
        let params = GovParams::default();
        params.save(&store).unwrap();
        assert_eq!(GovParams::load(&store).unwrap(), params);
    }

    #[test]
    fn test_apply_changes() {
        let mut params = GovParams::default();
        ParamChange::new(GovernableParam::VotingPeriod, "50")
            .apply_to(&mut params)
            .unwrap();
        ParamChange::new(GovernableParam::VetoThreshold, "4000")
            .apply_to(&mut params)
            .unwrap();
        ParamChange::new(GovernableParam::MinDeposit, "20agr,5atom")
            .apply_to(&mut params)
            .unwrap();
        assert_eq!(params.voting.voting_period, 50);
        assert_eq!(params.tally.veto_threshold.get(), 4000);
        assert_eq!(params.deposit.min_deposit.amount_of("atom"), 5);
    }

    #[test]
    fn test_rejects_bad_changes() {
        let bad = [
            ParamChange {
                key: "block_size".into(),
                value: "1".into(),
            },
            ParamChange::new(GovernableParam::VotingPeriod, "0"),
            ParamChange::new(GovernableParam::VotingPeriod, "-5"),
            ParamChange::new(GovernableParam::PassThreshold, "10001"),
            ParamChange::new(GovernableParam::MinDeposit, "lots"),
        ];
        for change in bad {
            assert!(
                matches!(
                    validate_changes(&[change.clone()]),
                    Err(GovernanceError::InvalidParameters(_))
                ),
                "accepted {:?}",
                change
            );
        }
        assert!(validate_changes(&[]).is_err());
    }

    #[test]
    fn test_validate_periods() {
        let mut params = GovParams::default();
        assert!(params.validate().is_ok());
        params.voting.voting_period = 0;
        assert!(params.validate().is_err());
    }
}
