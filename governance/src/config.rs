//! Governance configuration with TOML file support.

use agora_types::{Bps, CoinBag};
use agora_utils::{init_logging, LogFormat, LoggingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deposit::DepositExpiryPolicy;
use crate::genesis::GenesisState;
use crate::params::{DepositProcedure, GovParams, TallyProcedure, VotingProcedure};
use crate::registry::DEFAULT_STARTING_PROPOSAL_ID;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration of the governance module.
///
/// Loaded from TOML via [`GovernanceConfig::from_toml_file`]; every field
/// has a default, so an empty file is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub genesis: GenesisConfig,

    /// What to do with deposits of proposals that never reach the minimum.
    #[serde(default)]
    pub deposit_expiry: DepositExpiryPolicy,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Genesis parameters in their human-editable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default = "default_starting_proposal_id")]
    pub starting_proposal_id: u64,

    /// Coin list, e.g. `"10agr"` or `"10agr,5atom"`.
    #[serde(default = "default_min_deposit")]
    pub min_deposit: String,

    /// Blocks.
    #[serde(default = "default_period")]
    pub max_deposit_period: u64,

    /// Blocks.
    #[serde(default = "default_period")]
    pub voting_period: u64,

    #[serde(default = "default_pass_threshold_bps")]
    pub pass_threshold_bps: u32,

    #[serde(default = "default_veto_threshold_bps")]
    pub veto_threshold_bps: u32,

    #[serde(default = "default_governance_penalty_bps")]
    pub governance_penalty_bps: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "human" or "json".
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive, e.g. "info" or "info,agora_governance=debug".
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_starting_proposal_id() -> u64 {
    DEFAULT_STARTING_PROPOSAL_ID
}

fn default_min_deposit() -> String {
    "10agr".to_string()
}

fn default_period() -> u64 {
    200
}

fn default_pass_threshold_bps() -> u32 {
    5000
}

fn default_veto_threshold_bps() -> u32 {
    3340
}

fn default_governance_penalty_bps() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            starting_proposal_id: default_starting_proposal_id(),
            min_deposit: default_min_deposit(),
            max_deposit_period: default_period(),
            voting_period: default_period(),
            pass_threshold_bps: default_pass_threshold_bps(),
            veto_threshold_bps: default_veto_threshold_bps(),
            governance_penalty_bps: default_governance_penalty_bps(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

fn fraction(name: &str, bps: u32) -> Result<Bps, ConfigError> {
    Bps::new(bps).map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))
}

impl GenesisConfig {
    /// Convert into a validated [`GenesisState`].
    pub fn to_genesis_state(&self) -> Result<GenesisState, ConfigError> {
        let min_deposit: CoinBag = self
            .min_deposit
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("min_deposit: {}", e)))?;
        let state = GenesisState {
            starting_proposal_id: self.starting_proposal_id,
            params: GovParams {
                version: 1,
                deposit: DepositProcedure {
                    min_deposit,
                    max_deposit_period: self.max_deposit_period,
                },
                voting: VotingProcedure {
                    voting_period: self.voting_period,
                },
                tally: TallyProcedure {
                    pass_threshold: fraction("pass_threshold_bps", self.pass_threshold_bps)?,
                    veto_threshold: fraction("veto_threshold_bps", self.veto_threshold_bps)?,
                    governance_penalty: fraction(
                        "governance_penalty_bps",
                        self.governance_penalty_bps,
                    )?,
                },
            },
        };
        state
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(state)
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber described by this section.
    pub fn init(&self) -> Result<(), LoggingError> {
        init_logging(self.format, &self.level)
    }
}

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GovernanceConfig::from_toml_str("").unwrap();
        assert_eq!(config, GovernanceConfig::default());
        assert_eq!(config.deposit_expiry, DepositExpiryPolicy::Refund);
        assert_eq!(
            config.genesis.to_genesis_state().unwrap(),
            GenesisState::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config = GovernanceConfig::from_toml_str(
            r#"
            deposit_expiry = "burn"

            [genesis]
            starting_proposal_id = 7
            min_deposit = "50agr,1atom"
            voting_period = 30
            veto_threshold_bps = 4000

            [logging]
            format = "json"
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.deposit_expiry, DepositExpiryPolicy::Burn);
        assert_eq!(config.logging.format, LogFormat::Json);

        let state = config.genesis.to_genesis_state().unwrap();
        assert_eq!(state.starting_proposal_id, 7);
        assert_eq!(state.params.deposit.min_deposit.amount_of("atom"), 1);
        assert_eq!(state.params.deposit.max_deposit_period, 200);
        assert_eq!(state.params.voting.voting_period, 30);
        assert_eq!(state.params.tally.veto_threshold.get(), 4000);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config =
            GovernanceConfig::from_toml_str("[genesis]\npass_threshold_bps = 12000\n").unwrap();
        assert!(matches!(
            config.genesis.to_genesis_state(),
            Err(ConfigError::Invalid(_))
        ));
        let config = GovernanceConfig::from_toml_str("[genesis]\nmin_deposit = \"x\"\n").unwrap();
        assert!(config.genesis.to_genesis_state().is_err());
        assert!(GovernanceConfig::from_toml_str("deposit_expiry = \"keep\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GovernanceConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(GovernanceConfig::from_toml_str(&text).unwrap(), config);
    }
}
