//! Initial governance state and its export.

use agora_store::KvStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::params::GovParams;
use crate::registry::{ProposalRegistry, DEFAULT_STARTING_PROPOSAL_ID};
use crate::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub starting_proposal_id: u64,
    pub params: GovParams,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            starting_proposal_id: DEFAULT_STARTING_PROPOSAL_ID,
            params: GovParams::default(),
        }
    }
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.starting_proposal_id == 0 {
            return Err(GovernanceError::InvalidParameters(
                "starting_proposal_id must be positive".into(),
            ));
        }
        self.params.validate()
    }
}

/// Write `state` into a fresh store.
pub fn init_genesis(store: &dyn KvStore, state: &GenesisState) -> Result<(), GovernanceError> {
    state.validate()?;
    ProposalRegistry::new(store).set_next_id(state.starting_proposal_id)?;
    state.params.save(store)?;
    info!(
        starting_proposal_id = state.starting_proposal_id,
        min_deposit = %state.params.deposit.min_deposit,
        voting_period = state.params.voting.voting_period,
        "governance genesis initialised"
    );
    Ok(())
}

/// Read back what [`init_genesis`] would need to recreate the current
/// parameters and id counter.
pub fn export_genesis(store: &dyn KvStore) -> Result<GenesisState, GovernanceError> {
    Ok(GenesisState {
        starting_proposal_id: ProposalRegistry::new(store).next_id()?,
        params: GovParams::load(store)?,
    })
}
