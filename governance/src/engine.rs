//! Core governance engine: owns the bank and stake collaborators and routes
//! messages, end-of-block processing and queries to the governance core.

use agora_store::{BankKeeper, KvStore, StakeKeeper};
use agora_types::{Address, CoinBag};

use crate::config::GovernanceConfig;
use crate::context::Context;
use crate::deposit::DepositExpiryPolicy;
use crate::genesis::{self, GenesisState};
use crate::handler::{handle_msg, MsgResult};
use crate::msg::Msg;
use crate::params::GovParams;
use crate::processor::{EndBlockResult, GovernanceProcessor};
use crate::proposal::{Proposal, UpgradePlan};
use crate::query::{self, ProposalFilter};
use crate::tally::TallyOutcome;
use crate::vote::{Deposit, Vote};
use crate::GovernanceError;

/// Name of the governance module account that escrows deposits.
pub const MODULE_NAME: &str = "gov";

pub struct GovernanceEngine<B: BankKeeper, S: StakeKeeper> {
    bank: B,
    stake: S,
    escrow: Address,
    expiry_policy: DepositExpiryPolicy,
}

impl<B: BankKeeper, S: StakeKeeper> GovernanceEngine<B, S> {
    pub fn new(bank: B, stake: S) -> Self {
        Self {
            bank,
            stake,
            escrow: Address::module(MODULE_NAME),
            expiry_policy: DepositExpiryPolicy::default(),
        }
    }

    pub fn from_config(bank: B, stake: S, config: &GovernanceConfig) -> Self {
        Self::new(bank, stake).with_expiry_policy(config.deposit_expiry)
    }

    pub fn with_expiry_policy(mut self, policy: DepositExpiryPolicy) -> Self {
        self.expiry_policy = policy;
        self
    }

    /// The account holding escrowed deposits.
    pub fn escrow(&self) -> &Address {
        &self.escrow
    }

    pub fn expiry_policy(&self) -> DepositExpiryPolicy {
        self.expiry_policy
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn stake(&self) -> &S {
        &self.stake
    }

    pub fn init_genesis(
        &self,
        store: &dyn KvStore,
        state: &GenesisState,
    ) -> Result<(), GovernanceError> {
        genesis::init_genesis(store, state)
    }

    pub fn export_genesis(&self, store: &dyn KvStore) -> Result<GenesisState, GovernanceError> {
        genesis::export_genesis(store)
    }

    /// Apply one message atomically.
    pub fn handle(&self, ctx: Context<'_>, msg: &Msg) -> Result<MsgResult, GovernanceError> {
        handle_msg(ctx, &self.bank, &self.escrow, msg)
    }

    /// Run the end-of-block pass. Must be called once per block, after
    /// every transaction of the block; an error is fatal.
    pub fn end_block(&self, ctx: Context<'_>) -> Result<EndBlockResult, GovernanceError> {
        GovernanceProcessor::new(&self.bank, &self.stake, &self.escrow, self.expiry_policy)
            .end_block(ctx)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn proposal(&self, store: &dyn KvStore, id: u64) -> Result<Proposal, GovernanceError> {
        query::proposal(store, id)
    }

    pub fn proposals(
        &self,
        store: &dyn KvStore,
        filter: &ProposalFilter,
    ) -> Result<Vec<Proposal>, GovernanceError> {
        query::proposals(store, filter)
    }

    pub fn deposit(
        &self,
        store: &dyn KvStore,
        id: u64,
        depositor: &Address,
    ) -> Result<CoinBag, GovernanceError> {
        query::deposit(store, id, depositor)
    }

    pub fn deposits(&self, store: &dyn KvStore, id: u64) -> Result<Vec<Deposit>, GovernanceError> {
        query::deposits(store, id)
    }

    pub fn vote(
        &self,
        store: &dyn KvStore,
        id: u64,
        voter: &Address,
    ) -> Result<Option<Vote>, GovernanceError> {
        query::vote(store, id, voter)
    }

    pub fn votes(&self, store: &dyn KvStore, id: u64) -> Result<Vec<Vote>, GovernanceError> {
        query::votes(store, id)
    }

    pub fn tally_preview(
        &self,
        store: &dyn KvStore,
        id: u64,
    ) -> Result<TallyOutcome, GovernanceError> {
        query::tally_preview(store, &self.stake, id)
    }

    pub fn params(&self, store: &dyn KvStore) -> Result<GovParams, GovernanceError> {
        query::params(store)
    }

    pub fn scheduled_upgrade(
        &self,
        store: &dyn KvStore,
    ) -> Result<Option<UpgradePlan>, GovernanceError> {
        query::scheduled_upgrade(store)
    }
}
