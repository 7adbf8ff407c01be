use proptest::prelude::*;

use agora_governance::{
    Context, DualQueueScheduler, GenesisState, GovernanceEngine, Msg, ProposalKind,
    ProposalStatus, QueueKind,
};
use agora_nullables::{MemoryStore, NullBank, NullStake};
use agora_types::{Address, BlockHeight, CoinBag};

const ACCOUNTS: [&str; 3] = ["agr_alice", "agr_bob", "agr_carol"];

/// A governance operation against one of a handful of proposals.
#[derive(Clone, Debug)]
enum Op {
    Submit { proposer: usize, deposit: u128 },
    Deposit { proposal: u64, depositor: usize, amount: u128 },
    EndBlock,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 0u128..8).prop_map(|(proposer, deposit)| Op::Submit { proposer, deposit }),
        (1u64..6, 0usize..3, 0u128..8).prop_map(|(proposal, depositor, amount)| Op::Deposit {
            proposal,
            depositor,
            amount,
        }),
        Just(Op::EndBlock),
    ]
}

fn setup() -> (MemoryStore, GovernanceEngine<NullBank, NullStake>) {
    let store = MemoryStore::new();
    let engine = GovernanceEngine::new(NullBank::new(), NullStake::new());
    let mut genesis = GenesisState::default();
    genesis.params.deposit.max_deposit_period = 4;
    genesis.params.voting.voting_period = 3;
    engine.init_genesis(&store, &genesis).unwrap();
    for account in ACCOUNTS {
        engine
            .bank()
            .set_balance(&store, &Address::new(account), &CoinBag::single("agr", 1_000))
            .unwrap();
    }
    engine
        .stake()
        .add_validator(&store, &Address::new("agr_val"), 10, 10)
        .unwrap();
    (store, engine)
}

/// Run `ops`, one per block; failed messages are expected and ignored.
fn run(store: &MemoryStore, engine: &GovernanceEngine<NullBank, NullStake>, ops: &[Op]) {
    for (i, op) in ops.iter().enumerate() {
        let ctx = Context::new(store, BlockHeight::new(i as u64 + 1));
        match op {
            Op::Submit { proposer, deposit } => {
                let _ = engine.handle(
                    ctx,
                    &Msg::SubmitProposal {
                        title: "p".into(),
                        description: "d".into(),
                        kind: ProposalKind::Text,
                        proposer: Address::new(ACCOUNTS[*proposer]),
                        initial_deposit: CoinBag::single("agr", *deposit),
                    },
                );
            }
            Op::Deposit {
                proposal,
                depositor,
                amount,
            } => {
                let _ = engine.handle(
                    ctx,
                    &Msg::Deposit {
                        proposal_id: *proposal,
                        depositor: Address::new(ACCOUNTS[*depositor]),
                        amount: CoinBag::single("agr", *amount),
                    },
                );
            }
            Op::EndBlock => {
                engine.end_block(ctx).unwrap();
            }
        }
    }
}

proptest! {
    /// A proposal's total deposit always equals the sum of its live deposits.
    #[test]
    fn total_deposit_matches_live_deposits(ops in prop::collection::vec(op(), 1..40)) {
        let (store, engine) = setup();
        run(&store, &engine, &ops);
        for proposal in engine.proposals(&store, &Default::default()).unwrap() {
            let mut sum = CoinBag::new();
            for deposit in engine.deposits(&store, proposal.id).unwrap() {
                sum = sum.checked_add(&deposit.amount).unwrap();
            }
            prop_assert_eq!(&proposal.total_deposit, &sum, "proposal {}", proposal.id);
        }
    }

    /// A proposal sits in the queue matching its status and in no other.
    #[test]
    fn queue_membership_matches_status(ops in prop::collection::vec(op(), 1..40)) {
        let (store, engine) = setup();
        run(&store, &engine, &ops);
        let queues = DualQueueScheduler::new(&store);
        let inactive: Vec<u64> = queues
            .entries(QueueKind::Inactive)
            .unwrap()
            .iter()
            .map(|e| e.proposal_id)
            .collect();
        let active: Vec<u64> = queues
            .entries(QueueKind::Active)
            .unwrap()
            .iter()
            .map(|e| e.proposal_id)
            .collect();
        let proposals = engine.proposals(&store, &Default::default()).unwrap();
        for proposal in &proposals {
            let in_inactive = inactive.contains(&proposal.id);
            let in_active = active.contains(&proposal.id);
            match proposal.status {
                ProposalStatus::DepositPeriod => prop_assert!(in_inactive && !in_active),
                ProposalStatus::VotingPeriod => prop_assert!(in_active && !in_inactive),
                _ => prop_assert!(!in_inactive && !in_active),
            }
        }
        prop_assert_eq!(inactive.len() + active.len(),
            proposals.iter().filter(|p| !p.status.is_terminal()).count());
    }

    /// Coins are never created or lost: balances plus escrow stay constant.
    #[test]
    fn coins_are_conserved(ops in prop::collection::vec(op(), 1..40)) {
        use agora_store::BankKeeper;
        let (store, engine) = setup();
        run(&store, &engine, &ops);
        let mut total = engine.bank().balance(&store, engine.escrow()).unwrap();
        for account in ACCOUNTS {
            total = total
                .checked_add(&engine.bank().balance(&store, &Address::new(account)).unwrap())
                .unwrap();
        }
        prop_assert_eq!(total, CoinBag::single("agr", 3_000));
    }
}
