//! End-to-end claim workflow against the simulated chain and wallet.

use std::sync::{Arc, Mutex};

use ocif_staker::chain::{SimulatedChain, SimulatedOutcome, SimulatedWallet};
use ocif_staker::domain::{
    Account, Balance, CoreId, StakingCall, StakingCoreRef, UnclaimedCoreEntry, UnclaimedEras,
};
use ocif_staker::error::ClaimError;
use ocif_staker::services::{NotificationLevel, ToastSlot, WaitingFlag};
use ocif_staker::staking::{
    ClaimRequest, EvenSplitAllocator, RestakeAllocator, RestakeClaimer, StakingContext,
    SubmissionCallbacks,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ALICE: &str = "i4zTcKHr38MbSUrhFLVKHG5iULhYttBVrqVon2rv6iWcxQwQQ";

#[derive(Default)]
struct Lifecycle(Mutex<Vec<&'static str>>);

impl Lifecycle {
    fn events(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    fn terminal(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter(|e| *e != "executed")
            .collect()
    }
}

impl SubmissionCallbacks for Lifecycle {
    fn on_executed(&self) {
        self.0.lock().unwrap().push("executed");
    }
    fn on_success(&self) {
        self.0.lock().unwrap().push("success");
    }
    fn on_dropped(&self) {
        self.0.lock().unwrap().push("dropped");
    }
    fn on_invalid(&self) {
        self.0.lock().unwrap().push("invalid");
    }
    fn on_error(&self, _error: &str) {
        self.0.lock().unwrap().push("error");
    }
}

struct Harness {
    chain: Arc<SimulatedChain>,
    wallet: Arc<SimulatedWallet>,
    toasts: ToastSlot,
    waiting: WaitingFlag,
    lifecycle: Arc<Lifecycle>,
    claimer: RestakeClaimer,
}

impl Harness {
    fn new(outcome: SimulatedOutcome) -> Self {
        Self::with_chain(SimulatedChain::new(Balance(100), Balance(10)).with_outcome(outcome))
    }

    fn with_chain(chain: SimulatedChain) -> Self {
        let chain = Arc::new(chain.with_current_era(8));
        let wallet = Arc::new(SimulatedWallet::new([ALICE]));
        let toasts = ToastSlot::new();
        let waiting = WaitingFlag::new();
        let claimer = RestakeClaimer::new(StakingContext {
            chain: chain.clone(),
            wallet: wallet.clone(),
            notifier: Arc::new(toasts.clone()),
            waiting: waiting.clone(),
            app_name: "InvArch Tinkernet Staking".to_string(),
        });
        Self {
            chain,
            wallet,
            toasts,
            waiting,
            lifecycle: Arc::new(Lifecycle::default()),
            claimer,
        }
    }

    fn request(&self, cores: Vec<UnclaimedCoreEntry>) -> ClaimRequest {
        ClaimRequest {
            account: Account::new(ALICE),
            unclaimed_eras: UnclaimedEras {
                total: cores.len() as u32,
                cores,
            },
            current_era: 8,
            staking_cores: vec![],
            disable_claiming: false,
            enable_auto_restake: false,
            allocator: Arc::new(EvenSplitAllocator::new(Balance(10_000))),
            callbacks: self.lifecycle.clone(),
        }
    }
}

fn claimed_cores(calls: &[StakingCall]) -> Vec<u32> {
    calls
        .iter()
        .filter_map(|c| match c {
            StakingCall::ClaimRewards { core } => Some(core.0),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn disabled_claiming_touches_nothing() {
    let h = Harness::new(SimulatedOutcome::Success);
    let mut request = h.request(vec![UnclaimedCoreEntry::new(1, Some(5))]);
    request.disable_claiming = true;

    assert!(!h.claimer.run(&request).await);

    assert_eq!(h.chain.quote_count(), 0);
    assert_eq!(h.chain.submit_count(), 0);
    assert_eq!(h.wallet.enable_count(), 0);
    assert!(!h.waiting.is_waiting());
    assert_eq!(
        h.toasts.shown(NotificationLevel::Error),
        vec!["Can only claim when unclaimed rewards are greater than the existential deposit"]
    );
}

#[tokio::test]
async fn duplicate_cores_keep_first_earliest_era() {
    let h = Harness::new(SimulatedOutcome::Success);
    let request = h.request(vec![
        UnclaimedCoreEntry::new(1, Some(5)),
        UnclaimedCoreEntry::new(1, Some(7)),
        UnclaimedCoreEntry::new(2, Some(7)),
    ]);

    let receipt = h.claimer.try_run(&request).await.unwrap();

    // core 1 claims eras 5..8, core 2 claims era 7
    assert_eq!(claimed_cores(receipt.plan.calls()), vec![1, 1, 1, 2]);
    assert_eq!(h.chain.submitted_plans(), vec![receipt.plan.clone()]);
}

#[tokio::test]
async fn claims_cover_half_open_era_range() {
    let h = Harness::new(SimulatedOutcome::Success);
    let request = h.request(vec![
        UnclaimedCoreEntry::new(3, Some(5)),
        UnclaimedCoreEntry::new(4, Some(8)),
        UnclaimedCoreEntry::new(5, None),
    ]);

    let receipt = h.claimer.try_run(&request).await.unwrap();

    assert_eq!(claimed_cores(receipt.plan.calls()), vec![3, 3, 3]);
    assert_eq!(receipt.fee, Balance(130));
}

#[tokio::test]
async fn falls_back_to_one_claim_per_staking_core() {
    let h = Harness::new(SimulatedOutcome::Success);
    let mut request = h.request(vec![]);
    request.staking_cores = vec![
        StakingCoreRef::new(7),
        StakingCoreRef::new(8),
        StakingCoreRef::new(9),
    ];

    let receipt = h.claimer.try_run(&request).await.unwrap();

    assert_eq!(claimed_cores(receipt.plan.calls()), vec![7, 8, 9]);
}

#[tokio::test]
async fn empty_batch_never_quotes() {
    let h = Harness::new(SimulatedOutcome::Success);
    let request = h.request(vec![UnclaimedCoreEntry::new(1, Some(8))]);

    let err = h.claimer.try_run(&request).await.unwrap_err();

    assert_eq!(err, ClaimError::NothingToClaim);
    assert_eq!(h.chain.quote_count(), 0);
    assert_eq!(h.chain.submit_count(), 0);
    assert_eq!(h.toasts.shown(NotificationLevel::Error), vec!["No transactions to send"]);
}

#[tokio::test]
async fn restake_quotes_twice_and_appends_one_stake_per_eligible_core() {
    let h = Harness::new(SimulatedOutcome::Success);
    let mut request = h.request(vec![
        UnclaimedCoreEntry::new(1, Some(6)),
        UnclaimedCoreEntry::new(2, Some(7)),
    ]);
    request.enable_auto_restake = true;
    request.allocator = Arc::new(|_fee: Option<Balance>, _count: usize| Some(dec!(500)));

    let receipt = h.claimer.try_run(&request).await.unwrap();

    assert_eq!(h.chain.quote_count(), 2);
    let stakes: Vec<_> = receipt
        .plan
        .calls()
        .iter()
        .filter(|c| c.is_stake())
        .copied()
        .collect();
    assert_eq!(
        stakes,
        vec![
            StakingCall::Stake {
                core: CoreId(1),
                amount: Balance(500)
            },
            StakingCall::Stake {
                core: CoreId(2),
                amount: Balance(500)
            },
        ]
    );
    assert_eq!(receipt.plan.claim_count(), 3);
    assert_eq!(receipt.draft_fee, Some(Balance(150)));
    assert_eq!(receipt.fee, Balance(150));
}

#[tokio::test]
async fn restake_disabled_quotes_once() {
    let h = Harness::new(SimulatedOutcome::Success);
    let request = h.request(vec![UnclaimedCoreEntry::new(1, Some(6))]);

    let receipt = h.claimer.try_run(&request).await.unwrap();

    assert_eq!(h.chain.quote_count(), 1);
    assert_eq!(receipt.plan.stake_count(), 0);
    assert_eq!(receipt.draft_fee, None);
}

#[tokio::test]
async fn even_split_nets_out_the_draft_fee() {
    let h = Harness::new(SimulatedOutcome::Success);
    let mut request = h.request(vec![
        UnclaimedCoreEntry::new(1, Some(7)),
        UnclaimedCoreEntry::new(2, Some(7)),
    ]);
    request.enable_auto_restake = true;

    let receipt = h.claimer.try_run(&request).await.unwrap();

    // draft: 2 claims + 2 stakes = 4 calls, fee 140; (10_000 - 140) / 2
    assert_eq!(receipt.draft_fee, Some(Balance(140)));
    assert_eq!(receipt.plan.total_restaked(), Balance(9_860));
}

#[tokio::test]
async fn insufficient_rewards_after_fees_never_submit() {
    let h = Harness::new(SimulatedOutcome::Success);
    let mut request = h.request(vec![UnclaimedCoreEntry::new(1, Some(6))]);
    request.enable_auto_restake = true;
    let allocator = |fee: Option<Balance>, _count: usize| match fee {
        None => Some(dec!(50)),
        Some(_) => Some(Decimal::ZERO),
    };
    request.allocator = Arc::new(allocator) as Arc<dyn RestakeAllocator>;

    assert!(!h.claimer.run(&request).await);

    assert_eq!(h.chain.quote_count(), 1);
    assert_eq!(h.chain.submit_count(), 0);
    assert_eq!(
        h.toasts.shown(NotificationLevel::Error),
        vec!["The batch transaction fee is greater than the unclaimed rewards."]
    );
    assert!(!h.waiting.is_waiting());
}

#[tokio::test]
async fn exactly_one_terminal_callback_per_outcome() {
    let cases = [
        (SimulatedOutcome::Success, "success", true),
        (SimulatedOutcome::Dropped, "dropped", false),
        (SimulatedOutcome::Invalid, "invalid", false),
        (
            SimulatedOutcome::DispatchFailed("BadOrigin".to_string()),
            "error",
            false,
        ),
        (SimulatedOutcome::Hangup, "error", false),
    ];

    for (outcome, expected, ok) in cases {
        let h = Harness::new(outcome.clone());
        let request = h.request(vec![UnclaimedCoreEntry::new(1, Some(7))]);

        assert_eq!(h.claimer.run(&request).await, ok, "{:?}", outcome);
        assert_eq!(h.lifecycle.terminal(), vec![expected], "{:?}", outcome);
        assert!(!h.waiting.is_waiting());
        assert_eq!(h.chain.submit_count(), 1);
    }
}

#[tokio::test]
async fn rejected_signature_fires_error_callback() {
    let h = Harness::with_chain(
        SimulatedChain::new(Balance(100), Balance(10)).with_submit_error("Cancelled by user"),
    );
    let request = h.request(vec![UnclaimedCoreEntry::new(1, Some(7))]);

    assert!(!h.claimer.run(&request).await);

    assert_eq!(h.lifecycle.terminal(), vec!["error"]);
    assert_eq!(h.chain.quote_count(), 1);
    assert_eq!(
        h.toasts.shown(NotificationLevel::Error),
        vec!["Submission failed: Cancelled by user"]
    );
    assert!(!h.waiting.is_waiting());
}

#[tokio::test]
async fn notifications_replace_each_other() {
    let h = Harness::new(SimulatedOutcome::Success);
    let request = h.request(vec![UnclaimedCoreEntry::new(1, Some(7))]);

    assert!(h.claimer.run(&request).await);

    assert_eq!(
        h.toasts.shown(NotificationLevel::Loading),
        vec!["Claiming...", "Waiting for confirmation..."]
    );
    assert_eq!(h.toasts.shown(NotificationLevel::Success), vec!["Claimed successfully"]);
    assert_eq!(h.toasts.dismiss_count(), 2);
    assert_eq!(h.lifecycle.events(), vec!["executed", "success"]);
    assert_eq!(
        h.toasts.current().map(|n| n.level),
        Some(NotificationLevel::Success)
    );
}
