//! Stake management and dashboard numbers driven from an account snapshot.

use std::sync::Arc;

use ocif_staker::chain::{SimulatedChain, SimulatedWallet};
use ocif_staker::config::AppConfig;
use ocif_staker::domain::{Balance, CoreId, StakingCall};
use ocif_staker::error::StakerError;
use ocif_staker::services::{NotificationLevel, ToastSlot, WaitingFlag};
use ocif_staker::snapshot::AccountSnapshot;
use ocif_staker::staking::metrics::{aggregate_staked, staked_percent, staking_apy};
use ocif_staker::staking::{claiming_disabled, StakingContext, StakingManager};
use rust_decimal_macros::dec;
use tokio_test::assert_ok;

const ONE: u128 = 1_000_000_000_000;

const SNAPSHOT: &str = r#"{
    "account": {"address": "alice", "name": "Alice"},
    "currentEra": 40,
    "unclaimedEras": {"cores": [{"coreId": 0, "earliestEra": 38}], "total": 2},
    "stakingCores": [
        {"key": 0, "metadata": {"name": "InvArch"}, "userStaked": 200000000000000, "totalStaked": 900000000000000},
        {"key": 1, "metadata": {"name": "Tinkernet"}, "userStaked": 0, "totalStaked": 10000000000000}
    ],
    "totalUnclaimed": 5000000000000,
    "availableBalance": 80000000000000,
    "ledger": {
        "locked": 300000000000000,
        "unlockingChunks": [
            {"amount": 20000000000000, "unlockEra": 39},
            {"amount": 30000000000000, "unlockEra": 45}
        ]
    },
    "chain": {
        "totalIssuance": 1000000000000000,
        "inactiveIssuance": 0,
        "totalStaked": 250000000000000,
        "currentBlock": 150,
        "nextEraBlock": 200,
        "blocksPerEra": 100,
        "stakeThreshold": 50000000000000
    }
}"#;

fn snapshot() -> AccountSnapshot {
    serde_json::from_str(SNAPSHOT).unwrap()
}

fn manager(snapshot: &AccountSnapshot) -> (Arc<SimulatedChain>, ToastSlot, StakingManager) {
    let chain = Arc::new(
        SimulatedChain::new(Balance(1_000), Balance(100))
            .with_current_era(snapshot.current_era)
            .with_ledger(snapshot.ledger.clone()),
    );
    let toasts = ToastSlot::new();
    let manager = StakingManager::new(
        StakingContext {
            chain: chain.clone(),
            wallet: Arc::new(SimulatedWallet::new([snapshot.account.address.clone()])),
            notifier: Arc::new(toasts.clone()),
            waiting: WaitingFlag::new(),
            app_name: "InvArch Tinkernet Staking".to_string(),
        },
        AppConfig::default().amount_rules(),
    );
    (chain, toasts, manager)
}

#[tokio::test]
async fn unstake_is_capped_by_stake_on_core() {
    let snapshot = snapshot();
    let (chain, _toasts, manager) = manager(&snapshot);
    let staked = snapshot.core(CoreId(0)).unwrap().user_staked;

    let err = manager
        .unstake(&snapshot.account, CoreId(0), "250", staked)
        .await
        .unwrap_err();
    assert!(matches!(err, StakerError::Validation(_)), "{}", err);
    assert_eq!(chain.submit_count(), 0);

    let ok = assert_ok!(
        manager
            .unstake(&snapshot.account, CoreId(0), "1,00", staked)
            .await
    );
    assert!(ok);
    assert_eq!(
        chain.submitted_plans()[0].calls(),
        &[StakingCall::Unstake {
            core: CoreId(0),
            amount: Balance(100 * ONE)
        }]
    );
}

#[tokio::test]
async fn move_stake_rejects_same_core() {
    let snapshot = snapshot();
    let (chain, toasts, manager) = manager(&snapshot);

    assert!(manager
        .move_stake(&snapshot.account, CoreId(0), CoreId(0), "60", Balance(200 * ONE))
        .await
        .is_err());
    assert_eq!(chain.submit_count(), 0);
    assert!(toasts.history().is_empty());
}

#[tokio::test]
async fn withdraw_uses_ledger_from_chain() {
    let snapshot = snapshot();
    let (chain, toasts, manager) = manager(&snapshot);

    let unbonding = assert_ok!(manager.unbonding_info(&snapshot.account).await);
    assert_eq!(unbonding.len(), 2);
    assert!(unbonding[0].is_unlocked());
    assert_eq!(unbonding[1].unlock_in, 5);

    assert!(assert_ok!(
        manager.withdraw_unbonded(&snapshot.account, &unbonding).await
    ));
    assert_eq!(
        chain.submitted_plans()[0].calls(),
        &[StakingCall::WithdrawUnstaked]
    );
    assert_eq!(
        toasts.shown(NotificationLevel::Success),
        vec!["Unbonded successfully"]
    );
}

#[test]
fn dashboard_numbers_from_snapshot() {
    let snapshot = snapshot();
    let stats = &snapshot.chain;

    assert_eq!(staking_apy(stats.total_issuance, stats.total_staked), dec!(16));
    assert_eq!(
        staked_percent(stats.total_staked, aggregate_staked(stats)),
        dec!(25)
    );
    assert!(!claiming_disabled(
        snapshot.total_unclaimed,
        AppConfig::default().token.existential_deposit
    ));
    assert_eq!(snapshot.total_user_staked(), Balance(200 * ONE));
}
