//! Command implementations. Every command runs against the simulated chain.

use anyhow::{anyhow, bail};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;
use tracing::info;

use super::output::{print_error, print_items, print_kv, print_success, OutputMode};
use super::{Cli, Commands};
use crate::chain::{SimulatedChain, SimulatedWallet};
use crate::config::AppConfig;
use crate::domain::{Balance, BatchPlan, CoreId, StakingCall, TokenFormat};
use crate::services::{TracingNotifier, WaitingFlag};
use crate::snapshot::AccountSnapshot;
use crate::validation::{stake_max, unstake_max};
use crate::staking::metrics::{
    aggregate_staked, era_progress_percent, min_support_met, projected_dao_rewards,
    staked_percent, staking_apy,
};
use crate::staking::{
    append_restakes, build_claims, claim_targets, claiming_disabled, unique_cores,
    ClaimRequest, EvenSplitAllocator, NoopCallbacks, RestakeClaimer, RestakePass,
    StakingContext, StakingManager,
};

#[derive(Debug, Serialize, Tabled)]
pub struct CallRow {
    pub index: usize,
    pub call: String,
    pub core: String,
    pub amount: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct UnbondingRow {
    pub amount: String,
    pub status: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CoreRow {
    pub core: u32,
    pub name: String,
    pub my_stake: String,
    pub total_staked: String,
    pub active: bool,
}

pub async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let snapshot = AccountSnapshot::load(&cli.snapshot)?;
    let mode = OutputMode::from_json_flag(cli.json);

    let chain = Arc::new(
        SimulatedChain::new(
            config.claim.simulated_base_fee,
            config.claim.simulated_fee_per_call,
        )
        .with_outcome(cli.outcome.into())
        .with_current_era(snapshot.current_era)
        .with_ledger(snapshot.ledger.clone()),
    );
    let ctx = StakingContext {
        chain: chain.clone(),
        wallet: Arc::new(SimulatedWallet::new([snapshot.account.address.clone()])),
        notifier: Arc::new(TracingNotifier),
        waiting: WaitingFlag::new(),
        app_name: config.chain.app_name.clone(),
    };

    match &cli.command {
        Commands::Plan { restake } => run_plan(config, &snapshot, &chain, *restake, mode),
        Commands::Claim {
            restake,
            no_restake,
        } => {
            let auto_restake = if *restake {
                true
            } else if *no_restake {
                false
            } else {
                config.claim.auto_restake
            };
            run_claim(config, &snapshot, ctx, auto_restake).await
        }
        Commands::Stake { core, amount } => {
            let available = snapshot.available_balance;
            let amount = resolve_amount(amount, available, config.token.decimals, stake_max)?;
            let manager = StakingManager::new(ctx, config.amount_rules());
            let ok = manager
                .stake(&snapshot.account, CoreId(*core), &amount, available)
                .await?;
            report(ok, "Staked successfully")
        }
        Commands::Unstake { core, amount } => {
            let staked = snapshot.core(CoreId(*core))?.user_staked;
            let amount = resolve_amount(amount, staked, config.token.decimals, unstake_max)?;
            let manager = StakingManager::new(ctx, config.amount_rules());
            let ok = manager
                .unstake(&snapshot.account, CoreId(*core), &amount, staked)
                .await?;
            report(ok, "Unstaked successfully")
        }
        Commands::MoveStake { from, to, amount } => {
            let staked = snapshot.core(CoreId(*from))?.user_staked;
            let amount = resolve_amount(amount, staked, config.token.decimals, unstake_max)?;
            let manager = StakingManager::new(ctx, config.amount_rules());
            let ok = manager
                .move_stake(
                    &snapshot.account,
                    CoreId(*from),
                    CoreId(*to),
                    &amount,
                    staked,
                )
                .await?;
            report(ok, "Staked successfully")
        }
        Commands::Withdraw => {
            let manager = StakingManager::new(ctx, config.amount_rules());
            let unbonding = manager.unbonding_info(&snapshot.account).await?;
            let ok = manager
                .withdraw_unbonded(&snapshot.account, &unbonding)
                .await?;
            report(ok, "Unbonded successfully")
        }
        Commands::Unbonding => {
            let manager = StakingManager::new(ctx, config.amount_rules());
            run_unbonding(&config.token.format(), &manager, &snapshot, mode).await
        }
        Commands::Metrics => run_metrics(config, &snapshot, mode),
    }
}

/// Expand "max" into the prefilled amount for the balance that caps it
fn resolve_amount(
    raw: &str,
    cap: Balance,
    decimals: u32,
    max: fn(Decimal) -> Decimal,
) -> anyhow::Result<String> {
    if raw.trim().eq_ignore_ascii_case("max") {
        Ok(max(cap.to_tokens(decimals)?).normalize().to_string())
    } else {
        Ok(raw.to_string())
    }
}

fn report(ok: bool, message: &str) -> anyhow::Result<()> {
    if ok {
        print_success(message);
        Ok(())
    } else {
        print_error("Transaction did not succeed");
        Err(anyhow!("transaction did not succeed"))
    }
}

fn call_rows(plan: &BatchPlan, format: &TokenFormat) -> Vec<CallRow> {
    plan.calls()
        .iter()
        .enumerate()
        .map(|(index, call)| {
            let (core, amount) = match call {
                StakingCall::ClaimRewards { core } => (core.to_string(), String::new()),
                StakingCall::Stake { core, amount } | StakingCall::Unstake { core, amount } => {
                    (core.to_string(), format.format(*amount))
                }
                StakingCall::MoveStake { from, amount, to } => {
                    (format!("{} -> {}", from, to), format.format(*amount))
                }
                StakingCall::WithdrawUnstaked => (String::new(), String::new()),
            };
            CallRow {
                index,
                call: call.method().to_string(),
                core,
                amount,
            }
        })
        .collect()
}

fn run_plan(
    config: &AppConfig,
    snapshot: &AccountSnapshot,
    chain: &SimulatedChain,
    restake: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let unique = unique_cores(&snapshot.unclaimed_eras.cores);
    let targets = claim_targets(&unique, &snapshot.staking_cores);
    let mut plan = build_claims(&targets, snapshot.current_era);

    if restake {
        let allocator = EvenSplitAllocator::new(snapshot.total_unclaimed);
        append_restakes(&mut plan, &targets, &allocator, RestakePass::Draft)
            .map_err(|e| anyhow!(e))?;
    }

    let format = config.token.format();
    print_items(&call_rows(&plan, &format), mode)?;
    if mode == OutputMode::Table {
        print_kv("Estimated fee", &format.format(chain.quote(&plan)));
    }
    Ok(())
}

async fn run_claim(
    config: &AppConfig,
    snapshot: &AccountSnapshot,
    ctx: StakingContext,
    auto_restake: bool,
) -> anyhow::Result<()> {
    if !ctx.waiting.try_begin() {
        bail!("A claim is already in progress");
    }

    let request = ClaimRequest {
        account: snapshot.account.clone(),
        unclaimed_eras: snapshot.unclaimed_eras.clone(),
        current_era: snapshot.current_era,
        staking_cores: snapshot.staking_cores.clone(),
        disable_claiming: claiming_disabled(
            snapshot.total_unclaimed,
            config.token.existential_deposit,
        ),
        enable_auto_restake: auto_restake,
        allocator: Arc::new(EvenSplitAllocator::new(snapshot.total_unclaimed)),
        callbacks: Arc::new(NoopCallbacks),
    };

    info!(
        "Claiming for {} (auto_restake={})",
        snapshot.account, auto_restake
    );
    let claimer = RestakeClaimer::new(ctx);
    match claimer.try_run(&request).await {
        Ok(receipt) => {
            let format = config.token.format();
            print_items(&call_rows(&receipt.plan, &format), OutputMode::Table)?;
            print_kv("Fee", &format.format(receipt.fee));
            print_success("Claimed successfully");
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(anyhow!(e))
        }
    }
}

async fn run_unbonding(
    format: &TokenFormat,
    manager: &StakingManager,
    snapshot: &AccountSnapshot,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let rows: Vec<UnbondingRow> = manager
        .unbonding_info(&snapshot.account)
        .await?
        .into_iter()
        .map(|info| UnbondingRow {
            amount: format.format(info.amount),
            status: if info.is_unlocked() {
                "unlocked".to_string()
            } else {
                format!("unlocks in {} eras", info.unlock_in)
            },
        })
        .collect();
    print_items(&rows, mode)?;
    if mode == OutputMode::Table {
        print_kv(
            "Withdrawable",
            &format.format(snapshot.ledger.withdrawable(snapshot.current_era)),
        );
    }
    Ok(())
}

fn run_metrics(
    config: &AppConfig,
    snapshot: &AccountSnapshot,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let format = config.token.format();
    let stats = &snapshot.chain;
    let aggregate = aggregate_staked(stats);

    let rows: Vec<CoreRow> = snapshot
        .staking_cores
        .iter()
        .map(|core| CoreRow {
            core: core.key.0,
            name: core.metadata.name.clone(),
            my_stake: format.format(core.user_staked),
            total_staked: format.format(core.total_staked),
            active: min_support_met(stats.stake_threshold, core.total_staked),
        })
        .collect();

    if mode == OutputMode::Table {
        print_kv("Account", &snapshot.account.to_string());
        print_kv("Available balance", &format.format(snapshot.available_balance));
        print_kv("My stake", &format.format(snapshot.total_user_staked()));
        print_kv("Unclaimed rewards", &format.format(snapshot.total_unclaimed));
        print_kv("Claimed rewards", &format.format(snapshot.total_claimed));
        print_kv("Unclaimed eras", &snapshot.unclaimed_eras.total.to_string());
        print_kv(
            "Current era",
            &format!(
                "{} ({}% until next era)",
                snapshot.current_era,
                era_progress_percent(
                    stats.current_block,
                    stats.next_era_block,
                    stats.blocks_per_era
                )
            ),
        );
        print_kv(
            "Staking APY",
            &format!("{}%", staking_apy(stats.total_issuance, stats.total_staked)),
        );
        print_kv(
            "Projected annual DAO rewards",
            &format.format(projected_dao_rewards(stats.total_issuance)),
        );
        print_kv(
            &format!("Total {} staked", format.symbol),
            &format!("{}%", staked_percent(stats.total_staked, aggregate)),
        );
        print_kv(
            "Claiming",
            if claiming_disabled(snapshot.total_unclaimed, config.token.existential_deposit) {
                "disabled (rewards below existential deposit)"
            } else {
                "available"
            },
        );
    }
    print_items(&rows, mode)
}
