//! Dashboard figures derived from chain state.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::Balance;

/// Share of total supply minted to DAO treasuries each year
const DAO_REWARD_RATE: Decimal = dec!(0.06);

/// Chain-wide staking figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStats {
    #[serde(default)]
    pub total_issuance: Balance,
    #[serde(default)]
    pub inactive_issuance: Balance,
    /// Staked across all cores
    #[serde(default)]
    pub total_staked: Balance,
    #[serde(default)]
    pub current_block: u64,
    #[serde(default)]
    pub next_era_block: u64,
    #[serde(default)]
    pub blocks_per_era: u64,
    /// `ocifStaking.stakeThresholdForActiveCore`
    #[serde(default)]
    pub stake_threshold: Balance,
}

/// Circulating supply that could be staked
pub fn aggregate_staked(stats: &ChainStats) -> Balance {
    stats.total_issuance.saturating_sub(stats.inactive_issuance)
}

/// Annualized staking APY in percent, two decimals; zero when either input is zero
pub fn staking_apy(total_supply: Balance, total_staked: Balance) -> Decimal {
    if total_supply.is_zero() || total_staked.is_zero() {
        return Decimal::ZERO;
    }
    match (total_supply.as_decimal(), total_staked.as_decimal()) {
        (Ok(supply), Ok(staked)) => (supply * Decimal::from(4u8) / staked)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        _ => Decimal::ZERO,
    }
}

/// Yearly DAO rewards in planck
pub fn projected_dao_rewards(total_supply: Balance) -> Balance {
    total_supply
        .as_decimal()
        .ok()
        .map(|supply| (supply * DAO_REWARD_RATE).trunc())
        .and_then(|r| r.to_u128())
        .map(Balance)
        .unwrap_or_default()
}

/// Percentage of the aggregate that is staked, two decimals
pub fn staked_percent(total_staked: Balance, aggregate: Balance) -> Decimal {
    if total_staked.is_zero() || aggregate.is_zero() {
        return Decimal::ZERO;
    }
    match (total_staked.as_decimal(), aggregate.as_decimal()) {
        (Ok(staked), Ok(aggregate)) => (staked * Decimal::ONE_HUNDRED / aggregate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        _ => Decimal::ZERO,
    }
}

/// Progress through the current era in whole percent
pub fn era_progress_percent(current_block: u64, next_era_block: u64, blocks_per_era: u64) -> u64 {
    if current_block == 0 || next_era_block == 0 || blocks_per_era == 0 {
        return 0;
    }
    let era_start = next_era_block.saturating_sub(blocks_per_era);
    let elapsed = current_block.saturating_sub(era_start);
    let pct = Decimal::from(elapsed) * Decimal::ONE_HUNDRED / Decimal::from(blocks_per_era);
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// A core counts as active once its stake passes the threshold
pub fn min_support_met(stake_threshold: Balance, core_total_staked: Balance) -> bool {
    stake_threshold < core_total_staked
}

/// Claiming is pointless unless the rewards exceed the existential deposit
pub fn claiming_disabled(unclaimed: Balance, existential_deposit: Balance) -> bool {
    unclaimed <= existential_deposit
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000;

    #[test]
    fn apy_annualizes_quarterly_ratio() {
        assert_eq!(staking_apy(Balance(1_000 * ONE), Balance(300 * ONE)), dec!(13.33));
        assert_eq!(staking_apy(Balance(1_000 * ONE), Balance::ZERO), Decimal::ZERO);
    }

    #[test]
    fn dao_rewards_are_six_percent_of_supply() {
        assert_eq!(projected_dao_rewards(Balance(1_000 * ONE)), Balance(60 * ONE));
        assert_eq!(projected_dao_rewards(Balance(7)), Balance(0));
    }

    #[test]
    fn staked_percent_of_aggregate() {
        let stats = ChainStats {
            total_issuance: Balance(1_000 * ONE),
            inactive_issuance: Balance(200 * ONE),
            ..Default::default()
        };
        let aggregate = aggregate_staked(&stats);
        assert_eq!(aggregate, Balance(800 * ONE));
        assert_eq!(staked_percent(Balance(200 * ONE), aggregate), dec!(25));
    }

    #[test]
    fn era_progress_from_block_numbers() {
        assert_eq!(era_progress_percent(1_150, 1_200, 200), 75);
        assert_eq!(era_progress_percent(0, 1_200, 200), 0);
        assert_eq!(era_progress_percent(1_150, 1_200, 0), 0);
    }

    #[test]
    fn claim_gate_and_support_threshold() {
        assert!(claiming_disabled(Balance(10), Balance(10)));
        assert!(!claiming_disabled(Balance(11), Balance(10)));
        assert!(min_support_met(Balance(5), Balance(6)));
        assert!(!min_support_met(Balance(5), Balance(5)));
    }
}
