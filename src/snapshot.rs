//! Account snapshot consumed by the CLI.
//!
//! Stands in for the indexer and node queries: everything the dashboard would fetch for
//! one account, captured as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::domain::{Account, Balance, CoreId, StakerLedger, StakingCoreRef, UnclaimedEras};
use crate::error::{Result, StakerError};
use crate::staking::ChainStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account: Account,
    pub current_era: u32,
    #[serde(default)]
    pub unclaimed_eras: UnclaimedEras,
    #[serde(default)]
    pub staking_cores: Vec<StakingCoreRef>,
    /// Total unclaimed rewards in planck
    #[serde(default)]
    pub total_unclaimed: Balance,
    #[serde(default)]
    pub total_claimed: Balance,
    #[serde(default)]
    pub available_balance: Balance,
    #[serde(default)]
    pub ledger: StakerLedger,
    #[serde(default)]
    pub chain: ChainStats,
}

impl AccountSnapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let snapshot: AccountSnapshot = serde_json::from_str(&raw)?;
        debug!(
            "Loaded snapshot for {} ({} staking cores, {} unclaimed entries)",
            snapshot.account,
            snapshot.staking_cores.len(),
            snapshot.unclaimed_eras.cores.len()
        );
        Ok(snapshot)
    }

    pub fn core(&self, key: CoreId) -> Result<&StakingCoreRef> {
        self.staking_cores
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| StakerError::Validation(format!("Core {} is not in the snapshot", key)))
    }

    /// Sum of the account's stake across cores
    pub fn total_user_staked(&self) -> Balance {
        self.staking_cores
            .iter()
            .fold(Balance::ZERO, |acc, c| acc + c.user_staked)
    }
}
