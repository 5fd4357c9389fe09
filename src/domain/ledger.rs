use serde::{Deserialize, Serialize};

use super::Balance;

/// Unbonding chunk as stored in the staking ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockingChunk {
    pub amount: Balance,
    pub unlock_era: u32,
}

/// `ocifStaking.ledger(account)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakerLedger {
    #[serde(default)]
    pub locked: Balance,
    #[serde(default)]
    pub unlocking_chunks: Vec<UnlockingChunk>,
}

/// Unbonding chunk relative to the current era
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbondingInfo {
    pub amount: Balance,
    /// Eras left until withdrawable; zero or negative means unlocked
    pub unlock_in: i64,
}

impl UnbondingInfo {
    pub fn is_unlocked(&self) -> bool {
        self.unlock_in <= 0
    }
}

impl StakerLedger {
    pub fn unbonding_info(&self, current_era: u32) -> Vec<UnbondingInfo> {
        self.unlocking_chunks
            .iter()
            .map(|chunk| UnbondingInfo {
                amount: chunk.amount,
                unlock_in: i64::from(chunk.unlock_era) - i64::from(current_era),
            })
            .collect()
    }

    /// Total of the chunks that can be withdrawn now
    pub fn withdrawable(&self, current_era: u32) -> Balance {
        self.unbonding_info(current_era)
            .iter()
            .filter(|info| info.is_unlocked())
            .fold(Balance::ZERO, |acc, info| acc + info.amount)
    }
}
