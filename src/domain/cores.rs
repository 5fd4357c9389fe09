use serde::{Deserialize, Serialize};
use std::fmt;

use super::Balance;

/// Identifier of a registered core (project)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreId(pub u32);

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CoreId {
    fn from(value: u32) -> Self {
        CoreId(value)
    }
}

/// One core with outstanding unclaimed rewards, as reported by the indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclaimedCoreEntry {
    pub core_id: CoreId,
    /// First era with unclaimed rewards; absent when the indexer has no era data
    #[serde(default)]
    pub earliest_era: Option<u32>,
}

impl UnclaimedCoreEntry {
    pub fn new(core_id: impl Into<CoreId>, earliest_era: Option<u32>) -> Self {
        Self {
            core_id: core_id.into(),
            earliest_era,
        }
    }
}

/// Unclaimed-eras dataset for one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclaimedEras {
    #[serde(default)]
    pub cores: Vec<UnclaimedCoreEntry>,
    #[serde(default)]
    pub total: u32,
}

/// Minimal core metadata shown alongside staking data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A core the account stakes into; used when era-level data is unavailable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingCoreRef {
    pub key: CoreId,
    #[serde(default)]
    pub metadata: CoreMetadata,
    /// Amount this account currently has staked on the core
    #[serde(default)]
    pub user_staked: Balance,
    /// Total amount staked on the core by everyone
    #[serde(default)]
    pub total_staked: Balance,
}

impl StakingCoreRef {
    pub fn new(key: impl Into<CoreId>) -> Self {
        Self {
            key: key.into(),
            metadata: CoreMetadata::default(),
            user_staked: Balance::ZERO,
            total_staked: Balance::ZERO,
        }
    }
}

/// Core a claim or restake is aimed at.
///
/// Era-aware targets come from the unclaimed-eras dataset; era-unaware targets are the
/// fallback built from the account's staking cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreTarget {
    EraAware {
        core_id: CoreId,
        earliest_era: Option<u32>,
    },
    EraUnaware {
        key: CoreId,
    },
}

impl CoreTarget {
    pub fn core(&self) -> CoreId {
        match self {
            CoreTarget::EraAware { core_id, .. } => *core_id,
            CoreTarget::EraUnaware { key } => *key,
        }
    }

    /// Whether this target can receive a restake
    pub fn is_restake_eligible(&self) -> bool {
        match self {
            CoreTarget::EraAware { earliest_era, .. } => earliest_era.is_some(),
            CoreTarget::EraUnaware { .. } => true,
        }
    }
}

impl From<UnclaimedCoreEntry> for CoreTarget {
    fn from(entry: UnclaimedCoreEntry) -> Self {
        CoreTarget::EraAware {
            core_id: entry.core_id,
            earliest_era: entry.earliest_era,
        }
    }
}

impl From<&StakingCoreRef> for CoreTarget {
    fn from(core: &StakingCoreRef) -> Self {
        CoreTarget::EraUnaware { key: core.key }
    }
}
