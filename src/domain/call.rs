use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Balance, CoreId};

/// A single `ocifStaking` extrinsic call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingCall {
    /// `ocifStaking.stakerClaimRewards(core)`, claims one era per call
    ClaimRewards { core: CoreId },
    /// `ocifStaking.stake(core, amount)`
    Stake { core: CoreId, amount: Balance },
    /// `ocifStaking.unstake(core, amount)`
    Unstake { core: CoreId, amount: Balance },
    /// `ocifStaking.moveStake(from, amount, to)`
    MoveStake {
        from: CoreId,
        amount: Balance,
        to: CoreId,
    },
    /// `ocifStaking.withdrawUnstaked()`
    WithdrawUnstaked,
}

impl StakingCall {
    pub fn method(&self) -> &'static str {
        match self {
            StakingCall::ClaimRewards { .. } => "stakerClaimRewards",
            StakingCall::Stake { .. } => "stake",
            StakingCall::Unstake { .. } => "unstake",
            StakingCall::MoveStake { .. } => "moveStake",
            StakingCall::WithdrawUnstaked => "withdrawUnstaked",
        }
    }

    pub fn is_claim(&self) -> bool {
        matches!(self, StakingCall::ClaimRewards { .. })
    }

    pub fn is_stake(&self) -> bool {
        matches!(self, StakingCall::Stake { .. })
    }
}

impl fmt::Display for StakingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakingCall::ClaimRewards { core } => write!(f, "ocifStaking.{}({})", self.method(), core),
            StakingCall::Stake { core, amount } | StakingCall::Unstake { core, amount } => {
                write!(f, "ocifStaking.{}({}, {})", self.method(), core, amount)
            }
            StakingCall::MoveStake { from, amount, to } => {
                write!(f, "ocifStaking.{}({}, {}, {})", self.method(), from, amount, to)
            }
            StakingCall::WithdrawUnstaked => write!(f, "ocifStaking.{}()", self.method()),
        }
    }
}

/// Ordered list of calls submitted as one `utility.batch` extrinsic.
///
/// `utility.batch` is used rather than `batch_all`: claiming an era where the account's
/// stake has since moved fails, and that must not revert the remaining claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    calls: Vec<StakingCall>,
}

impl BatchPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(call: StakingCall) -> Self {
        Self { calls: vec![call] }
    }

    pub fn push(&mut self, call: StakingCall) {
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[StakingCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn claim_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_claim()).count()
    }

    pub fn stake_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_stake()).count()
    }

    /// Sum of all `Stake` amounts in the plan
    pub fn total_restaked(&self) -> Balance {
        self.calls
            .iter()
            .filter_map(|c| match c {
                StakingCall::Stake { amount, .. } => Some(*amount),
                _ => None,
            })
            .fold(Balance::ZERO, |acc, amount| acc + amount)
    }
}

impl FromIterator<StakingCall> for BatchPlan {
    fn from_iter<I: IntoIterator<Item = StakingCall>>(iter: I) -> Self {
        Self {
            calls: iter.into_iter().collect(),
        }
    }
}
