use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StakerError};

/// Status update emitted by the chain client for a broadcast extrinsic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Accepted into the transaction pool
    Ready,
    /// Gossiped to peers
    Broadcast,
    /// Included in a block (not yet final)
    InBlock { block_hash: String },
    /// Finalized; `success` reflects the dispatch result of the extrinsic
    Finalized {
        block_hash: String,
        success: bool,
        error: Option<String>,
    },
    /// Rejected by the pool (bad nonce, insufficient balance for fees, ...)
    Invalid,
    /// Removed from the pool without inclusion
    Dropped,
}

/// Submission lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionState {
    /// Nothing broadcast yet
    Idle,
    /// Signed and handed to the node
    Submitted,
    /// Included in a block, waiting for finality
    Confirmed,
    /// Finalized with a successful dispatch
    Succeeded,
    /// Dropped from the pool
    Dropped,
    /// Invalid, failed dispatch, or lost status stream
    Failed,
}

/// Caller-visible callback fired by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Executed,
    Success,
    Dropped,
    Invalid,
    Error(String),
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "IDLE",
            SubmissionState::Submitted => "SUBMITTED",
            SubmissionState::Confirmed => "CONFIRMED",
            SubmissionState::Succeeded => "SUCCEEDED",
            SubmissionState::Dropped => "DROPPED",
            SubmissionState::Failed => "FAILED",
        }
    }

    /// Check if this state can transition to another state
    pub fn can_transition_to(&self, target: SubmissionState) -> bool {
        use SubmissionState::*;

        match (self, target) {
            (Idle, Submitted) => true,

            (Submitted, Confirmed) => true,
            (Submitted, Succeeded) => true, // Finalized without an InBlock update
            (Submitted, Dropped) => true,
            (Submitted, Failed) => true,

            (Confirmed, Succeeded) => true,
            (Confirmed, Dropped) => true,
            (Confirmed, Failed) => true,

            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded | SubmissionState::Dropped | SubmissionState::Failed
        )
    }

    /// Move from `Idle` to `Submitted` once the extrinsic has been handed to the node
    pub fn submit(self) -> Result<SubmissionState> {
        self.checked(SubmissionState::Submitted)
    }

    /// Apply a chain status update.
    ///
    /// Returns the next state and the callback it fires. Pool-level updates
    /// (`Ready`, `Broadcast`) and a repeated `InBlock` leave the state unchanged and
    /// fire nothing.
    pub fn apply(self, status: &TxStatus) -> Result<(SubmissionState, Option<LifecycleEvent>)> {
        use SubmissionState::*;

        match status {
            TxStatus::Ready | TxStatus::Broadcast => Ok((self, None)),
            TxStatus::InBlock { .. } if self == Confirmed => Ok((self, None)),
            TxStatus::InBlock { .. } => {
                Ok((self.checked(Confirmed)?, Some(LifecycleEvent::Executed)))
            }
            TxStatus::Finalized { success: true, .. } => {
                Ok((self.checked(Succeeded)?, Some(LifecycleEvent::Success)))
            }
            TxStatus::Finalized {
                success: false,
                error,
                ..
            } => {
                let reason = error
                    .clone()
                    .unwrap_or_else(|| "extrinsic failed".to_string());
                Ok((self.checked(Failed)?, Some(LifecycleEvent::Error(reason))))
            }
            TxStatus::Invalid => Ok((self.checked(Failed)?, Some(LifecycleEvent::Invalid))),
            TxStatus::Dropped => Ok((self.checked(Dropped)?, Some(LifecycleEvent::Dropped))),
        }
    }

    /// Status stream ended before a terminal state was reached
    pub fn stream_closed(self) -> Result<(SubmissionState, LifecycleEvent)> {
        let next = self.checked(SubmissionState::Failed)?;
        Ok((
            next,
            LifecycleEvent::Error("status stream closed before finalization".to_string()),
        ))
    }

    fn checked(self, target: SubmissionState) -> Result<SubmissionState> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(StakerError::InvalidStateTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State transition event (for logging/debugging)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: SubmissionState,
    pub to: SubmissionState,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl StateTransition {
    pub fn new(from: SubmissionState, to: SubmissionState) -> Self {
        Self {
            from,
            to,
            timestamp: chrono::Utc::now(),
        }
    }
}
