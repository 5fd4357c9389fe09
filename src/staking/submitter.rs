use tracing::{debug, info, instrument, warn};

use crate::chain::{ChainClient, Signer};
use crate::domain::{BatchPlan, LifecycleEvent, StateTransition, SubmissionState};
use crate::error::ClaimError;
use crate::services::{Notifier, WaitingFlag};

/// Caller hooks for the submission lifecycle; each fires at most once per submission
pub trait SubmissionCallbacks: Send + Sync {
    /// Included in a block
    fn on_executed(&self) {}
    fn on_success(&self) {}
    fn on_dropped(&self) {}
    fn on_invalid(&self) {}
    fn on_error(&self, _error: &str) {}
}

/// Callbacks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl SubmissionCallbacks for NoopCallbacks {}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub state: SubmissionState,
    pub transitions: Vec<StateTransition>,
}

/// Sign, broadcast and follow one plan to a terminal state.
///
/// Shows "Waiting for confirmation..." when the extrinsic lands in a block. Terminal
/// notifications are left to the caller so each failure surfaces exactly once.
#[instrument(skip_all, fields(address = %address, calls = batch.len()))]
pub async fn submit_and_watch(
    chain: &dyn ChainClient,
    address: &str,
    signer: &Signer,
    batch: &BatchPlan,
    callbacks: &dyn SubmissionCallbacks,
    notifier: &dyn Notifier,
    waiting: &WaitingFlag,
) -> Result<SubmissionReceipt, ClaimError> {
    let mut statuses = match chain.sign_and_send(address, signer, batch).await {
        Ok(statuses) => statuses,
        Err(e) => {
            let err = ClaimError::from(e);
            warn!("Broadcast rejected: {}", err);
            callbacks.on_error(&err.to_string());
            return Err(err);
        }
    };

    let mut state = SubmissionState::Idle;
    let mut transitions = Vec::new();
    let submitted = state.submit().map_err(ClaimError::from)?;
    transitions.push(StateTransition::new(state, submitted));
    state = submitted;
    debug!("Batch submitted");

    while let Some(status) = statuses.recv().await {
        let (next, event) = match state.apply(&status) {
            Ok(step) => step,
            Err(e) => {
                warn!("Unexpected status {:?} in state {}: {}", status, state, e);
                continue;
            }
        };
        if next != state {
            transitions.push(StateTransition::new(state, next));
            state = next;
        }

        match event {
            None => {}
            Some(LifecycleEvent::Executed) => {
                notifier.dismiss();
                notifier.loading("Waiting for confirmation...");
                waiting.set(true);
                callbacks.on_executed();
            }
            Some(LifecycleEvent::Success) => {
                info!("Batch finalized successfully");
                callbacks.on_success();
                return Ok(SubmissionReceipt { state, transitions });
            }
            Some(LifecycleEvent::Dropped) => {
                callbacks.on_dropped();
                return Err(ClaimError::SubmissionDropped);
            }
            Some(LifecycleEvent::Invalid) => {
                callbacks.on_invalid();
                return Err(ClaimError::SubmissionInvalid);
            }
            Some(LifecycleEvent::Error(reason)) => {
                callbacks.on_error(&reason);
                return Err(ClaimError::SubmissionFailed(reason));
            }
        }
    }

    let (_, event) = state.stream_closed().map_err(ClaimError::from)?;
    let reason = match event {
        LifecycleEvent::Error(reason) => reason,
        other => format!("{:?}", other),
    };
    warn!("Status stream ended in state {}", state);
    callbacks.on_error(&reason);
    Err(ClaimError::SubmissionFailed(reason))
}
