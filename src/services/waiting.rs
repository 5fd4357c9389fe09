use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared "waiting for the chain" flag.
///
/// The workflows only set it; callers use [`WaitingFlag::try_begin`] to keep a second
/// action from starting while one is in flight.
#[derive(Debug, Clone, Default)]
pub struct WaitingFlag {
    inner: Arc<AtomicBool>,
}

impl WaitingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, waiting: bool) {
        let previous = self.inner.swap(waiting, Ordering::SeqCst);
        if previous != waiting {
            debug!("waiting: {} -> {}", previous, waiting);
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Claim the flag; false if another action already holds it
    pub fn try_begin(&self) -> bool {
        self.inner
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
