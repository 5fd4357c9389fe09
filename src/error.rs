use thiserror::Error;

/// Main error type for the staking client
#[derive(Error, Debug)]
pub enum StakerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Chain errors
    #[error("Fee estimation failed: {0}")]
    FeeEstimation(String),

    #[error("Submission failed: {0}")]
    Submission(String),

    // State machine errors
    #[error("Invalid state transition: from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Wallet extension errors
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Claim failed: {0}")]
    Claim(#[from] ClaimError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for StakerError
pub type Result<T> = std::result::Result<T, StakerError>;

/// Failure taxonomy of the claim-and-restake workflow.
///
/// Every variant is handled inside the workflow; callers only ever observe the
/// boolean outcome and the notification that was shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Can only claim when unclaimed rewards are greater than the existential deposit")]
    ClaimingDisabled,

    #[error("No transactions to send")]
    NothingToClaim,

    #[error("The batch transaction fee is greater than the unclaimed rewards.")]
    RestakeInsufficientAfterFees,

    #[error("Fee estimation failed: {0}")]
    FeeEstimationFailed(String),

    #[error("Invalid transaction")]
    SubmissionInvalid,

    #[error("Transaction dropped")]
    SubmissionDropped,

    #[error("Transaction failed: {0}")]
    SubmissionFailed(String),

    #[error("{0}")]
    Other(String),
}

impl From<StakerError> for ClaimError {
    fn from(err: StakerError) -> Self {
        match err {
            StakerError::Claim(inner) => inner,
            StakerError::FeeEstimation(msg) => ClaimError::FeeEstimationFailed(msg),
            other => ClaimError::Other(other.to_string()),
        }
    }
}
