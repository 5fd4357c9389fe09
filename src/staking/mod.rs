pub mod allocator;
pub mod claim_batch;
pub mod manage;
pub mod metrics;
pub mod restake_claim;
pub mod submitter;

pub use allocator::{EvenSplitAllocator, RestakeAllocator};
pub use claim_batch::{append_restakes, build_claims, claim_targets, unique_cores, RestakePass};
pub use manage::{AmountRules, StakingManager};
pub use metrics::{claiming_disabled, ChainStats};
pub use restake_claim::{ClaimReceipt, ClaimRequest, RestakeClaimer, StakingContext};
pub use submitter::{submit_and_watch, NoopCallbacks, SubmissionCallbacks, SubmissionReceipt};
