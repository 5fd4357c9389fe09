pub mod chain;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod snapshot;
pub mod staking;
pub mod validation;

pub use chain::{ChainClient, SimulatedChain, SimulatedOutcome, SimulatedWallet, WalletExtension};
pub use config::AppConfig;
pub use domain::{
    Account, Balance, BatchPlan, CoreId, CoreTarget, StakingCall, StakingCoreRef,
    SubmissionState, TxStatus, UnclaimedCoreEntry, UnclaimedEras,
};
pub use error::{ClaimError, Result, StakerError};
pub use services::{Notifier, ToastSlot, TracingNotifier, WaitingFlag};
pub use staking::{
    ClaimReceipt, ClaimRequest, EvenSplitAllocator, RestakeAllocator, RestakeClaimer,
    StakingContext, StakingManager,
};
