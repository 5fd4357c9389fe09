use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::{Balance, BatchPlan, StakerLedger, TxStatus};
use crate::error::Result;

/// Status updates for one broadcast extrinsic, in chain order
pub type TxStatusStream = mpsc::UnboundedReceiver<TxStatus>;

/// Signing handle resolved from the wallet extension for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub address: String,
    /// Extension that owns the key
    pub source: String,
}

/// Dry-run fee quote for an extrinsic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub partial_fee: Balance,
    pub weight: u64,
}

/// Browser-style wallet extension that holds the user's keys
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// Authorize this application with the extension
    async fn enable(&self, app_name: &str) -> Result<()>;

    /// Resolve the signer for an address the extension manages
    async fn signer_for(&self, address: &str) -> Result<Signer>;
}

/// Node connection used for fee quotes, submission and staking queries.
///
/// A plan with more than one call is wrapped in `utility.batch`; a single call is
/// submitted as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Fee quote for the plan without broadcasting it
    async fn payment_info(
        &self,
        address: &str,
        signer: &Signer,
        batch: &BatchPlan,
    ) -> Result<PaymentInfo>;

    /// Sign and broadcast the plan. The returned stream yields status updates until
    /// the extrinsic reaches a final status, then closes.
    async fn sign_and_send(
        &self,
        address: &str,
        signer: &Signer,
        batch: &BatchPlan,
    ) -> Result<TxStatusStream>;

    /// `ocifStaking.currentEra()`
    async fn current_era(&self) -> Result<u32>;

    /// `ocifStaking.ledger(address)`
    async fn ledger(&self, address: &str) -> Result<StakerLedger>;
}
