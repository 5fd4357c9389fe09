//! Claim staking rewards, optionally restaking them in the same batch.
//!
//! Workflow:
//! 1. refuse when claiming is disabled (rewards not above the existential deposit)
//! 2. enable the wallet extension and resolve the signer
//! 3. dedup the unclaimed cores and build one claim per unclaimed era
//! 4. quote the fee for the batch
//! 5. with auto-restake: quote a draft with fee-unaware restakes, rebuild it with
//!    restakes net of that fee, and quote the final plan again
//! 6. sign, broadcast and follow the batch to finalization
//!
//! Every failure is handled here: the pending notification is replaced by one error
//! message, the waiting flag is cleared and the run resolves to `false`.

use std::sync::Arc;
use tracing::{error, info, instrument};

use super::allocator::RestakeAllocator;
use super::claim_batch::{append_restakes, build_claims, claim_targets, unique_cores, RestakePass};
use super::submitter::{submit_and_watch, SubmissionCallbacks, SubmissionReceipt};
use crate::chain::{ChainClient, Signer, WalletExtension};
use crate::domain::{Account, Balance, BatchPlan, StakingCoreRef, UnclaimedEras};
use crate::error::{ClaimError, StakerError};
use crate::services::{Notifier, WaitingFlag};

/// Shared collaborators for staking workflows
#[derive(Clone)]
pub struct StakingContext {
    pub chain: Arc<dyn ChainClient>,
    pub wallet: Arc<dyn WalletExtension>,
    pub notifier: Arc<dyn Notifier>,
    pub waiting: WaitingFlag,
    /// Name presented to the wallet extension
    pub app_name: String,
}

impl StakingContext {
    /// Enable the extension and resolve the signer for `address`
    pub(crate) async fn signer(&self, address: &str) -> Result<Signer, StakerError> {
        self.wallet.enable(&self.app_name).await?;
        self.wallet.signer_for(address).await
    }
}

/// Inputs for one claim
#[derive(Clone)]
pub struct ClaimRequest {
    pub account: Account,
    pub unclaimed_eras: UnclaimedEras,
    pub current_era: u32,
    pub staking_cores: Vec<StakingCoreRef>,
    pub disable_claiming: bool,
    pub enable_auto_restake: bool,
    pub allocator: Arc<dyn RestakeAllocator>,
    pub callbacks: Arc<dyn SubmissionCallbacks>,
}

/// What a successful claim submitted
#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    pub plan: BatchPlan,
    /// Quote for the submitted plan
    pub fee: Balance,
    /// Quote for the fee-unaware draft, when restaking
    pub draft_fee: Option<Balance>,
    pub submission: SubmissionReceipt,
}

/// Runs the claim-and-restake workflow
#[derive(Clone)]
pub struct RestakeClaimer {
    ctx: StakingContext,
}

impl RestakeClaimer {
    pub fn new(ctx: StakingContext) -> Self {
        Self { ctx }
    }

    /// Run the workflow; true only when the batch finalized successfully
    pub async fn run(&self, request: &ClaimRequest) -> bool {
        match self.try_run(request).await {
            Ok(receipt) => {
                info!(
                    "Claimed with {} calls ({} claims, {} restakes), fee {}",
                    receipt.plan.len(),
                    receipt.plan.claim_count(),
                    receipt.plan.stake_count(),
                    receipt.fee
                );
                true
            }
            Err(e) => {
                error!("Claim failed: {}", e);
                false
            }
        }
    }

    /// Run the workflow and return the failure kind instead of collapsing it to `false`.
    ///
    /// Notifications and the waiting flag are handled exactly as in [`run`](Self::run).
    pub async fn try_run(&self, request: &ClaimRequest) -> Result<ClaimReceipt, ClaimError> {
        let notifier = &self.ctx.notifier;
        match self.execute(request).await {
            Ok(receipt) => {
                notifier.dismiss();
                notifier.success("Claimed successfully");
                self.ctx.waiting.set(false);
                Ok(receipt)
            }
            Err(e) => {
                notifier.dismiss();
                notifier.error(&e.to_string());
                self.ctx.waiting.set(false);
                Err(e)
            }
        }
    }

    #[instrument(skip_all, fields(address = %request.account.address, era = request.current_era))]
    async fn execute(&self, request: &ClaimRequest) -> Result<ClaimReceipt, ClaimError> {
        self.ctx.waiting.set(true);
        self.ctx.notifier.loading("Claiming...");

        if request.disable_claiming {
            return Err(ClaimError::ClaimingDisabled);
        }

        let address = request.account.address.as_str();
        let signer = self.ctx.signer(address).await?;

        let unique = unique_cores(&request.unclaimed_eras.cores);
        let targets = claim_targets(&unique, &request.staking_cores);
        let claims = build_claims(&targets, request.current_era);
        info!(
            "Built {} claim calls across {} cores",
            claims.claim_count(),
            targets.len()
        );

        if claims.is_empty() {
            return Err(ClaimError::NothingToClaim);
        }

        let (plan, fee, draft_fee) = if request.enable_auto_restake {
            let mut draft = claims.clone();
            append_restakes(&mut draft, &targets, request.allocator.as_ref(), RestakePass::Draft)?;
            let draft_fee = self.estimate_fee(address, &signer, &draft).await?;

            let mut plan = claims;
            let restakes = append_restakes(
                &mut plan,
                &targets,
                request.allocator.as_ref(),
                RestakePass::Final { fee: draft_fee },
            )?;
            let fee = self.estimate_fee(address, &signer, &plan).await?;
            info!(
                "Restaking {} into {} cores (draft fee {}, final fee {})",
                plan.total_restaked(),
                restakes,
                draft_fee,
                fee
            );
            (plan, fee, Some(draft_fee))
        } else {
            let fee = self.estimate_fee(address, &signer, &claims).await?;
            (claims, fee, None)
        };

        let submission = submit_and_watch(
            self.ctx.chain.as_ref(),
            address,
            &signer,
            &plan,
            request.callbacks.as_ref(),
            self.ctx.notifier.as_ref(),
            &self.ctx.waiting,
        )
        .await?;

        Ok(ClaimReceipt {
            plan,
            fee,
            draft_fee,
            submission,
        })
    }

    async fn estimate_fee(
        &self,
        address: &str,
        signer: &Signer,
        plan: &BatchPlan,
    ) -> Result<Balance, ClaimError> {
        self.ctx
            .chain
            .payment_info(address, signer, plan)
            .await
            .map(|info| info.partial_fee)
            .map_err(|e| match e {
                StakerError::FeeEstimation(msg) => ClaimError::FeeEstimationFailed(msg),
                other => ClaimError::FeeEstimationFailed(other.to_string()),
            })
    }
}
