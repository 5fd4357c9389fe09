//! Single-call staking actions: stake, unstake, move stake, withdraw unbonded.
//!
//! Amounts are validated first; a bad amount is returned as a validation error without
//! touching the wallet or showing a notification. After that the action behaves like
//! the claim workflow: one loading message, one terminal message, `bool` result.

use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use super::restake_claim::StakingContext;
use super::submitter::{submit_and_watch, NoopCallbacks};
use crate::domain::{Account, Balance, BatchPlan, CoreId, StakingCall, UnbondingInfo};
use crate::error::{ClaimError, Result, StakerError};
use crate::validation::{parse_token_amount, validate_distinct_cores, validate_stake_amount, AmountCap};

/// Amount limits applied to user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRules {
    /// Minimum stake/unstake amount in whole tokens
    pub min_amount: Decimal,
    pub decimals: u32,
}

/// Notification texts for one action
#[derive(Debug, Clone, Copy)]
struct ActionMessages {
    pending: &'static str,
    done: &'static str,
    /// Replaces unexpected errors; invalid and dropped keep their own text
    failed: Option<&'static str>,
}

impl ActionMessages {
    fn new(pending: &'static str, done: &'static str) -> Self {
        Self {
            pending,
            done,
            failed: None,
        }
    }

    fn or_fail_with(mut self, failed: &'static str) -> Self {
        self.failed = Some(failed);
        self
    }

    fn failure(&self, err: &ClaimError) -> String {
        match (err, self.failed) {
            (ClaimError::SubmissionInvalid | ClaimError::SubmissionDropped, _) | (_, None) => {
                err.to_string()
            }
            (_, Some(failed)) => failed.to_string(),
        }
    }
}

/// Stake management for one account
#[derive(Clone)]
pub struct StakingManager {
    ctx: StakingContext,
    rules: AmountRules,
}

impl StakingManager {
    pub fn new(ctx: StakingContext, rules: AmountRules) -> Self {
        Self { ctx, rules }
    }

    /// Stake `raw_amount` tokens from the free balance into `core`
    pub async fn stake(
        &self,
        account: &Account,
        core: CoreId,
        raw_amount: &str,
        available: Balance,
    ) -> Result<bool> {
        let amount = self.checked_amount(raw_amount, available, AmountCap::Available)?;
        let call = StakingCall::Stake { core, amount };
        Ok(self
            .submit(account, call, ActionMessages::new("Staking...", "Staked successfully"))
            .await)
    }

    /// Unstake `raw_amount` tokens from `core`; they enter the unbonding period
    pub async fn unstake(
        &self,
        account: &Account,
        core: CoreId,
        raw_amount: &str,
        staked: Balance,
    ) -> Result<bool> {
        let amount = self.checked_amount(raw_amount, staked, AmountCap::Staked)?;
        let call = StakingCall::Unstake { core, amount };
        Ok(self
            .submit(
                account,
                call,
                ActionMessages::new("Unstaking...", "Unstaked successfully")
                    .or_fail_with("Failed to unstake"),
            )
            .await)
    }

    /// Move stake between cores without unbonding
    pub async fn move_stake(
        &self,
        account: &Account,
        from: CoreId,
        to: CoreId,
        raw_amount: &str,
        staked_on_source: Balance,
    ) -> Result<bool> {
        validate_distinct_cores(from.0, to.0)?;
        let amount = self.checked_amount(raw_amount, staked_on_source, AmountCap::Staked)?;
        let call = StakingCall::MoveStake { from, amount, to };
        Ok(self
            .submit(account, call, ActionMessages::new("Staking...", "Staked successfully"))
            .await)
    }

    /// Withdraw every chunk that finished unbonding
    pub async fn withdraw_unbonded(
        &self,
        account: &Account,
        unbonding: &[UnbondingInfo],
    ) -> Result<bool> {
        if !unbonding.iter().any(UnbondingInfo::is_unlocked) {
            return Err(StakerError::Validation(
                "Nothing has finished unbonding".to_string(),
            ));
        }
        Ok(self
            .submit(
                account,
                StakingCall::WithdrawUnstaked,
                ActionMessages::new("Unbonding...", "Unbonded successfully"),
            )
            .await)
    }

    /// Current unbonding chunks for the account
    pub async fn unbonding_info(&self, account: &Account) -> Result<Vec<UnbondingInfo>> {
        let ledger = self.ctx.chain.ledger(&account.address).await?;
        let era = self.ctx.chain.current_era().await?;
        Ok(ledger.unbonding_info(era))
    }

    fn checked_amount(&self, raw: &str, max: Balance, cap: AmountCap) -> Result<Balance> {
        let amount = parse_token_amount(raw)?;
        let max_tokens = max.to_tokens(self.rules.decimals)?;
        validate_stake_amount(amount, self.rules.min_amount, max_tokens, cap)?;
        Balance::from_tokens(amount, self.rules.decimals)
    }

    #[instrument(skip(self, account, messages), fields(address = %account.address, call = %call))]
    async fn submit(&self, account: &Account, call: StakingCall, messages: ActionMessages) -> bool {
        let notifier = &self.ctx.notifier;
        self.ctx.waiting.set(true);
        notifier.loading(messages.pending);

        match self.send(account, call).await {
            Ok(()) => {
                info!("{}", messages.done);
                notifier.dismiss();
                notifier.success(messages.done);
                self.ctx.waiting.set(false);
                true
            }
            Err(e) => {
                error!("{} failed: {}", call.method(), e);
                notifier.dismiss();
                notifier.error(&messages.failure(&e));
                self.ctx.waiting.set(false);
                false
            }
        }
    }

    async fn send(&self, account: &Account, call: StakingCall) -> std::result::Result<(), ClaimError> {
        let signer = self.ctx.signer(&account.address).await?;
        submit_and_watch(
            self.ctx.chain.as_ref(),
            &account.address,
            &signer,
            &BatchPlan::single(call),
            &NoopCallbacks,
            self.ctx.notifier.as_ref(),
            &self.ctx.waiting,
        )
        .await?;
        Ok(())
    }
}
