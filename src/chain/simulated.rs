//! In-process chain and wallet used for dry runs.
//!
//! Quotes fees from a linear model, records every plan it is asked about and replays a
//! configurable lifecycle for submissions, so the workflows can be exercised end to end
//! without a node.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::traits::{ChainClient, PaymentInfo, Signer, TxStatusStream, WalletExtension};
use crate::domain::{Balance, BatchPlan, StakerLedger, TxStatus};
use crate::error::{Result, StakerError};

const WEIGHT_PER_CALL: u64 = 250_000_000;

/// How a simulated submission ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    /// InBlock then successful finalization
    Success,
    /// InBlock then finalization with a failed dispatch
    DispatchFailed(String),
    /// Rejected by the pool
    Invalid,
    /// Dropped from the pool
    Dropped,
    /// Stream closes after InBlock without finalizing
    Hangup,
}

#[derive(Debug, Default)]
struct Recorded {
    quoted: Vec<BatchPlan>,
    submitted: Vec<BatchPlan>,
}

/// Simulated node
#[derive(Debug)]
pub struct SimulatedChain {
    base_fee: Balance,
    fee_per_call: Balance,
    outcome: SimulatedOutcome,
    fee_error: Option<String>,
    submit_error: Option<String>,
    current_era: u32,
    ledger: StakerLedger,
    quote_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    recorded: Mutex<Recorded>,
}

impl SimulatedChain {
    pub fn new(base_fee: Balance, fee_per_call: Balance) -> Self {
        Self {
            base_fee,
            fee_per_call,
            outcome: SimulatedOutcome::Success,
            fee_error: None,
            submit_error: None,
            current_era: 0,
            ledger: StakerLedger::default(),
            quote_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn with_outcome(mut self, outcome: SimulatedOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Make every fee quote fail with the given message
    pub fn with_fee_error(mut self, message: impl Into<String>) -> Self {
        self.fee_error = Some(message.into());
        self
    }

    /// Make every submission fail before broadcast, as when signing is rejected
    pub fn with_submit_error(mut self, message: impl Into<String>) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    pub fn with_current_era(mut self, era: u32) -> Self {
        self.current_era = era;
        self
    }

    pub fn with_ledger(mut self, ledger: StakerLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Fee the simulator charges for a plan
    pub fn quote(&self, batch: &BatchPlan) -> Balance {
        let calls = batch.len() as u128;
        self.base_fee + Balance(self.fee_per_call.planck().saturating_mul(calls))
    }

    pub fn quote_count(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn quoted_plans(&self) -> Vec<BatchPlan> {
        self.recorded
            .lock()
            .map(|r| r.quoted.clone())
            .unwrap_or_default()
    }

    pub fn submitted_plans(&self) -> Vec<BatchPlan> {
        self.recorded
            .lock()
            .map(|r| r.submitted.clone())
            .unwrap_or_default()
    }

    fn record(&self, f: impl FnOnce(&mut Recorded)) {
        if let Ok(mut recorded) = self.recorded.lock() {
            f(&mut recorded);
        }
    }
}

fn extrinsic_hash(address: &str, batch: &BatchPlan, nonce: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(address.as_bytes());
    hasher.update(nonce.to_le_bytes());
    for call in batch.calls() {
        hasher.update(call.to_string().as_bytes());
    }
    format!("0x{}", hex::encode(hasher.finalize()))
}

#[async_trait]
impl ChainClient for SimulatedChain {
    async fn payment_info(
        &self,
        address: &str,
        _signer: &Signer,
        batch: &BatchPlan,
    ) -> Result<PaymentInfo> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.record(|r| r.quoted.push(batch.clone()));

        if let Some(ref message) = self.fee_error {
            return Err(StakerError::FeeEstimation(message.clone()));
        }

        let info = PaymentInfo {
            partial_fee: self.quote(batch),
            weight: WEIGHT_PER_CALL * batch.len() as u64,
        };
        debug!(
            "Quoted {} calls for {}: fee={}",
            batch.len(),
            address,
            info.partial_fee
        );
        Ok(info)
    }

    async fn sign_and_send(
        &self,
        address: &str,
        signer: &Signer,
        batch: &BatchPlan,
    ) -> Result<TxStatusStream> {
        if let Some(ref message) = self.submit_error {
            return Err(StakerError::Submission(message.clone()));
        }
        if signer.address != address {
            return Err(StakerError::Submission(format!(
                "Signer for {} cannot sign for {}",
                signer.address, address
            )));
        }

        let nonce = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.record(|r| r.submitted.push(batch.clone()));

        let hash = extrinsic_hash(address, batch, nonce);
        info!("Simulated submission {} with {} calls", hash, batch.len());

        let (tx, rx) = mpsc::unbounded_channel();
        let block_hash = format!("0x{}", &hash[2..18]);
        let mut statuses = vec![TxStatus::Ready, TxStatus::Broadcast];
        match &self.outcome {
            SimulatedOutcome::Success => {
                statuses.push(TxStatus::InBlock {
                    block_hash: block_hash.clone(),
                });
                statuses.push(TxStatus::Finalized {
                    block_hash,
                    success: true,
                    error: None,
                });
            }
            SimulatedOutcome::DispatchFailed(reason) => {
                statuses.push(TxStatus::InBlock {
                    block_hash: block_hash.clone(),
                });
                statuses.push(TxStatus::Finalized {
                    block_hash,
                    success: false,
                    error: Some(reason.clone()),
                });
            }
            SimulatedOutcome::Invalid => statuses = vec![TxStatus::Invalid],
            SimulatedOutcome::Dropped => statuses.push(TxStatus::Dropped),
            SimulatedOutcome::Hangup => statuses.push(TxStatus::InBlock { block_hash }),
        }

        for status in statuses {
            // receiver is still held by us until return
            let _ = tx.send(status);
        }
        Ok(rx)
    }

    async fn current_era(&self) -> Result<u32> {
        Ok(self.current_era)
    }

    async fn ledger(&self, _address: &str) -> Result<StakerLedger> {
        Ok(self.ledger.clone())
    }
}

/// Simulated wallet extension holding a fixed set of addresses
#[derive(Debug, Default)]
pub struct SimulatedWallet {
    accounts: HashSet<String>,
    enabled_for: Mutex<Option<String>>,
    enable_calls: AtomicUsize,
}

impl SimulatedWallet {
    pub fn new<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            enabled_for: Mutex::new(None),
            enable_calls: AtomicUsize::new(0),
        }
    }

    pub fn enable_count(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletExtension for SimulatedWallet {
    async fn enable(&self, app_name: &str) -> Result<()> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        let mut enabled = self
            .enabled_for
            .lock()
            .map_err(|_| StakerError::Wallet("wallet state poisoned".to_string()))?;
        *enabled = Some(app_name.to_string());
        Ok(())
    }

    async fn signer_for(&self, address: &str) -> Result<Signer> {
        let enabled = self
            .enabled_for
            .lock()
            .map_err(|_| StakerError::Wallet("wallet state poisoned".to_string()))?
            .is_some();
        if !enabled {
            return Err(StakerError::Wallet(
                "Wallet extension has not been enabled".to_string(),
            ));
        }
        if !self.accounts.contains(address) {
            return Err(StakerError::Wallet(format!(
                "Unable to find injected {}",
                address
            )));
        }
        Ok(Signer {
            address: address.to_string(),
            source: "simulated".to_string(),
        })
    }
}
