//! Signing, broadcasting and confirmation of state-changing vault calls.

use std::{future::Future, time::Duration};

use alloy_primitives::TxHash;
use async_trait::async_trait;
use multivault_abi::CallDescriptor;

use crate::errors::DeployError;

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    /// `false` when the tx was mined but reverted.
    pub confirmed: bool,
    pub block_number: Option<u64>,
}

/// Submits a call as a transaction from the configured signer.
///
/// `send` broadcasts exactly once and never retries; a caller that wants a
/// retry must build and send a new call.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn send(&self, call: &CallDescriptor) -> Result<TxHash, DeployError>;

    async fn await_receipt(
        &self,
        method: &'static str,
        tx_hash: TxHash,
    ) -> Result<Receipt, DeployError>;
}

/// Run `fut` with an upper bound, mapping expiry to `ConfirmationTimeout`.
pub async fn bounded_wait<F, T>(
    method: &'static str,
    tx_hash: TxHash,
    timeout: Duration,
    fut: F,
) -> Result<T, DeployError>
where
    F: Future<Output = Result<T, DeployError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(DeployError::ConfirmationTimeout {
            method,
            tx_hash,
            timeout,
        }),
    }
}
