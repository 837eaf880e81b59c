use std::{fmt, time::Duration};

use alloy_primitives::{TxHash, U256};
use multivault_abi::EncodingMismatch;
use thiserror::Error;

/// Failure of a single read, submission or confirmation step.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("reading `{view}` failed: {reason}")]
    ReadFailure { view: &'static str, reason: String },

    #[error("predicted atom id {expected} but the vault counter is now {observed}")]
    PredictionRace { expected: U256, observed: U256 },

    #[error("`{method}` was rejected before inclusion: {reason}")]
    SubmissionFailure { method: &'static str, reason: String },

    #[error("`{method}` tx {tx_hash} was not confirmed within {timeout:?}")]
    ConfirmationTimeout {
        method: &'static str,
        tx_hash: TxHash,
        timeout: Duration,
    },

    #[error("`{method}` tx {tx_hash} reverted")]
    TransactionReverted { method: &'static str, tx_hash: TxHash },

    #[error(transparent)]
    EncodingMismatch(#[from] EncodingMismatch),
}

/// Coarse error taxonomy surfaced to operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ReadFailure,
    PredictionRace,
    SubmissionFailure,
    ConfirmationTimeout,
    TransactionReverted,
    EncodingMismatch,
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::ReadFailure { .. } => ErrorKind::ReadFailure,
            DeployError::PredictionRace { .. } => ErrorKind::PredictionRace,
            DeployError::SubmissionFailure { .. } => ErrorKind::SubmissionFailure,
            DeployError::ConfirmationTimeout { .. } => ErrorKind::ConfirmationTimeout,
            DeployError::TransactionReverted { .. } => ErrorKind::TransactionReverted,
            DeployError::EncodingMismatch(_) => ErrorKind::EncodingMismatch,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
