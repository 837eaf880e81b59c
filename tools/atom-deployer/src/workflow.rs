//! Create-atom / deploy-atom-wallet pipeline.
//!
//! States run strictly in order and every failure is terminal: nothing after
//! the failing state runs and nothing already mined is compensated.

use std::fmt;

use alloy_primitives::{TxHash, U256};
use multivault_abi::{AbiValue, CallDescriptor, ContractEndpoint};
use thiserror::Error;

use crate::{
    errors::{DeployError, ErrorKind},
    predictor::{predict, PredictedAtom},
    reader::{VaultReader, ViewFunction},
    submitter::{Receipt, TxSubmitter},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    ReadState,
    Predict,
    SubmitCreate,
    AwaitCreateConfirmed,
    VerifyPrediction,
    SubmitDependent,
    AwaitDependentConfirmed,
    Done,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::ReadState => "READ_STATE",
            WorkflowState::Predict => "PREDICT",
            WorkflowState::SubmitCreate => "SUBMIT_CREATE",
            WorkflowState::AwaitCreateConfirmed => "AWAIT_CREATE_CONFIRMED",
            WorkflowState::VerifyPrediction => "VERIFY_PREDICTION",
            WorkflowState::SubmitDependent => "SUBMIT_DEPENDENT",
            WorkflowState::AwaitDependentConfirmed => "AWAIT_DEPENDENT_CONFIRMED",
            WorkflowState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// A run that stopped before `DONE`.
#[derive(Debug, Error)]
#[error("atom deployment failed in {state} ({}): {source}", .source.kind())]
pub struct WorkflowError {
    pub state: WorkflowState,
    #[source]
    pub source: DeployError,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Result of a run that reached `DONE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub counter: U256,
    pub atom_cost: U256,
    pub atom: PredictedAtom,
    pub create: Receipt,
    pub wallet: Receipt,
}

/// Per-state payload; each variant carries exactly what the next state needs.
enum Step {
    ReadState,
    Predict {
        counter: U256,
        atom_cost: U256,
    },
    SubmitCreate {
        counter: U256,
        atom_cost: U256,
        atom: PredictedAtom,
    },
    AwaitCreateConfirmed {
        counter: U256,
        atom_cost: U256,
        atom: PredictedAtom,
        tx_hash: TxHash,
    },
    VerifyPrediction {
        counter: U256,
        atom_cost: U256,
        atom: PredictedAtom,
        create: Receipt,
    },
    SubmitDependent {
        counter: U256,
        atom_cost: U256,
        atom: PredictedAtom,
        create: Receipt,
    },
    AwaitDependentConfirmed {
        counter: U256,
        atom_cost: U256,
        atom: PredictedAtom,
        create: Receipt,
        tx_hash: TxHash,
    },
    Done(DeploymentOutcome),
}

impl Step {
    fn state(&self) -> WorkflowState {
        match self {
            Step::ReadState => WorkflowState::ReadState,
            Step::Predict { .. } => WorkflowState::Predict,
            Step::SubmitCreate { .. } => WorkflowState::SubmitCreate,
            Step::AwaitCreateConfirmed { .. } => WorkflowState::AwaitCreateConfirmed,
            Step::VerifyPrediction { .. } => WorkflowState::VerifyPrediction,
            Step::SubmitDependent { .. } => WorkflowState::SubmitDependent,
            Step::AwaitDependentConfirmed { .. } => WorkflowState::AwaitDependentConfirmed,
            Step::Done(_) => WorkflowState::Done,
        }
    }
}

/// Drives one run of the pipeline against a reader and a submitter.
///
/// Assumes this is the only writer creating atoms during the run. Two
/// concurrent runs against the same vault can predict the same id.
pub struct AtomDeployment<'a, R, S> {
    reader: &'a R,
    submitter: &'a S,
    endpoint: ContractEndpoint,
    verify_prediction: bool,
}

impl<'a, R: VaultReader, S: TxSubmitter> AtomDeployment<'a, R, S> {
    pub fn new(
        reader: &'a R,
        submitter: &'a S,
        endpoint: ContractEndpoint,
        verify_prediction: bool,
    ) -> Self {
        Self {
            reader,
            submitter,
            endpoint,
            verify_prediction,
        }
    }

    pub async fn run(&self) -> Result<DeploymentOutcome, WorkflowError> {
        let mut step = Step::ReadState;
        loop {
            let state = step.state();
            tracing::debug!(%state, "entering state");
            step = match self.advance(step).await {
                Ok(Step::Done(outcome)) => {
                    tracing::info!(
                        atom_id = %outcome.atom.atom_id,
                        create_tx = %outcome.create.transaction_hash,
                        wallet_tx = %outcome.wallet.transaction_hash,
                        "atom deployment complete"
                    );
                    return Ok(outcome);
                }
                Ok(next) => next,
                Err(source) => {
                    tracing::error!(%state, kind = %source.kind(), error = %source, "atom deployment aborted");
                    return Err(WorkflowError { state, source });
                }
            };
        }
    }

    async fn advance(&self, step: Step) -> Result<Step, DeployError> {
        let next = match step {
            Step::ReadState => {
                let counter = self.reader.read_uint(ViewFunction::Count).await?;
                let atom_cost = self.reader.read_uint(ViewFunction::AtomCost).await?;
                tracing::info!(%counter, %atom_cost, "read vault state");
                Step::Predict { counter, atom_cost }
            }

            Step::Predict { counter, atom_cost } => {
                let atom = predict(counter).ok_or_else(|| DeployError::ReadFailure {
                    view: ViewFunction::Count.name(),
                    reason: "counter is saturated, no next atom id".into(),
                })?;
                tracing::info!(atom_id = %atom.atom_id, label = %atom.label, "predicted next atom");
                Step::SubmitCreate {
                    counter,
                    atom_cost,
                    atom,
                }
            }

            Step::SubmitCreate {
                counter,
                atom_cost,
                atom,
            } => {
                let call = CallDescriptor::new(
                    self.endpoint.address,
                    atom_cost,
                    "createAtom",
                    vec![AbiValue::Bytes(atom.content_uri.clone())],
                )?;
                let tx_hash = self.submitter.send(&call).await?;
                tracing::info!(%tx_hash, "createAtom submitted");
                Step::AwaitCreateConfirmed {
                    counter,
                    atom_cost,
                    atom,
                    tx_hash,
                }
            }

            Step::AwaitCreateConfirmed {
                counter,
                atom_cost,
                atom,
                tx_hash,
            } => {
                let create = self.confirmed("createAtom", tx_hash).await?;
                Step::VerifyPrediction {
                    counter,
                    atom_cost,
                    atom,
                    create,
                }
            }

            Step::VerifyPrediction {
                counter,
                atom_cost,
                atom,
                create,
            } => {
                if self.verify_prediction {
                    let observed = self.reader.read_uint(ViewFunction::Count).await?;
                    if observed != atom.atom_id {
                        return Err(DeployError::PredictionRace {
                            expected: atom.atom_id,
                            observed,
                        });
                    }
                } else {
                    tracing::warn!(atom_id = %atom.atom_id, "skipping post-create prediction check");
                }
                Step::SubmitDependent {
                    counter,
                    atom_cost,
                    atom,
                    create,
                }
            }

            Step::SubmitDependent {
                counter,
                atom_cost,
                atom,
                create,
            } => {
                // The argument is the id fixed at PREDICT, never read from the receipt.
                let call = CallDescriptor::new(
                    self.endpoint.address,
                    U256::ZERO,
                    "deployAtomWallet",
                    vec![AbiValue::Uint(atom.atom_id)],
                )?;
                let tx_hash = self.submitter.send(&call).await?;
                tracing::info!(%tx_hash, "deployAtomWallet submitted");
                Step::AwaitDependentConfirmed {
                    counter,
                    atom_cost,
                    atom,
                    create,
                    tx_hash,
                }
            }

            Step::AwaitDependentConfirmed {
                counter,
                atom_cost,
                atom,
                create,
                tx_hash,
            } => {
                let wallet = self.confirmed("deployAtomWallet", tx_hash).await?;
                Step::Done(DeploymentOutcome {
                    counter,
                    atom_cost,
                    atom,
                    create,
                    wallet,
                })
            }

            done @ Step::Done(_) => done,
        };
        Ok(next)
    }

    async fn confirmed(&self, method: &'static str, tx_hash: TxHash) -> Result<Receipt, DeployError> {
        let receipt = self.submitter.await_receipt(method, tx_hash).await?;
        if !receipt.confirmed {
            return Err(DeployError::TransactionReverted { method, tx_hash });
        }
        tracing::info!(method, %tx_hash, block = ?receipt.block_number, "tx mined");
        Ok(receipt)
    }
}
