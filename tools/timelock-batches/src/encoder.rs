use alloy_primitives::{B256, U256};
use multivault_abi::{method, AbiValue, CallDescriptor, ContractEndpoint, StateMutability};

use crate::{
    builder::{BatchBuilder, BatchMetadata},
    errors::BatchError,
    operation::operation_id,
    types::TransactionBatch,
};

/// A privileged vault call, eg `setExitFee(0, 500)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GovernanceAction {
    pub method: String,
    pub args: Vec<AbiValue>,
}

impl GovernanceAction {
    pub fn new(method: impl Into<String>, args: Vec<AbiValue>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    pub fn set_exit_fee(vault_id: U256, exit_fee: U256) -> Self {
        Self::new("setExitFee", vec![AbiValue::Uint(vault_id), AbiValue::Uint(exit_fee)])
    }

    pub fn pause() -> Self {
        Self::new("pause", Vec::new())
    }

    pub fn unpause() -> Self {
        Self::new("unpause", Vec::new())
    }

    /// Direct call to the target method with the original typed arguments.
    fn call(&self, endpoint: &ContractEndpoint) -> Result<CallDescriptor, BatchError> {
        let target = method(&self.method)?;
        if target.mutability == StateMutability::View || target.name == "scheduleOperation" {
            return Err(BatchError::NotGovernable {
                method: target.name,
            });
        }
        Ok(CallDescriptor::new(
            endpoint.address,
            U256::ZERO,
            target.name,
            self.args.clone(),
        )?)
    }
}

/// The two halves of a timelocked change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelockBatches {
    pub operation_id: B256,
    /// `scheduleOperation(operationId, encodedCall)`.
    pub schedule: TransactionBatch,
    /// The privileged call itself, submitted once the delay has passed.
    pub execute: TransactionBatch,
}

/// Build the schedule and execute batches for `action`.
///
/// Pure: the same inputs give identical batches. Both are built and validated
/// before returning, so a mismatch never leaves half a pair behind.
pub fn encode_timelocked(
    endpoint: &ContractEndpoint,
    action: &GovernanceAction,
    schedule_meta: BatchMetadata,
    execute_meta: BatchMetadata,
) -> Result<TimelockBatches, BatchError> {
    let execute_call = action.call(endpoint)?;
    let operation_id = operation_id(execute_call.method.name);

    let schedule_call = CallDescriptor::new(
        endpoint.address,
        U256::ZERO,
        "scheduleOperation",
        vec![
            AbiValue::FixedBytes32(operation_id),
            AbiValue::Bytes(execute_call.calldata().clone()),
        ],
    )?;

    let schedule = BatchBuilder::new(endpoint.chain_id, schedule_meta)
        .call(&schedule_call)
        .build()?;
    let execute = BatchBuilder::new(endpoint.chain_id, execute_meta)
        .call(&execute_call)
        .build()?;

    tracing::debug!(
        method = execute_call.method.name,
        %operation_id,
        calldata = %execute_call.calldata(),
        "encoded timelocked action"
    );

    Ok(TimelockBatches {
        operation_id,
        schedule,
        execute,
    })
}

/// Build a single batch calling `action` directly, for methods that are not
/// behind the timelock (eg `pause` / `unpause`).
pub fn encode_direct(
    endpoint: &ContractEndpoint,
    action: &GovernanceAction,
    meta: BatchMetadata,
) -> Result<TransactionBatch, BatchError> {
    let call = action.call(endpoint)?;
    BatchBuilder::new(endpoint.chain_id, meta).call(&call).build()
}
