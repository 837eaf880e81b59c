//! Validated call descriptors for the vault ABI subset.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    errors::EncodingMismatch,
    interface::IEthMultiVault,
    methods::{method, MethodAbi},
    values::AbiValue,
};

/// Where the vault lives. Supplied by configuration, immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractEndpoint {
    /// Transparent upgradeable proxy address.
    pub address: Address,
    pub chain_id: u64,
}

/// A single contract call whose arguments have been checked against the ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallDescriptor {
    pub to: Address,
    pub value: U256,
    pub method: &'static MethodAbi,
    pub args: Vec<AbiValue>,
    calldata: Bytes,
}

impl CallDescriptor {
    pub fn new(
        to: Address,
        value: U256,
        method_name: &str,
        args: Vec<AbiValue>,
    ) -> Result<Self, EncodingMismatch> {
        let method = method(method_name)?;
        if !value.is_zero() && !method.is_payable() {
            return Err(EncodingMismatch::NotPayable {
                method: method.name,
            });
        }
        let calldata = encode_call(method, &args)?;
        Ok(Self {
            to,
            value,
            method,
            args,
            calldata,
        })
    }

    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    /// `(param name, rendered value)` pairs in ABI order.
    pub fn named_inputs(&self) -> Vec<(&'static str, String)> {
        self.method
            .inputs
            .iter()
            .zip(&self.args)
            .map(|(p, v)| (p.name, v.to_input_string()))
            .collect()
    }
}

fn check_args(method: &'static MethodAbi, args: &[AbiValue]) -> Result<(), EncodingMismatch> {
    if args.len() != method.inputs.len() {
        return Err(EncodingMismatch::Arity {
            method: method.name,
            expected: method.inputs.len(),
            got: args.len(),
        });
    }
    for (param, arg) in method.inputs.iter().zip(args) {
        if param.ty != arg.sol_type() {
            return Err(EncodingMismatch::Type {
                method: method.name,
                param: param.name,
                expected: param.ty,
                got: arg.sol_type(),
            });
        }
    }
    Ok(())
}

fn type_error(method: &'static MethodAbi, idx: usize, got: &AbiValue) -> EncodingMismatch {
    let param = method.inputs[idx];
    EncodingMismatch::Type {
        method: method.name,
        param: param.name,
        expected: param.ty,
        got: got.sol_type(),
    }
}

fn uint_arg(method: &'static MethodAbi, args: &[AbiValue], idx: usize) -> Result<U256, EncodingMismatch> {
    args[idx].as_uint().ok_or_else(|| type_error(method, idx, &args[idx]))
}

fn bytes_arg(method: &'static MethodAbi, args: &[AbiValue], idx: usize) -> Result<Bytes, EncodingMismatch> {
    args[idx]
        .as_bytes()
        .cloned()
        .ok_or_else(|| type_error(method, idx, &args[idx]))
}

/// ABI-encode `method(args...)` (selector + arguments).
///
/// Arity and every argument type are checked against the method table first,
/// so a mismatch never yields calldata.
pub fn encode_call(method: &'static MethodAbi, args: &[AbiValue]) -> Result<Bytes, EncodingMismatch> {
    use IEthMultiVault::*;

    check_args(method, args)?;

    let data = match method.name {
        "count" => countCall {}.abi_encode(),
        "getAtomCost" => getAtomCostCall {}.abi_encode(),
        "createAtom" => createAtomCall {
            atomUri: bytes_arg(method, args, 0)?,
        }
        .abi_encode(),
        "deployAtomWallet" => deployAtomWalletCall {
            atomId: uint_arg(method, args, 0)?,
        }
        .abi_encode(),
        "scheduleOperation" => scheduleOperationCall {
            operationId: args[0]
                .as_fixed_bytes32()
                .ok_or_else(|| type_error(method, 0, &args[0]))?,
            data: bytes_arg(method, args, 1)?,
        }
        .abi_encode(),
        "setExitFee" => setExitFeeCall {
            id: uint_arg(method, args, 0)?,
            exitFee: uint_arg(method, args, 1)?,
        }
        .abi_encode(),
        "pause" => pauseCall {}.abi_encode(),
        "unpause" => unpauseCall {}.abi_encode(),
        other => return Err(EncodingMismatch::UnknownMethod(other.to_string())),
    };
    Ok(Bytes::from(data))
}
