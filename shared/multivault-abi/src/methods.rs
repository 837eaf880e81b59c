//! Typed method table for the ABI subset.
//!
//! The `sol!` interface gives us encoders; this table gives us the parameter
//! names and types as data, which the batch artifacts need verbatim.

use sha3::{Digest, Keccak256};

use crate::errors::EncodingMismatch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateMutability {
    View,
    NonPayable,
    Payable,
}

/// One named, typed function parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbiParam {
    pub name: &'static str,
    pub ty: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodAbi {
    pub name: &'static str,
    pub inputs: &'static [AbiParam],
    pub mutability: StateMutability,
}

impl MethodAbi {
    /// Canonical signature, eg `setExitFee(uint256,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.ty).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        let digest = Keccak256::digest(self.signature().as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest[..4]);
        out
    }

    pub fn is_payable(&self) -> bool {
        self.mutability == StateMutability::Payable
    }
}

const fn param(name: &'static str, ty: &'static str) -> AbiParam {
    AbiParam { name, ty }
}

pub const COUNT: MethodAbi = MethodAbi {
    name: "count",
    inputs: &[],
    mutability: StateMutability::View,
};

pub const GET_ATOM_COST: MethodAbi = MethodAbi {
    name: "getAtomCost",
    inputs: &[],
    mutability: StateMutability::View,
};

pub const CREATE_ATOM: MethodAbi = MethodAbi {
    name: "createAtom",
    inputs: &[param("atomUri", "bytes")],
    mutability: StateMutability::Payable,
};

pub const DEPLOY_ATOM_WALLET: MethodAbi = MethodAbi {
    name: "deployAtomWallet",
    inputs: &[param("atomId", "uint256")],
    mutability: StateMutability::NonPayable,
};

pub const SCHEDULE_OPERATION: MethodAbi = MethodAbi {
    name: "scheduleOperation",
    inputs: &[param("operationId", "bytes32"), param("data", "bytes")],
    mutability: StateMutability::NonPayable,
};

pub const SET_EXIT_FEE: MethodAbi = MethodAbi {
    name: "setExitFee",
    inputs: &[param("id", "uint256"), param("exitFee", "uint256")],
    mutability: StateMutability::NonPayable,
};

pub const PAUSE: MethodAbi = MethodAbi {
    name: "pause",
    inputs: &[],
    mutability: StateMutability::NonPayable,
};

pub const UNPAUSE: MethodAbi = MethodAbi {
    name: "unpause",
    inputs: &[],
    mutability: StateMutability::NonPayable,
};

pub const METHODS: &[MethodAbi] = &[
    COUNT,
    GET_ATOM_COST,
    CREATE_ATOM,
    DEPLOY_ATOM_WALLET,
    SCHEDULE_OPERATION,
    SET_EXIT_FEE,
    PAUSE,
    UNPAUSE,
];

/// Look up a method of the ABI subset by name.
pub fn method(name: &str) -> Result<&'static MethodAbi, EncodingMismatch> {
    METHODS
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| EncodingMismatch::UnknownMethod(name.to_string()))
}
