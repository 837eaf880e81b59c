//! Read-only queries against the vault's view functions.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use multivault_abi::IEthMultiVault;

use crate::errors::DeployError;

/// Zero-argument `uint256` view functions the workflow reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewFunction {
    /// `count()`: id of the most recently created vault.
    Count,
    /// `getAtomCost()`: value that must accompany `createAtom`.
    AtomCost,
}

impl ViewFunction {
    pub fn name(self) -> &'static str {
        match self {
            ViewFunction::Count => "count",
            ViewFunction::AtomCost => "getAtomCost",
        }
    }

    pub fn calldata(self) -> Bytes {
        let data = match self {
            ViewFunction::Count => IEthMultiVault::countCall {}.abi_encode(),
            ViewFunction::AtomCost => IEthMultiVault::getAtomCostCall {}.abi_encode(),
        };
        Bytes::from(data)
    }

    /// Decode raw `eth_call` return data.
    pub fn decode(self, ret: &[u8]) -> Result<U256, DeployError> {
        let decoded = match self {
            ViewFunction::Count => {
                IEthMultiVault::countCall::abi_decode_returns(ret, true).map(|r| r._0)
            }
            ViewFunction::AtomCost => {
                IEthMultiVault::getAtomCostCall::abi_decode_returns(ret, true).map(|r| r._0)
            }
        };
        decoded.map_err(|e| DeployError::ReadFailure {
            view: self.name(),
            reason: format!("undecodable return data: {e}"),
        })
    }
}

/// Source of current vault state. Implementations must be side-effect free.
#[async_trait]
pub trait VaultReader: Send + Sync {
    async fn read_uint(&self, view: ViewFunction) -> Result<U256, DeployError>;
}
