//! Static ABI subset of the EthMultiVault contract, shared by the deployment
//! workflow and the governance batch encoder.
//!
//! The contract itself is external; everything here mirrors its published
//! signatures and must stay in lockstep with them.

pub mod atomic;
pub mod call;
pub mod errors;
pub mod interface;
pub mod methods;
pub mod values;

pub use atomic::write_atomic;
pub use call::{encode_call, CallDescriptor, ContractEndpoint};
pub use errors::EncodingMismatch;
pub use interface::IEthMultiVault;
pub use methods::{method, AbiParam, MethodAbi, StateMutability, METHODS};
pub use values::AbiValue;
