//! Sequential atom deployment against an EthMultiVault proxy.
//!
//! `count()` → predict `count + 1` → `createAtom` → wait → `deployAtomWallet`
//! → wait. See [`workflow::AtomDeployment`].

pub mod config;
pub mod errors;
pub mod predictor;
pub mod reader;
pub mod report;
pub mod rpc;
pub mod submitter;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use errors::{DeployError, ErrorKind};
pub use workflow::{AtomDeployment, DeploymentOutcome, WorkflowError, WorkflowState};
