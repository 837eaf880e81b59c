//! Safe Transaction Builder batches for EthMultiVault governance.
//!
//! Timelocked admin changes need two batches: one calling
//! `scheduleOperation(keccak256(name), calldata)` and one calling the method
//! directly after the delay. This crate only produces the files; submitting
//! them, and in the right order, is up to the Safe owners.

pub mod artifacts;
pub mod builder;
pub mod encoder;
pub mod errors;
pub mod operation;
pub mod types;


pub use builder::{BatchBuilder, BatchLabel, BatchMetadata};
pub use encoder::{encode_direct, encode_timelocked, GovernanceAction, TimelockBatches};
pub use errors::{ArtifactError, BatchError};
pub use operation::operation_id;
pub use types::TransactionBatch;
