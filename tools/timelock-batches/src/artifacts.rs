//! Durable batch files.

use std::path::Path;

use multivault_abi::write_atomic;

use crate::{errors::ArtifactError, encoder::TimelockBatches, types::TransactionBatch};

/// Write `batch` as pretty JSON, replacing `path` atomically.
pub fn write_batch(path: &Path, batch: &TransactionBatch) -> Result<(), ArtifactError> {
    let serialised = serde_json::to_string_pretty(batch)?;
    write_atomic(path, serialised.as_bytes()).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), name = %batch.meta.name, "wrote batch");
    Ok(())
}

/// Write the schedule and execute halves as two separate files.
pub fn write_timelock_pair(
    batches: &TimelockBatches,
    schedule_path: &Path,
    execute_path: &Path,
) -> Result<(), ArtifactError> {
    write_batch(schedule_path, &batches.schedule)?;
    write_batch(execute_path, &batches.execute)
}
