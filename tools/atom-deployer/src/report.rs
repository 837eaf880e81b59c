//! Machine-readable record of completed runs.
//!
//! Merges one entry per atom into a JSON file so later tooling can look up
//! which txs created an atom and its wallet. Keys this tool does not own are
//! carried over untouched.

use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use multivault_abi::write_atomic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::workflow::DeploymentOutcome;

#[derive(Debug, Default, Deserialize, Serialize)]
struct RunReport {
    #[serde(default)]
    network: String,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    runs: Map<String, Value>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct RunEntry {
    atom_id: String,
    atom_uri: String,
    atom_cost: String,
    observed_count: String,
    create_tx: String,
    create_block: Option<u64>,
    wallet_tx: String,
    wallet_block: Option<u64>,
    completed_at: String,
}

impl RunEntry {
    fn new(outcome: &DeploymentOutcome, completed_at: &str) -> Self {
        Self {
            atom_id: outcome.atom.atom_id.to_string(),
            atom_uri: format!("0x{}", hex::encode(&outcome.atom.content_uri)),
            atom_cost: outcome.atom_cost.to_string(),
            observed_count: outcome.counter.to_string(),
            create_tx: outcome.create.transaction_hash.to_string(),
            create_block: outcome.create.block_number,
            wallet_tx: outcome.wallet.transaction_hash.to_string(),
            wallet_block: outcome.wallet.block_number,
            completed_at: completed_at.to_owned(),
        }
    }
}

/// Existing report at `path`; a missing, empty or non-object file starts a
/// fresh one, malformed JSON is an error.
fn load(path: &Path) -> Result<RunReport> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RunReport::default()),
        Err(e) => return Err(e).with_context(|| format!("failed reading {}", path.display())),
    };
    if raw.trim().is_empty() {
        return Ok(RunReport::default());
    }
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing JSON in {}", path.display()))?;
    if !value.is_object() {
        return Ok(RunReport::default());
    }
    serde_json::from_value(value)
        .with_context(|| format!("unexpected report layout in {}", path.display()))
}

pub fn record_run(path: &Path, network: &str, outcome: &DeploymentOutcome) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let mut report = load(path)?;
    report.network = network.to_owned();
    report.updated_at = now.clone();
    report.runs.insert(
        outcome.atom.label.clone(),
        serde_json::to_value(RunEntry::new(outcome, &now))?,
    );

    let serialised = serde_json::to_string_pretty(&report).context("failed serialising report JSON")?;
    write_atomic(path, serialised.as_bytes())
        .with_context(|| format!("failed replacing {}", path.display()))
}

/// Record a run whose txs are already confirmed on-chain.
///
/// The atom and its wallet exist whether or not this succeeds, so failures
/// are logged rather than returned. Returns whether the report was written.
pub fn record_completed_run(path: &Path, network: &str, outcome: &DeploymentOutcome) -> bool {
    match record_run(path, network, outcome) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "run recorded");
            true
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                atom = %outcome.atom.label,
                create_tx = %outcome.create.transaction_hash,
                wallet_tx = %outcome.wallet.transaction_hash,
                "atom deployed but report not written: {e:#}"
            );
            false
        }
    }
}
