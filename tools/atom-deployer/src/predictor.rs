//! Next-atom prediction.
//!
//! The vault assigns atom ids sequentially, so the id of the atom we are
//! about to create is `count() + 1`. This only holds if nobody else creates an
//! atom between our read and the confirmation of our `createAtom` tx.

use alloy_primitives::{Bytes, U256};

/// Label prefix the vault tooling uses for atom URIs.
pub const ATOM_LABEL_PREFIX: &str = "atom";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictedAtom {
    pub atom_id: U256,
    /// `"atom{atom_id}"`.
    pub label: String,
    /// UTF-8 bytes of `label` (identical to `abi.encodePacked(label)`).
    pub content_uri: Bytes,
}

/// Predict the atom that the next `createAtom` call will mint.
///
/// Returns `None` only when the counter is already `U256::MAX`.
pub fn predict(counter: U256) -> Option<PredictedAtom> {
    let atom_id = counter.checked_add(U256::from(1u8))?;
    let label = format!("{ATOM_LABEL_PREFIX}{atom_id}");
    let content_uri = Bytes::copy_from_slice(label.as_bytes());
    Some(PredictedAtom {
        atom_id,
        label,
        content_uri,
    })
}
