use std::{io, path::PathBuf};

use multivault_abi::EncodingMismatch;
use thiserror::Error;

/// Reasons a batch could not be built. No artifact exists when one is returned.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    EncodingMismatch(#[from] EncodingMismatch),

    #[error("`{method}` cannot be used as a governance action")]
    NotGovernable { method: &'static str },

    #[error("value `{value}` for `{param}` is not a valid `{ty}` input")]
    InvalidValue {
        param: String,
        ty: String,
        value: String,
    },

    #[error("batch has no transactions")]
    Empty,

    #[error("invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed serialising batch JSON: {0}")]
    Serialise(#[from] serde_json::Error),

    #[error("failed writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
