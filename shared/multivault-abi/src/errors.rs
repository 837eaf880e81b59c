use thiserror::Error;

/// A call whose arguments do not match the declared ABI signature.
///
/// Raised before any calldata, transaction or artifact is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingMismatch {
    #[error("unknown method `{0}` (not part of the EthMultiVault ABI subset)")]
    UnknownMethod(String),

    #[error("`{method}` takes {expected} argument(s), got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("`{method}` argument `{param}` must be `{expected}`, got `{got}`")]
    Type {
        method: &'static str,
        param: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("`{method}` is not payable but a non-zero value was attached")]
    NotPayable { method: &'static str },
}
