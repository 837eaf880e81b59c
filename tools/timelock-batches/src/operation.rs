use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Timelock operation id for a privileged method: `keccak256(utf8(name))`.
///
/// Only the name is hashed, never the arguments; the vault correlates
/// `scheduleOperation` and the later direct call through this value.
pub fn operation_id(method_name: &str) -> B256 {
    keccak256_bytes(method_name.as_bytes())
}

fn keccak256_bytes(bytes: &[u8]) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    B256::from(b)
}
