use alloy_primitives::{Address, Bytes, B256, U256};

/// A typed call argument, restricted to the ABI types the vault subset uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Bytes(Bytes),
    FixedBytes32(B256),
    Address(Address),
}

impl AbiValue {
    /// Solidity type name this value encodes as.
    pub fn sol_type(&self) -> &'static str {
        match self {
            AbiValue::Uint(_) => "uint256",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::FixedBytes32(_) => "bytes32",
            AbiValue::Address(_) => "address",
        }
    }

    /// String form used by transaction builder tooling: decimal for numerics,
    /// `0x`-prefixed hex for byte values, checksummed hex for addresses.
    pub fn to_input_string(&self) -> String {
        match self {
            AbiValue::Uint(v) => v.to_string(),
            AbiValue::Bytes(b) => format!("0x{}", hex::encode(b)),
            AbiValue::FixedBytes32(b) => format!("0x{}", hex::encode(b)),
            AbiValue::Address(a) => a.to_checksum(None),
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            AbiValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_fixed_bytes32(&self) -> Option<B256> {
        match self {
            AbiValue::FixedBytes32(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }
}

impl From<Bytes> for AbiValue {
    fn from(value: Bytes) -> Self {
        AbiValue::Bytes(value)
    }
}

impl From<B256> for AbiValue {
    fn from(value: B256) -> Self {
        AbiValue::FixedBytes32(value)
    }
}

impl From<Address> for AbiValue {
    fn from(value: Address) -> Self {
        AbiValue::Address(value)
    }
}
