//! Validating builder for [`TransactionBatch`].

use alloy_primitives::{Address, U256};
use multivault_abi::CallDescriptor;
use regex::Regex;

use crate::{
    errors::BatchError,
    types::{
        BatchMeta, BatchTransaction, ContractMethod, InputValues, MethodInput, TransactionBatch,
        BATCH_FORMAT_VERSION, TX_BUILDER_VERSION,
    },
};

/// Caller-supplied batch metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchMetadata {
    pub name: String,
    pub description: String,
    /// Unix milliseconds stamped into `createdAt`.
    pub created_at_ms: u64,
    /// Safe the batch is meant to be imported into, if known.
    pub safe: Option<Address>,
}

impl BatchMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_at_ms,
            safe: None,
        }
    }

    pub fn with_safe(mut self, safe: Option<Address>) -> Self {
        self.safe = safe;
        self
    }
}

/// Name and description shown for a batch in the Safe UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchLabel {
    pub name: &'static str,
    pub description: &'static str,
}

impl BatchLabel {
    pub const SCHEDULE_EXIT_FEE: Self = Self {
        name: "Schedule SetExitFee",
        description: "Schedule a new exit fee",
    };
    pub const EXEC_EXIT_FEE: Self = Self {
        name: "Exec SetExitFee",
        description: "Exec a new exit fee",
    };
    pub const PAUSE: Self = Self {
        name: "pause",
        description: "Pause the contract",
    };
    pub const UNPAUSE: Self = Self {
        name: "UNPAUSE",
        description: "UNPAUSE the contract",
    };

    pub fn metadata(self, created_at_ms: u64) -> BatchMetadata {
        BatchMetadata::new(self.name, self.description, created_at_ms)
    }
}

pub struct BatchBuilder {
    chain_id: u64,
    meta: BatchMetadata,
    transactions: Vec<BatchTransaction>,
}

impl BatchBuilder {
    pub fn new(chain_id: u64, meta: BatchMetadata) -> Self {
        Self {
            chain_id,
            meta,
            transactions: Vec::new(),
        }
    }

    pub fn call(mut self, call: &CallDescriptor) -> Self {
        self.transactions.push(transaction_for(call));
        self
    }

    /// Validate every field's string encoding and assemble the batch.
    pub fn build(self) -> Result<TransactionBatch, BatchError> {
        if self.transactions.is_empty() {
            return Err(BatchError::Empty);
        }
        let validator = Validator::new()?;
        for tx in &self.transactions {
            validator.check("to", "address", &tx.to)?;
            validator.check("value", "uint256", &tx.value)?;
            for input in &tx.contract_method.inputs {
                let value = tx.contract_inputs_values.get(&input.name).ok_or_else(|| {
                    BatchError::InvalidValue {
                        param: input.name.clone(),
                        ty: input.ty.clone(),
                        value: String::new(),
                    }
                })?;
                validator.check(&input.name, &input.ty, value)?;
            }
        }

        let created_from_safe_address = self.meta.safe.map(|a| a.to_checksum(None));
        Ok(TransactionBatch {
            version: BATCH_FORMAT_VERSION.to_string(),
            chain_id: self.chain_id.to_string(),
            created_at: self.meta.created_at_ms,
            meta: BatchMeta {
                name: self.meta.name,
                description: self.meta.description,
                tx_builder_version: TX_BUILDER_VERSION.to_string(),
                created_from_safe_address,
            },
            transactions: self.transactions,
        })
    }
}

fn transaction_for(call: &CallDescriptor) -> BatchTransaction {
    let inputs = call
        .method
        .inputs
        .iter()
        .map(|p| MethodInput {
            name: p.name.to_string(),
            ty: p.ty.to_string(),
            internal_type: p.ty.to_string(),
        })
        .collect();
    let values = call
        .named_inputs()
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    BatchTransaction {
        to: call.to.to_checksum(None),
        value: call.value.to_string(),
        contract_method: ContractMethod {
            name: call.method.name.to_string(),
            inputs,
            payable: call.method.is_payable(),
        },
        contract_inputs_values: InputValues(values),
    }
}

struct Validator {
    decimal: Regex,
    hex_bytes: Regex,
    word: Regex,
    address: Regex,
}

impl Validator {
    fn new() -> Result<Self, BatchError> {
        Ok(Self {
            decimal: Regex::new(r"^(0|[1-9][0-9]*)$")?,
            hex_bytes: Regex::new(r"^0x([0-9a-fA-F]{2})*$")?,
            word: Regex::new(r"^0x[0-9a-fA-F]{64}$")?,
            address: Regex::new(r"^0x[0-9a-fA-F]{40}$")?,
        })
    }

    fn check(&self, param: &str, ty: &str, value: &str) -> Result<(), BatchError> {
        let ok = match ty {
            "uint256" => self.decimal.is_match(value) && value.parse::<U256>().is_ok(),
            "bytes" => self.hex_bytes.is_match(value),
            "bytes32" => self.word.is_match(value),
            "address" => self.address.is_match(value),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(BatchError::InvalidValue {
                param: param.to_string(),
                ty: ty.to_string(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use multivault_abi::AbiValue;

    use super::*;

    fn set_exit_fee() -> CallDescriptor {
        CallDescriptor::new(
            Address::repeat_byte(0x42),
            U256::ZERO,
            "setExitFee",
            vec![AbiValue::from(0u64), AbiValue::from(500u64)],
        )
        .unwrap()
    }

    #[test]
    fn test_builds_batch_with_metadata() {
        let meta = BatchMetadata::new("Exec SetExitFee", "Exec a new exit fee", 1_700_000_000_000)
            .with_safe(Some(Address::repeat_byte(0x42)));
        let batch = BatchBuilder::new(84532, meta).call(&set_exit_fee()).build().unwrap();

        assert_eq!(batch.version, "1.0");
        assert_eq!(batch.chain_id, "84532");
        assert_eq!(batch.created_at, 1_700_000_000_000);
        assert_eq!(batch.meta.tx_builder_version, TX_BUILDER_VERSION);
        assert!(batch.meta.created_from_safe_address.is_some());

        let tx = &batch.transactions[0];
        assert_eq!(tx.value, "0");
        assert!(!tx.contract_method.payable);
        assert_eq!(
            tx.contract_inputs_values.0,
            vec![("id".to_string(), "0".to_string()), ("exitFee".to_string(), "500".to_string())]
        );
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let meta = BatchMetadata::new("n", "d", 0);
        assert!(matches!(BatchBuilder::new(1, meta).build(), Err(BatchError::Empty)));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let v = Validator::new().unwrap();
        assert!(v.check("id", "uint256", "500").is_ok());
        assert!(v.check("id", "uint256", "5e2").is_err());
        assert!(v.check("id", "uint256", "0500").is_err());
        assert!(v.check("data", "bytes", "0xabc").is_err());
        assert!(v.check("data", "bytes", "0x").is_ok());
        assert!(v.check("operationId", "bytes32", "0x1234").is_err());
        assert!(v.check("x", "string", "hello").is_err());
    }

    #[test]
    fn test_tampered_input_fails_validation() {
        let call = CallDescriptor::new(
            Address::ZERO,
            U256::from(1u8),
            "createAtom",
            vec![AbiValue::Bytes(Bytes::from_static(b"atom1"))],
        )
        .unwrap();
        let mut builder = BatchBuilder::new(1, BatchMetadata::new("n", "d", 0)).call(&call);
        builder.transactions[0].contract_inputs_values.0[0].1 = "atom1".into();
        assert!(matches!(builder.build(), Err(BatchError::InvalidValue { .. })));
    }
}
