//! Safe Transaction Builder batch file layout.

use serde::{ser::SerializeMap, Serialize, Serializer};

/// Batch file format version understood by the Safe Transaction Builder.
pub const BATCH_FORMAT_VERSION: &str = "1.0";
/// Transaction Builder release the batches are generated against.
pub const TX_BUILDER_VERSION: &str = "1.16.5";

/// One importable batch file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBatch {
    pub version: String,
    /// Decimal chain id.
    pub chain_id: String,
    /// Unix milliseconds. The only time-varying field.
    pub created_at: u64,
    pub meta: BatchMeta,
    pub transactions: Vec<BatchTransaction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    pub name: String,
    pub description: String,
    pub tx_builder_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_from_safe_address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTransaction {
    pub to: String,
    /// Wei, decimal.
    pub value: String,
    pub contract_method: ContractMethod,
    pub contract_inputs_values: InputValues,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractMethod {
    pub name: String,
    pub inputs: Vec<MethodInput>,
    pub payable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInput {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub internal_type: String,
}

/// `{argName: stringValue}` in ABI argument order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputValues(pub Vec<(String, String)>);

impl InputValues {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for InputValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
