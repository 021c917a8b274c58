//! Transaction decoding models and the data-source contract
//!
//! The decoding service never talks to a node itself. Whatever fetches raw
//! transactions, results and contract interfaces implements [`TxSource`]
//! and is handed to the service at construction time.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::domain::abi::{AbiError, DecodedArgs, Interface};

/// Status the node reports for a reverted contract call
pub const REVERT_STATUS: &str = "REVERT";

/// The parts of a transaction the decoder needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Transaction id
    pub id: String,
    /// Selector-prefixed call data
    pub call_data: Vec<u8>,
    /// Called contract, if this is a contract invocation
    pub contract_address: Option<String>,
    /// Execution status reported by the node (e.g., "SUCCESS", "REVERT")
    pub status: String,
}

/// Return data as the node hands it over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnData {
    /// ABI-encoded bytes (the node's `0x`-prefixed contract result)
    Encoded(Vec<u8>),
    /// Hex-encoded plain-text message (no `0x` prefix); never ABI-decoded
    Message(String),
}

impl ReturnData {
    /// Classify a raw result string by its `0x` prefix
    pub fn from_node_result(raw: &str) -> Result<Self, TxDecodeError> {
        let raw = raw.trim();
        match raw.strip_prefix("0x") {
            Some(payload) => Ok(ReturnData::Encoded(hex::decode(payload)?)),
            None => Ok(ReturnData::Message(raw.to_string())),
        }
    }
}

/// Provider of raw transaction data and contract interfaces
pub trait TxSource {
    /// Fetch a transaction by id
    fn transaction(&self, tx_id: &str) -> anyhow::Result<Option<TransactionRecord>>;

    /// Fetch the published interface of a contract
    fn contract_interface(&self, address: &str) -> anyhow::Result<Option<Interface>>;

    /// Fetch the return data of a transaction
    fn return_data(&self, tx_id: &str) -> anyhow::Result<Option<ReturnData>>;
}

/// Decoded call-data view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedInput {
    pub method_name: String,
    /// Canonical signature of the matched function
    pub signature: String,
    pub input_names: Vec<String>,
    pub input_types: Vec<String>,
    pub decoded_input: DecodedArgs,
}

/// Decoded return-data payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPayload {
    /// ABI-decoded output values
    Values(DecodedArgs),
    /// Plain-text message returned instead of ABI data
    Message(String),
    /// The function declares no outputs
    Empty,
}

impl Serialize for OutputPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutputPayload::Values(args) => args.serialize(serializer),
            OutputPayload::Message(message) => serializer.serialize_str(message),
            OutputPayload::Empty => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("_length", &0)?;
                map.end()
            }
        }
    }
}

/// Decoded return-data view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedOutput {
    pub method_name: String,
    pub output_names: Vec<String>,
    pub output_types: Vec<String>,
    pub decoded_output: OutputPayload,
}

/// Revert status and message of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertInfo {
    pub tx_status: String,
    /// Empty unless the transaction reverted
    pub revert_message: String,
}

/// Errors from the transaction decoding service
#[derive(Debug, Error)]
pub enum TxDecodeError {
    /// Resolution or decoding failed
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("transaction {0} not found")]
    TransactionNotFound(String),

    /// The transaction does not call a contract
    #[error("no contract found for transaction {0}")]
    NoContract(String),

    #[error("contract {0} does not exist")]
    ContractNotFound(String),

    #[error("no result recorded for transaction {0}")]
    ResultNotFound(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A plain-text return payload is not valid UTF-8
    #[error("return message is not valid UTF-8")]
    InvalidMessage,

    /// The data source failed
    #[error("data source error: {0:#}")]
    Source(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_data_classification() {
        assert_eq!(
            ReturnData::from_node_result("0x0001").unwrap(),
            ReturnData::Encoded(vec![0x00, 0x01])
        );
        assert_eq!(
            ReturnData::from_node_result("6f6b").unwrap(),
            ReturnData::Message("6f6b".to_string())
        );
        assert!(matches!(
            ReturnData::from_node_result("0xzz"),
            Err(TxDecodeError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_empty_output_serializes_with_zero_length() {
        let output = DecodedOutput {
            method_name: "ping".to_string(),
            output_names: vec![],
            output_types: vec![],
            decoded_output: OutputPayload::Empty,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["methodName"], "ping");
        assert_eq!(json["decodedOutput"], serde_json::json!({"_length": 0}));
    }
}
