//! Transaction decoding service
//!
//! [`TxDecoder`] drives the ABI engine from a transaction id: it fetches
//! the transaction, the called contract's interface and the return data
//! from a [`TxSource`], then resolves and decodes. The pure
//! [`decode_input`] and [`decode_output`] do the same work on data the
//! caller already holds.

use tracing::debug;

use crate::domain::abi::{AbiError, DecodedValue, FunctionDescriptor, Interface, ParamType};
use crate::domain::tx::{
    DecodedInput, DecodedOutput, OutputPayload, ReturnData, RevertInfo, TransactionRecord,
    TxDecodeError, TxSource, REVERT_STATUS,
};
use crate::infrastructure::abi::{
    canonical, decode_named, decode_types, reported_name, resolve, selector_hex,
};

/// Selector of the standard `Error(string)` revert payload
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Decode call data against an interface
pub fn decode_input(call_data: &[u8], interface: &Interface) -> Result<DecodedInput, AbiError> {
    let resolution = resolve(call_data, interface)?;
    let decoded_input = decode_named(resolution.args, &resolution.function.inputs)?;

    Ok(DecodedInput {
        method_name: resolution.function.name.clone(),
        signature: resolution.signature,
        input_names: decoded_input.names(),
        input_types: resolution.input_types,
        decoded_input,
    })
}

/// Decode the return data of an already-resolved function.
///
/// A function without declared outputs yields [`OutputPayload::Empty`]
/// whatever the return data holds. A plain-text message is hex-decoded to
/// UTF-8 instead of being ABI-decoded.
pub fn decode_output(
    function: &FunctionDescriptor,
    return_data: &ReturnData,
) -> Result<DecodedOutput, TxDecodeError> {
    let output_names = function.outputs.iter().map(reported_name).collect();
    let output_types = canonical::canonical_types(&function.outputs)?;

    let decoded_output = if function.outputs.is_empty() {
        OutputPayload::Empty
    } else {
        match return_data {
            ReturnData::Encoded(bytes) => OutputPayload::Values(decode_named(bytes, &function.outputs)?),
            ReturnData::Message(message) => OutputPayload::Message(decode_message(message)?),
        }
    };

    Ok(DecodedOutput {
        method_name: function.name.clone(),
        output_names,
        output_types,
        decoded_output,
    })
}

/// Hex-encoded plain text to a string
fn decode_message(message: &str) -> Result<String, TxDecodeError> {
    let bytes = hex::decode(message.trim())?;
    String::from_utf8(bytes).map_err(|_| TxDecodeError::InvalidMessage)
}

/// Revert reason carried by the return data of a reverted call.
///
/// A standard `Error(string)` payload is decoded in full. Anything else is
/// read from its last 32 bytes, with NUL bytes stripped.
fn revert_reason(return_data: &ReturnData) -> Result<String, TxDecodeError> {
    let bytes = match return_data {
        ReturnData::Encoded(bytes) => bytes.clone(),
        ReturnData::Message(message) => hex::decode(message.trim())?,
    };

    if let Some((selector, payload)) = bytes.split_first_chunk::<4>() {
        if *selector == ERROR_STRING_SELECTOR {
            if let Ok(values) = decode_types(payload, &[ParamType::String]) {
                if let Some(reason) = values.first().and_then(DecodedValue::as_str) {
                    return Ok(reason.to_string());
                }
            }
        }
    }

    let tail = &bytes[bytes.len().saturating_sub(32)..];
    let text = std::str::from_utf8(tail).map_err(|_| TxDecodeError::InvalidMessage)?;
    Ok(text.replace('\0', ""))
}

/// Decodes transactions fetched from a [`TxSource`]
#[derive(Debug, Clone)]
pub struct TxDecoder<S> {
    source: S,
}

impl<S: TxSource> TxDecoder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decode the call data of a transaction
    pub fn decode_input_by_id(&self, tx_id: &str) -> Result<DecodedInput, TxDecodeError> {
        let (tx, interface) = self.contract_call(tx_id)?;
        let decoded = decode_input(&tx.call_data, &interface)?;
        debug!(tx_id, method = %decoded.method_name, "decoded input");
        Ok(decoded)
    }

    /// Decode the return data of a transaction
    pub fn decode_result_by_id(&self, tx_id: &str) -> Result<DecodedOutput, TxDecodeError> {
        let (tx, interface) = self.contract_call(tx_id)?;
        let resolution = resolve(&tx.call_data, &interface)?;
        let function = resolution.function;

        if function.outputs.is_empty() {
            return decode_output(function, &ReturnData::Encoded(Vec::new()));
        }

        let return_data = self
            .source
            .return_data(tx_id)
            .map_err(TxDecodeError::Source)?
            .ok_or_else(|| TxDecodeError::ResultNotFound(tx_id.to_string()))?;

        debug!(
            tx_id,
            selector = %selector_hex(resolution.selector),
            method = %function.name,
            "decoding result"
        );
        decode_output(function, &return_data)
    }

    /// Report the status of a transaction and its revert reason, if any
    pub fn decode_revert_message(&self, tx_id: &str) -> Result<RevertInfo, TxDecodeError> {
        let tx = self.fetch_transaction(tx_id)?;
        if tx.contract_address.is_none() {
            return Err(TxDecodeError::NoContract(tx_id.to_string()));
        }

        if tx.status != REVERT_STATUS {
            return Ok(RevertInfo {
                tx_status: tx.status,
                revert_message: String::new(),
            });
        }

        let return_data = self
            .source
            .return_data(tx_id)
            .map_err(TxDecodeError::Source)?
            .ok_or_else(|| TxDecodeError::ResultNotFound(tx_id.to_string()))?;

        Ok(RevertInfo {
            tx_status: tx.status,
            revert_message: revert_reason(&return_data)?,
        })
    }

    fn fetch_transaction(&self, tx_id: &str) -> Result<TransactionRecord, TxDecodeError> {
        self.source
            .transaction(tx_id)
            .map_err(TxDecodeError::Source)?
            .ok_or_else(|| TxDecodeError::TransactionNotFound(tx_id.to_string()))
    }

    /// The transaction and the interface of the contract it calls
    fn contract_call(&self, tx_id: &str) -> Result<(TransactionRecord, Interface), TxDecodeError> {
        let tx = self.fetch_transaction(tx_id)?;
        let address = tx
            .contract_address
            .clone()
            .ok_or_else(|| TxDecodeError::NoContract(tx_id.to_string()))?;

        let interface = self
            .source
            .contract_interface(&address)
            .map_err(TxDecodeError::Source)?
            .ok_or(TxDecodeError::ContractNotFound(address))?;

        Ok((tx, interface))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::abi::ParamSpec;
    use crate::infrastructure::abi::selector;

    #[derive(Default)]
    struct MemorySource {
        txs: HashMap<String, TransactionRecord>,
        interfaces: HashMap<String, Interface>,
        results: HashMap<String, ReturnData>,
    }

    impl TxSource for MemorySource {
        fn transaction(&self, tx_id: &str) -> anyhow::Result<Option<TransactionRecord>> {
            Ok(self.txs.get(tx_id).cloned())
        }

        fn contract_interface(&self, address: &str) -> anyhow::Result<Option<Interface>> {
            Ok(self.interfaces.get(address).cloned())
        }

        fn return_data(&self, tx_id: &str) -> anyhow::Result<Option<ReturnData>> {
            Ok(self.results.get(tx_id).cloned())
        }
    }

    fn word(last: u8) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[31] = last;
        word
    }

    fn token() -> Interface {
        Interface::new(vec![
            FunctionDescriptor::function(
                "transfer",
                vec![
                    ParamSpec::new("to", "address"),
                    ParamSpec::new("amount", "uint256"),
                ],
                vec![ParamSpec::new("success", "bool")],
            ),
            FunctionDescriptor::function("ping", vec![], vec![]),
        ])
    }

    fn transfer_call() -> Vec<u8> {
        let mut data = vec![0xa9, 0x05, 0x9c, 0xbb];
        data.extend(word(0x11));
        data.extend(word(100));
        data
    }

    fn source_with(tx: TransactionRecord) -> MemorySource {
        let mut source = MemorySource::default();
        source.interfaces.insert("41bb".into(), token());
        source.txs.insert(tx.id.clone(), tx);
        source
    }

    fn record(id: &str, call_data: Vec<u8>, status: &str) -> TransactionRecord {
        TransactionRecord {
            id: id.into(),
            call_data,
            contract_address: Some("41bb".into()),
            status: status.into(),
        }
    }

    #[test]
    fn test_decode_input_by_id() {
        let decoder = TxDecoder::new(source_with(record("t1", transfer_call(), "SUCCESS")));
        let decoded = decoder.decode_input_by_id("t1").unwrap();

        assert_eq!(decoded.method_name, "transfer");
        assert_eq!(decoded.signature, "transfer(address,uint256)");
        assert_eq!(decoded.input_names, vec!["to", "amount"]);
        assert_eq!(decoded.input_types, vec!["address", "uint256"]);
        assert_eq!(
            decoded.decoded_input.by_name("amount").unwrap().value.as_uint(),
            Some(alloy_primitives::U256::from(100))
        );
    }

    #[test]
    fn test_decode_result_by_id() {
        let mut source = source_with(record("t1", transfer_call(), "SUCCESS"));
        source.results.insert("t1".into(), ReturnData::Encoded(word(1).to_vec()));
        let decoder = TxDecoder::new(source);

        let output = decoder.decode_result_by_id("t1").unwrap();
        assert_eq!(output.output_names, vec!["success"]);
        assert_eq!(output.output_types, vec!["bool"]);
        let OutputPayload::Values(values) = output.decoded_output else {
            panic!("expected values");
        };
        assert_eq!(values.get(0).unwrap().value, DecodedValue::Bool(true));
    }

    #[test]
    fn test_result_without_outputs_is_empty() {
        let decoder = TxDecoder::new(source_with(record("t1", selector("ping()").to_vec(), "SUCCESS")));
        let output = decoder.decode_result_by_id("t1").unwrap();
        assert_eq!(output.method_name, "ping");
        assert_eq!(output.decoded_output, OutputPayload::Empty);
    }

    #[test]
    fn test_output_tuple_array_unnamed() {
        let function = FunctionDescriptor::function(
            "orders",
            vec![],
            vec![
                ParamSpec::tuple("list", "tuple[]", vec![ParamSpec::new("id", "uint8")]),
                ParamSpec::new("total", "uint256"),
            ],
        );
        // empty (uint8)[] then total = 7
        let mut data = word(64).to_vec();
        data.extend(word(7));
        data.extend(word(0));

        let output = decode_output(&function, &ReturnData::Encoded(data)).unwrap();
        assert_eq!(output.output_names, vec!["", "total"]);
        assert_eq!(output.output_types, vec!["(uint8)[]", "uint256"]);
        let OutputPayload::Values(values) = output.decoded_output else {
            panic!("expected values");
        };
        assert_eq!(values.names(), vec!["", "total"]);
        assert_eq!(values.get(0).unwrap().value, DecodedValue::Array(vec![]));
    }

    #[test]
    fn test_result_message() {
        let mut source = source_with(record("t1", transfer_call(), "SUCCESS"));
        source.results.insert("t1".into(), ReturnData::Message(hex::encode("out of energy")));
        let output = TxDecoder::new(source).decode_result_by_id("t1").unwrap();
        assert_eq!(output.decoded_output, OutputPayload::Message("out of energy".into()));
    }

    #[test]
    fn test_result_message_invalid_utf8() {
        let mut source = source_with(record("t1", transfer_call(), "SUCCESS"));
        source.results.insert("t1".into(), ReturnData::Message("ff".into()));
        assert!(matches!(
            TxDecoder::new(source).decode_result_by_id("t1"),
            Err(TxDecodeError::InvalidMessage)
        ));
    }

    #[test]
    fn test_missing_pieces() {
        let mut source = source_with(record("t1", transfer_call(), "SUCCESS"));
        source.txs.insert(
            "plain".into(),
            TransactionRecord {
                contract_address: None,
                ..record("plain", vec![], "SUCCESS")
            },
        );
        source.txs.insert(
            "orphan".into(),
            TransactionRecord {
                contract_address: Some("41ff".into()),
                ..record("orphan", transfer_call(), "SUCCESS")
            },
        );
        let decoder = TxDecoder::new(source);

        assert!(matches!(
            decoder.decode_input_by_id("nope"),
            Err(TxDecodeError::TransactionNotFound(_))
        ));
        assert!(matches!(
            decoder.decode_input_by_id("plain"),
            Err(TxDecodeError::NoContract(_))
        ));
        assert!(matches!(
            decoder.decode_revert_message("plain"),
            Err(TxDecodeError::NoContract(_))
        ));
        assert!(matches!(
            decoder.decode_input_by_id("orphan"),
            Err(TxDecodeError::ContractNotFound(_))
        ));
        assert!(matches!(
            decoder.decode_result_by_id("t1"),
            Err(TxDecodeError::ResultNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_selector() {
        let decoder = TxDecoder::new(source_with(record("t1", vec![0xde, 0xad, 0xbe, 0xef], "SUCCESS")));
        assert!(matches!(
            decoder.decode_input_by_id("t1"),
            Err(TxDecodeError::Abi(AbiError::MethodNotFound(_)))
        ));
    }

    #[test]
    fn test_revert_message() {
        let mut source = source_with(record("t1", transfer_call(), "REVERT"));
        let mut tail = [0u8; 32];
        tail[..9].copy_from_slice(b"not owner");
        let mut data = vec![0u8; 32];
        data.extend(tail);
        source.results.insert("t1".into(), ReturnData::Encoded(data));
        source.txs.insert("t2".into(), record("t2", transfer_call(), "SUCCESS"));
        let decoder = TxDecoder::new(source);

        let info = decoder.decode_revert_message("t1").unwrap();
        assert_eq!(info.tx_status, "REVERT");
        assert_eq!(info.revert_message, "not owner");

        let info = decoder.decode_revert_message("t2").unwrap();
        assert_eq!(info.tx_status, "SUCCESS");
        assert_eq!(info.revert_message, "");
    }

    #[test]
    fn test_revert_error_string() {
        let reason = "transfer amount exceeds allowance granted";
        let mut data = ERROR_STRING_SELECTOR.to_vec();
        data.extend(word(0x20));
        data.extend(word(reason.len() as u8));
        let mut body = reason.as_bytes().to_vec();
        body.resize(64, 0);
        data.extend(body);

        assert_eq!(revert_reason(&ReturnData::Encoded(data)).unwrap(), reason);
    }

    #[test]
    fn test_revert_message_payload() {
        let message = ReturnData::Message(hex::encode("REVERT opcode executed"));
        assert_eq!(revert_reason(&message).unwrap(), "REVERT opcode executed");
    }
}
