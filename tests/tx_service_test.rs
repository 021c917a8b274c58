//! Transaction decoding over saved node responses

use std::fs;
use std::path::Path;

use alloy_primitives::address;
use serde_json::{json, Value};
use tempfile::TempDir;
use txdecode::export::{self, OutputFormat};
use txdecode::infrastructure::FixtureSource;
use txdecode::{OutputPayload, TxDecodeError, TxDecoder};

const CONTRACT: &str = "41a614f803b6fd780986a42c78ec9c7f77e6ded13c";

fn write(root: &Path, dir: &str, key: &str, value: Value) {
    fs::create_dir_all(root.join(dir)).unwrap();
    fs::write(root.join(dir).join(format!("{}.json", key)), value.to_string()).unwrap();
}

fn word(value: u64) -> String {
    format!("{:064x}", value)
}

fn transaction(status: &str, data: &str) -> Value {
    json!({
        "ret": [{"contractRet": status}],
        "raw_data": {"contract": [{
            "type": "TriggerSmartContract",
            "parameter": {
                "type_url": "type.googleapis.com/protocol.TriggerSmartContract",
                "value": {
                    "data": data,
                    "owner_address": "41f0cc5a2a84cd0f68ed1667070934542d673acbd8",
                    "contract_address": CONTRACT
                }
            }
        }]}
    })
}

fn fixtures() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "contracts",
        CONTRACT,
        json!({
            "contract_address": CONTRACT,
            "abi": {"entrys": [
                {"type": "Function", "name": "transfer",
                 "inputs": [{"name": "_to", "type": "address"}, {"name": "_value", "type": "uint256"}],
                 "outputs": [{"type": "bool"}]},
                {"type": "Function", "name": "setNote",
                 "inputs": [{"name": "note", "type": "string"}]},
                {"type": "Event", "name": "Transfer",
                 "inputs": [{"name": "from", "type": "address", "indexed": true}]}
            ]}
        }),
    );

    let transfer = format!("a9059cbb{}{}", word(0xbeef), word(250));
    write(root, "transactions", "ok", transaction("SUCCESS", &transfer));
    write(root, "info", "ok", json!({"id": "ok", "contractResult": [word(1)]}));

    let set_note = format!(
        "{}{}{}{}",
        hex::encode(txdecode::infrastructure::abi::selector("setNote(string)")),
        word(0x20),
        word(5),
        format!("{:0<64}", hex::encode("hello"))
    );
    write(root, "transactions", "note", transaction("SUCCESS", &set_note));

    write(root, "transactions", "reverted", transaction("REVERT", &transfer));
    let mut reason = hex::encode("balance too low");
    reason = format!("{:0<64}", reason);
    write(
        root,
        "info",
        "reverted",
        json!({"contractResult": [format!("{}{}", word(0), reason)]}),
    );

    write(root, "transactions", "energy", transaction("OUT_OF_ENERGY", &transfer));
    write(
        root,
        "info",
        "energy",
        json!({"contractResult": [""], "resMessage": hex::encode("Not enough energy")}),
    );

    write(root, "transactions", "missing", json!({}));
    dir
}

#[test]
fn test_decode_input_by_id() {
    let dir = fixtures();
    let decoder = TxDecoder::new(FixtureSource::new(dir.path()));

    let decoded = decoder.decode_input_by_id("ok").unwrap();
    assert_eq!(decoded.method_name, "transfer");
    assert_eq!(decoded.input_names, vec!["_to", "_value"]);
    assert_eq!(
        decoded.decoded_input.get(0).unwrap().value.as_address(),
        Some(address!("000000000000000000000000000000000000beef"))
    );
    assert_eq!(decoded.decoded_input.get(1).unwrap().value.to_string(), "250");

    let note = decoder.decode_input_by_id("note").unwrap();
    assert_eq!(note.decoded_input.by_name("note").unwrap().value.as_str(), Some("hello"));
}

#[test]
fn test_decode_result_by_id() {
    let dir = fixtures();
    let decoder = TxDecoder::new(FixtureSource::new(dir.path()));

    let output = decoder.decode_result_by_id("ok").unwrap();
    assert_eq!(output.output_names, vec![""]);
    assert_eq!(output.output_types, vec!["bool"]);
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["decodedOutput"], json!({"_length": 1, "0": true}));

    let empty = decoder.decode_result_by_id("note").unwrap();
    assert_eq!(empty.decoded_output, OutputPayload::Empty);

    let energy = decoder.decode_result_by_id("energy").unwrap();
    assert_eq!(energy.decoded_output, OutputPayload::Message("Not enough energy".into()));
}

#[test]
fn test_decode_revert_message() {
    let dir = fixtures();
    let decoder = TxDecoder::new(FixtureSource::new(dir.path()));

    let reverted = decoder.decode_revert_message("reverted").unwrap();
    assert_eq!(reverted.tx_status, "REVERT");
    assert_eq!(reverted.revert_message, "balance too low");

    let ok = decoder.decode_revert_message("ok").unwrap();
    assert_eq!(ok.tx_status, "SUCCESS");
    assert!(ok.revert_message.is_empty());
}

#[test]
fn test_missing_transaction() {
    let dir = fixtures();
    let decoder = TxDecoder::new(FixtureSource::new(dir.path()));

    assert!(matches!(
        decoder.decode_input_by_id("missing"),
        Err(TxDecodeError::TransactionNotFound(_))
    ));
    assert!(matches!(
        decoder.decode_input_by_id("absent"),
        Err(TxDecodeError::TransactionNotFound(_))
    ));
    assert!(matches!(
        decoder.decode_result_by_id("../ok"),
        Err(TxDecodeError::Source(_))
    ));
}

#[test]
fn test_render_input_as_json() {
    let dir = fixtures();
    let decoder = TxDecoder::new(FixtureSource::new(dir.path()));
    let decoded = decoder.decode_input_by_id("ok").unwrap();

    let mut buf = Vec::new();
    export::write(&mut buf, OutputFormat::Json, &decoded).unwrap();
    let json: Value = serde_json::from_slice(&buf).unwrap();

    assert_eq!(json["methodName"], "transfer");
    assert_eq!(json["inputTypes"], json!(["address", "uint256"]));
    assert_eq!(json["decodedInput"]["_length"], 2);
    assert_eq!(json["decodedInput"]["1"], "250");
}
