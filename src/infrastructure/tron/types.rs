//! Node JSON shapes
//!
//! Only the fields the decoder reads are modelled; everything else in the
//! node responses is ignored.

use serde::Deserialize;

/// `gettransactionbyid` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeTransaction {
    #[serde(rename = "txID", default)]
    pub tx_id: Option<String>,
    #[serde(default)]
    pub ret: Vec<NodeRet>,
    #[serde(default)]
    pub raw_data: Option<NodeRawData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeRet {
    #[serde(rename = "contractRet", default)]
    pub contract_ret: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeRawData {
    #[serde(default)]
    pub contract: Vec<NodeContractCall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeContractCall {
    #[serde(default)]
    pub parameter: Option<NodeParameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeParameter {
    #[serde(default)]
    pub value: NodeCallValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeCallValue {
    /// Call data as hex, without `0x`
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl NodeTransaction {
    /// Parameters of the first contract in the transaction
    pub fn call_value(&self) -> Option<&NodeCallValue> {
        self.raw_data
            .as_ref()?
            .contract
            .first()?
            .parameter
            .as_ref()
            .map(|parameter| &parameter.value)
    }

    /// Execution status of the first contract, empty if unreported
    pub fn status(&self) -> String {
        self.ret
            .first()
            .and_then(|ret| ret.contract_ret.clone())
            .unwrap_or_default()
    }
}

/// `gettransactioninfobyid` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeTransactionInfo {
    #[serde(default)]
    pub id: Option<String>,
    /// Encoded results as hex, without `0x`
    #[serde(rename = "contractResult", default)]
    pub contract_result: Vec<String>,
    /// Hex-encoded plain-text message, used when the result is empty
    #[serde(rename = "resMessage", default)]
    pub res_message: Option<String>,
}

impl NodeTransactionInfo {
    /// Raw result string in the convention the decoder expects:
    /// `0x`-prefixed for ABI data, bare hex for a plain-text message
    pub fn raw_result(&self) -> String {
        match self.contract_result.first().map(|r| r.trim()) {
            Some(result) if !result.is_empty() => format!("0x{}", result),
            _ => match &self.res_message {
                Some(message) if !message.trim().is_empty() => message.trim().to_string(),
                _ => "0x".to_string(),
            },
        }
    }
}
