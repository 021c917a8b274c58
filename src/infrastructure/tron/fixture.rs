//! File-backed transaction source over saved node responses
//!
//! Layout under the fixture root:
//!
//! ```text
//! transactions/<tx id>.json   gettransactionbyid response
//! info/<tx id>.json           gettransactioninfobyid response
//! contracts/<address>.json    getcontract response
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::types::{NodeTransaction, NodeTransactionInfo};
use crate::domain::abi::Interface;
use crate::domain::tx::{ReturnData, TransactionRecord, TxSource};
use crate::infrastructure::abi::interface_from_json;

/// Reads node-format JSON dumps from a directory
#[derive(Debug, Clone)]
pub struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, dir: &str, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            bail!("invalid fixture key `{}`", key);
        }
        Ok(self.root.join(dir).join(format!("{}.json", key)))
    }

    /// Read a JSON file; a missing file or an empty object yields `None`
    fn read_json(&self, dir: &str, key: &str) -> Result<Option<Value>> {
        let path = self.path(dir, key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "fixture missing");
                return Ok(None);
            }
            Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
        };
        let value: Value =
            serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))?;

        match &value {
            Value::Object(map) if map.is_empty() => Ok(None),
            _ => Ok(Some(value)),
        }
    }

    fn read_as<T: DeserializeOwned>(&self, dir: &str, key: &str) -> Result<Option<T>> {
        self.read_json(dir, key)?
            .map(|value| {
                serde_json::from_value(value).with_context(|| format!("decode {}/{}.json", dir, key))
            })
            .transpose()
    }
}

impl TxSource for FixtureSource {
    fn transaction(&self, tx_id: &str) -> Result<Option<TransactionRecord>> {
        let Some(tx) = self.read_as::<NodeTransaction>("transactions", tx_id)? else {
            return Ok(None);
        };

        let value = tx.call_value();
        let data = value.and_then(|v| v.data.as_deref()).unwrap_or_default();
        let data = data.strip_prefix("0x").unwrap_or(data);
        let call_data = hex::decode(data)
            .with_context(|| format!("transaction {} has invalid call data", tx_id))?;

        Ok(Some(TransactionRecord {
            id: tx.tx_id.clone().unwrap_or_else(|| tx_id.to_string()),
            call_data,
            contract_address: value.and_then(|v| v.contract_address.clone()),
            status: tx.status(),
        }))
    }

    fn contract_interface(&self, address: &str) -> Result<Option<Interface>> {
        match self.read_json("contracts", address)? {
            Some(value) => interface_from_json(value),
            None => Ok(None),
        }
    }

    fn return_data(&self, tx_id: &str) -> Result<Option<ReturnData>> {
        let Some(info) = self.read_as::<NodeTransactionInfo>("info", tx_id)? else {
            return Ok(None);
        };
        Ok(Some(ReturnData::from_node_result(&info.raw_result())?))
    }
}
