//! Interface file loading and directory scanning

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::canonical::canonicalize_signature;
use super::selector::selector;
use crate::domain::abi::{IndexedFunction, Interface, SelectorIndex};

/// Largest file the scanner will parse
const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Extract an interface from the JSON shapes contracts are published in.
///
/// Accepts a bare entry array, `{"abi": [...]}`, the node contract shape
/// `{"abi": {"entrys": [...]}}` and `{"entrys": [...]}`. Returns `None`
/// for JSON that carries no interface.
pub fn interface_from_json(value: Value) -> Result<Option<Interface>> {
    let entries = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("abi") {
            Some(Value::Object(mut abi)) => match abi.remove("entrys") {
                Some(entries) => entries,
                None => return Ok(None),
            },
            Some(abi) => abi,
            None => match map.remove("entrys") {
                Some(entries) => entries,
                None => return Ok(None),
            },
        },
        _ => return Ok(None),
    };

    if entries.is_null() {
        return Ok(Some(Interface::default()));
    }

    let interface: Interface =
        serde_json::from_value(entries).context("invalid interface entries")?;
    Ok(Some(interface))
}

/// Load an interface from a JSON file
pub fn load_interface(path: &Path) -> Result<Interface> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))?;
    interface_from_json(value)?
        .with_context(|| format!("{} does not contain an interface", path.display()))
}

/// Interface file scanner
pub struct AbiScanner;

impl AbiScanner {
    /// Scan a single root directory for interface files
    pub fn scan(root: impl AsRef<Path>) -> SelectorIndex {
        let started = Instant::now();
        let root = root.as_ref();
        let mut index = SelectorIndex::new();
        let mut scanned_files = 0;
        let mut errors = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > MAX_FILE_BYTES {
                debug!(path = %path.display(), "skipping oversized file");
                continue;
            }

            scanned_files += 1;

            if let Err(err) = Self::index_file(path, &mut index) {
                errors.push(format!("{}: {:#}", path.display(), err));
            }
        }

        index.scanned_files = scanned_files;
        index.errors = errors;
        index.scan_ms = started.elapsed().as_millis();

        debug!(
            root = %root.display(),
            files = index.scanned_files,
            selectors = index.len(),
            errors = index.errors.len(),
            "scan finished"
        );
        index
    }

    /// Scan multiple root directories; later roots register after earlier ones
    pub fn scan_roots(roots: &[PathBuf]) -> SelectorIndex {
        let started = Instant::now();
        let mut index = SelectorIndex::new();

        for root in roots {
            index.merge(Self::scan(root));
        }

        index.scan_ms = started.elapsed().as_millis();
        index
    }

    /// Add every function of one file to the index
    fn index_file(path: &Path, index: &mut SelectorIndex) -> Result<()> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;

        let Some(interface) = interface_from_json(value)? else {
            return Ok(()); // Not an interface file, skip silently
        };

        for function in interface.functions() {
            let signature = match canonicalize_signature(&function.name, &function.inputs) {
                Ok(signature) => signature,
                Err(err) => {
                    warn!(path = %path.display(), function = %function.name, %err, "skipping function");
                    continue;
                }
            };

            index.insert(IndexedFunction {
                selector: selector(&signature),
                name: function.name.clone(),
                signature,
                inputs: function.inputs.clone(),
                source: path.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "build"
                )
            })
            .unwrap_or(false)
    }
}
