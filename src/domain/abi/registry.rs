//! Selector index - functions from scanned interfaces keyed by selector

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use super::ParamSpec;

/// A function signature with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct IndexedFunction {
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Function name
    pub name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Input parameters
    pub inputs: Vec<ParamSpec>,
    /// File the interface was loaded from
    pub source: PathBuf,
}

impl IndexedFunction {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// Functions indexed by selector
///
/// Every registration is kept so collisions stay visible; lookups return
/// the most recently registered entry, the same tie-break the resolver
/// applies within a single interface.
#[derive(Debug, Default, Clone)]
pub struct SelectorIndex {
    /// Functions per selector, in registration order
    functions: HashMap<[u8; 4], Vec<IndexedFunction>>,
    /// Number of files scanned
    pub scanned_files: usize,
    /// Scan errors
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl SelectorIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function
    pub fn insert(&mut self, function: IndexedFunction) {
        self.functions
            .entry(function.selector)
            .or_default()
            .push(function);
    }

    /// Look up a function by selector (last registration wins)
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&IndexedFunction> {
        self.functions.get(&selector).and_then(|entries| entries.last())
    }

    /// All functions registered for a selector
    pub fn lookup_all(&self, selector: [u8; 4]) -> &[IndexedFunction] {
        self.functions
            .get(&selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a function by selector hex string (e.g., "0xa9059cbb")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&IndexedFunction> {
        self.lookup(parse_selector_hex(selector_hex)?)
    }

    /// Selectors registered by more than one distinct signature
    pub fn collisions(&self) -> Vec<(&[u8; 4], &[IndexedFunction])> {
        let mut collisions: Vec<_> = self
            .functions
            .iter()
            .filter(|(_, entries)| {
                entries
                    .iter()
                    .any(|entry| entry.signature != entries[0].signature)
            })
            .map(|(selector, entries)| (selector, entries.as_slice()))
            .collect();
        collisions.sort_by_key(|(selector, _)| **selector);
        collisions
    }

    /// Number of distinct selectors
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Merge another index into this one; its entries register after ours
    pub fn merge(&mut self, other: Self) {
        self.scanned_files = self.scanned_files.saturating_add(other.scanned_files);
        self.errors.extend(other.errors);
        let mut incoming: Vec<_> = other.functions.into_iter().collect();
        incoming.sort_by_key(|(selector, _)| *selector);
        for (selector, entries) in incoming {
            self.functions.entry(selector).or_default().extend(entries);
        }
    }

    /// All functions, one per registration
    pub fn functions(&self) -> impl Iterator<Item = &IndexedFunction> {
        self.functions.values().flatten()
    }
}

/// Parse "0xa9059cbb" / "a9059cbb" into selector bytes
pub fn parse_selector_hex(selector_hex: &str) -> Option<[u8; 4]> {
    let trimmed = selector_hex.trim();
    let normalized = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if normalized.len() != 8 {
        return None;
    }

    let bytes = hex::decode(normalized).ok()?;
    bytes.try_into().ok()
}
