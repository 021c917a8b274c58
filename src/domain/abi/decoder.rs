//! Decoded argument views
//!
//! Values come out of the decoder in declaration order; these types pair
//! them with the declared parameter names and types so callers can look
//! them up by ordinal or by name.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::DecodedValue;

/// A decoded function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedArg {
    /// Declared parameter name (empty if unnamed)
    pub name: String,
    /// Canonical type (e.g., "address", "uint256", "(uint256,address)[]")
    pub kind: String,
    /// Decoded value
    pub value: DecodedValue,
}

/// Decoded arguments in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedArgs {
    args: Vec<DecodedArg>,
}

impl DecodedArgs {
    pub fn new(args: Vec<DecodedArg>) -> Self {
        Self { args }
    }

    /// Argument at a declaration position
    pub fn get(&self, ordinal: usize) -> Option<&DecodedArg> {
        self.args.get(ordinal)
    }

    /// First argument with the given declared name.
    ///
    /// Unnamed arguments can only be reached by ordinal.
    pub fn by_name(&self, name: &str) -> Option<&DecodedArg> {
        if name.is_empty() {
            return None;
        }
        self.args.iter().find(|arg| arg.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedArg> {
        self.args.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.args.iter().map(|arg| arg.name.clone()).collect()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.args.iter().map(|arg| arg.kind.clone()).collect()
    }

    pub fn values(&self) -> Vec<DecodedValue> {
        self.args.iter().map(|arg| arg.value.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl IntoIterator for DecodedArgs {
    type Item = DecodedArg;
    type IntoIter = std::vec::IntoIter<DecodedArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.into_iter()
    }
}

/// Serialized as an ordinal map: `{"_length": n, "0": v0, "1": v1, ...}`
impl Serialize for DecodedArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.args.len() + 1))?;
        map.serialize_entry("_length", &self.args.len())?;
        for (idx, arg) in self.args.iter().enumerate() {
            map.serialize_entry(&idx.to_string(), &arg.value)?;
        }
        map.end()
    }
}
