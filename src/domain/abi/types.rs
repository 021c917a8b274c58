//! Interface data model
//!
//! `ParamSpec`, `FunctionDescriptor` and `Interface` mirror the JSON a
//! contract publishes. `ParamType` is the resolved, closed type tree the
//! decoder walks; tuples carry their members instead of relying on any
//! naming convention.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::AbiError;

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Type tag (e.g., "address", "uint256[]", "tuple[]")
    #[serde(rename = "type")]
    pub kind: String,
    /// Tuple members, only present for tuple and tuple-array types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ParamSpec>>,
}

impl ParamSpec {
    /// Create a parameter of an elementary or array type
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            components: None,
        }
    }

    /// Create a tuple (or tuple array) parameter
    pub fn tuple(
        name: impl Into<String>,
        kind: impl Into<String>,
        components: Vec<ParamSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            components: Some(components),
        }
    }

    /// Whether the base of this type tag is `tuple`
    pub fn is_tuple(&self) -> bool {
        base_type(&self.kind) == "tuple"
    }
}

/// Kind of an interface entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    #[default]
    Function,
    Constructor,
    Event,
    Fallback,
    Receive,
    Error,
}

impl FunctionKind {
    /// Parse an entry kind, ignoring case ("Function" and "function" both match)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "function" => Some(Self::Function),
            "constructor" => Some(Self::Constructor),
            "event" => Some(Self::Event),
            "fallback" => Some(Self::Fallback),
            "receive" => Some(Self::Receive),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FunctionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        FunctionKind::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown entry type `{}`", value)))
    }
}

/// A single interface entry (function, constructor, event, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Entry name (empty for constructors and fallbacks)
    #[serde(default)]
    pub name: String,
    /// Input parameters, in declaration order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inputs: Vec<ParamSpec>,
    /// Output parameters, in declaration order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub outputs: Vec<ParamSpec>,
    /// Entry kind; absent means `function`
    #[serde(rename = "type", default)]
    pub kind: FunctionKind,
}

impl FunctionDescriptor {
    /// Create a `function` entry
    pub fn function(name: impl Into<String>, inputs: Vec<ParamSpec>, outputs: Vec<ParamSpec>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
            kind: FunctionKind::Function,
        }
    }

    /// Whether this entry takes part in selector resolution
    pub fn is_function(&self) -> bool {
        self.kind == FunctionKind::Function
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ParamSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ParamSpec>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A contract interface: entries in published order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interface {
    entries: Vec<FunctionDescriptor>,
}

impl Interface {
    /// Create an interface from entries, preserving their order
    pub fn new(entries: Vec<FunctionDescriptor>) -> Self {
        Self { entries }
    }

    /// All entries in published order
    pub fn entries(&self) -> &[FunctionDescriptor] {
        &self.entries
    }

    /// Entries of kind `function`, in published order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.entries.iter().filter(|entry| entry.is_function())
    }

    /// First function with the given name
    pub fn function_by_name(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions().find(|function| function.name == name)
    }

    /// Number of entries of any kind
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the interface has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<FunctionDescriptor> for Interface {
    fn from_iter<I: IntoIterator<Item = FunctionDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Resolved parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte address
    Address,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Dynamic bytes
    Bytes,
    /// External function reference (address + selector)
    Function,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Resolve a parameter spec into a type tree
    pub fn from_spec(spec: &ParamSpec) -> Result<Self, AbiError> {
        let (base, dims) = split_array_suffix(&spec.kind)?;

        let mut ty = if base == "tuple" {
            let components = spec
                .components
                .as_ref()
                .ok_or_else(|| AbiError::malformed(&spec.kind, "tuple without components"))?;
            ParamType::Tuple(
                components
                    .iter()
                    .map(ParamType::from_spec)
                    .collect::<Result<Vec<_>, _>>()?,
            )
        } else {
            ParamType::elementary(base)
                .ok_or_else(|| AbiError::UnsupportedType(spec.kind.clone()))?
        };

        for dim in dims {
            ty = match dim {
                None => ParamType::Array(Box::new(ty)),
                Some(size) => ParamType::FixedArray(Box::new(ty), size),
            };
        }

        Ok(ty)
    }

    /// Resolve a list of parameter specs
    pub fn from_specs(specs: &[ParamSpec]) -> Result<Vec<Self>, AbiError> {
        specs.iter().map(ParamType::from_spec).collect()
    }

    /// Parse an elementary (non-array, non-tuple) type name
    pub fn elementary(name: &str) -> Option<Self> {
        match name {
            "address" => return Some(ParamType::Address),
            "bool" => return Some(ParamType::Bool),
            "string" => return Some(ParamType::String),
            "bytes" => return Some(ParamType::Bytes),
            "function" => return Some(ParamType::Function),
            "uint" => return Some(ParamType::Uint(256)),
            "int" => return Some(ParamType::Int(256)),
            _ => {}
        }

        if let Some(rest) = name.strip_prefix("uint") {
            return parse_size(rest)
                .filter(|bits| bits % 8 == 0 && (8..=256).contains(bits))
                .map(ParamType::Uint);
        }
        if let Some(rest) = name.strip_prefix("int") {
            return parse_size(rest)
                .filter(|bits| bits % 8 == 0 && (8..=256).contains(bits))
                .map(ParamType::Int);
        }
        if let Some(rest) = name.strip_prefix("bytes") {
            return parse_size(rest)
                .filter(|size| (1..=32).contains(size))
                .map(ParamType::FixedBytes);
        }

        None
    }

    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head of its enclosing region
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            ParamType::FixedArray(inner, size) => inner.head_size().saturating_mul(*size),
            ParamType::Tuple(types) => types
                .iter()
                .fold(0usize, |acc, ty| acc.saturating_add(ty.head_size())),
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::String => f.write_str("string"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::Function => f.write_str("function"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(types) => {
                f.write_str("(")?;
                for (idx, ty) in types.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Deepest array nesting accepted in a type tag
pub(crate) const MAX_ARRAY_DEPTH: usize = 64;

/// Strip the array suffixes from a type tag.
///
/// Returns the base type and the dimensions innermost-first, so
/// `uint8[2][]` yields `("uint8", [Some(2), None])`.
pub(crate) fn split_array_suffix(kind: &str) -> Result<(&str, Vec<Option<usize>>), AbiError> {
    let mut rest = kind.trim();
    let mut dims = Vec::new();

    while let Some(head) = rest.strip_suffix(']') {
        if dims.len() == MAX_ARRAY_DEPTH {
            return Err(AbiError::malformed(kind, "array nesting too deep"));
        }
        let open = head
            .rfind('[')
            .ok_or_else(|| AbiError::malformed(kind, "unbalanced array suffix"))?;
        let size = &head[open + 1..];
        if size.is_empty() {
            dims.push(None);
        } else {
            let size = parse_size(size).ok_or_else(|| AbiError::UnsupportedType(kind.to_string()))?;
            dims.push(Some(size));
        }
        rest = &head[..open];
    }

    if rest.contains('[') || rest.contains(']') {
        return Err(AbiError::malformed(kind, "unbalanced array suffix"));
    }

    dims.reverse();
    Ok((rest, dims))
}

/// Base type of a tag with its array suffixes removed
pub(crate) fn base_type(kind: &str) -> &str {
    let trimmed = kind.trim();
    trimmed.find('[').map_or(trimmed, |idx| &trimmed[..idx])
}

fn parse_size(digits: &str) -> Option<usize> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
