//! Decoded ABI values

use std::fmt;

use alloy_primitives::{Address, I256, U256};
use serde::{Serialize, Serializer};

/// A value decoded from ABI-encoded data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer with its declared bit size
    Uint(U256, usize),
    /// Signed integer with its declared bit size
    Int(I256, usize),
    /// Boolean
    Bool(bool),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// External function reference
    Function {
        /// Contract address
        address: Address,
        /// Function selector
        selector: [u8; 4],
    },
    /// Dynamic array
    Array(Vec<DecodedValue>),
    /// Fixed-size array
    FixedArray(Vec<DecodedValue>),
    /// Tuple (struct)
    Tuple(Vec<DecodedValue>),
}

impl DecodedValue {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            DecodedValue::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(value, _) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            DecodedValue::Int(value, _) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Contents of `bytes` or `bytesN` values
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(bytes) | DecodedValue::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Members of arrays, fixed arrays and tuples
    pub fn as_slice(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(values)
            | DecodedValue::FixedArray(values)
            | DecodedValue::Tuple(values) => Some(values),
            _ => None,
        }
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    values: &[DecodedValue],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str(close)
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Address(addr) => write!(f, "{}", addr),
            DecodedValue::Uint(value, _) => write!(f, "{}", value),
            DecodedValue::Int(value, _) => write!(f, "{}", value),
            DecodedValue::Bool(value) => write!(f, "{}", value),
            DecodedValue::FixedBytes(bytes) | DecodedValue::Bytes(bytes) => {
                write!(f, "0x{}", hex::encode(bytes))
            }
            DecodedValue::String(value) => write!(f, "{:?}", value),
            DecodedValue::Function { address, selector } => {
                write!(f, "0x{}{}", hex::encode(address), hex::encode(selector))
            }
            DecodedValue::Array(values) | DecodedValue::FixedArray(values) => {
                write_list(f, "[", values, "]")
            }
            DecodedValue::Tuple(values) => write_list(f, "(", values, ")"),
        }
    }
}

/// JSON form: integers as decimal strings, bytes as 0x-prefixed hex,
/// sequences and tuples as arrays
impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Address(addr) => serializer.collect_str(addr),
            DecodedValue::Uint(value, _) => serializer.collect_str(value),
            DecodedValue::Int(value, _) => serializer.collect_str(value),
            DecodedValue::Bool(value) => serializer.serialize_bool(*value),
            DecodedValue::String(value) => serializer.serialize_str(value),
            DecodedValue::FixedBytes(_) | DecodedValue::Bytes(_) | DecodedValue::Function { .. } => {
                serializer.collect_str(self)
            }
            DecodedValue::Array(values)
            | DecodedValue::FixedArray(values)
            | DecodedValue::Tuple(values) => serializer.collect_seq(values),
        }
    }
}
