//! ABI resolution and decoding errors

use thiserror::Error;

/// Errors produced by the signature, resolution and decoding engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// The interface describes an incomplete or inconsistent type shape
    #[error("malformed type `{kind}`: {reason}")]
    MalformedType {
        /// The offending type tag
        kind: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Call data is shorter than the 4-byte selector
    #[error("call data too short: need 4 selector bytes, got {0}")]
    TruncatedInput(usize),

    /// No function descriptor matches the selector
    #[error("no function in interface matches selector 0x{}", hex::encode(.0))]
    MethodNotFound([u8; 4]),

    /// A head or tail read would go past the end of the buffer
    #[error("buffer too short: reading {len} bytes at offset {offset} exceeds {available} available")]
    BufferTooShort {
        /// Start of the attempted read
        offset: usize,
        /// Number of bytes requested
        len: usize,
        /// Total buffer length
        available: usize,
    },

    /// The type tag is outside the supported vocabulary
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    /// A `string` value does not hold valid UTF-8
    #[error("string value at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Offset of the string content in the buffer
        offset: usize,
    },
}

impl AbiError {
    pub(crate) fn malformed(kind: &str, reason: &'static str) -> Self {
        AbiError::MalformedType {
            kind: kind.to_string(),
            reason,
        }
    }
}
