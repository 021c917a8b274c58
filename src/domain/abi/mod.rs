//! ABI domain models
//!
//! This module defines the interface data model, the decoded value tree
//! and the error type shared by the resolution and decoding engine.

mod decoder;
mod error;
mod registry;
mod types;
mod value;

pub use decoder::{DecodedArg, DecodedArgs};
pub use error::AbiError;
pub use registry::{parse_selector_hex, IndexedFunction, SelectorIndex};
pub(crate) use types::{base_type, MAX_ARRAY_DEPTH};
pub use types::{FunctionDescriptor, FunctionKind, Interface, ParamSpec, ParamType};
pub use value::DecodedValue;
