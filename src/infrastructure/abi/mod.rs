//! ABI engine - canonical signatures, selectors, resolution and decoding

pub mod canonical;
pub mod decoder;
pub mod resolver;
pub mod scanner;
pub mod selector;

pub use canonical::{canonicalize, canonicalize_signature, normalize_signature, parse_signature, parse_type};
pub use decoder::{decode, decode_named, decode_types, reported_name};
pub use resolver::{find_collisions, resolve, Resolution, SelectorCollision};
pub use scanner::{interface_from_json, load_interface, AbiScanner};
pub use selector::{function_selector, selector, selector_hex};
