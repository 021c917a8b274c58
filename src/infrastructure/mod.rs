//! Infrastructure layer
//!
//! This layer contains:
//! - The ABI engine (canonicalization, selectors, resolution, decoding)
//! - Interface file loading and scanning
//! - A file-backed transaction source over node-shaped JSON

pub mod abi;
pub mod tron;

pub use abi::AbiScanner;
pub use tron::FixtureSource;
