//! Node-format transaction data
//!
//! Deserialization of the node's transaction, transaction-info and
//! contract responses, and a [`FixtureSource`] that serves them from disk.

mod fixture;
pub mod types;

pub use fixture::FixtureSource;
