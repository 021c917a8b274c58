//! Domain layer - data models and contracts, independent of any data source

pub mod abi;
pub mod tx;
