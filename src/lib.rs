//! Contract call resolution and ABI decoding
//!
//! Resolves which function of a contract interface a piece of call data
//! invokes and decodes its arguments and return data into typed values.

pub mod app;
pub mod config;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod logging;

pub use app::{decode_input, decode_output, TxDecoder};
pub use domain::abi::{
    AbiError, DecodedArg, DecodedArgs, DecodedValue, FunctionDescriptor, FunctionKind, Interface,
    ParamSpec, ParamType,
};
pub use domain::tx::{
    DecodedInput, DecodedOutput, OutputPayload, ReturnData, RevertInfo, TransactionRecord,
    TxDecodeError, TxSource,
};
