//! Function selector calculation

use alloy_primitives::keccak256;

use super::canonical::canonicalize_signature;
use crate::domain::abi::{AbiError, FunctionDescriptor};

/// Compute the 4-byte selector of a canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector of an interface function, from its canonical signature
pub fn function_selector(function: &FunctionDescriptor) -> Result<[u8; 4], AbiError> {
    Ok(selector(&canonicalize_signature(
        &function.name,
        &function.inputs,
    )?))
}

/// Selector as 0x-prefixed hex
pub fn selector_hex(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::ParamSpec;

    #[test]
    fn test_known_selectors() {
        // transfer(address,uint256) -> 0xa9059cbb
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        // approve(address,uint256) -> 0x095ea7b3
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
        // balanceOf(address) -> 0x70a08231
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        // totalSupply() -> 0x18160ddd
        assert_eq!(selector("totalSupply()"), [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_function_selector() {
        let function = FunctionDescriptor::function(
            "transfer",
            vec![
                ParamSpec::new("to", "address"),
                ParamSpec::new("amount", "uint256"),
            ],
            vec![ParamSpec::new("", "bool")],
        );
        assert_eq!(function_selector(&function).unwrap(), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector_hex([0xa9, 0x05, 0x9c, 0xbb]), "0xa9059cbb");
    }
}
