//! Function resolution - match call data against an interface by selector

use tracing::{debug, warn};

use super::canonical::{canonical_types, canonicalize_signature};
use super::selector::{selector, selector_hex};
use crate::domain::abi::{AbiError, FunctionDescriptor, Interface};

/// The function a piece of call data invokes
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Matched interface entry
    pub function: &'a FunctionDescriptor,
    /// Selector taken from the call data
    pub selector: [u8; 4],
    /// Canonical signature of the matched entry
    pub signature: String,
    /// Canonical input types, in declaration order
    pub input_types: Vec<String>,
    /// Encoded arguments (call data after the selector)
    pub args: &'a [u8],
}

/// Find the function invoked by `call_data`.
///
/// Every `function` entry is checked; when several share the selector the
/// one declared last wins and a warning is logged.
pub fn resolve<'a>(call_data: &'a [u8], interface: &'a Interface) -> Result<Resolution<'a>, AbiError> {
    let Some((head, args)) = call_data.split_first_chunk::<4>() else {
        return Err(AbiError::TruncatedInput(call_data.len()));
    };
    let wanted = *head;

    let mut matched: Option<(&FunctionDescriptor, String)> = None;
    for function in interface.functions() {
        let signature = canonicalize_signature(&function.name, &function.inputs)?;
        if selector(&signature) != wanted {
            continue;
        }
        if let Some((_, shadowed)) = &matched {
            warn!(
                selector = %selector_hex(wanted),
                shadowed = %shadowed,
                winner = %signature,
                "duplicate selector in interface, later entry wins"
            );
        }
        matched = Some((function, signature));
    }

    let (function, signature) = matched.ok_or(AbiError::MethodNotFound(wanted))?;
    debug!(selector = %selector_hex(wanted), %signature, "resolved call data");

    Ok(Resolution {
        function,
        selector: wanted,
        signature,
        input_types: canonical_types(&function.inputs)?,
        args,
    })
}

/// A selector claimed by more than one function of an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorCollision {
    pub selector: [u8; 4],
    /// Signatures sharing the selector, in declaration order
    pub signatures: Vec<String>,
}

/// Report selectors shared by several `function` entries
pub fn find_collisions(interface: &Interface) -> Result<Vec<SelectorCollision>, AbiError> {
    let mut seen: Vec<SelectorCollision> = Vec::new();
    for function in interface.functions() {
        let signature = canonicalize_signature(&function.name, &function.inputs)?;
        let sel = selector(&signature);
        match seen.iter_mut().find(|entry| entry.selector == sel) {
            Some(entry) => entry.signatures.push(signature),
            None => seen.push(SelectorCollision {
                selector: sel,
                signatures: vec![signature],
            }),
        }
    }
    seen.retain(|entry| entry.signatures.len() > 1);
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{FunctionKind, ParamSpec};

    fn transfer() -> FunctionDescriptor {
        FunctionDescriptor::function(
            "transfer",
            vec![
                ParamSpec::new("to", "address"),
                ParamSpec::new("amount", "uint256"),
            ],
            vec![ParamSpec::new("", "bool")],
        )
    }

    fn approve() -> FunctionDescriptor {
        FunctionDescriptor::function(
            "approve",
            vec![
                ParamSpec::new("spender", "address"),
                ParamSpec::new("amount", "uint256"),
            ],
            vec![ParamSpec::new("", "bool")],
        )
    }

    #[test]
    fn test_resolve_transfer() {
        let interface = Interface::new(vec![approve(), transfer()]);
        let mut call_data = vec![0xa9, 0x05, 0x9c, 0xbb];
        call_data.extend([0u8; 64]);

        let resolution = resolve(&call_data, &interface).unwrap();
        assert_eq!(resolution.function.name, "transfer");
        assert_eq!(resolution.signature, "transfer(address,uint256)");
        assert_eq!(resolution.input_types, vec!["address", "uint256"]);
        assert_eq!(resolution.args.len(), 64);
    }

    #[test]
    fn test_truncated_input() {
        let interface = Interface::new(vec![transfer()]);
        assert_eq!(
            resolve(&[0xa9, 0x05, 0x9c], &interface).unwrap_err(),
            AbiError::TruncatedInput(3)
        );
    }

    #[test]
    fn test_method_not_found() {
        let interface = Interface::new(vec![transfer()]);
        assert_eq!(
            resolve(&[0xde, 0xad, 0xbe, 0xef], &interface).unwrap_err(),
            AbiError::MethodNotFound([0xde, 0xad, 0xbe, 0xef])
        );
    }

    #[test]
    fn test_non_function_entries_are_ignored() {
        let mut event = transfer();
        event.kind = FunctionKind::Event;
        let interface = Interface::new(vec![event]);

        assert!(matches!(
            resolve(&[0xa9, 0x05, 0x9c, 0xbb], &interface),
            Err(AbiError::MethodNotFound(_))
        ));
    }

    #[test]
    fn test_last_match_wins() {
        let mut first = transfer();
        first.outputs = vec![];
        let second = transfer();
        let interface = Interface::new(vec![first, approve(), second]);

        let resolution = resolve(&[0xa9, 0x05, 0x9c, 0xbb], &interface).unwrap();
        assert!(std::ptr::eq(resolution.function, &interface.entries()[2]));
        assert_eq!(resolution.function.outputs.len(), 1);
    }

    #[test]
    fn test_find_collisions() {
        let interface = Interface::new(vec![transfer(), approve(), transfer()]);
        let collisions = find_collisions(&interface).unwrap();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].selector, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(collisions[0].signatures.len(), 2);

        let clean = Interface::new(vec![transfer(), approve()]);
        assert!(find_collisions(&clean).unwrap().is_empty());
    }
}
