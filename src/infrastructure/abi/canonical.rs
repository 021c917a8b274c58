//! Canonical signatures
//!
//! Turns parameter specs into the whitespace-free type strings that get
//! hashed into selectors, and parses such strings back into specs.

use crate::domain::abi::{base_type, AbiError, ParamSpec, MAX_ARRAY_DEPTH};

/// Canonical type string of a parameter.
///
/// Elementary and elementary-array tags are returned unchanged. Tuples
/// become their parenthesized member list, keeping any array suffix:
/// `tuple[]` with members `uint8, bool` becomes `(uint8,bool)[]`.
pub fn canonicalize(param: &ParamSpec) -> Result<String, AbiError> {
    if !param.is_tuple() {
        return Ok(param.kind.clone());
    }

    let components = param
        .components
        .as_ref()
        .ok_or_else(|| AbiError::malformed(&param.kind, "tuple without components"))?;

    let kind = param.kind.trim();
    let suffix = &kind[base_type(kind).len()..];
    if !is_array_suffix(suffix) {
        return Err(AbiError::malformed(&param.kind, "unbalanced array suffix"));
    }

    Ok(format!("({}){}", canonical_list(components)?, suffix))
}

/// Canonical types of a parameter list, in declaration order
pub fn canonical_types(params: &[ParamSpec]) -> Result<Vec<String>, AbiError> {
    params.iter().map(canonicalize).collect()
}

/// Canonical function signature, e.g. `transfer(address,uint256)`
pub fn canonicalize_signature(name: &str, inputs: &[ParamSpec]) -> Result<String, AbiError> {
    Ok(format!("{}({})", name, canonical_list(inputs)?))
}

fn canonical_list(params: &[ParamSpec]) -> Result<String, AbiError> {
    Ok(canonical_types(params)?.join(","))
}

fn is_array_suffix(suffix: &str) -> bool {
    let mut rest = suffix;
    let mut depth = 0;
    while !rest.is_empty() {
        depth += 1;
        if depth > MAX_ARRAY_DEPTH {
            return false;
        }
        let Some(inner) = rest.strip_prefix('[') else {
            return false;
        };
        let Some(close) = inner.find(']') else {
            return false;
        };
        if !inner[..close].bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        rest = &inner[close + 1..];
    }
    true
}

/// Parse a canonical type string back into an (unnamed) parameter spec.
///
/// `(uint8,(bool,string)[])[2]` becomes a `tuple[2]` spec whose
/// components mirror the parenthesized lists.
pub fn parse_type(ty: &str) -> Result<ParamSpec, AbiError> {
    let ty = ty.trim();

    if ty.starts_with('(') {
        let close = matching_paren(ty)?;
        let suffix = &ty[close + 1..];
        if !is_array_suffix(suffix) {
            return Err(AbiError::malformed(ty, "unexpected text after tuple"));
        }
        let components = split_top_level(&ty[1..close])?
            .into_iter()
            .map(parse_type)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ParamSpec::tuple("", format!("tuple{}", suffix), components));
    }

    if ty.is_empty() || ty.contains(|c: char| matches!(c, '(' | ')' | ',') || c.is_whitespace()) {
        return Err(AbiError::malformed(ty, "not a type"));
    }
    Ok(ParamSpec::new("", ty))
}

/// Parse `name(type1,type2,...)` into the function name and its inputs
pub fn parse_signature(signature: &str) -> Result<(String, Vec<ParamSpec>), AbiError> {
    let signature = signature.trim();
    let open = signature
        .find('(')
        .ok_or_else(|| AbiError::malformed(signature, "missing '('"))?;
    let params = &signature[open..];
    if matching_paren(params)? != params.len() - 1 {
        return Err(AbiError::malformed(signature, "unexpected text after ')'"));
    }

    let inputs = split_top_level(&params[1..params.len() - 1])?
        .into_iter()
        .map(parse_type)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((signature[..open].trim().to_string(), inputs))
}

/// Normalize a human-written signature.
///
/// Drops everything after the parameter list (modifiers, `returns (...)`),
/// parameter names and data-location keywords, so
/// `transfer(address to, uint256 amount) returns (bool)` becomes
/// `transfer(address,uint256)`.
pub fn normalize_signature(signature: &str) -> Result<String, AbiError> {
    let signature = signature.trim();
    let open = signature
        .find('(')
        .ok_or_else(|| AbiError::malformed(signature, "missing '('"))?;
    let close = open + matching_paren(&signature[open..])?;

    let name = signature[..open].trim();
    let name = name.strip_prefix("function ").unwrap_or(name).trim();
    Ok(format!(
        "{}({})",
        name,
        normalize_list(&signature[open + 1..close])?
    ))
}

fn normalize_list(list: &str) -> Result<String, AbiError> {
    let items = split_top_level(list)?
        .into_iter()
        .map(normalize_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items.join(","))
}

fn normalize_item(item: &str) -> Result<String, AbiError> {
    let item = item.trim();
    if item.starts_with('(') {
        let close = matching_paren(item)?;
        let suffix: String = item[close + 1..]
            .chars()
            .take_while(|c| !c.is_whitespace())
            .collect();
        return Ok(format!("({}){}", normalize_list(&item[1..close])?, suffix));
    }
    Ok(item
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string())
}

/// Index of the ')' matching the '(' at the start of `s`
fn matching_paren(s: &str) -> Result<usize, AbiError> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| AbiError::malformed(s, "unbalanced parentheses"))?;
                if depth == 0 {
                    return Ok(idx);
                }
            }
            _ => {}
        }
    }
    Err(AbiError::malformed(s, "unbalanced parentheses"))
}

/// Split a comma-separated list at nesting depth zero
fn split_top_level(list: &str) -> Result<Vec<&str>, AbiError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| AbiError::malformed(list, "unbalanced parentheses"))?;
            }
            ',' if depth == 0 => {
                items.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::malformed(list, "unbalanced parentheses"));
    }
    items.push(&list[start..]);
    Ok(items)
}
