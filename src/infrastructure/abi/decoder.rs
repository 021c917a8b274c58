//! ABI argument decoder
//!
//! Head/tail decoding over 32-byte words. Every parameter list (top-level
//! arguments, tuple members, array elements) is an encoded region: static
//! members sit inline in the head, dynamic members hold an offset relative
//! to the start of that region. Reads are bounds-checked before slicing.

use alloy_primitives::{Address, I256, U256};

use super::canonical::canonicalize;
use crate::domain::abi::{AbiError, DecodedArg, DecodedArgs, DecodedValue, ParamSpec, ParamType};

const WORD: usize = 32;

/// Decode `data` according to the parameter specs, in declaration order
pub fn decode(data: &[u8], params: &[ParamSpec]) -> Result<Vec<DecodedValue>, AbiError> {
    let types = ParamType::from_specs(params)?;
    decode_types(data, &types)
}

/// Decode `data` according to already-resolved types
pub fn decode_types(data: &[u8], types: &[ParamType]) -> Result<Vec<DecodedValue>, AbiError> {
    Reader { data }.sequence(0, types.iter(), types.len())
}

/// Name a decoded value is reported under: the declared name, except
/// that `tuple[]` parameters are always reported unnamed
pub fn reported_name(param: &ParamSpec) -> String {
    if param.kind.trim() == "tuple[]" {
        return String::new();
    }
    param.name.clone()
}

/// Decode `data` and pair each value with its reported name and canonical type
pub fn decode_named(data: &[u8], params: &[ParamSpec]) -> Result<DecodedArgs, AbiError> {
    let values = decode(data, params)?;
    let args = params
        .iter()
        .zip(values)
        .map(|(param, value)| {
            Ok(DecodedArg {
                name: reported_name(param),
                kind: canonicalize(param)?,
                value,
            })
        })
        .collect::<Result<Vec<_>, AbiError>>()?;
    Ok(DecodedArgs::new(args))
}

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn too_short(&self, offset: usize, len: usize) -> AbiError {
        AbiError::BufferTooShort {
            offset,
            len,
            available: self.data.len(),
        }
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], AbiError> {
        offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .map(|end| &self.data[offset..end])
            .ok_or_else(|| self.too_short(offset, len))
    }

    fn word(&self, offset: usize) -> Result<&'a [u8], AbiError> {
        self.slice(offset, WORD)
    }

    /// Read an offset or length word. Values that do not fit a `usize`
    /// saturate, so the bounds check that follows reports them.
    fn read_usize(&self, offset: usize) -> Result<usize, AbiError> {
        let word = self.word(offset)?;
        let (high, low) = word.split_at(WORD - 8);
        if high.iter().any(|b| *b != 0) {
            return Ok(usize::MAX);
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(low);
        Ok(usize::try_from(u64::from_be_bytes(buf)).unwrap_or(usize::MAX))
    }

    /// Decode a region starting at `base` holding `count` members
    fn sequence<'t>(
        &self,
        base: usize,
        types: impl Iterator<Item = &'t ParamType>,
        count: usize,
    ) -> Result<Vec<DecodedValue>, AbiError> {
        let mut values = Vec::with_capacity(count);
        let mut head = base;

        for ty in types {
            let value = if ty.is_dynamic() {
                let offset = self.read_usize(head)?;
                let tail = base
                    .checked_add(offset)
                    .ok_or_else(|| self.too_short(offset, WORD))?;
                self.value(tail, ty)?
            } else {
                self.value(head, ty)?
            };
            values.push(value);
            head = head.saturating_add(ty.head_size());
        }

        Ok(values)
    }

    /// Decode `len` elements of `inner` from the region at `base`
    fn repeated(&self, base: usize, inner: &ParamType, len: usize) -> Result<Vec<DecodedValue>, AbiError> {
        // Reject impossible lengths before allocating for them
        let needed = len.saturating_mul(inner.head_size().max(1));
        if needed > self.data.len().saturating_sub(base) {
            return Err(self.too_short(base, needed));
        }
        self.sequence(base, std::iter::repeat(inner).take(len), len)
    }

    /// Length-prefixed byte content at `at`
    fn dynamic_bytes(&self, at: usize) -> Result<&'a [u8], AbiError> {
        let len = self.read_usize(at)?;
        let start = at.checked_add(WORD).ok_or_else(|| self.too_short(at, WORD))?;
        self.slice(start, len)
    }

    fn value(&self, at: usize, ty: &ParamType) -> Result<DecodedValue, AbiError> {
        match ty {
            ParamType::Address => {
                let word = self.word(at)?;
                Ok(DecodedValue::Address(Address::from_slice(&word[12..])))
            }
            ParamType::Uint(bits) => {
                let word = self.word(at)?;
                Ok(DecodedValue::Uint(U256::from_be_slice(word), *bits))
            }
            ParamType::Int(bits) => {
                let word = self.word(at)?;
                Ok(DecodedValue::Int(I256::from_raw(U256::from_be_slice(word)), *bits))
            }
            ParamType::Bool => {
                let word = self.word(at)?;
                Ok(DecodedValue::Bool(word.iter().any(|b| *b != 0)))
            }
            ParamType::FixedBytes(size) => {
                let word = self.word(at)?;
                Ok(DecodedValue::FixedBytes(word[..*size].to_vec()))
            }
            ParamType::Function => {
                let word = self.word(at)?;
                let mut selector = [0u8; 4];
                selector.copy_from_slice(&word[20..24]);
                Ok(DecodedValue::Function {
                    address: Address::from_slice(&word[..20]),
                    selector,
                })
            }
            ParamType::Bytes => Ok(DecodedValue::Bytes(self.dynamic_bytes(at)?.to_vec())),
            ParamType::String => {
                let content = self.dynamic_bytes(at)?;
                let value = std::str::from_utf8(content)
                    .map_err(|_| AbiError::InvalidUtf8 { offset: at + WORD })?;
                Ok(DecodedValue::String(value.to_string()))
            }
            ParamType::Array(inner) => {
                let len = self.read_usize(at)?;
                let base = at.checked_add(WORD).ok_or_else(|| self.too_short(at, WORD))?;
                Ok(DecodedValue::Array(self.repeated(base, inner, len)?))
            }
            ParamType::FixedArray(inner, size) => {
                Ok(DecodedValue::FixedArray(self.repeated(at, inner, *size)?))
            }
            ParamType::Tuple(types) => Ok(DecodedValue::Tuple(self.sequence(
                at,
                types.iter(),
                types.len(),
            )?)),
        }
    }
}
