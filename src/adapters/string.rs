// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `string` objects.
//!
//! Field `any` is a `uint64` array laid out as
//! `[version, ndims, dims..., lengths..., packed UTF-16LE code units]`,
//! one length (in code units) per string, strings in column-major order.

use crate::core::array::Array;
use crate::core::dims::{checked_flatten, element_count};

use super::{object_of_class, AdapterError, Result};

const CLASS: &str = "string";

/// View of a `string` array.
#[derive(Debug, Clone)]
pub struct StringAdapter {
    dims: Vec<usize>,
    strings: Vec<String>,
}

impl StringAdapter {
    /// Build the view; fails if `array` is not a `string` object.
    pub fn new(array: &Array) -> Result<Self> {
        let object = object_of_class(array, CLASS)?;
        let any = object.field("any", &[0])?;
        let words = any
            .as_numeric()
            .and_then(|n| n.as_slice::<u64>())
            .ok_or_else(|| AdapterError::malformed(CLASS, "string data must be uint64"))?;
        let (dims, strings) = parse_words(words)?;
        Ok(Self { dims, strings })
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// String at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<&str> {
        Ok(&self.strings[checked_flatten(&self.dims, index)?])
    }

    /// All strings in column-major order.
    #[must_use]
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}

fn parse_words(words: &[u64]) -> Result<(Vec<usize>, Vec<String>)> {
    let truncated = |what: &str| AdapterError::malformed(CLASS, format!("{what} truncated"));
    let ndims = *words.get(1).ok_or_else(|| truncated("header"))? as usize;
    let dims: Vec<usize> = words
        .get(2..ndims.saturating_add(2))
        .ok_or_else(|| truncated("dimensions"))?
        .iter()
        .map(|&d| d as usize)
        .collect();
    let count = element_count(&dims);
    let start = 2 + ndims;
    let lengths = words
        .get(start..start.saturating_add(count))
        .ok_or_else(|| truncated("lengths"))?;

    let units: Vec<u16> = words[start + count..]
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect::<Vec<u8>>()
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let mut strings = Vec::with_capacity(count);
    let mut offset = 0usize;
    for &length in lengths {
        let end = offset.saturating_add(length as usize);
        let slice = units.get(offset..end).ok_or_else(|| truncated("text"))?;
        strings.push(String::from_utf16_lossy(slice));
        offset = end;
    }
    Ok((dims, strings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures::linked_object;
    use crate::core::numeric::NumericArray;

    fn pack(dims: &[u64], texts: &[&str]) -> Vec<u64> {
        let mut words = vec![1, dims.len() as u64];
        words.extend_from_slice(dims);
        let units: Vec<u16> = texts.iter().flat_map(|t| t.encode_utf16()).collect();
        words.extend(texts.iter().map(|t| t.encode_utf16().count() as u64));
        let mut bytes: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
        bytes.resize(bytes.len().div_ceil(8) * 8, 0);
        words.extend(
            bytes
                .chunks_exact(8)
                .map(|c| u64::from_le_bytes(c.try_into().unwrap())),
        );
        words
    }

    fn string_object(words: Vec<u64>) -> Array {
        let len = words.len();
        let any = NumericArray::from_vec(words, &[1, len]).unwrap();
        linked_object(CLASS, vec![("any", any.into())])
    }

    #[test]
    fn test_strings() {
        let array = string_object(pack(&[2, 1], &["abc", "Привет"]));
        let adapter = StringAdapter::new(&array).unwrap();
        assert_eq!(adapter.dims(), &[2, 1]);
        assert_eq!(adapter.get(&[0]).unwrap(), "abc");
        assert_eq!(adapter.get(&[1, 0]).unwrap(), "Привет");
    }

    #[test]
    fn test_empty_string() {
        let array = string_object(pack(&[1, 1], &[""]));
        let adapter = StringAdapter::new(&array).unwrap();
        assert_eq!(adapter.get(&[0]).unwrap(), "");
    }

    #[test]
    fn test_truncated_text() {
        let mut words = pack(&[1, 1], &["abcdefgh"]);
        words.pop();
        let array = string_object(words);
        assert!(matches!(
            StringAdapter::new(&array),
            Err(AdapterError::Malformed { .. })
        ));
    }
}
