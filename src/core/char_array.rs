// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Character arrays.
//!
//! The decoded string is the only stored state. Raw code units are derived
//! from it whenever they are needed, and every mutation re-encodes through
//! [`CharArray::set_text`], so the two views cannot drift apart.

use crate::core::dims::checked_flatten;
use crate::core::error::{CodecError, Result};

/// Code unit width the array was stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharEncoding {
    /// 8-bit units decoded as UTF-8
    Utf8,
    /// 16-bit units decoded as UTF-16
    #[default]
    Utf16,
}

/// MATLAB `char` array.
#[derive(Debug, Clone)]
pub struct CharArray {
    dims: Vec<usize>,
    text: String,
    encoding: CharEncoding,
}

impl CharArray {
    /// Row vector holding `text`, one column per UTF-16 code unit.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let units = text.encode_utf16().count();
        Self {
            dims: vec![1, units],
            text,
            encoding: CharEncoding::Utf16,
        }
    }

    /// Character array with explicit dimensions.
    ///
    /// The text is taken in column-major order.
    pub fn with_dims(text: impl Into<String>, dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
            text: text.into(),
            encoding: CharEncoding::Utf16,
        }
    }

    /// Decode 8-bit storage.
    pub fn from_utf8_bytes(bytes: &[u8], dims: &[usize]) -> Self {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "char data is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(bytes).into_owned()
            }
        };
        Self {
            dims: dims.to_vec(),
            text,
            encoding: CharEncoding::Utf8,
        }
    }

    /// Decode 16-bit storage.
    pub fn from_utf16_units(units: &[u16], dims: &[usize]) -> Self {
        let text = match String::from_utf16(units) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "char data is not valid UTF-16, decoding lossily");
                String::from_utf16_lossy(units)
            }
        };
        Self {
            dims: dims.to_vec(),
            text,
            encoding: CharEncoding::Utf16,
        }
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Decoded text in column-major order.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Storage width as decoded.
    #[must_use]
    pub fn encoding(&self) -> CharEncoding {
        self.encoding
    }

    /// UTF-16 code units of the text, as written to disk.
    #[must_use]
    pub fn code_units(&self) -> Vec<u16> {
        self.text.encode_utf16().collect()
    }

    /// Replace the text.
    ///
    /// Dimensions are kept when the code unit count is unchanged, otherwise
    /// the array becomes a row vector.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let units = text.encode_utf16().count();
        if units != self.text.encode_utf16().count() {
            self.dims = vec![1, units];
        }
        self.text = text;
        self.encoding = CharEncoding::Utf16;
    }

    /// Replace one UTF-16 code unit at a multi-index.
    pub fn set_code_unit(&mut self, index: &[usize], unit: u16) -> Result<()> {
        let offset = checked_flatten(&self.dims, index)?;
        let mut units = self.code_units();
        let slot = units
            .get_mut(offset)
            .ok_or_else(|| CodecError::index_out_of_bounds(index, &self.dims))?;
        *slot = unit;
        let dims = self.dims.clone();
        self.set_text(String::from_utf16_lossy(&units));
        self.dims = dims;
        Ok(())
    }

    /// Code units as numbers, in the stored width.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self.encoding {
            CharEncoding::Utf8 => self.text.bytes().map(f64::from).collect(),
            CharEncoding::Utf16 => self.text.encode_utf16().map(f64::from).collect(),
        }
    }
}

impl PartialEq for CharArray {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.text == other.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_vector() {
        let chars = CharArray::new("abc");
        assert_eq!(chars.dims(), &[1, 3]);
        assert_eq!(chars.as_str(), "abc");
        assert_eq!(chars.code_units(), vec![97, 98, 99]);
    }

    #[test]
    fn test_astral_code_points_take_two_units() {
        let chars = CharArray::new("🍆");
        assert_eq!(chars.dims(), &[1, 2]);
        assert_eq!(chars.code_units().len(), 2);
    }

    #[test]
    fn test_set_code_unit_keeps_views_in_sync() {
        let mut chars = CharArray::new("abc");
        chars.set_code_unit(&[0, 1], u16::from(b'X')).unwrap();
        assert_eq!(chars.as_str(), "aXc");
        assert_eq!(chars.code_units(), vec![97, 88, 99]);
        assert_eq!(chars.dims(), &[1, 3]);
        assert!(chars.set_code_unit(&[0, 3], 0).is_err());
    }

    #[test]
    fn test_set_text_resizes() {
        let mut chars = CharArray::new("ab");
        chars.set_text("hello");
        assert_eq!(chars.dims(), &[1, 5]);
    }

    #[test]
    fn test_utf8_storage() {
        let chars = CharArray::from_utf8_bytes("héllo".as_bytes(), &[1, 5]);
        assert_eq!(chars.as_str(), "héllo");
        assert_eq!(chars.encoding(), CharEncoding::Utf8);
        assert_eq!(chars.to_f64_vec().len(), 6);
    }

    #[test]
    fn test_equality_ignores_storage_width() {
        let a = CharArray::from_utf8_bytes(b"abc", &[1, 3]);
        let b = CharArray::new("abc");
        assert_eq!(a, b);
    }
}
