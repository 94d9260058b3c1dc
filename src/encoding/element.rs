// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tagged data element reader.
//!
//! Every element starts with a tag. A full tag is a type word followed by a
//! length word. When the upper half of the first word is non-zero the tag
//! is a short tag: the low half is the type, the high half the byte length
//! (at most 4), and the payload sits in the following 4 bytes.
//!
//! Elements are padded to 8-byte boundaries, except compressed elements,
//! whose padding lives inside the inflated stream.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::DeflateDecoder;

use crate::core::array::Array;
use crate::core::element::NumericData;
use crate::core::error::{CodecError, Result};
use crate::core::opaque::{SubsystemCell, SubsystemHandle};
use crate::encoding::checksum::adler32;
use crate::encoding::cursor::{decode_values, MatCursor};
use crate::encoding::tags::{DataType, SHORT_PAYLOAD_SIZE};

/// Bytes of zlib framing around a compressed payload (2-byte header, 4-byte checksum).
pub const ZLIB_FRAMING: usize = 6;

/// A decoded data element.
#[derive(Debug, Clone, PartialEq)]
pub enum DataElement {
    /// Raw numeric payload
    Numeric(NumericData),
    /// Matrix (array) element
    Matrix(Box<Matrix>),
}

impl DataElement {
    /// Short description of the element type for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            DataElement::Numeric(data) => data.type_name(),
            DataElement::Matrix(_) => "matrix".to_string(),
        }
    }
}

/// A decoded matrix element.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Array name (empty for nested arrays)
    pub name: String,
    /// Global flag
    pub global: bool,
    /// Decoded value
    pub array: Array,
}

impl Matrix {
    /// The zero-length matrix element.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            global: false,
            array: Array::Empty,
        }
    }
}

/// Type and payload length read from a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Element type
    pub data_type: DataType,
    /// Payload length in bytes
    pub length: usize,
    /// Short tag with inline payload
    pub short: bool,
}

/// Reads data elements, resolving class objects against one subsystem cell.
#[derive(Debug, Clone)]
pub struct ElementReader {
    cell: SubsystemCell,
    weak_links: bool,
}

impl ElementReader {
    /// Reader for a top-level stream; objects keep the cell alive.
    #[must_use]
    pub fn new(cell: &SubsystemCell) -> Self {
        Self {
            cell: cell.clone(),
            weak_links: false,
        }
    }

    /// Reader for the subsystem block itself; objects refer to the cell weakly.
    #[must_use]
    pub fn nested(cell: &SubsystemCell) -> Self {
        Self {
            cell: cell.clone(),
            weak_links: true,
        }
    }

    /// Handle to store in decoded class objects.
    pub(crate) fn handle(&self) -> SubsystemHandle {
        if self.weak_links {
            SubsystemHandle::weak(&self.cell)
        } else {
            SubsystemHandle::strong(&self.cell)
        }
    }

    /// Read a tag.
    pub fn read_tag(cursor: &mut MatCursor<'_>) -> Result<Tag> {
        let start = cursor.position();
        let word = cursor.read_u32()?;
        let (code, length, short) = if word >> 16 != 0 {
            (word & 0xffff, (word >> 16) as usize, true)
        } else {
            (word, cursor.read_u32()? as usize, false)
        };
        let data_type = DataType::from_code(code).ok_or(CodecError::UnknownDataType {
            code,
            cursor_pos: start as u64,
        })?;
        if short && length > SHORT_PAYLOAD_SIZE {
            return Err(CodecError::parse(
                "short tag",
                format!("length {length} exceeds {SHORT_PAYLOAD_SIZE} bytes at position {start}"),
            ));
        }
        Ok(Tag {
            data_type,
            length,
            short,
        })
    }

    /// Read one data element.
    pub fn read_element(&self, cursor: &mut MatCursor<'_>) -> Result<DataElement> {
        let start = cursor.position();
        let tag = Self::read_tag(cursor)?;
        if tag.short {
            let payload = &cursor.read_bytes(SHORT_PAYLOAD_SIZE)?[..tag.length];
            return match tag.data_type {
                DataType::Matrix | DataType::Compressed => Err(CodecError::parse(
                    "short tag",
                    format!("{} element cannot use a short tag at position {start}", tag.data_type),
                )),
                data_type => Ok(DataElement::Numeric(decode_numeric(data_type, payload)?)),
            };
        }
        match tag.data_type {
            DataType::Compressed => self.read_compressed(cursor, tag.length),
            DataType::Matrix => {
                let element = if tag.length == 0 {
                    Matrix::empty()
                } else {
                    let payload = cursor.read_bytes(tag.length)?;
                    let mut inner = MatCursor::new(payload);
                    let matrix = self.read_matrix(&mut inner)?;
                    if !inner.is_at_end() {
                        tracing::warn!(
                            position = start,
                            unread = inner.remaining(),
                            "matrix contents shorter than declared length"
                        );
                    }
                    matrix
                };
                cursor.align();
                Ok(DataElement::Matrix(Box::new(element)))
            }
            data_type => {
                let payload = cursor.read_bytes(tag.length)?;
                let data = decode_numeric(data_type, payload)?;
                cursor.align();
                Ok(DataElement::Numeric(data))
            }
        }
    }

    fn read_compressed(&self, cursor: &mut MatCursor<'_>, length: usize) -> Result<DataElement> {
        let start = cursor.position();
        let payload = cursor.read_bytes(length)?;
        if length < ZLIB_FRAMING {
            return Err(CodecError::compression(format!(
                "compressed element at position {start} is only {length} bytes"
            )));
        }
        let deflated = &payload[2..length - 4];
        let mut inflated = Vec::new();
        DeflateDecoder::new(deflated)
            .read_to_end(&mut inflated)
            .map_err(|e| CodecError::compression(format!("inflate failed at position {start}: {e}")))?;
        let expected = BigEndian::read_u32(&payload[length - 4..]);
        let actual = adler32(&inflated);
        if expected != actual {
            tracing::warn!(
                position = start,
                expected,
                actual,
                "Adler-32 mismatch in compressed element"
            );
        }
        let mut inner = MatCursor::new(&inflated);
        self.read_element(&mut inner)
    }
}

/// Decode a numeric payload.
pub fn decode_numeric(data_type: DataType, bytes: &[u8]) -> Result<NumericData> {
    let size = match data_type {
        DataType::Int8 | DataType::UInt8 | DataType::Utf8 => 1,
        DataType::Int16 | DataType::UInt16 | DataType::Utf16 => 2,
        DataType::Int32 | DataType::UInt32 | DataType::Single => 4,
        DataType::Int64 | DataType::UInt64 | DataType::Double => 8,
        DataType::Utf32 | DataType::Matrix | DataType::Compressed => 0,
    };
    if size == 0 {
        return Err(CodecError::unexpected_element(
            "data element",
            "numeric or text",
            data_type.to_string(),
        ));
    }
    if bytes.len() % size != 0 {
        return Err(CodecError::parse(
            "data element",
            format!(
                "{} payload of {} bytes is not a whole number of elements",
                data_type,
                bytes.len()
            ),
        ));
    }
    Ok(match data_type {
        DataType::Int8 => NumericData::Int8(bytes.iter().map(|&b| b as i8).collect()),
        DataType::Int16 => NumericData::Int16(decode_values(bytes, LittleEndian::read_i16_into)),
        DataType::UInt16 | DataType::Utf16 => {
            NumericData::UInt16(decode_values(bytes, LittleEndian::read_u16_into))
        }
        DataType::Int32 => NumericData::Int32(decode_values(bytes, LittleEndian::read_i32_into)),
        DataType::UInt32 => NumericData::UInt32(decode_values(bytes, LittleEndian::read_u32_into)),
        DataType::Int64 => NumericData::Int64(decode_values(bytes, LittleEndian::read_i64_into)),
        DataType::UInt64 => NumericData::UInt64(decode_values(bytes, LittleEndian::read_u64_into)),
        DataType::Single => NumericData::Single(decode_values(bytes, LittleEndian::read_f32_into)),
        DataType::Double => NumericData::Double(decode_values(bytes, LittleEndian::read_f64_into)),
        // size check above leaves only byte-wide storage here
        _ => NumericData::UInt8(bytes.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, OnceLock};

    use flate2::write::DeflateEncoder;
    use flate2::Compression;

    fn reader() -> ElementReader {
        ElementReader::new(&Arc::new(OnceLock::new()))
    }

    #[test]
    fn test_short_tag() {
        // uint16 element, 2 bytes, inline
        let data = [0x04, 0x00, 0x02, 0x00, 0x34, 0x12, 0x00, 0x00];
        let mut cursor = MatCursor::new(&data);
        let element = reader().read_element(&mut cursor).unwrap();
        assert_eq!(element, DataElement::Numeric(NumericData::UInt16(vec![0x1234])));
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_long_tag_with_padding() {
        let mut data = vec![0x02, 0, 0, 0, 5, 0, 0, 0, 1, 2, 3, 4, 5, 0, 0, 0];
        data.extend_from_slice(&[0x02, 0x00, 0x01, 0x00, 9, 0, 0, 0]);
        let mut cursor = MatCursor::new(&data);
        let r = reader();
        let first = r.read_element(&mut cursor).unwrap();
        assert_eq!(first, DataElement::Numeric(NumericData::UInt8(vec![1, 2, 3, 4, 5])));
        assert_eq!(cursor.position(), 16);
        let second = r.read_element(&mut cursor).unwrap();
        assert_eq!(second, DataElement::Numeric(NumericData::UInt8(vec![9])));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_unknown_type_code() {
        let data = [0x0B, 0, 0, 0, 0, 0, 0, 0];
        let err = reader().read_element(&mut MatCursor::new(&data)).unwrap_err();
        assert!(matches!(err, CodecError::UnknownDataType { code: 11, .. }));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_truncated_payload() {
        let data = [0x09, 0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 0];
        let err = reader().read_element(&mut MatCursor::new(&data)).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn test_empty_matrix() {
        let data = [0x0E, 0, 0, 0, 0, 0, 0, 0];
        let element = reader().read_element(&mut MatCursor::new(&data)).unwrap();
        match element {
            DataElement::Matrix(m) => assert!(m.array.is_empty()),
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_compressed_element() {
        let inner = [0x05, 0x00, 0x04, 0x00, 0x07, 0x00, 0x00, 0x00];
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&inner).unwrap();
        let deflated = encoder.finish().unwrap();

        let mut data = vec![0x0F, 0, 0, 0];
        data.extend_from_slice(&((deflated.len() + 6) as u32).to_le_bytes());
        data.extend_from_slice(&[0x78, 0x9C]);
        data.extend_from_slice(&deflated);
        data.extend_from_slice(&adler32(&inner).to_be_bytes());

        let mut cursor = MatCursor::new(&data);
        let element = reader().read_element(&mut cursor).unwrap();
        assert_eq!(element, DataElement::Numeric(NumericData::Int32(vec![7])));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_decode_numeric_rejects_partial_elements() {
        assert!(decode_numeric(DataType::Double, &[0; 7]).is_err());
        assert!(decode_numeric(DataType::Utf32, &[0; 4]).is_err());
    }
}
