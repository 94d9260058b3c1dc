// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte cursor for reading little-endian MAT-file data.
//!
//! Alignment is measured from the start of the cursor's buffer. For the
//! top-level stream that is the start of the file; a decompressed element
//! or the subsystem block gets a fresh cursor whose positions start at 0.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::error::{CodecError, Result};

/// Element alignment in bytes.
pub const ALIGNMENT: usize = 8;

/// Cursor over a borrowed byte buffer.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use matcodec::encoding::cursor::MatCursor;
///
/// let data = [0x2A, 0x00, 0x00, 0x00];
/// let mut cursor = MatCursor::new(&data);
/// assert_eq!(cursor.read_u32()?, 42);
/// assert!(cursor.is_at_end());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MatCursor<'a> {
    /// The data buffer
    data: &'a [u8],
    /// Current read position
    offset: usize,
}

impl<'a> MatCursor<'a> {
    /// Cursor at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Cursor at `offset` within `data`.
    #[must_use]
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True when no bytes are left.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Whole underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// Skip padding up to the next 8-byte boundary.
    ///
    /// Padding cut short by the end of the buffer is tolerated.
    pub fn align(&mut self) {
        let padding = (ALIGNMENT - self.offset % ALIGNMENT) % ALIGNMENT;
        if padding > self.remaining() {
            tracing::warn!(
                position = self.offset,
                padding,
                "element padding truncated by end of stream"
            );
        }
        self.offset = (self.offset + padding).min(self.data.len());
    }

    /// Read `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(CodecError::buffer_too_short(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        let bytes = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(bytes)
    }

    /// Skip `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(CodecError::buffer_too_short(
                position - self.offset,
                self.remaining(),
                self.offset as u64,
            ));
        }
        self.offset = position;
        Ok(())
    }

    /// Read a byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a u16 value.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read an i16 value.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    /// Read a u32 value.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read an i32 value.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read a u64 value.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    /// Peek at the next u32 without consuming it.
    pub fn peek_u32(&self) -> Result<u32> {
        self.clone().read_u32()
    }
}

/// Decode a little-endian payload into values of one primitive type.
pub(crate) fn decode_values<T: Copy + Default>(
    bytes: &[u8],
    read_into: fn(&[u8], &mut [T]),
) -> Vec<T> {
    let size = std::mem::size_of::<T>();
    let mut values = vec![T::default(); bytes.len() / size];
    read_into(&bytes[..values.len() * size], &mut values);
    values
}
