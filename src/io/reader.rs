// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MAT-file reader.
//!
//! The reader parses the header, then reads top-level elements until the
//! stream ends cleanly at a tag boundary. The element that starts at the
//! header's subsystem offset is not a variable: it is decoded as subsystem
//! data and published to the shared cell that every class object read from
//! this file resolves against.
//!
//! # Example
//!
//! ```rust,no_run
//! use matcodec::io::MatFileReader;
//!
//! let reader = MatFileReader::open("data.mat")?;
//! let file = reader.read()?;
//! for variable in &file {
//!     println!("{}: {}", variable.name, variable.value);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::core::array::Array;
use crate::core::error::{CodecError, Result};
use crate::core::file::{MatFile, Variable};
use crate::core::opaque::SubsystemCell;
use crate::encoding::cursor::MatCursor;
use crate::encoding::element::{DataElement, ElementReader};
use crate::encoding::subsystem::read_subsystem;
use crate::io::header::Header;

enum Source {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

/// Reader over a complete MAT-file image.
pub struct MatFileReader {
    source: Source,
}

impl MatFileReader {
    /// Reader over an in-memory file.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: Source::Owned(bytes.into()),
        }
    }

    /// Reader over everything `reader` yields.
    ///
    /// Short reads are retried until the stream ends.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(bytes))
    }

    /// Memory-map a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CodecError::encode(
                "MatFileReader",
                format!("Failed to open file '{}': {e}", path.display()),
            )
        })?;
        // The map is read-only and owned by the reader for its whole lifetime.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| {
            CodecError::encode(
                "MatFileReader",
                format!("Failed to mmap file '{}': {e}", path.display()),
            )
        })?;
        Ok(Self {
            source: Source::Mapped(mmap),
        })
    }

    /// Raw file bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match &self.source {
            Source::Owned(bytes) => bytes,
            Source::Mapped(mmap) => mmap,
        }
    }

    /// Parse only the header.
    pub fn read_header(&self) -> Result<Header> {
        Header::read(&mut MatCursor::new(self.bytes()))
    }

    /// Parse the whole file.
    pub fn read(&self) -> Result<MatFile> {
        let data = self.bytes();
        let mut cursor = MatCursor::new(data);
        let header = Header::read(&mut cursor)?;
        tracing::debug!(
            text = %header.text,
            subsystem_offset = ?header.subsystem_offset,
            "read header"
        );

        let cell: SubsystemCell = Arc::new(OnceLock::new());
        let reader = ElementReader::new(&cell);
        let mut file = MatFile::new();
        let mut subsystem_found = false;

        while !cursor.is_at_end() {
            let start = cursor.position();
            let element = reader.read_element(&mut cursor)?;
            if header.subsystem_offset == Some(start as u64) {
                subsystem_found = true;
                let bytes = subsystem_bytes(&element)?;
                let subsystem = read_subsystem(bytes, &cell)?;
                if cell.set(subsystem).is_err() {
                    tracing::warn!(offset = start, "ignoring repeated subsystem data");
                }
                continue;
            }
            match element {
                DataElement::Matrix(matrix) => {
                    tracing::debug!(
                        name = %matrix.name,
                        class = %matrix.array.class_label(),
                        offset = start,
                        "read variable"
                    );
                    file.insert(Variable::new(matrix.name, matrix.array, matrix.global));
                }
                other => tracing::debug!(
                    element = %other.describe(),
                    offset = start,
                    "skipping top-level data element"
                ),
            }
        }

        if let (Some(offset), false) = (header.subsystem_offset, subsystem_found) {
            tracing::warn!(offset, "subsystem data offset does not start an element");
        }
        Ok(file)
    }
}

fn subsystem_bytes(element: &DataElement) -> Result<&[u8]> {
    let bytes = match element {
        DataElement::Matrix(matrix) => match &matrix.array {
            Array::Numeric(numeric) => numeric.as_slice::<u8>(),
            _ => None,
        },
        DataElement::Numeric(_) => None,
    };
    bytes.ok_or_else(|| {
        CodecError::unexpected_element("subsystem data", "uint8 matrix", element.describe())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_file_is_empty() {
        let bytes = Header::new("empty").to_bytes();
        let file = MatFileReader::new(bytes.to_vec()).read().unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn test_truncated_element_is_an_error() {
        let mut bytes = Header::new("t").to_bytes().to_vec();
        bytes.extend_from_slice(&[14, 0, 0, 0, 64, 0, 0, 0, 1, 2]);
        let err = MatFileReader::new(bytes).read().unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn test_from_reader_collects_whole_stream() {
        let bytes = Header::new("stream").to_bytes();
        let reader = MatFileReader::from_reader(&bytes[..]).unwrap();
        assert_eq!(reader.read_header().unwrap().text, "stream");
    }

    #[test]
    fn test_open_missing_file() {
        assert!(MatFileReader::open("/nonexistent/definitely/missing.mat").is_err());
    }
}
