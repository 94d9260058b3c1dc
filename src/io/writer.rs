// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MAT-file writer.
//!
//! Writes the header at the sink's current position, then one element per
//! variable. With [`CompressionUsage::Always`] each variable is wrapped in a
//! compressed element: a zlib stream (`78 9C`, raw DEFLATE, big-endian
//! Adler-32 of the uncompressed bytes). Seekable sinks stream the variable
//! through the compressor and patch the element length afterwards;
//! unseekable sinks buffer one variable at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Cursor;
//! use matcodec::io::{CompressionUsage, WriterBuilder};
//! use matcodec::DataBuilder;
//!
//! let builder = DataBuilder::new();
//! let file = builder.new_file([builder.new_variable("x", builder.new_char_array("hi"), false)]);
//! let mut writer = WriterBuilder::new()
//!     .compression(CompressionUsage::Never)
//!     .build(Cursor::new(Vec::new()));
//! writer.write(&file)?;
//! # Ok(())
//! # }
//! ```

use std::io::{Seek, SeekFrom, Write};

use byteorder::{ByteOrder, LittleEndian};
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::core::error::{CodecError, Result};
use crate::core::file::{MatFile, Variable};
use crate::encoding::checksum::{adler32, ChecksumWriter};
use crate::encoding::element::ZLIB_FRAMING;
use crate::encoding::encoder::write_variable;
use crate::encoding::sink::StreamSink;
use crate::encoding::tags::{DataType, TAG_SIZE};
use crate::io::header::Header;
use crate::io::options::{CompressionUsage, WriterOptions};

/// zlib header for the default compression level.
const ZLIB_HEADER: [u8; 2] = [0x78, 0x9C];

fn compressed_tag(length: u32) -> [u8; TAG_SIZE] {
    let mut tag = [0u8; TAG_SIZE];
    LittleEndian::write_u32(&mut tag[..4], DataType::Compressed.code());
    LittleEndian::write_u32(&mut tag[4..], length);
    tag
}

fn compressed_length(deflated: u64) -> Result<u32> {
    u32::try_from(deflated + ZLIB_FRAMING as u64).map_err(|_| {
        CodecError::encode("MatFileWriter", "compressed variable exceeds 4 GiB")
    })
}

/// Writer of complete MAT-files.
pub struct MatFileWriter<W> {
    sink: W,
    options: WriterOptions,
}

impl<W: Write> MatFileWriter<W> {
    /// Create a writer over `sink`.
    pub fn new(sink: W, options: WriterOptions) -> Self {
        Self { sink, options }
    }

    /// Writer options.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Write `file` to a sink that cannot seek.
    ///
    /// Compressed variables are assembled in memory one at a time.
    pub fn write_unseekable(&mut self, file: &MatFile) -> Result<()> {
        self.write_header()?;
        for variable in file {
            match self.options.compression {
                CompressionUsage::Never => self.write_plain(variable)?,
                CompressionUsage::Always => self.write_buffered(variable)?,
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        let header = match &self.options.description {
            Some(text) => Header::new(text.clone()),
            None => Header::generated(),
        };
        self.sink.write_all(&header.to_bytes())?;
        Ok(())
    }

    fn write_plain(&mut self, variable: &Variable) -> Result<()> {
        let mut sink = StreamSink::new(&mut self.sink);
        write_variable(&mut sink, &variable.name, &variable.value, variable.global)?;
        tracing::debug!(name = %variable.name, size = sink.written(), "wrote variable");
        Ok(())
    }

    fn write_buffered(&mut self, variable: &Variable) -> Result<()> {
        let mut raw = StreamSink::new(Vec::new());
        write_variable(&mut raw, &variable.name, &variable.value, variable.global)?;
        let raw = raw.into_inner();
        let checksum = adler32(&raw);

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let deflated = encoder.finish()?;

        self.sink
            .write_all(&compressed_tag(compressed_length(deflated.len() as u64)?))?;
        self.sink.write_all(&ZLIB_HEADER)?;
        self.sink.write_all(&deflated)?;
        self.sink.write_all(&checksum.to_be_bytes())?;
        tracing::debug!(
            name = %variable.name,
            uncompressed = raw.len(),
            compressed = deflated.len() + ZLIB_FRAMING,
            "wrote compressed variable"
        );
        Ok(())
    }
}

impl<W: Write + Seek> MatFileWriter<W> {
    /// Write `file` to a seekable sink.
    pub fn write(&mut self, file: &MatFile) -> Result<()> {
        self.write_header()?;
        for variable in file {
            match self.options.compression {
                CompressionUsage::Never => self.write_plain(variable)?,
                CompressionUsage::Always => self.write_streamed(variable)?,
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    fn write_streamed(&mut self, variable: &Variable) -> Result<()> {
        let tag_position = self.sink.stream_position()?;
        self.sink.write_all(&compressed_tag(0))?;
        self.sink.write_all(&ZLIB_HEADER)?;
        let deflate_start = self.sink.stream_position()?;

        // The tee sits in front of the compressor so the checksum covers
        // the uncompressed bytes.
        let mut tee =
            ChecksumWriter::new(DeflateEncoder::new(&mut self.sink, Compression::default()));
        let uncompressed = {
            let mut sink = StreamSink::new(&mut tee);
            write_variable(&mut sink, &variable.name, &variable.value, variable.global)?;
            sink.written()
        };
        let (encoder, checksum) = tee.into_inner();
        encoder.finish()?;

        let deflate_end = self.sink.stream_position()?;
        self.sink.write_all(&checksum.to_be_bytes())?;
        let end = self.sink.stream_position()?;

        let length = compressed_length(deflate_end - deflate_start)?;
        self.sink.seek(SeekFrom::Start(tag_position))?;
        self.sink.write_all(&compressed_tag(length))?;
        self.sink.seek(SeekFrom::Start(end))?;
        tracing::debug!(
            name = %variable.name,
            uncompressed,
            compressed = length,
            "wrote compressed variable"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::numeric::NumericArray;
    use crate::io::header::HEADER_SIZE;
    use crate::io::reader::MatFileReader;
    use std::io::Cursor;

    fn sample() -> MatFile {
        let value = NumericArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        [Variable::new("m", value, false)].into_iter().collect()
    }

    fn options(compression: CompressionUsage) -> WriterOptions {
        WriterOptions {
            compression,
            description: Some("unit test".into()),
        }
    }

    #[test]
    fn test_seekable_and_buffered_paths_agree() {
        let mut seekable = MatFileWriter::new(Cursor::new(Vec::new()), options(CompressionUsage::Always));
        seekable.write(&sample()).unwrap();
        let seekable = seekable.into_inner().into_inner();

        let mut buffered = MatFileWriter::new(Vec::new(), options(CompressionUsage::Always));
        buffered.write_unseekable(&sample()).unwrap();
        let buffered = buffered.into_inner();

        assert_eq!(&seekable[seekable.len() - 4..], &buffered[buffered.len() - 4..]);
        let from_seekable = MatFileReader::new(seekable).read().unwrap();
        let from_buffered = MatFileReader::new(buffered).read().unwrap();
        assert_eq!(from_seekable, sample());
        assert_eq!(from_buffered, sample());
    }

    #[test]
    fn test_compressed_element_layout() {
        let mut writer = MatFileWriter::new(Cursor::new(Vec::new()), options(CompressionUsage::Always));
        writer.write(&sample()).unwrap();
        let bytes = writer.into_inner().into_inner();
        let element = &bytes[HEADER_SIZE..];
        assert_eq!(LittleEndian::read_u32(&element[..4]), 15);
        let length = LittleEndian::read_u32(&element[4..8]) as usize;
        assert_eq!(element.len(), TAG_SIZE + length);
        assert_eq!(&element[8..10], &ZLIB_HEADER);
    }

    #[test]
    fn test_uncompressed_element_follows_header() {
        let mut writer = MatFileWriter::new(Vec::new(), options(CompressionUsage::Never));
        writer.write_unseekable(&sample()).unwrap();
        let bytes = writer.into_inner();
        assert!(bytes.starts_with(b"unit test"));
        assert_eq!(LittleEndian::read_u32(&bytes[HEADER_SIZE..HEADER_SIZE + 4]), 14);
    }

    #[test]
    fn test_header_written_at_current_position() {
        let mut cursor = Cursor::new(vec![0xAA; 3]);
        cursor.seek(SeekFrom::End(0)).unwrap();
        let mut writer = MatFileWriter::new(cursor, options(CompressionUsage::Always));
        writer.write(&sample()).unwrap();
        let bytes = writer.into_inner().into_inner();
        assert_eq!(&bytes[..3], &[0xAA; 3]);
        assert!(bytes[3..].starts_with(b"unit test"));
        let element = &bytes[3 + HEADER_SIZE..];
        let length = LittleEndian::read_u32(&element[4..8]) as usize;
        assert_eq!(element.len(), TAG_SIZE + length);
    }
}
