// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MAT-file v5 element encoding and decoding.
//!
//! - [`tags`] - Data type codes, array classes and flags
//! - [`cursor`] - Little-endian byte cursor with 8-byte alignment
//! - [`element`] - Tag and data element reader, compressed elements
//! - [`decoder`] - Matrix element decoder
//! - [`subsystem`] - Subsystem data block reader
//! - [`sink`] - Output sinks for the encoder
//! - [`encoder`] - Matrix element encoder
//! - [`checksum`] - Adler-32

pub mod checksum;
pub mod cursor;
pub mod decoder;
pub mod element;
pub mod encoder;
pub mod sink;
pub mod subsystem;
pub mod tags;

pub use checksum::{adler32, Adler32, ChecksumWriter};
pub use cursor::MatCursor;
pub use element::{DataElement, ElementReader, Matrix};
pub use encoder::{variable_size, write_variable};
pub use sink::{ElementSink, SizeCalculator, StreamSink};
pub use subsystem::read_subsystem;
pub use tags::{ArrayClass, ArrayFlags, DataType};
