// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Matcodec
//!
//! Reader and writer for MATLAB level 5 MAT-files.
//!
//! - Numeric, logical, char, cell, struct and sparse arrays, real and complex
//! - Class objects (`table`, `datetime`, `string`, user classes) resolved
//!   through the file's subsystem data
//! - zlib-compressed variables, on seekable and unseekable sinks
//!
//! ## Architecture
//!
//! - `core/` - Value model: arrays, variables, files, errors
//! - `encoding/` - Element tags, matrix decoder and encoder, subsystem data
//! - `io/` - File header, [`MatFileReader`], [`MatFileWriter`]
//! - `adapters/` - Typed views over common MATLAB classes
//!
//! ## Example: Reading
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use matcodec::MatFileReader;
//!
//! let file = MatFileReader::open("data.mat")?.read()?;
//! let m = file.get("m")?;
//! println!("{:?}", m.value.to_array2());
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Writing
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::fs::File;
//! use matcodec::{DataBuilder, WriterBuilder};
//!
//! let builder = DataBuilder::new();
//! let m = builder.new_array_from(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])?;
//! let file = builder.new_file([builder.new_variable("m", m, false)]);
//! WriterBuilder::new().build(File::create("out.mat")?).write(&file)?;
//! # Ok(())
//! # }
//! ```

// Value model
pub mod core;

pub use core::{
    Array, CellArray, CharArray, CodecError, DataBuilder, ElementType, MatElement, MatFile,
    NumericArray, OpaqueArray, Result, SparseArray, SparseMatrix, StructArray, Variable,
};

// Element encoding
pub mod encoding;

// File reading and writing
pub mod io;

pub use io::{CompressionUsage, Header, MatFileReader, MatFileWriter, WriterBuilder, WriterOptions};

// Class adapters
pub mod adapters;

pub use adapters::{
    AdapterError, DatetimeAdapter, DurationAdapter, EnumAdapter, StringAdapter, TableAdapter,
};
