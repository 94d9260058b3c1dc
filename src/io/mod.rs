// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File-level reading and writing.
//!
//! - [`header`] - The 128-byte file header
//! - [`reader`] - [`MatFileReader`]
//! - [`writer`] - [`MatFileWriter`]
//! - [`options`] - Writer configuration and builder

pub mod header;
pub mod options;
pub mod reader;
pub mod writer;

pub use header::Header;
pub use options::{CompressionUsage, WriterBuilder, WriterOptions};
pub use reader::MatFileReader;
pub use writer::MatFileWriter;
