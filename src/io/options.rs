// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer configuration.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::writer::MatFileWriter;

/// Whether variables are wrapped in compressed elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionUsage {
    /// Plain matrix elements
    Never,
    /// One zlib-compressed element per variable
    #[default]
    Always,
}

/// Options for [`MatFileWriter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterOptions {
    /// Compression mode
    #[serde(default)]
    pub compression: CompressionUsage,
    /// Header text; generated from platform and time when absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Builder for [`MatFileWriter`].
#[derive(Debug, Clone, Default)]
pub struct WriterBuilder {
    options: WriterOptions,
}

impl WriterBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression mode.
    pub fn compression(mut self, compression: CompressionUsage) -> Self {
        self.options.compression = compression;
        self
    }

    /// Set the header text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    /// The configured options.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Build a writer over `sink`.
    pub fn build<W: Write>(self, sink: W) -> MatFileWriter<W> {
        MatFileWriter::new(sink, self.options)
    }
}
