// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - re-encode a file.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, ValueEnum};
use matcodec::{Array, CompressionUsage, MatFile, WriterBuilder};

use crate::common::{open_file, Result};

/// Compression choice on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum CompressionArg {
    #[default]
    Always,
    Never,
}

impl From<CompressionArg> for CompressionUsage {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Always => CompressionUsage::Always,
            CompressionArg::Never => CompressionUsage::Never,
        }
    }
}

/// Re-encode a MAT-file, optionally changing compression.
#[derive(Args, Clone, Debug)]
pub struct ConvertCmd {
    /// Input MAT-file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output MAT-file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Compress each variable
    #[arg(long, value_enum, default_value_t = CompressionArg::Always)]
    compression: CompressionArg,
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        let (_, source) = open_file(&self.input)?;

        let mut file = MatFile::new();
        for variable in &source {
            if matches!(variable.value, Array::Opaque(_)) {
                eprintln!("Warning: skipping object variable '{}'", variable.name);
                continue;
            }
            file.insert(variable.clone());
        }

        let sink = File::create(&self.output)
            .with_context(|| format!("cannot create {}", self.output.display()))?;
        let mut writer = WriterBuilder::new()
            .compression(self.compression.into())
            .build(BufWriter::new(sink));
        writer.write(&file)?;

        println!(
            "Wrote {} variables to {}",
            file.len(),
            self.output.display()
        );
        Ok(())
    }
}
