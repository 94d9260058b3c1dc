// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Info command - header and variable listing.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::common::{format_dims, open_file, Result, VariableSummary};

/// Show header text and the variables a file holds.
#[derive(Args, Clone, Debug)]
pub struct InfoCmd {
    /// Input MAT-file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print a JSON document instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileSummary {
    description: String,
    version: i16,
    subsystem_offset: Option<u64>,
    variables: Vec<VariableSummary>,
}

impl InfoCmd {
    pub fn run(self) -> Result<()> {
        let (header, file) = open_file(&self.input)?;
        let summary = FileSummary {
            description: header.text,
            version: header.version,
            subsystem_offset: header.subsystem_offset,
            variables: file.iter().map(VariableSummary::from).collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("=== {} ===", self.input.display());
        println!("Description: {}", summary.description);
        println!("Version: {:#06x}", summary.version);
        match summary.subsystem_offset {
            Some(offset) => println!("Subsystem data: at offset {offset}"),
            None => println!("Subsystem data: none"),
        }
        println!("Variables: {}", summary.variables.len());
        println!();
        for variable in &summary.variables {
            println!(
                "  {} | {} | {}{}",
                variable.name,
                variable.class,
                format_dims(&variable.dims),
                if variable.global { " | global" } else { "" }
            );
        }
        Ok(())
    }
}
