// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Show command - print one variable.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_dims, open_file, summarize, Result};

/// Print a variable's value.
#[derive(Args, Clone, Debug)]
pub struct ShowCmd {
    /// Input MAT-file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Variable name
    #[arg(value_name = "VARIABLE")]
    variable: String,
}

impl ShowCmd {
    pub fn run(self) -> Result<()> {
        let (_, file) = open_file(&self.input)?;
        let variable = file.get(&self.variable)?;
        println!(
            "{}: {} {}",
            variable.name,
            format_dims(variable.value.dims()),
            variable.value.class_label()
        );
        println!("{}", summarize(&variable.value));
        Ok(())
    }
}
