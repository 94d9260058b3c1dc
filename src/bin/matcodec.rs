// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Matcodec CLI
//!
//! Command-line tool for MATLAB MAT-files.
//!
//! ## Usage
//!
//! ```sh
//! # List variables
//! matcodec info data.mat
//!
//! # Print one variable
//! matcodec show data.mat m
//!
//! # Re-encode without compression
//! matcodec convert data.mat plain.mat --compression never
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, InfoCmd, ShowCmd};
use common::Result;

/// Matcodec - MATLAB MAT-file toolkit
#[derive(Parser, Clone)]
#[command(name = "matcodec")]
#[command(about = "Inspect and convert MATLAB level 5 MAT-files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Show header and variable listing
    Info(InfoCmd),

    /// Print one variable
    Show(ShowCmd),

    /// Re-encode a file
    Convert(ConvertCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info(cmd) => cmd.run(),
        Commands::Show(cmd) => cmd.run(),
        Commands::Convert(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
