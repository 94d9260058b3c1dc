// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual matcodec binary and verify its behavior.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use common::{file_with_subsystem, linked_point, sample_file, temp_path, write_to_vec};
use matcodec::{CompressionUsage, MatFileReader};

/// Path to the built matcodec binary
fn matcodec_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_matcodec"))
}

/// Run matcodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = matcodec_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run matcodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run matcodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_sample(path: &Path) {
    fs::write(path, write_to_vec(&sample_file(), CompressionUsage::Always)).unwrap();
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("MAT-files"));
    assert!(output.contains("info"));
    assert!(output.contains("show"));
    assert!(output.contains("convert"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("matcodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Info
// ============================================================================

#[test]
fn test_info_lists_variables() {
    let (path, _guard) = temp_path("info.mat");
    write_sample(&path);
    let output = run_ok(&["info", &arg(&path)]);
    assert!(output.contains("Description: matcodec test"));
    assert!(output.contains("Subsystem data: none"));
    assert!(output.contains("  d | double | 2x3"));
    assert!(output.contains("  g | double | 1x1 | global"));
    assert!(output.contains("  xy | struct | 2x3"));
}

#[test]
fn test_info_json() {
    let (path, _guard) = temp_path("info.mat");
    write_sample(&path);
    let output = run_ok(&["info", &arg(&path), "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["description"], "matcodec test");
    let variables = json["variables"].as_array().unwrap();
    assert_eq!(variables.len(), sample_file().len());
    assert_eq!(variables[0]["name"], "d");
    assert_eq!(variables[0]["dims"], serde_json::json!([2, 3]));
}

#[test]
fn test_info_missing_file() {
    let stderr = run_err(&["info", "/nonexistent/missing.mat"]);
    assert!(stderr.starts_with("Error: "));
}

// ============================================================================
// Show
// ============================================================================

#[test]
fn test_show_variable() {
    let (path, _guard) = temp_path("show.mat");
    write_sample(&path);
    let output = run_ok(&["show", &arg(&path), "text"]);
    assert!(output.contains("'hello'"));
    let output = run_ok(&["show", &arg(&path), "xy"]);
    assert!(output.contains("fields: x, y"));
}

#[test]
fn test_show_unknown_variable() {
    let (path, _guard) = temp_path("show.mat");
    write_sample(&path);
    let stderr = run_err(&["show", &arg(&path), "missing"]);
    assert!(stderr.contains("missing"));
}

// ============================================================================
// Convert
// ============================================================================

#[test]
fn test_convert_decompresses() {
    let (input, _guard) = temp_path("in.mat");
    write_sample(&input);
    let output = input.with_file_name("out.mat");
    run_ok(&["convert", &arg(&input), &arg(&output), "--compression", "never"]);

    let bytes = fs::read(&output).unwrap();
    // first element after the header is a plain matrix
    assert_eq!(&bytes[128..132], &[14, 0, 0, 0]);
    let converted = MatFileReader::new(bytes).read().unwrap();
    assert_eq!(converted, sample_file());
}

#[test]
fn test_convert_skips_objects() {
    let (input, _guard) = temp_path("objects.mat");
    let mut bytes = file_with_subsystem(&[linked_point("p")], 2.0);
    // header-relative layout is unchanged by appending a plain variable
    bytes.extend(common::double_matrix("d", &[1, 1], &[4.0]));
    fs::write(&input, bytes).unwrap();
    let output = input.with_file_name("plain.mat");

    let result = run(&["convert", &arg(&input), &arg(&output)]);
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("skipping object variable 'p'"));

    let converted = MatFileReader::open(&output).unwrap().read().unwrap();
    assert_eq!(converted.len(), 1);
    assert_eq!(converted[0].name, "d");
}
