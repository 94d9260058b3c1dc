// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use matcodec::{Array, Header, MatFile, MatFileReader, Variable};
use serde::Serialize;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Values printed before a summary is cut short.
const MAX_VALUES: usize = 16;

/// Open and fully parse a MAT-file.
pub fn open_file(path: &Path) -> Result<(Header, MatFile)> {
    let reader = MatFileReader::open(path)?;
    let header = reader.read_header()?;
    let file = reader.read()?;
    Ok((header, file))
}

/// Dimensions as `2x3`; `[]` when there are none.
pub fn format_dims(dims: &[usize]) -> String {
    if dims.is_empty() {
        return "[]".to_string();
    }
    dims.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("x")
}

/// One row of `info` output.
#[derive(Debug, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub class: String,
    pub dims: Vec<usize>,
    pub global: bool,
}

impl From<&Variable> for VariableSummary {
    fn from(variable: &Variable) -> Self {
        Self {
            name: variable.name.clone(),
            class: variable.value.class_label(),
            dims: variable.value.dims().to_vec(),
            global: variable.global,
        }
    }
}

/// Human-readable summary of a value's contents.
pub fn summarize(value: &Array) -> String {
    match value {
        Array::Empty => "[]".to_string(),
        Array::Char(text) => format!("'{}'", text.as_str()),
        Array::Struct(s) => {
            let names: Vec<&str> = s.field_names().collect();
            format!("fields: {}", names.join(", "))
        }
        Array::Cell(cells) => {
            let shapes: Vec<String> = cells
                .iter()
                .take(MAX_VALUES)
                .map(|cell| format_dims(cell.dims()))
                .collect();
            format!("{{{}}}", elide(shapes, cells.len()))
        }
        Array::Opaque(object) => match object.field_names() {
            Ok(fields) => format!("object of class {}: {}", value.class_label(), fields.join(", ")),
            Err(_) => format!("object of class {}", value.class_label()),
        },
        Array::Numeric(_) | Array::Sparse(_) => match value.to_complex_vec() {
            Some(values) => {
                let count = values.len();
                let shown: Vec<String> = values
                    .into_iter()
                    .take(MAX_VALUES)
                    .map(|c| {
                        if c.im == 0.0 {
                            c.re.to_string()
                        } else {
                            format!("{}{:+}i", c.re, c.im)
                        }
                    })
                    .collect();
                format!("[{}]", elide(shown, count))
            }
            None => value.class_label(),
        },
    }
}

fn elide(items: Vec<String>, total: usize) -> String {
    let mut text = items.join(", ");
    if total > items.len() {
        text.push_str(&format!(", ... ({total} total)"));
    }
    text
}
