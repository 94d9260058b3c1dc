// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Value construction façade.
//!
//! [`DataBuilder`] gathers the constructors callers need to assemble a
//! [`MatFile`] for writing.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use matcodec::DataBuilder;
//!
//! let builder = DataBuilder::new();
//! let mut m = builder.new_array::<f64>(&[2, 2]);
//! m.set(&[1, 1], 4.0)?;
//! let file = builder.new_file([builder.new_variable("m", m, false)]);
//! assert_eq!(file.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::core::array::Array;
use crate::core::cell::CellArray;
use crate::core::char_array::CharArray;
use crate::core::element::MatElement;
use crate::core::error::Result;
use crate::core::file::{MatFile, Variable};
use crate::core::numeric::NumericArray;
use crate::core::sparse::{SparseArray, SparseElement};
use crate::core::structure::StructArray;

/// Constructors for arrays, variables and files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataBuilder;

impl DataBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Zero-filled numeric array.
    #[must_use]
    pub fn new_array<T: MatElement>(&self, dims: &[usize]) -> NumericArray {
        NumericArray::zeros::<T>(dims)
    }

    /// Numeric array over explicit column-major data.
    pub fn new_array_from<T: MatElement>(&self, data: Vec<T>, dims: &[usize]) -> Result<NumericArray> {
        NumericArray::from_vec(data, dims)
    }

    /// Cell array of empty cells.
    #[must_use]
    pub fn new_cell_array(&self, dims: &[usize]) -> CellArray {
        CellArray::new(dims)
    }

    /// Structure array with the given fields, all values empty.
    pub fn new_struct_array<I, S>(&self, field_names: I, dims: &[usize]) -> StructArray
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StructArray::new(field_names, dims)
    }

    /// Row-vector character array.
    pub fn new_char_array(&self, text: impl Into<String>) -> CharArray {
        CharArray::new(text)
    }

    /// Character array with explicit dimensions.
    pub fn new_char_array_with_dims(&self, text: impl Into<String>, dims: &[usize]) -> CharArray {
        CharArray::with_dims(text, dims)
    }

    /// Sparse array; `dims` must have exactly two entries.
    pub fn new_sparse_array<T: SparseElement>(&self, dims: &[usize]) -> Result<SparseArray> {
        SparseArray::new::<T>(dims)
    }

    /// The empty-array sentinel.
    #[must_use]
    pub fn new_empty(&self) -> Array {
        Array::Empty
    }

    /// Variable.
    pub fn new_variable(
        &self,
        name: impl Into<String>,
        value: impl Into<Array>,
        global: bool,
    ) -> Variable {
        Variable::new(name, value, global)
    }

    /// File from variables; later duplicates overwrite earlier ones.
    pub fn new_file(&self, variables: impl IntoIterator<Item = Variable>) -> MatFile {
        variables.into_iter().collect()
    }
}
