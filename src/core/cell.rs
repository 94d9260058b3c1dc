// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cell arrays: heterogeneous containers of arrays.

use crate::core::array::Array;
use crate::core::dims::{check_len, checked_flatten, element_count};
use crate::core::error::Result;

/// MATLAB cell array. Every cell holds an [`Array`]; unset cells hold
/// [`Array::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    dims: Vec<usize>,
    cells: Vec<Array>,
}

impl CellArray {
    /// Cell array of empty cells.
    #[must_use]
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
            cells: vec![Array::Empty; element_count(dims)],
        }
    }

    /// Cell array over explicit column-major cells.
    pub fn from_vec(cells: Vec<Array>, dims: &[usize]) -> Result<Self> {
        check_len(dims, cells.len())?;
        Ok(Self {
            dims: dims.to_vec(),
            cells,
        })
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if there are no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in column-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[Array] {
        &self.cells
    }

    /// Iterate over cells in column-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Array> {
        self.cells.iter()
    }

    /// Cell at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<&Array> {
        let offset = checked_flatten(&self.dims, index)?;
        Ok(&self.cells[offset])
    }

    /// Mutable cell at a multi-index.
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut Array> {
        let offset = checked_flatten(&self.dims, index)?;
        Ok(&mut self.cells[offset])
    }

    /// Replace the cell at a multi-index.
    pub fn set(&mut self, index: &[usize], value: impl Into<Array>) -> Result<()> {
        *self.get_mut(index)? = value.into();
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CellArray {
    type Item = &'a Array;
    type IntoIter = std::slice::Iter<'a, Array>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
