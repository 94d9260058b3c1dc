// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Two-dimensional sparse arrays.
//!
//! Entries live in a map keyed by column then row, so iteration yields them
//! in the compressed-sparse-column order the file format stores. Absent
//! entries read as the element type's zero value.

use std::collections::BTreeMap;
use std::fmt;

use num_complex::Complex64;

use crate::core::error::{CodecError, Result};

/// Element types a sparse array may hold.
pub trait SparseElement: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// Wrap a matrix in the matching [`SparseArray`] variant.
    fn wrap(matrix: SparseMatrix<Self>) -> SparseArray;

    /// Borrow the matrix if the array holds this type.
    fn matrix(array: &SparseArray) -> Option<&SparseMatrix<Self>>;

    /// Mutably borrow the matrix if the array holds this type.
    fn matrix_mut(array: &mut SparseArray) -> Option<&mut SparseMatrix<Self>>;
}

macro_rules! impl_sparse_element {
    ($t:ty, $variant:ident) => {
        impl SparseElement for $t {
            fn wrap(matrix: SparseMatrix<Self>) -> SparseArray {
                SparseArray::$variant(matrix)
            }

            fn matrix(array: &SparseArray) -> Option<&SparseMatrix<Self>> {
                match array {
                    SparseArray::$variant(m) => Some(m),
                    _ => None,
                }
            }

            fn matrix_mut(array: &mut SparseArray) -> Option<&mut SparseMatrix<Self>> {
                match array {
                    SparseArray::$variant(m) => Some(m),
                    _ => None,
                }
            }
        }
    };
}

impl_sparse_element!(f64, Double);
impl_sparse_element!(Complex64, Complex);
impl_sparse_element!(bool, Logical);

/// Sparse matrix of `T` with an implicit zero default.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    dims: [usize; 2],
    // (column, row) -> value
    entries: BTreeMap<(usize, usize), T>,
}

impl<T: SparseElement> SparseMatrix<T> {
    /// Empty matrix. Only two dimensions are supported.
    pub fn new(dims: &[usize]) -> Result<Self> {
        match *dims {
            [rows, cols] => Ok(Self {
                dims: [rows, cols],
                entries: BTreeMap::new(),
            }),
            _ => Err(CodecError::unsupported(format!(
                "sparse arrays with {} dimensions",
                dims.len()
            ))),
        }
    }

    /// Dimensions `[rows, columns]`.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.dims[0]
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.dims[1]
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Value at `(row, col)`; zero when no entry is stored.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check(row, col)?;
        Ok(self.entries.get(&(col, row)).copied().unwrap_or_default())
    }

    /// Value at a column-major linear index.
    pub fn get_linear(&self, index: usize) -> Result<T> {
        let rows = self.rows();
        if rows == 0 {
            return Err(CodecError::index_out_of_bounds(&[index], &self.dims));
        }
        self.get(index % rows, index / rows)
    }

    /// Store a value. Storing zero removes the entry.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check(row, col)?;
        if value == T::default() {
            self.entries.remove(&(col, row));
        } else {
            self.entries.insert((col, row), value);
        }
        Ok(())
    }

    /// Stored entries as `(row, col, value)` in column-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.entries
            .iter()
            .map(|(&(col, row), &value)| (row, col, value))
    }

    /// Dense column-major expansion; `None` when the element count overflows.
    #[must_use]
    pub fn to_dense(&self) -> Option<Vec<T>> {
        let len = self.rows().checked_mul(self.cols())?;
        let mut dense = vec![T::default(); len];
        for (&(col, row), &value) in &self.entries {
            dense[col * self.rows() + row] = value;
        }
        Some(dense)
    }

    /// Store a decoded entry. Zeros are dropped like in `set`.
    pub(crate) fn insert_unchecked(&mut self, row: usize, col: usize, value: T) {
        if value != T::default() {
            self.entries.insert((col, row), value);
        }
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(CodecError::index_out_of_bounds(&[row, col], &self.dims));
        }
        Ok(())
    }
}

/// Sparse array of one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum SparseArray {
    /// Real double entries
    Double(SparseMatrix<f64>),
    /// Complex double entries
    Complex(SparseMatrix<Complex64>),
    /// Logical entries
    Logical(SparseMatrix<bool>),
}

impl SparseArray {
    /// Empty sparse array of element type `T`.
    pub fn new<T: SparseElement>(dims: &[usize]) -> Result<Self> {
        Ok(T::wrap(SparseMatrix::new(dims)?))
    }

    /// Dimensions `[rows, columns]`.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        match self {
            SparseArray::Double(m) => m.dims(),
            SparseArray::Complex(m) => m.dims(),
            SparseArray::Logical(m) => m.dims(),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        match self {
            SparseArray::Double(m) => m.nnz(),
            SparseArray::Complex(m) => m.nnz(),
            SparseArray::Logical(m) => m.nnz(),
        }
    }

    /// Typed matrix view.
    #[must_use]
    pub fn as_matrix<T: SparseElement>(&self) -> Option<&SparseMatrix<T>> {
        T::matrix(self)
    }

    /// Mutable typed matrix view.
    pub fn as_matrix_mut<T: SparseElement>(&mut self) -> Option<&mut SparseMatrix<T>> {
        T::matrix_mut(self)
    }

    /// Element type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            SparseArray::Double(_) => "double",
            SparseArray::Complex(_) => "complex double",
            SparseArray::Logical(_) => "logical",
        }
    }

    /// Dense real values; `None` for complex arrays or when the element
    /// count does not fit in `usize`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            SparseArray::Double(m) => m.to_dense(),
            SparseArray::Logical(m) => Some(m.to_dense()?.into_iter().map(f64::from).collect()),
            SparseArray::Complex(_) => None,
        }
    }

    /// Dense complex values.
    #[must_use]
    pub fn to_complex_vec(&self) -> Option<Vec<Complex64>> {
        match self {
            SparseArray::Complex(m) => m.to_dense(),
            _ => self
                .to_f64_vec()
                .map(|v| v.into_iter().map(|x| Complex64::new(x, 0.0)).collect()),
        }
    }
}
