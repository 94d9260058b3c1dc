// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The array value model.
//!
//! [`Array`] is the closed set of array kinds a MAT-file variable can hold.
//! Every kind reports dimensions and supports lossy conversion to plain
//! numbers; conversions a kind cannot perform return `None`.

use std::fmt;

use ndarray::{Array2, ArrayD, IxDyn, ShapeBuilder};
use num_complex::Complex64;

use crate::core::cell::CellArray;
use crate::core::char_array::CharArray;
use crate::core::dims::element_count;
use crate::core::numeric::NumericArray;
use crate::core::opaque::{OpaqueArray, SubsystemCell};
use crate::core::sparse::SparseArray;
use crate::core::structure::StructArray;

/// Any MAT-file array.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Array {
    /// Dimensionless placeholder for "no value"
    #[default]
    Empty,
    /// Dense numeric or logical data
    Numeric(NumericArray),
    /// Character data
    Char(CharArray),
    /// Cell array
    Cell(CellArray),
    /// Structure array
    Struct(StructArray),
    /// Sparse matrix
    Sparse(SparseArray),
    /// Class object
    Opaque(OpaqueArray),
}

impl Array {
    /// Dimensions. Empty arrays have none.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        match self {
            Array::Empty => &[],
            Array::Numeric(a) => a.dims(),
            Array::Char(a) => a.dims(),
            Array::Cell(a) => a.dims(),
            Array::Struct(a) => a.dims(),
            Array::Sparse(a) => a.dims(),
            Array::Opaque(a) => a.dims(),
        }
    }

    /// Product of the dimensions.
    #[must_use]
    pub fn count(&self) -> usize {
        element_count(self.dims())
    }

    /// True when the array has no dimensions at all.
    ///
    /// A `0x0` array is not empty by this rule; it has two dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dims().is_empty()
    }

    /// Short kind label: the MATLAB class name for numeric data.
    #[must_use]
    pub fn class_label(&self) -> String {
        match self {
            Array::Empty => "empty".to_string(),
            Array::Numeric(a) => a.data().type_name(),
            Array::Char(_) => "char".to_string(),
            Array::Cell(_) => "cell".to_string(),
            Array::Struct(_) => "struct".to_string(),
            Array::Sparse(a) => format!("sparse {}", a.type_name()),
            Array::Opaque(a) => a
                .class_name()
                .unwrap_or_else(|_| a.declared_class_name().to_string()),
        }
    }

    /// Values as a flat column-major `f64` vector.
    #[must_use]
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            Array::Numeric(a) => a.data().to_f64_vec(),
            Array::Char(a) => Some(a.to_f64_vec()),
            Array::Sparse(a) => a.to_f64_vec(),
            Array::Empty | Array::Cell(_) | Array::Struct(_) | Array::Opaque(_) => None,
        }
    }

    /// Values as a flat column-major complex vector.
    #[must_use]
    pub fn to_complex_vec(&self) -> Option<Vec<Complex64>> {
        match self {
            Array::Numeric(a) => a.data().to_complex_vec(),
            Array::Sparse(a) => a.to_complex_vec(),
            Array::Char(_) => self
                .to_f64_vec()
                .map(|v| v.into_iter().map(|x| Complex64::new(x, 0.0)).collect()),
            Array::Empty | Array::Cell(_) | Array::Struct(_) | Array::Opaque(_) => None,
        }
    }

    /// Values as a 2-D grid; only for arrays with exactly two dimensions.
    #[must_use]
    pub fn to_array2(&self) -> Option<Array2<f64>> {
        let &[rows, cols] = self.dims() else {
            return None;
        };
        let values = self.to_f64_vec()?;
        Array2::from_shape_vec((rows, cols).f(), values).ok()
    }

    /// Values shaped by the array's dimensions, column-major.
    #[must_use]
    pub fn to_array_d(&self) -> Option<ArrayD<f64>> {
        if self.is_empty() {
            return None;
        }
        let values = self.to_f64_vec()?;
        ArrayD::from_shape_vec(IxDyn(self.dims()).f(), values).ok()
    }

    /// Numeric array view.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            Array::Numeric(a) => Some(a),
            _ => None,
        }
    }

    /// Character array view.
    #[must_use]
    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            Array::Char(a) => Some(a),
            _ => None,
        }
    }

    /// Cell array view.
    #[must_use]
    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            Array::Cell(a) => Some(a),
            _ => None,
        }
    }

    /// Structure array view.
    #[must_use]
    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            Array::Struct(a) => Some(a),
            _ => None,
        }
    }

    /// Sparse array view.
    #[must_use]
    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            Array::Sparse(a) => Some(a),
            _ => None,
        }
    }

    /// Class object view.
    #[must_use]
    pub fn as_opaque(&self) -> Option<&OpaqueArray> {
        match self {
            Array::Opaque(a) => Some(a),
            _ => None,
        }
    }

    /// Replace weak subsystem handles below this value with strong ones.
    pub(crate) fn upgrade_links(&mut self, cell: &SubsystemCell) {
        match self {
            Array::Opaque(a) => a.upgrade_links(cell),
            Array::Cell(a) => {
                for index in 0..a.len() {
                    if let Ok(child) = a.get_mut(&[index]) {
                        child.upgrade_links(cell);
                    }
                }
            }
            Array::Struct(a) => a.upgrade_links(cell),
            Array::Empty | Array::Numeric(_) | Array::Char(_) | Array::Sparse(_) => {}
        }
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .dims()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("x");
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "{dims} {}", self.class_label())
        }
    }
}

impl From<NumericArray> for Array {
    fn from(value: NumericArray) -> Self {
        Array::Numeric(value)
    }
}

impl From<CharArray> for Array {
    fn from(value: CharArray) -> Self {
        Array::Char(value)
    }
}

impl From<CellArray> for Array {
    fn from(value: CellArray) -> Self {
        Array::Cell(value)
    }
}

impl From<StructArray> for Array {
    fn from(value: StructArray) -> Self {
        Array::Struct(value)
    }
}

impl From<SparseArray> for Array {
    fn from(value: SparseArray) -> Self {
        Array::Sparse(value)
    }
}

impl From<OpaqueArray> for Array {
    fn from(value: OpaqueArray) -> Self {
        Array::Opaque(value)
    }
}
