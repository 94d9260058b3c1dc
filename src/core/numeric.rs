// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dense numeric and logical arrays.

use crate::core::dims::{check_len, checked_flatten, element_count};
use crate::core::element::{ElementType, MatElement, NumericData};
use crate::core::error::{CodecError, Result};

/// Dense array of one primitive element type, real or complex.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    dims: Vec<usize>,
    data: NumericData,
}

impl NumericArray {
    /// Zero-filled array of element type `T`.
    #[must_use]
    pub fn zeros<T: MatElement>(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
            data: T::wrap(vec![T::default(); element_count(dims)]),
        }
    }

    /// Array over explicit column-major data.
    pub fn from_vec<T: MatElement>(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        check_len(dims, data.len())?;
        Ok(Self {
            dims: dims.to_vec(),
            data: T::wrap(data),
        })
    }

    /// Array over an existing buffer.
    pub fn from_data(data: NumericData, dims: &[usize]) -> Result<Self> {
        check_len(dims, data.len())?;
        Ok(Self {
            dims: dims.to_vec(),
            data,
        })
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Underlying buffer.
    #[must_use]
    pub fn data(&self) -> &NumericData {
        &self.data
    }

    /// Primitive element type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// True for complex arrays.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.data.is_complex()
    }

    /// True for logical arrays.
    #[must_use]
    pub fn is_logical(&self) -> bool {
        self.data.element_type() == ElementType::Logical
    }

    /// Typed view of the data.
    #[must_use]
    pub fn as_slice<T: MatElement>(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Mutable typed view of the data.
    pub fn as_mut_slice<T: MatElement>(&mut self) -> Option<&mut [T]> {
        self.data.as_mut_slice()
    }

    /// Element at a multi-index.
    pub fn get<T: MatElement>(&self, index: &[usize]) -> Result<T> {
        let offset = checked_flatten(&self.dims, index)?;
        let values = self.typed::<T>()?;
        Ok(values[offset])
    }

    /// Replace the element at a multi-index.
    pub fn set<T: MatElement>(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = checked_flatten(&self.dims, index)?;
        let found = self.data.type_name();
        let values = self
            .data
            .as_mut_slice::<T>()
            .ok_or_else(|| CodecError::type_mismatch(type_label::<T>(), found))?;
        values[offset] = value;
        Ok(())
    }

    fn typed<T: MatElement>(&self) -> Result<&[T]> {
        self.data
            .as_slice::<T>()
            .ok_or_else(|| CodecError::type_mismatch(type_label::<T>(), self.data.type_name()))
    }
}

fn type_label<T: MatElement>() -> String {
    if T::COMPLEX {
        format!("complex {}", T::ELEMENT_TYPE)
    } else {
        T::ELEMENT_TYPE.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_zeros_and_set() {
        let mut array = NumericArray::zeros::<i32>(&[2, 3]);
        assert_eq!(array.as_slice::<i32>().unwrap(), &[0; 6]);
        array.set(&[1, 2], 7i32).unwrap();
        assert_eq!(array.get::<i32>(&[1, 2]).unwrap(), 7);
        assert_eq!(array.as_slice::<i32>().unwrap()[5], 7);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(NumericArray::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]).is_err());
        let array = NumericArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(array.get::<f64>(&[0, 1]).unwrap(), 3.0);
    }

    #[test]
    fn test_type_mismatch() {
        let array = NumericArray::zeros::<u8>(&[1, 1]);
        let err = array.get::<f64>(&[0]).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_complex_array() {
        let array =
            NumericArray::from_vec(vec![Complex64::new(1.0, -1.0)], &[1, 1]).unwrap();
        assert!(array.is_complex());
        assert_eq!(array.element_type(), ElementType::Double);
        assert_eq!(array.get::<Complex64>(&[0, 0]).unwrap(), Complex64::new(1.0, -1.0));
    }

    #[test]
    fn test_out_of_bounds() {
        let array = NumericArray::zeros::<f64>(&[2, 2]);
        assert!(matches!(
            array.get::<f64>(&[2, 0]),
            Err(CodecError::IndexOutOfBounds { .. })
        ));
    }
}
