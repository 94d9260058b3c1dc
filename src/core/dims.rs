// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dimension and index arithmetic.
//!
//! All arrays are stored in column-major order: the first dimension varies
//! fastest. The linear offset of `(i0, i1, i2, ...)` in an array of
//! dimensions `(d0, d1, d2, ...)` is `i0 + d0*i1 + d0*d1*i2 + ...`.

use crate::core::error::{CodecError, Result};

/// Number of elements described by `dims`.
///
/// The product of an empty dimension list is 1. Saturates instead of
/// overflowing on corrupt dimensions.
#[must_use]
pub fn element_count(dims: &[usize]) -> usize {
    dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
}

/// Column-major linear offset of a multi-index.
///
/// Fewer indices than dimensions are allowed; the last index given then
/// acts as a linear index into the trailing dimensions. A single index is
/// therefore a plain linear index.
#[must_use]
pub fn flatten(dims: &[usize], index: &[usize]) -> usize {
    let mut stride = 1usize;
    let mut offset = 0usize;
    for (position, &i) in index.iter().enumerate() {
        offset += i * stride;
        stride *= dims.get(position).copied().unwrap_or(1);
    }
    offset
}

/// Like [`flatten`], but rejects indices that fall outside the array.
pub fn checked_flatten(dims: &[usize], index: &[usize]) -> Result<usize> {
    let last = index.len().saturating_sub(1);
    let in_range = index.len() <= dims.len().max(1)
        && index
            .iter()
            .enumerate()
            .all(|(position, &i)| position == last || dims.get(position).is_some_and(|&d| i < d));
    let offset = flatten(dims, index);
    if !in_range || offset >= element_count(dims) {
        return Err(CodecError::index_out_of_bounds(index, dims));
    }
    Ok(offset)
}

/// Multi-index (one entry per dimension) of a column-major linear offset.
#[must_use]
pub fn unflatten(dims: &[usize], mut offset: usize) -> Vec<usize> {
    let mut index = Vec::with_capacity(dims.len());
    for &d in dims {
        if d == 0 {
            index.push(0);
            continue;
        }
        index.push(offset % d);
        offset /= d;
    }
    index
}

/// Validate that `len` elements fill an array of dimensions `dims`.
pub fn check_len(dims: &[usize], len: usize) -> Result<()> {
    let expected = element_count(dims);
    if expected != len {
        return Err(CodecError::DimensionMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(&[2, 3, 4]), 24);
        assert_eq!(element_count(&[0, 0]), 0);
        assert_eq!(element_count(&[]), 1);
    }

    #[test]
    fn test_flatten_column_major() {
        let dims = [2, 3, 4];
        assert_eq!(flatten(&dims, &[0, 0, 0]), 0);
        assert_eq!(flatten(&dims, &[1, 0, 0]), 1);
        assert_eq!(flatten(&dims, &[0, 1, 0]), 2);
        assert_eq!(flatten(&dims, &[1, 2, 3]), 1 + 2 * 2 + 6 * 3);
    }

    #[test]
    fn test_flatten_linear_index() {
        assert_eq!(flatten(&[4, 5], &[13]), 13);
        assert_eq!(flatten(&[4, 5], &[]), 0);
    }

    #[test]
    fn test_flatten_unflatten_law() {
        let shapes: [&[usize]; 4] = [&[1], &[4, 5], &[2, 3, 4], &[3, 1, 2, 2]];
        for dims in shapes {
            let count = element_count(dims);
            let mut seen = vec![false; count];
            for offset in 0..count {
                let index = unflatten(dims, offset);
                assert_eq!(index.len(), dims.len());
                let back = flatten(dims, &index);
                assert_eq!(back, offset);
                assert!(!seen[back], "flatten is not injective for {dims:?}");
                seen[back] = true;
                assert_eq!(unflatten(dims, back), index);
            }
        }
    }

    #[test]
    fn test_checked_flatten() {
        let dims = [2, 3];
        assert_eq!(checked_flatten(&dims, &[1, 2]).unwrap(), 5);
        assert_eq!(checked_flatten(&dims, &[5]).unwrap(), 5);
        assert!(checked_flatten(&dims, &[2, 0]).is_err());
        assert!(checked_flatten(&dims, &[0, 3]).is_err());
        assert!(checked_flatten(&dims, &[6]).is_err());
        assert!(checked_flatten(&dims, &[0, 0, 0]).is_err());
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(&[2, 3], 6).is_ok());
        assert!(matches!(
            check_len(&[2, 3], 5),
            Err(CodecError::DimensionMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }
}
