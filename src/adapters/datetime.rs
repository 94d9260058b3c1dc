// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `datetime` objects.
//!
//! Instants are stored as milliseconds since 1970-01-01 UTC in a double
//! array. Some producers store a complex array; only the real part carries
//! the instant.

use chrono::{DateTime, Utc};

use crate::core::array::Array;
use crate::core::dims::checked_flatten;

use super::{object_of_class, AdapterError, Result};

const CLASS: &str = "datetime";

/// Milliseconds of 0001-01-01T00:00:00Z.
const MIN_MILLIS: f64 = -62_135_596_800_000.0;

/// Milliseconds of 9999-12-31T23:59:59.999Z.
const MAX_MILLIS: f64 = 253_402_300_799_999.0;

/// View of a `datetime` array.
#[derive(Debug, Clone)]
pub struct DatetimeAdapter {
    dims: Vec<usize>,
    millis: Vec<f64>,
}

impl DatetimeAdapter {
    /// Build the view; fails if `array` is not a `datetime` object.
    pub fn new(array: &Array) -> Result<Self> {
        let object = object_of_class(array, CLASS)?;
        let data = object.field("data", &[0])?;
        let numeric = data
            .as_numeric()
            .ok_or_else(|| AdapterError::malformed(CLASS, "data must be numeric"))?;
        let millis = numeric
            .data()
            .to_complex_vec()
            .ok_or_else(|| AdapterError::malformed(CLASS, "data is not convertible to double"))?
            .into_iter()
            .map(|c| c.re)
            .collect();
        Ok(Self {
            dims: numeric.dims().to_vec(),
            millis,
        })
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Instant at a multi-index; `None` for NaN and out-of-range values.
    pub fn get(&self, index: &[usize]) -> Result<Option<DateTime<Utc>>> {
        let millis = self.millis[checked_flatten(&self.dims, index)?];
        if !(MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
            return Ok(None);
        }
        let whole = millis.floor();
        let nanos = ((millis - whole) * 1_000_000.0).round() as i64;
        Ok(DateTime::from_timestamp_millis(whole as i64)
            .and_then(|t| t.checked_add_signed(chrono::Duration::nanoseconds(nanos))))
    }
}
