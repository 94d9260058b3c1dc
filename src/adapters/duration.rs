// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `duration` objects, stored as milliseconds in field `millis`.

use chrono::Duration;

use crate::core::array::Array;
use crate::core::dims::checked_flatten;

use super::{object_of_class, AdapterError, Result};

const CLASS: &str = "duration";

/// 100 ns ticks per millisecond.
const TICKS_PER_MILLI: f64 = 10_000.0;

/// View of a `duration` array.
#[derive(Debug, Clone)]
pub struct DurationAdapter {
    dims: Vec<usize>,
    millis: Vec<f64>,
}

impl DurationAdapter {
    pub fn new(array: &Array) -> Result<Self> {
        let object = object_of_class(array, CLASS)?;
        let data = object.field("millis", &[0])?;
        let millis = data
            .to_f64_vec()
            .ok_or_else(|| AdapterError::malformed(CLASS, "millis is not convertible to double"))?;
        Ok(Self {
            dims: data.dims().to_vec(),
            millis,
        })
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Duration at a multi-index, truncated to 100 ns.
    pub fn get(&self, index: &[usize]) -> Result<Duration> {
        let millis = self.millis[checked_flatten(&self.dims, index)?];
        let ticks = (millis * TICKS_PER_MILLI) as i64;
        Ok(Duration::microseconds(ticks / 10) + Duration::nanoseconds((ticks % 10) * 100))
    }
}
