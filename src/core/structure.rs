// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Structure arrays.
//!
//! A structure array owns an ordered list of named fields. Each field holds
//! one [`Array`] per element position, so `get(field, index)` and
//! `element(index).get(field)` always see the same value.

use crate::core::array::Array;
use crate::core::dims::{check_len, checked_flatten, element_count};
use crate::core::error::{CodecError, Result};
use crate::core::opaque::SubsystemCell;

/// One named field with a value per element position.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    name: String,
    values: Vec<Array>,
}

impl StructField {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in column-major element order.
    #[must_use]
    pub fn values(&self) -> &[Array] {
        &self.values
    }
}

/// MATLAB structure array.
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    dims: Vec<usize>,
    fields: Vec<StructField>,
}

impl StructArray {
    /// Structure array whose fields all hold empty arrays.
    ///
    /// Duplicate field names are collapsed, keeping the first position.
    pub fn new<I, S>(field_names: I, dims: &[usize]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut array = Self {
            dims: dims.to_vec(),
            fields: Vec::new(),
        };
        for name in field_names {
            array.add_field(name);
        }
        array
    }

    /// Structure array from fields with explicit values.
    pub fn from_fields(fields: Vec<(String, Vec<Array>)>, dims: &[usize]) -> Result<Self> {
        let mut array = Self {
            dims: dims.to_vec(),
            fields: Vec::with_capacity(fields.len()),
        };
        for (name, values) in fields {
            check_len(dims, values.len())?;
            if array.position(&name).is_some() {
                return Err(CodecError::parse(
                    "struct field names",
                    format!("duplicate field name '{name}'"),
                ));
            }
            array.fields.push(StructField { name, values });
        }
        Ok(array)
    }

    /// Dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of element positions.
    #[must_use]
    pub fn len(&self) -> usize {
        element_count(&self.dims)
    }

    /// True if there are no element positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    /// True if the field exists.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Append a field holding empty arrays. Existing fields are left alone.
    pub fn add_field(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.position(&name).is_none() {
            let values = vec![Array::Empty; self.len()];
            self.fields.push(StructField { name, values });
        }
    }

    /// Value of `field` at a multi-index.
    pub fn get(&self, field: &str, index: &[usize]) -> Result<&Array> {
        let offset = checked_flatten(&self.dims, index)?;
        Ok(&self.field(field)?.values[offset])
    }

    /// Replace the value of `field` at a multi-index.
    pub fn set(&mut self, field: &str, index: &[usize], value: impl Into<Array>) -> Result<()> {
        let offset = checked_flatten(&self.dims, index)?;
        let position = self
            .position(field)
            .ok_or_else(|| CodecError::field_not_found(field))?;
        self.fields[position].values[offset] = value.into();
        Ok(())
    }

    /// All field values of one element position.
    pub fn element(&self, index: &[usize]) -> Result<StructElement<'_>> {
        let offset = checked_flatten(&self.dims, index)?;
        Ok(StructElement {
            array: self,
            offset,
        })
    }

    pub(crate) fn upgrade_links(&mut self, cell: &SubsystemCell) {
        for field in &mut self.fields {
            for value in &mut field.values {
                value.upgrade_links(cell);
            }
        }
    }

    fn field(&self, name: &str) -> Result<&StructField> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| CodecError::field_not_found(name))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Map view of one element of a structure array.
#[derive(Debug, Clone, Copy)]
pub struct StructElement<'a> {
    array: &'a StructArray,
    offset: usize,
}

impl<'a> StructElement<'a> {
    /// Value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'a Array> {
        self.array
            .fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| &f.values[self.offset])
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.fields.len()
    }

    /// True if the structure has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.fields.is_empty()
    }

    /// `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Array)> + 'a {
        let offset = self.offset;
        self.array
            .fields
            .iter()
            .map(move |f| (f.name.as_str(), &f.values[offset]))
    }
}
