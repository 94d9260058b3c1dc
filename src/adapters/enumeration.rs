// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Enumeration instances.
//!
//! An enumeration array is an inline opaque record whose data is a
//! structure. `ValueNames` holds 1-based indices into the subsystem name
//! table, one per enumeration member; `ValueIndices` holds, per element,
//! a 0-based index into that member list.

use crate::core::array::Array;
use crate::core::numeric::NumericArray;
use crate::core::structure::StructArray;

use super::{AdapterError, Result};

const CLASS: &str = "enumeration";

/// View of an enumeration array.
#[derive(Debug, Clone)]
pub struct EnumAdapter {
    class_name: String,
    value_names: Vec<String>,
    values: NumericArray,
}

impl EnumAdapter {
    pub fn new(array: &Array) -> Result<Self> {
        let object = array.as_opaque().ok_or(AdapterError::NotAnObject)?;
        let data = object
            .raw_data()
            .and_then(Array::as_struct)
            .ok_or_else(|| AdapterError::malformed(CLASS, "data must be an inline structure"))?;

        let names = object.subsystem_names()?;
        let value_names = uint32_field(data, "ValueNames")?
            .as_slice::<u32>()
            .unwrap_or_default()
            .iter()
            .map(|&i| {
                (i as usize)
                    .checked_sub(1)
                    .and_then(|i| names.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        AdapterError::malformed(CLASS, format!("no member name at index {i}"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let values = uint32_field(data, "ValueIndices")?.clone();

        Ok(Self {
            class_name: object.class_name()?,
            value_names,
            values,
        })
    }

    /// Enumeration class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Member names in declaration order.
    #[must_use]
    pub fn value_names(&self) -> &[String] {
        &self.value_names
    }

    /// Per-element member indices, shaped like the enumeration array.
    #[must_use]
    pub fn values(&self) -> &NumericArray {
        &self.values
    }

    /// Member name of an element.
    pub fn name_at(&self, index: &[usize]) -> Result<&str> {
        let member = self.values.get::<u32>(index)? as usize;
        self.value_names
            .get(member)
            .map(String::as_str)
            .ok_or_else(|| AdapterError::malformed(CLASS, format!("member {member} out of range")))
    }
}

fn uint32_field<'a>(data: &'a StructArray, field: &str) -> Result<&'a NumericArray> {
    data.get(field, &[0])?
        .as_numeric()
        .filter(|n| n.as_slice::<u32>().is_some())
        .ok_or_else(|| AdapterError::malformed(CLASS, format!("{field} must be uint32")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, OnceLock};

    use crate::core::opaque::{
        OpaqueArray, OpaqueStorage, SubsystemCell, SubsystemData, SubsystemHandle,
    };

    fn weekday(indices: Vec<u32>, names: Vec<u32>) -> (SubsystemCell, Array) {
        let cell: SubsystemCell = Arc::new(OnceLock::new());
        let _ = cell.set(SubsystemData {
            field_names: vec!["Weekday".into(), "Monday".into(), "Tuesday".into()],
            ..Default::default()
        });
        let count = names.len();
        let len = indices.len();
        let data = StructArray::from_fields(
            vec![
                ("builtinClassName".into(), vec![Array::Empty]),
                (
                    "ValueNames".into(),
                    vec![NumericArray::from_vec(names, &[count, 1]).unwrap().into()],
                ),
                (
                    "ValueIndices".into(),
                    vec![NumericArray::from_vec(indices, &[1, len]).unwrap().into()],
                ),
            ],
            &[1, 1],
        )
        .unwrap();
        let object = OpaqueArray::new(
            "MCOS",
            "Weekday",
            OpaqueStorage::Raw(Box::new(data.into())),
            SubsystemHandle::strong(&cell),
        );
        (cell, object.into())
    }

    #[test]
    fn test_enum_members() {
        let (_cell, array) = weekday(vec![1, 0, 1], vec![2, 3]);
        let adapter = EnumAdapter::new(&array).unwrap();
        assert_eq!(adapter.class_name(), "Weekday");
        assert_eq!(adapter.value_names(), &["Monday", "Tuesday"]);
        assert_eq!(adapter.values().dims(), &[1, 3]);
        assert_eq!(adapter.name_at(&[0, 0]).unwrap(), "Tuesday");
        assert_eq!(adapter.name_at(&[0, 1]).unwrap(), "Monday");
    }

    #[test]
    fn test_bad_name_index() {
        let (_cell, array) = weekday(vec![0], vec![0]);
        assert!(matches!(
            EnumAdapter::new(&array),
            Err(AdapterError::Malformed { .. })
        ));
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            EnumAdapter::new(&Array::Empty),
            Err(AdapterError::NotAnObject)
        ));
    }
}
