// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `table` objects.

use crate::core::array::Array;
use crate::core::cell::CellArray;
use crate::core::opaque::OpaqueArray;

use super::{char_text, object_of_class, AdapterError, Result};

const CLASS: &str = "table";

/// View of a `table` object.
#[derive(Debug, Clone)]
pub struct TableAdapter<'a> {
    object: &'a OpaqueArray,
    description: String,
    row_count: usize,
    row_names: Vec<String>,
    variable_names: Vec<String>,
}

impl<'a> TableAdapter<'a> {
    /// Build the view; fails if `array` is not a well-formed table.
    pub fn new(array: &'a Array) -> Result<Self> {
        let object = object_of_class(array, CLASS)?;

        let varnames = object.field("varnames", &[0])?;
        let variable_names = char_cell(&varnames, "variable names")?;

        let props = object.field("props", &[0])?;
        let props = props
            .as_struct()
            .ok_or_else(|| AdapterError::malformed(CLASS, "properties must be a structure"))?;
        let description = char_text(props.get("Description", &[0])?, CLASS, "description")?;

        let nrows = object.field("nrows", &[0])?;
        let row_count = nrows
            .to_f64_vec()
            .and_then(|v| v.first().copied())
            .ok_or_else(|| AdapterError::malformed(CLASS, "row count not found"))?
            as usize;

        let rownames = object.field("rownames", &[0])?;
        let row_names = char_cell(&rownames, "row names")?;

        Ok(Self {
            object,
            description,
            row_count,
            row_names,
            variable_names,
        })
    }

    /// Table description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Row names; empty when the table has none.
    #[must_use]
    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    /// Variable (column) names.
    #[must_use]
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Number of variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variable_names.len()
    }

    /// Column data of a variable.
    pub fn get(&self, name: &str) -> Result<Array> {
        let position = self
            .variable_names
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| AdapterError::NoSuchVariable(name.to_string()))?;
        let data = self.object.field("data", &[0])?;
        let cells = data
            .as_cell()
            .ok_or_else(|| AdapterError::malformed(CLASS, "data must be a cell array"))?;
        Ok(cells.get(&[position])?.clone())
    }
}

fn char_cell(value: &Array, what: &str) -> Result<Vec<String>> {
    let cells: &CellArray = value
        .as_cell()
        .ok_or_else(|| AdapterError::malformed(CLASS, format!("{what} must be a cell array")))?;
    cells
        .iter()
        .map(|cell| char_text(cell, CLASS, what))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures::linked_object;
    use crate::core::char_array::CharArray;
    use crate::core::numeric::NumericArray;
    use crate::core::structure::StructArray;

    fn names(values: &[&str]) -> Array {
        let cells = values.iter().map(|v| CharArray::new(*v).into()).collect();
        CellArray::from_vec(cells, &[1, values.len()]).unwrap().into()
    }

    fn table() -> Array {
        let props = StructArray::from_fields(
            vec![("Description".into(), vec![CharArray::new("weather").into()])],
            &[1, 1],
        )
        .unwrap();
        let columns = CellArray::from_vec(
            vec![
                NumericArray::from_vec(vec![20.5, 22.0], &[2, 1]).unwrap().into(),
                CharArray::with_dims("NS", &[2, 1]).into(),
            ],
            &[1, 2],
        )
        .unwrap();
        linked_object(
            CLASS,
            vec![
                ("data", columns.into()),
                ("nrows", NumericArray::from_vec(vec![2.0], &[1, 1]).unwrap().into()),
                ("rownames", names(&["mon", "tue"])),
                ("varnames", names(&["temp", "wind"])),
                ("props", props.into()),
            ],
        )
    }

    #[test]
    fn test_table_metadata() {
        let array = table();
        let table = TableAdapter::new(&array).unwrap();
        assert_eq!(table.description(), "weather");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.variable_count(), 2);
        assert_eq!(table.variable_names(), &["temp", "wind"]);
        assert_eq!(table.row_names(), &["mon", "tue"]);
    }

    #[test]
    fn test_table_columns() {
        let array = table();
        let table = TableAdapter::new(&array).unwrap();
        let temp = table.get("temp").unwrap();
        assert_eq!(temp.to_f64_vec(), Some(vec![20.5, 22.0]));
        assert!(matches!(
            table.get("rain"),
            Err(AdapterError::NoSuchVariable(_))
        ));
    }

    #[test]
    fn test_wrong_class_rejected() {
        let array = linked_object("timetable", vec![]);
        assert!(matches!(
            TableAdapter::new(&array),
            Err(AdapterError::WrongClass { .. })
        ));
    }
}
