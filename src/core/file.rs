// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variables and files.

use std::collections::HashMap;
use std::ops::Index;

use crate::core::array::Array;
use crate::core::error::{CodecError, Result};

/// A named top-level value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Value
    pub value: Array,
    /// Declared with `global`
    pub global: bool,
}

impl Variable {
    /// Create a variable.
    pub fn new(name: impl Into<String>, value: impl Into<Array>, global: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            global,
        }
    }
}

/// Contents of a MAT-file: variables in order of first definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatFile {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl MatFile {
    /// File with no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable. A later variable with the same name replaces the
    /// value but keeps the position of the first definition.
    pub fn insert(&mut self, variable: Variable) {
        match self.index.get(&variable.name) {
            Some(&position) => self.variables[position] = variable,
            None => {
                self.index
                    .insert(variable.name.clone(), self.variables.len());
                self.variables.push(variable);
            }
        }
    }

    /// Variables in file order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if the file has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variable by name.
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.try_get(name)
            .ok_or_else(|| CodecError::variable_not_found(name))
    }

    /// Variable by name, if present.
    #[must_use]
    pub fn try_get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&position| &self.variables[position])
    }

    /// Iterate over variables in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for MatFile {
    fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self {
        let mut file = MatFile::new();
        for variable in iter {
            file.insert(variable);
        }
        file
    }
}

impl Index<usize> for MatFile {
    type Output = Variable;

    fn index(&self, index: usize) -> &Self::Output {
        &self.variables[index]
    }
}

impl<'a> IntoIterator for &'a MatFile {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::char_array::CharArray;

    #[test]
    fn test_later_definition_overwrites_in_place() {
        let file: MatFile = [
            Variable::new("a", CharArray::new("first"), false),
            Variable::new("b", Array::Empty, false),
            Variable::new("a", CharArray::new("second"), true),
        ]
        .into_iter()
        .collect();
        assert_eq!(file.len(), 2);
        assert_eq!(file[0].name, "a");
        assert!(file[0].global);
        assert_eq!(file[0].value.as_char().unwrap().as_str(), "second");
        assert_eq!(file[1].name, "b");
    }

    #[test]
    fn test_lookup() {
        let file: MatFile = std::iter::once(Variable::new("x", Array::Empty, false)).collect();
        assert!(file.get("x").is_ok());
        assert!(file.try_get("y").is_none());
        let err = file.get("y").unwrap_err();
        assert!(matches!(err, CodecError::VariableNotFound { .. }));
        assert!(err.is_contract_violation());
    }
}
