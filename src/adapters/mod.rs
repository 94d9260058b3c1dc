// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed views over common MATLAB class objects.
//!
//! - [`TableAdapter`] - `table`
//! - [`DatetimeAdapter`] - `datetime`
//! - [`DurationAdapter`] - `duration`
//! - [`StringAdapter`] - `string`
//! - [`EnumAdapter`] - enumeration instances

pub mod datetime;
pub mod duration;
pub mod enumeration;
pub mod string;
pub mod table;

pub use datetime::DatetimeAdapter;
pub use duration::DurationAdapter;
pub use enumeration::EnumAdapter;
pub use string::StringAdapter;
pub use table::TableAdapter;

use thiserror::Error;

use crate::core::array::Array;
use crate::core::error::CodecError;
use crate::core::opaque::OpaqueArray;

/// Errors raised while building an adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("value is not a class object")]
    NotAnObject,

    #[error("expected an object of class '{expected}', found '{found}'")]
    WrongClass { expected: String, found: String },

    #[error("malformed {class} object: {message}")]
    Malformed { class: String, message: String },

    #[error("table has no variable '{0}'")]
    NoSuchVariable(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl AdapterError {
    pub(crate) fn malformed(class: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            class: class.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for adapters.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// The object behind `array`, checked to be of class `class`.
fn object_of_class<'a>(array: &'a Array, class: &str) -> Result<&'a OpaqueArray> {
    let object = array.as_opaque().ok_or(AdapterError::NotAnObject)?;
    let found = object.class_name()?;
    if found != class {
        return Err(AdapterError::WrongClass {
            expected: class.to_string(),
            found,
        });
    }
    Ok(object)
}

/// Text of a character array.
fn char_text(value: &Array, class: &str, what: &str) -> Result<String> {
    value
        .as_char()
        .map(|c| c.as_str().to_string())
        .ok_or_else(|| AdapterError::malformed(class, format!("{what} must be a char array")))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Resolved linked objects for adapter tests.

    use std::collections::HashMap;
    use std::sync::{Arc, OnceLock};

    use crate::core::array::Array;
    use crate::core::opaque::{
        ClassInfo, ObjectInfo, ObjectLink, OpaqueArray, OpaqueStorage, SubsystemCell,
        SubsystemData, SubsystemHandle, OBJECT_LINK_MAGIC,
    };

    /// A 1x1 linked object of class `class` whose fields hold `fields`.
    pub fn linked_object(class: &str, fields: Vec<(&str, Array)>) -> Array {
        let mut data = SubsystemData::default();
        let mut field_ids = Vec::new();
        let mut links = HashMap::new();
        for (position, (name, value)) in fields.into_iter().enumerate() {
            let id = position as u32 + 2;
            field_ids.push((name.to_string(), id));
            links.insert(id, position as u32);
            data.values.insert(position as u32, value);
        }
        data.classes.insert(1, ClassInfo::new(class, field_ids));
        data.objects.insert(1, ObjectInfo::new(links));
        let cell: SubsystemCell = Arc::new(OnceLock::new());
        let _ = cell.set(data);
        let link = ObjectLink::parse(&[OBJECT_LINK_MAGIC, 2, 1, 1, 1, 1]).unwrap();
        OpaqueArray::new(
            "MCOS",
            class,
            OpaqueStorage::Link(link),
            SubsystemHandle::strong(&cell),
        )
        .into()
    }
}
