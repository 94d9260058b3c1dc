// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Class objects and the subsystem data they resolve against.
//!
//! MATLAB stores class-object arrays (`table`, `datetime`, `string`, user
//! classes) as opaque records. Simple objects carry their data inline. Most
//! carry an [`ObjectLink`] instead: per-element object ids and a class index
//! into a table held once per file in the subsystem data block, which the
//! file places after the records that refer to it.
//!
//! Links therefore hold a [`SubsystemHandle`] to a write-once cell. The
//! reader fills the cell when it reaches the subsystem block, after which
//! every link created earlier resolves. Links created while parsing the
//! subsystem block itself hold a weak handle, so the cell does not own a
//! cycle back to itself; values handed out by [`OpaqueArray::field`] are
//! re-attached to a strong handle.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::core::array::Array;
use crate::core::dims::{checked_flatten, element_count};
use crate::core::error::{CodecError, Result};

/// Word that marks a `uint32` buffer inside subsystem data as an object link.
pub const OBJECT_LINK_MAGIC: u32 = 0xDD00_0000;

/// Shared write-once cell holding a file's subsystem data.
pub type SubsystemCell = Arc<OnceLock<SubsystemData>>;

/// Class metadata from the subsystem data block.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    name: String,
    // (field name, field id), ordered by field id
    fields: Vec<(String, u32)>,
}

impl ClassInfo {
    /// Create class metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, mut fields: Vec<(String, u32)>) -> Self {
        fields.sort_by_key(|&(_, id)| id);
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names ordered by field id.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Field id of a named field.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<u32> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|&(_, id)| id)
    }
}

/// Field values of one object: field id to value index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectInfo {
    field_links: HashMap<u32, u32>,
}

impl ObjectInfo {
    /// Create object metadata.
    #[must_use]
    pub fn new(field_links: HashMap<u32, u32>) -> Self {
        Self { field_links }
    }

    /// Value index of a field.
    #[must_use]
    pub fn value_index(&self, field_id: u32) -> Option<u32> {
        self.field_links.get(&field_id).copied()
    }

    /// All value indices this object refers to.
    pub fn value_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.field_links.values().copied()
    }
}

/// Resolved subsystem data of one file.
#[derive(Debug, Clone, Default)]
pub struct SubsystemData {
    /// Class id to class metadata
    pub classes: HashMap<u32, ClassInfo>,
    /// Object id to object metadata
    pub objects: HashMap<u32, ObjectInfo>,
    /// Value index to value
    pub values: HashMap<u32, Array>,
    /// Name table shared by classes, fields and enumerations
    pub field_names: Vec<String>,
}

impl SubsystemData {
    fn resolve(&self, link: &ObjectLink, field: &str, index: &[usize]) -> Result<&Array> {
        let class = self.class(link.class_index)?;
        let field_id = class
            .find_field(field)
            .ok_or_else(|| CodecError::field_not_found(field))?;
        let offset = checked_flatten(&link.dims, index)?;
        let object_id = link.object_ids[offset];
        let object = self.objects.get(&object_id).ok_or_else(|| {
            CodecError::subsystem("object lookup", format!("no object with id {object_id}"))
        })?;
        let value_index = object
            .value_index(field_id)
            .ok_or_else(|| CodecError::field_not_found(field))?;
        self.values.get(&value_index).ok_or_else(|| {
            CodecError::subsystem("value lookup", format!("no value with index {value_index}"))
        })
    }

    fn class(&self, class_index: u32) -> Result<&ClassInfo> {
        self.classes.get(&class_index).ok_or_else(|| {
            CodecError::subsystem("class lookup", format!("no class with id {class_index}"))
        })
    }
}

#[derive(Clone, Default)]
enum HandleInner {
    Strong(SubsystemCell),
    Weak(Weak<OnceLock<SubsystemData>>),
    #[default]
    Detached,
}

/// Reference from an object to its file's subsystem data.
#[derive(Clone, Default)]
pub struct SubsystemHandle {
    inner: HandleInner,
}

impl SubsystemHandle {
    /// Handle that keeps the cell alive.
    #[must_use]
    pub fn strong(cell: &SubsystemCell) -> Self {
        Self {
            inner: HandleInner::Strong(Arc::clone(cell)),
        }
    }

    /// Handle that does not keep the cell alive.
    #[must_use]
    pub fn weak(cell: &SubsystemCell) -> Self {
        Self {
            inner: HandleInner::Weak(Arc::downgrade(cell)),
        }
    }

    /// Handle with no subsystem data behind it.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// The cell, if it is still alive.
    #[must_use]
    pub fn cell(&self) -> Option<SubsystemCell> {
        match &self.inner {
            HandleInner::Strong(cell) => Some(Arc::clone(cell)),
            HandleInner::Weak(weak) => weak.upgrade(),
            HandleInner::Detached => None,
        }
    }

    /// Run `f` against the resolved data.
    pub fn with_data<R>(
        &self,
        f: impl FnOnce(&SubsystemData, &SubsystemCell) -> Result<R>,
    ) -> Result<R> {
        let cell = self.cell().ok_or(CodecError::UnresolvedLink)?;
        let data = cell.get().ok_or(CodecError::UnresolvedLink)?;
        f(data, &cell)
    }

    /// True once the subsystem data is available.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.cell().is_some_and(|cell| cell.get().is_some())
    }

    fn upgrade(&mut self, cell: &SubsystemCell) {
        if let HandleInner::Weak(_) = self.inner {
            self.inner = HandleInner::Strong(Arc::clone(cell));
        }
    }
}

impl fmt::Debug for SubsystemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (&self.inner, self.is_resolved()) {
            (HandleInner::Detached, _) => "detached",
            (_, true) => "resolved",
            (_, false) => "unresolved",
        };
        write!(f, "SubsystemHandle({state})")
    }
}

/// Per-element object ids and the class they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLink {
    dims: Vec<usize>,
    object_ids: Vec<u32>,
    class_index: u32,
}

impl ObjectLink {
    /// Parse `[magic, ndims, dims..., object ids..., class index]`.
    pub fn parse(words: &[u32]) -> Result<Self> {
        let malformed = |message: &str| CodecError::parse("object link", message.to_string());
        let ndims = *words.get(1).ok_or_else(|| malformed("missing dimension count"))? as usize;
        let dims: Vec<usize> = words
            .get(2..2 + ndims)
            .ok_or_else(|| malformed("dimensions truncated"))?
            .iter()
            .map(|&d| d as usize)
            .collect();
        let count = element_count(&dims);
        let start = 2 + ndims;
        let end = start
            .checked_add(count)
            .ok_or_else(|| malformed("object count overflows"))?;
        let object_ids = words
            .get(start..end)
            .ok_or_else(|| malformed("object ids truncated"))?
            .to_vec();
        let class_index = *words
            .get(end)
            .ok_or_else(|| malformed("missing class index"))?;
        Ok(Self {
            dims,
            object_ids,
            class_index,
        })
    }

    /// Dimensions of the object array.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Object ids in column-major order.
    #[must_use]
    pub fn object_ids(&self) -> &[u32] {
        &self.object_ids
    }

    /// Class id.
    #[must_use]
    pub fn class_index(&self) -> u32 {
        self.class_index
    }
}

/// How an opaque record stores its data.
#[derive(Debug, Clone, PartialEq)]
pub enum OpaqueStorage {
    /// Data carried inline
    Raw(Box<Array>),
    /// Data held in the subsystem tables
    Link(ObjectLink),
}

/// MATLAB class object.
#[derive(Debug, Clone)]
pub struct OpaqueArray {
    type_description: String,
    class_name: String,
    storage: OpaqueStorage,
    subsystem: SubsystemHandle,
}

impl OpaqueArray {
    /// Create an opaque array.
    pub fn new(
        type_description: impl Into<String>,
        class_name: impl Into<String>,
        storage: OpaqueStorage,
        subsystem: SubsystemHandle,
    ) -> Self {
        Self {
            type_description: type_description.into(),
            class_name: class_name.into(),
            storage,
            subsystem,
        }
    }

    /// Type description, e.g. `"MCOS"`.
    #[must_use]
    pub fn type_description(&self) -> &str {
        &self.type_description
    }

    /// Storage.
    #[must_use]
    pub fn storage(&self) -> &OpaqueStorage {
        &self.storage
    }

    /// True if field access goes through the subsystem tables.
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self.storage, OpaqueStorage::Link(_))
    }

    /// Inline data of a non-link object.
    #[must_use]
    pub fn raw_data(&self) -> Option<&Array> {
        match &self.storage {
            OpaqueStorage::Raw(data) => Some(data),
            OpaqueStorage::Link(_) => None,
        }
    }

    /// Dimensions. Inline objects report no dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        match &self.storage {
            OpaqueStorage::Raw(_) => &[],
            OpaqueStorage::Link(link) => link.dims(),
        }
    }

    /// Class name; links look it up in the subsystem class table.
    pub fn class_name(&self) -> Result<String> {
        match &self.storage {
            OpaqueStorage::Raw(_) => Ok(self.class_name.clone()),
            OpaqueStorage::Link(link) => self
                .subsystem
                .with_data(|data, _| Ok(data.class(link.class_index)?.name().to_string())),
        }
    }

    /// Class name as written in the record itself.
    #[must_use]
    pub fn declared_class_name(&self) -> &str {
        &self.class_name
    }

    /// Field names of the object's class.
    pub fn field_names(&self) -> Result<Vec<String>> {
        match &self.storage {
            OpaqueStorage::Raw(data) => Ok(match data.as_ref() {
                Array::Struct(s) => s.field_names().map(str::to_string).collect(),
                _ => Vec::new(),
            }),
            OpaqueStorage::Link(link) => self.subsystem.with_data(|data, _| {
                Ok(data
                    .class(link.class_index)?
                    .field_names()
                    .map(str::to_string)
                    .collect())
            }),
        }
    }

    /// Value of `field` for the object at a multi-index.
    ///
    /// Inline structure data is borrowed; linked values are cloned out of
    /// the subsystem tables.
    pub fn field(&self, field: &str, index: &[usize]) -> Result<Cow<'_, Array>> {
        match &self.storage {
            OpaqueStorage::Raw(data) => match data.as_ref() {
                Array::Struct(s) => Ok(Cow::Borrowed(s.get(field, index)?)),
                _ => Err(CodecError::field_not_found(field)),
            },
            OpaqueStorage::Link(link) => self.subsystem.with_data(|data, cell| {
                let mut value = data.resolve(link, field, index)?.clone();
                value.upgrade_links(cell);
                Ok(Cow::Owned(value))
            }),
        }
    }

    /// Shared name table of the subsystem data.
    pub fn subsystem_names(&self) -> Result<Vec<String>> {
        self.subsystem
            .with_data(|data, _| Ok(data.field_names.clone()))
    }

    /// Subsystem handle.
    #[must_use]
    pub fn subsystem(&self) -> &SubsystemHandle {
        &self.subsystem
    }

    pub(crate) fn upgrade_links(&mut self, cell: &SubsystemCell) {
        self.subsystem.upgrade(cell);
        if let OpaqueStorage::Raw(data) = &mut self.storage {
            data.upgrade_links(cell);
        }
    }
}

impl PartialEq for OpaqueArray {
    fn eq(&self, other: &Self) -> bool {
        self.type_description == other.type_description
            && self.class_name == other.class_name
            && self.storage == other.storage
    }
}
