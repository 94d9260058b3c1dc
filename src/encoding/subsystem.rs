// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Subsystem data block reader.
//!
//! The block is a nested MAT stream (8 bytes of header, then elements). Its
//! first variable is a structure whose `MCOS` field is an opaque object
//! wrapping a cell array. Cell 0 is a binary table blob; cells from index 2
//! on hold field values.
//!
//! The blob starts with a zero-terminated list of 32-bit offsets, followed
//! by the NUL-terminated name table. The offsets delimit these sections:
//!
//! | offsets      | contents                                        |
//! |--------------|-------------------------------------------------|
//! | `[2]..[3]`   | class records (16 bytes each, first is padding) |
//! | `[3]..[4]`   | embedded object records (16 bytes, 8 of header) |
//! | `[4]..[5]`   | object records (24 bytes each, first is padding)|
//! | `[5]..[6]`   | per-object field-to-value tables                |

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::array::Array;
use crate::core::error::{CodecError, Result};
use crate::core::opaque::{
    ClassInfo, ObjectInfo, ObjectLink, OpaqueArray, OpaqueStorage, SubsystemCell, SubsystemData,
    OBJECT_LINK_MAGIC,
};
use crate::encoding::cursor::MatCursor;
use crate::encoding::element::{DataElement, ElementReader};

/// Bytes before the first element of the nested stream.
const NESTED_HEADER_SIZE: usize = 8;

/// Cells before the first field value.
const VALUE_CELL_OFFSET: usize = 2;

/// Parse a subsystem data block.
///
/// Class objects found inside the block refer to `cell` weakly; the caller
/// stores the result in `cell`.
pub fn read_subsystem(bytes: &[u8], cell: &SubsystemCell) -> Result<SubsystemData> {
    let reader = ElementReader::nested(cell);
    let mut cursor = MatCursor::new(bytes);
    cursor.skip(NESTED_HEADER_SIZE)?;

    let mut variables = Vec::new();
    while !cursor.is_at_end() {
        match reader.read_element(&mut cursor)? {
            DataElement::Matrix(matrix) => variables.push(matrix.array),
            other => tracing::debug!(
                element = %other.describe(),
                "skipping non-matrix element in subsystem data"
            ),
        }
    }

    let missing = |what: &str| CodecError::subsystem("layout", format!("missing {what}"));
    let main = variables
        .first()
        .and_then(Array::as_struct)
        .ok_or_else(|| missing("main structure"))?;
    let mcos = main
        .get("MCOS", &[0])
        .map_err(|_| missing("MCOS field"))?
        .as_opaque()
        .ok_or_else(|| missing("MCOS object"))?;
    let cells = mcos
        .raw_data()
        .and_then(Array::as_cell)
        .ok_or_else(|| missing("MCOS cell array"))?
        .as_slice();
    let info = cells
        .first()
        .and_then(Array::as_numeric)
        .and_then(|n| n.as_slice::<u8>())
        .ok_or_else(|| missing("uint8 table blob"))?;

    let data = decode_tables(info, cells, &reader)?;
    tracing::debug!(
        classes = data.classes.len(),
        objects = data.objects.len(),
        values = data.values.len(),
        "read subsystem data"
    );
    Ok(data)
}

#[derive(Debug, Clone, Copy)]
struct ObjectRecord {
    class_id: u32,
    embedded_position: u32,
    object_position: u32,
}

#[derive(Debug, Clone, Copy)]
struct EmbeddedRecord {
    field_id: u32,
    value_index: u32,
}

fn decode_tables(info: &[u8], cells: &[Array], reader: &ElementReader) -> Result<SubsystemData> {
    let (offsets, names_start) = read_offsets(info)?;
    if offsets.len() < 7 {
        return Err(CodecError::subsystem(
            "offsets",
            format!("expected at least 7 offsets, found {}", offsets.len()),
        ));
    }
    let names = read_names(info, names_start, offsets[1])?;
    let class_names = read_class_names(section(info, offsets[2], offsets[3])?, &names)?;
    let embedded = read_embedded_objects(section(info, offsets[3], offsets[4])?)?;
    let records = read_object_records(section(info, offsets[4], offsets[5])?)?;
    let position_count = records.values().filter(|r| r.object_position != 0).count();
    let positions = read_object_positions(section(info, offsets[5], offsets[6])?, position_count)?;

    let classes = gather_classes(&class_names, &names, &records, &positions, &embedded)?;
    let objects = gather_objects(&records, &positions, &embedded)?;

    let mut values = HashMap::new();
    for object in objects.values() {
        for index in object.value_indices() {
            if values.contains_key(&index) {
                continue;
            }
            let source = cells
                .get(index as usize + VALUE_CELL_OFFSET)
                .ok_or_else(|| {
                    CodecError::subsystem("values", format!("value index {index} out of range"))
                })?;
            values.insert(index, resolve_value(source, reader)?);
        }
    }

    Ok(SubsystemData {
        classes,
        objects,
        values,
        field_names: names,
    })
}

fn to_u32(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| CodecError::subsystem(what, format!("negative value {value}")))
}

/// Offsets up to the first zero word, and the position of the name table.
fn read_offsets(info: &[u8]) -> Result<(Vec<usize>, usize)> {
    let mut cursor = MatCursor::new(info);
    let mut offsets = Vec::new();
    loop {
        let word = cursor.read_i32()?;
        if word == 0 {
            break;
        }
        offsets.push(to_u32(word, "offsets")? as usize);
    }
    let mut position = cursor.position();
    if position % 8 != 0 {
        position += 4;
    }
    Ok((offsets, position))
}

fn read_names(info: &[u8], start: usize, count: usize) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(count.min(info.len()));
    let mut rest = info
        .get(start..)
        .ok_or_else(|| CodecError::subsystem("names", "name table starts past the blob"))?;
    for _ in 0..count {
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| CodecError::subsystem("names", "unterminated name"))?;
        names.push(String::from_utf8_lossy(&rest[..end]).into_owned());
        rest = &rest[end + 1..];
    }
    Ok(names)
}

fn section(info: &[u8], start: usize, end: usize) -> Result<&[u8]> {
    info.get(start..end).ok_or_else(|| {
        CodecError::subsystem(
            "sections",
            format!("section {start}..{end} outside {}-byte blob", info.len()),
        )
    })
}

fn name_at(names: &[String], id: u32, what: &str) -> Result<String> {
    (id as usize)
        .checked_sub(1)
        .and_then(|i| names.get(i))
        .cloned()
        .ok_or_else(|| CodecError::subsystem(what, format!("name index {id} out of range")))
}

fn read_class_names(bytes: &[u8], names: &[String]) -> Result<BTreeMap<u32, String>> {
    let count = (bytes.len() / 16)
        .checked_sub(1)
        .ok_or_else(|| CodecError::subsystem("classes", "class section too short"))?;
    let mut cursor = MatCursor::new(bytes);
    // record 0 is padding
    cursor.skip(16)?;
    let mut classes = BTreeMap::new();
    for id in 1..=count {
        cursor.skip(4)?;
        let name_index = to_u32(cursor.read_i32()?, "classes")?;
        cursor.skip(8)?;
        classes.insert(id as u32, name_at(names, name_index, "classes")?);
    }
    Ok(classes)
}

fn read_embedded_objects(bytes: &[u8]) -> Result<BTreeMap<u32, EmbeddedRecord>> {
    let count = bytes
        .len()
        .checked_sub(8)
        .ok_or_else(|| CodecError::subsystem("embedded objects", "section too short"))?
        / 16;
    let mut cursor = MatCursor::new(bytes);
    cursor.skip(8)?;
    let mut embedded = BTreeMap::new();
    for position in 1..=count {
        cursor.skip(4)?;
        let field_id = to_u32(cursor.read_i32()?, "embedded objects")?;
        cursor.skip(4)?;
        let value_index = to_u32(cursor.read_i32()?, "embedded objects")?;
        embedded.insert(
            position as u32,
            EmbeddedRecord {
                field_id,
                value_index,
            },
        );
    }
    Ok(embedded)
}

fn read_object_records(bytes: &[u8]) -> Result<BTreeMap<u32, ObjectRecord>> {
    let count = (bytes.len() / 24)
        .checked_sub(1)
        .ok_or_else(|| CodecError::subsystem("objects", "object section too short"))?;
    let mut cursor = MatCursor::new(bytes);
    cursor.skip(24)?;
    let mut records = BTreeMap::new();
    for id in 1..=count {
        let class_id = to_u32(cursor.read_i32()?, "objects")?;
        cursor.skip(8)?;
        let embedded_position = to_u32(cursor.read_i32()?, "objects")?;
        let object_position = to_u32(cursor.read_i32()?, "objects")?;
        // loading order
        cursor.skip(4)?;
        records.insert(
            id as u32,
            ObjectRecord {
                class_id,
                embedded_position,
                object_position,
            },
        );
    }
    Ok(records)
}

fn read_object_positions(bytes: &[u8], count: usize) -> Result<BTreeMap<u32, HashMap<u32, u32>>> {
    let mut cursor = MatCursor::new(bytes);
    cursor.skip(8)?;
    let mut positions = BTreeMap::new();
    for position in 1..=count {
        let len = to_u32(cursor.read_i32()?, "object fields")?;
        let mut fields = HashMap::new();
        for _ in 0..len {
            let x = cursor.read_i32()?;
            let y = cursor.read_i32()?;
            let value_index = to_u32(cursor.read_i32()?, "object fields")?;
            let field_id = to_u32(x.wrapping_mul(y), "object fields")?;
            fields.insert(field_id, value_index);
        }
        cursor.align();
        positions.insert(position as u32, fields);
    }
    Ok(positions)
}

fn find_record<'r>(
    records: &'r BTreeMap<u32, ObjectRecord>,
    matches: impl Fn(&ObjectRecord) -> bool,
    what: &str,
) -> Result<(u32, &'r ObjectRecord)> {
    records
        .iter()
        .find(|(_, record)| matches(record))
        .map(|(&id, record)| (id, record))
        .ok_or_else(|| CodecError::subsystem("objects", format!("no object at {what}")))
}

fn gather_classes(
    class_names: &BTreeMap<u32, String>,
    names: &[String],
    records: &BTreeMap<u32, ObjectRecord>,
    positions: &BTreeMap<u32, HashMap<u32, u32>>,
    embedded: &BTreeMap<u32, EmbeddedRecord>,
) -> Result<HashMap<u32, ClassInfo>> {
    let mut classes = HashMap::with_capacity(class_names.len());
    for (&class_id, class_name) in class_names {
        let mut field_ids = BTreeSet::new();
        for (&position, fields) in positions {
            let (_, record) = find_record(
                records,
                |r| r.object_position == position,
                &format!("position {position}"),
            )?;
            if record.class_id == class_id {
                field_ids.extend(fields.keys().copied());
            }
        }
        for (&position, entry) in embedded {
            let (_, record) = find_record(
                records,
                |r| r.embedded_position == position,
                &format!("embedded position {position}"),
            )?;
            if record.class_id == class_id {
                field_ids.insert(entry.field_id);
            }
        }
        let fields = field_ids
            .into_iter()
            .map(|id| Ok((name_at(names, id, "fields")?, id)))
            .collect::<Result<Vec<_>>>()?;
        classes.insert(class_id, ClassInfo::new(class_name.clone(), fields));
    }
    Ok(classes)
}

fn gather_objects(
    records: &BTreeMap<u32, ObjectRecord>,
    positions: &BTreeMap<u32, HashMap<u32, u32>>,
    embedded: &BTreeMap<u32, EmbeddedRecord>,
) -> Result<HashMap<u32, ObjectInfo>> {
    let mut objects = HashMap::new();
    for (&position, fields) in positions {
        let (id, _) = find_record(
            records,
            |r| r.object_position == position,
            &format!("position {position}"),
        )?;
        objects.insert(id, ObjectInfo::new(fields.clone()));
    }
    for (&position, entry) in embedded {
        let (id, _) = find_record(
            records,
            |r| r.embedded_position == position,
            &format!("embedded position {position}"),
        )?;
        objects.insert(
            id,
            ObjectInfo::new(HashMap::from([(entry.field_id, entry.value_index)])),
        );
    }
    Ok(objects)
}

/// Field values that are themselves object links become class objects.
fn resolve_value(source: &Array, reader: &ElementReader) -> Result<Array> {
    if let Some(words) = source.as_numeric().and_then(|n| n.as_slice::<u32>()) {
        if words.first() == Some(&OBJECT_LINK_MAGIC) {
            let link = ObjectLink::parse(words)?;
            return Ok(OpaqueArray::new("", "", OpaqueStorage::Link(link), reader.handle()).into());
        }
    }
    Ok(source.clone())
}
