// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use num_complex::{Complex, Complex64};

use matcodec::{
    Array, CellArray, CharArray, CompressionUsage, MatFile, NumericArray, SparseArray,
    StructArray, Variable, WriterBuilder,
};

// ============================================================================
// Temporary Files
// ============================================================================

/// Get a temporary directory for test files
pub fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id());
    std::env::temp_dir().join(format!(
        "matcodec_test_{}_{}_{}",
        std::process::id(),
        thread_id.replace(|c: char| !c.is_ascii_alphanumeric(), ""),
        random
    ))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    (path, CleanupGuard(dir))
}

/// Cleanup guard for test temporary files
pub struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Value Fixtures
// ============================================================================

pub fn doubles(values: Vec<f64>, dims: &[usize]) -> Array {
    NumericArray::from_vec(values, dims).unwrap().into()
}

/// The 2x3 struct array with fields `x` and `y`, element (i, j) holding
/// `x = 10*i + j` and `y = 'i,j'`.
pub fn xy_struct() -> StructArray {
    let mut s = StructArray::new(["x", "y"], &[2, 3]);
    for i in 0..2 {
        for j in 0..3 {
            s.set("x", &[i, j], doubles(vec![(10 * i + j) as f64], &[1, 1]))
                .unwrap();
            s.set("y", &[i, j], CharArray::new(format!("{i},{j}"))).unwrap();
        }
    }
    s
}

/// The 4x5 sparse double matrix with entries (1,2)=3.5 and (3,0)=-1.
pub fn sparse_4x5() -> SparseArray {
    let mut sparse = SparseArray::new::<f64>(&[4, 5]).unwrap();
    let matrix = sparse.as_matrix_mut::<f64>().unwrap();
    matrix.set(1, 2, 3.5).unwrap();
    matrix.set(3, 0, -1.0).unwrap();
    sparse
}

/// One variable of every writable kind.
pub fn sample_file() -> MatFile {
    let mut variables = vec![
        Variable::new("d", doubles(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]), false),
        Variable::new(
            "s",
            NumericArray::from_vec(vec![0.5f32, -1.25], &[1, 2]).unwrap(),
            false,
        ),
        Variable::new("i8", NumericArray::from_vec(vec![-128i8, 127], &[2, 1]).unwrap(), false),
        Variable::new("u8", NumericArray::from_vec(vec![0u8, 255], &[1, 2]).unwrap(), false),
        Variable::new("i16", NumericArray::from_vec(vec![i16::MIN], &[1, 1]).unwrap(), false),
        Variable::new("u16", NumericArray::from_vec(vec![u16::MAX, 1], &[1, 2]).unwrap(), false),
        Variable::new("i32", NumericArray::from_vec(vec![-7i32, 7, 0], &[3, 1]).unwrap(), false),
        Variable::new("u32", NumericArray::from_vec(vec![u32::MAX], &[1, 1]).unwrap(), false),
        Variable::new("i64", NumericArray::from_vec(vec![i64::MIN, i64::MAX], &[1, 2]).unwrap(), false),
        Variable::new("u64", NumericArray::from_vec(vec![u64::MAX], &[1, 1]).unwrap(), false),
        Variable::new(
            "z",
            NumericArray::from_vec(
                vec![Complex64::new(1.0, 2.0), Complex64::new(-3.0, 0.5)],
                &[1, 2],
            )
            .unwrap(),
            false,
        ),
        Variable::new(
            "zi",
            NumericArray::from_vec(vec![num_complex::Complex::new(3i16, -4)], &[1, 1]).unwrap(),
            false,
        ),
        Variable::new(
            "flags",
            NumericArray::from_vec(vec![true, false, true], &[1, 3]).unwrap(),
            false,
        ),
        Variable::new("nothing", NumericArray::zeros::<f64>(&[0, 0]), false),
        Variable::new("text", CharArray::new("hello"), false),
        Variable::new("unicode", CharArray::new("Привет 🍆"), false),
        Variable::new("block", CharArray::with_dims("abcdef", &[2, 3]), false),
        Variable::new("g", doubles(vec![42.0], &[1, 1]), true),
        Variable::new("xy", xy_struct(), false),
        Variable::new("sp", sparse_4x5(), false),
        Variable::new(
            "tiny",
            NumericArray::from_vec(vec![f64::MIN_POSITIVE, -f64::MIN_POSITIVE], &[1, 2]).unwrap(),
            false,
        ),
    ];
    variables.extend(extremes());

    let mut complex_sparse = SparseArray::new::<Complex64>(&[2, 2]).unwrap();
    complex_sparse
        .as_matrix_mut::<Complex64>()
        .unwrap()
        .set(0, 1, Complex64::new(0.0, 1.0))
        .unwrap();
    variables.push(Variable::new("spz", complex_sparse, false));

    let mut logical_sparse = SparseArray::new::<bool>(&[3, 1]).unwrap();
    logical_sparse
        .as_matrix_mut::<bool>()
        .unwrap()
        .set(2, 0, true)
        .unwrap();
    variables.push(Variable::new("spl", logical_sparse, false));

    let inner = CellArray::from_vec(vec![CharArray::new("nested").into()], &[1, 1]).unwrap();
    let cells = CellArray::from_vec(
        vec![
            doubles(vec![1.0], &[1, 1]),
            CharArray::new("two").into(),
            Array::Empty,
            inner.into(),
        ],
        &[2, 2],
    )
    .unwrap();
    variables.push(Variable::new("c", cells, false));

    variables.into_iter().collect()
}

/// `[MIN, MAX]` of every real type as `limits_*`, and a complex pair per
/// type as `zlimits_*`.
pub fn extremes() -> Vec<Variable> {
    macro_rules! limits {
        ($($name:literal: $t:ty),* $(,)?) => {
            vec![$(
                Variable::new(
                    concat!("limits_", $name),
                    NumericArray::from_vec(vec![<$t>::MIN, <$t>::MAX], &[1, 2]).unwrap(),
                    false,
                ),
                Variable::new(
                    concat!("zlimits_", $name),
                    NumericArray::from_vec(
                        vec![
                            Complex::new(<$t>::MIN, <$t>::MAX),
                            Complex::new(<$t>::MAX, <$t>::MIN),
                        ],
                        &[2, 1],
                    )
                    .unwrap(),
                    false,
                ),
            )*]
        };
    }
    limits!(
        "i8": i8,
        "u8": u8,
        "i16": i16,
        "u16": u16,
        "i32": i32,
        "u32": u32,
        "i64": i64,
        "u64": u64,
        "f32": f32,
        "f64": f64,
    )
}

/// Write `file` to memory through the seekable path.
pub fn write_to_vec(file: &MatFile, compression: CompressionUsage) -> Vec<u8> {
    let mut writer = WriterBuilder::new()
        .compression(compression)
        .description("matcodec test")
        .build(Cursor::new(Vec::new()));
    writer.write(file).unwrap();
    writer.into_inner().into_inner()
}

// ============================================================================
// Byte Stream Builders
// ============================================================================

pub const MI_INT8: u32 = 1;
pub const MI_UINT8: u32 = 2;
pub const MI_INT16: u32 = 3;
pub const MI_UINT16: u32 = 4;
pub const MI_INT32: u32 = 5;
pub const MI_UINT32: u32 = 6;
pub const MI_DOUBLE: u32 = 9;
pub const MI_UINT64: u32 = 13;
pub const MI_MATRIX: u32 = 14;
pub const MI_COMPRESSED: u32 = 15;
pub const MI_UTF8: u32 = 16;
pub const MI_UTF32: u32 = 18;

pub const CLASS_CELL: u8 = 1;
pub const CLASS_STRUCT: u8 = 2;
pub const CLASS_CHAR: u8 = 4;
pub const CLASS_DOUBLE: u8 = 6;
pub const CLASS_UINT8: u8 = 9;
pub const CLASS_UINT32: u8 = 13;
pub const CLASS_UINT64: u8 = 15;
pub const CLASS_OPAQUE: u8 = 17;

/// 128-byte header.
pub fn header(text: &str, subsystem_offset: u64, indicator: &[u8; 2]) -> Vec<u8> {
    let mut bytes = vec![b' '; 128];
    bytes[..text.len()].copy_from_slice(text.as_bytes());
    bytes[116..124].copy_from_slice(&subsystem_offset.to_le_bytes());
    bytes[124..126].copy_from_slice(&0x0100i16.to_le_bytes());
    bytes[126..128].copy_from_slice(indicator);
    bytes
}

/// Element with a full 8-byte tag, padded to 8 bytes.
pub fn element(data_type: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

/// Element with a short tag; `payload` must be at most 4 bytes.
pub fn short_element(data_type: u32, payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() <= 4);
    let word = data_type | ((payload.len() as u32) << 16);
    let mut out = word.to_le_bytes().to_vec();
    out.extend_from_slice(payload);
    out.resize(8, 0);
    out
}

pub fn flags(class: u8, flag_byte: u8) -> Vec<u8> {
    element(MI_UINT32, &[class, flag_byte, 0, 0, 0, 0, 0, 0])
}

pub fn dims(values: &[i32]) -> Vec<u8> {
    element(MI_INT32, &le_i32(values))
}

pub fn name(text: &str) -> Vec<u8> {
    element(MI_INT8, text.as_bytes())
}

pub fn le_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn le_u32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn le_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn matrix(parts: &[Vec<u8>]) -> Vec<u8> {
    element(MI_MATRIX, &parts.concat())
}

/// Double matrix element.
pub fn double_matrix(var_name: &str, shape: &[i32], values: &[f64]) -> Vec<u8> {
    matrix(&[
        flags(CLASS_DOUBLE, 0),
        dims(shape),
        name(var_name),
        element(MI_DOUBLE, &le_f64(values)),
    ])
}

/// uint8 matrix holding `bytes` as a column.
pub fn uint8_matrix(var_name: &str, bytes: &[u8]) -> Vec<u8> {
    matrix(&[
        flags(CLASS_UINT8, 0),
        dims(&[bytes.len() as i32, 1]),
        name(var_name),
        element(MI_UINT8, bytes),
    ])
}

/// Wrap a complete element in a zlib-compressed element.
pub fn compressed(inner: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(inner).unwrap();
    let stream = encoder.finish().unwrap();
    let mut out = Vec::new();
    out.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
    out.extend_from_slice(&(stream.len() as u32).to_le_bytes());
    out.extend_from_slice(&stream);
    out
}

// ============================================================================
// Class Object Fixtures
// ============================================================================

/// Subsystem table blob with one class of one field: class id 1 named
/// `class` with field `field`; object 1 of class 1 maps `field` to value
/// index 0.
pub fn class_blob(class: &str, field: &str) -> Vec<u8> {
    let mut names = format!("{class}\0{field}\0").into_bytes();
    names.resize(names.len().div_ceil(8) * 8, 0);
    let classes = 32 + names.len() as u32;
    let mut blob = le_u32(&[
        4,
        2,
        classes,
        classes + 32,
        classes + 40,
        classes + 88,
        classes + 112,
        0,
    ]);
    blob.extend(names);
    // class records: padding, then class 1 named by name index 1
    blob.extend(le_u32(&[0, 0, 0, 0, 0, 1, 0, 0]));
    // embedded object header, no records
    blob.extend(le_u32(&[0, 0]));
    // object records: padding, then object 1 of class 1
    blob.extend(le_u32(&[0; 6]));
    blob.extend(le_u32(&[1, 0, 0, 0, 1, 1]));
    // field tables: padding, then one field (name index 2) to value 0
    blob.extend(le_u32(&[0, 0]));
    blob.extend(le_u32(&[1, 2, 1, 0]));
    blob
}

/// The `Point` blob: class `Point` with field `x`.
pub fn point_blob() -> Vec<u8> {
    class_blob("Point", "x")
}

/// Object link words for a 1x1 array of object 1, class 1.
pub fn point_link() -> Vec<u32> {
    vec![0xDD00_0000, 2, 1, 1, 1, 1]
}

/// Opaque variable `var_name` linking to object 1 of class 1.
pub fn linked_object(var_name: &str, class: &str) -> Vec<u8> {
    let link = point_link();
    matrix(&[
        flags(CLASS_OPAQUE, 0),
        name(var_name),
        name("MCOS"),
        name(class),
        matrix(&[
            flags(CLASS_UINT32, 0),
            dims(&[link.len() as i32, 1]),
            name(""),
            element(MI_UINT32, &le_u32(&link)),
        ]),
    ])
}

pub fn linked_point(var_name: &str) -> Vec<u8> {
    linked_object(var_name, "Point")
}

/// Nested subsystem stream with table `blob` and value 0 encoded as `value`.
pub fn subsystem_stream(blob: &[u8], value: Vec<u8>) -> Vec<u8> {
    let cells = matrix(&[
        flags(CLASS_CELL, 0),
        dims(&[3, 1]),
        name(""),
        uint8_matrix("", blob),
        element(MI_MATRIX, &[]),
        value,
    ]);
    let wrapper = matrix(&[
        flags(CLASS_OPAQUE, 0),
        name(""),
        name("MCOS"),
        name("FileWrapper__"),
        cells,
    ]);
    let main = matrix(&[
        flags(CLASS_STRUCT, 0),
        dims(&[1, 1]),
        name(""),
        element(MI_INT32, &le_i32(&[5])),
        element(MI_INT8, b"MCOS\0"),
        wrapper,
    ]);
    let mut stream = vec![0x00, 0x01, b'I', b'M', 0, 0, 0, 0];
    stream.extend(main);
    stream
}

/// Complete file: variables, then the subsystem element the header points at.
pub fn file_with_objects(variables: &[Vec<u8>], blob: &[u8], value: Vec<u8>) -> Vec<u8> {
    let body: Vec<u8> = variables.concat();
    let offset = 128 + body.len() as u64;
    let mut bytes = header("MATLAB 5.0 MAT-file", offset, b"IM");
    bytes.extend(body);
    bytes.extend(uint8_matrix("", &subsystem_stream(blob, value)));
    bytes
}

/// Complete file whose `Point` objects have `x` equal to `x`.
pub fn file_with_subsystem(variables: &[Vec<u8>], x: f64) -> Vec<u8> {
    file_with_objects(variables, &point_blob(), double_matrix("", &[1, 1], &[x]))
}
