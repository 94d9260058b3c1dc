// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Element encoder.
//!
//! Emits matrix elements into any [`ElementSink`]. When writing real output,
//! every matrix is sized in a [`SizeCalculator`] pass first so its tag can
//! carry the exact length.
//! Payloads of at most 4 bytes use the short tag form; longer payloads are
//! padded to the next 8-byte boundary.

use byteorder::{ByteOrder, LittleEndian};
use num_complex::Complex;

use crate::core::array::Array;
use crate::core::char_array::CharArray;
use crate::core::element::{ElementType, NumericData};
use crate::core::error::{CodecError, Result};
use crate::core::numeric::NumericArray;
use crate::core::sparse::{SparseArray, SparseElement, SparseMatrix};
use crate::core::structure::StructArray;
use crate::encoding::cursor::ALIGNMENT;
use crate::encoding::sink::{ComplexPart, ElementSink, LePayload, LeValue, SizeCalculator};
use crate::encoding::tags::{ArrayClass, ArrayFlags, DataType, SHORT_PAYLOAD_SIZE, TAG_SIZE};

const ZEROS: [u8; ALIGNMENT] = [0; ALIGNMENT];

/// Write one variable as a matrix element.
pub fn write_variable<S: ElementSink>(
    sink: &mut S,
    name: &str,
    array: &Array,
    global: bool,
) -> Result<()> {
    write_matrix(sink, name, array, global)
}

/// Byte length of the matrix element `write_variable` would produce, tag included.
pub fn variable_size(name: &str, array: &Array, global: bool) -> Result<u64> {
    let mut calc = SizeCalculator::new();
    write_matrix(&mut calc, name, array, global)?;
    Ok(calc.size())
}

fn write_tag<S: ElementSink>(sink: &mut S, data_type: DataType, length: u32) -> Result<()> {
    let mut tag = [0u8; TAG_SIZE];
    LittleEndian::write_u32(&mut tag[..4], data_type.code());
    LittleEndian::write_u32(&mut tag[4..], length);
    sink.put_bytes(&tag)
}

fn write_data<S, P>(sink: &mut S, data_type: DataType, payload: &P) -> Result<()>
where
    S: ElementSink,
    P: LePayload + ?Sized,
{
    let len = payload.byte_len();
    if len <= SHORT_PAYLOAD_SIZE {
        let word = data_type.code() | ((len as u32) << 16);
        sink.put_bytes(&word.to_le_bytes())?;
        sink.put_payload(payload)?;
        return sink.put_bytes(&ZEROS[..SHORT_PAYLOAD_SIZE - len]);
    }
    let length = u32::try_from(len)
        .map_err(|_| CodecError::encode("MAT", format!("{len}-byte data element exceeds 4 GiB")))?;
    write_tag(sink, data_type, length)?;
    sink.put_payload(payload)?;
    sink.put_bytes(&ZEROS[..(ALIGNMENT - len % ALIGNMENT) % ALIGNMENT])
}

fn write_complex<S: ElementSink, T: LeValue>(
    sink: &mut S,
    data_type: DataType,
    values: &[Complex<T>],
) -> Result<()> {
    write_data(sink, data_type, &ComplexPart::real(values))?;
    write_data(sink, data_type, &ComplexPart::imaginary(values))
}

fn write_matrix<S: ElementSink>(sink: &mut S, name: &str, array: &Array, global: bool) -> Result<()> {
    if let Array::Empty = array {
        return write_tag(sink, DataType::Matrix, 0);
    }
    if sink.counts_only() {
        write_tag(sink, DataType::Matrix, 0)?;
        return write_contents(sink, name, array, global);
    }
    let mut calc = SizeCalculator::new();
    write_contents(&mut calc, name, array, global)?;
    let length = u32::try_from(calc.size()).map_err(|_| {
        CodecError::encode("MAT", format!("array '{name}' of {} bytes exceeds 4 GiB", calc.size()))
    })?;
    write_tag(sink, DataType::Matrix, length)?;
    write_contents(sink, name, array, global)
}

fn write_contents<S: ElementSink>(
    sink: &mut S,
    name: &str,
    array: &Array,
    global: bool,
) -> Result<()> {
    match array {
        Array::Empty => Ok(()),
        Array::Numeric(numeric) => write_numeric(sink, name, numeric, global),
        Array::Char(chars) => write_char(sink, name, chars, global),
        Array::Cell(cells) => {
            write_header(sink, ArrayFlags::new(ArrayClass::Cell), global, cells.dims(), name)?;
            for cell in cells {
                write_matrix(sink, "", cell, false)?;
            }
            Ok(())
        }
        Array::Struct(structure) => write_struct(sink, name, structure, global),
        Array::Sparse(sparse) => match sparse {
            SparseArray::Double(m) => {
                let flags = ArrayFlags::new(ArrayClass::Sparse);
                write_sparse(sink, name, m, flags, global, |sink, values| {
                    write_data(sink, DataType::Double, values)
                })
            }
            SparseArray::Complex(m) => {
                let mut flags = ArrayFlags::new(ArrayClass::Sparse);
                flags.complex = true;
                write_sparse(sink, name, m, flags, global, |sink, values| {
                    write_complex(sink, DataType::Double, values)
                })
            }
            SparseArray::Logical(m) => {
                let mut flags = ArrayFlags::new(ArrayClass::Sparse);
                flags.logical = true;
                write_sparse(sink, name, m, flags, global, |sink, values| {
                    write_data(sink, DataType::UInt8, values)
                })
            }
        },
        Array::Opaque(_) => Err(CodecError::unsupported(format!(
            "writing class object '{name}'"
        ))),
    }
}

fn write_header<S: ElementSink>(
    sink: &mut S,
    mut flags: ArrayFlags,
    global: bool,
    dims: &[usize],
    name: &str,
) -> Result<()> {
    flags.global = global;
    write_tag(sink, DataType::UInt32, 8)?;
    let mut bytes = [0u8; 8];
    bytes[0] = flags.class.code();
    bytes[1] = flags.flag_byte();
    LittleEndian::write_u32(&mut bytes[4..], flags.nzmax);
    sink.put_bytes(&bytes)?;

    let dims = dims
        .iter()
        .map(|&d| to_i32(d, "dimension"))
        .collect::<Result<Vec<_>>>()?;
    write_data(sink, DataType::Int32, dims.as_slice())?;
    write_data(sink, DataType::Int8, ascii(name, "array name")?.as_bytes())
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| CodecError::encode("MAT", format!("{what} {value} exceeds int32 range")))
}

fn ascii<'a>(name: &'a str, what: &str) -> Result<&'a str> {
    if name.is_ascii() {
        Ok(name)
    } else {
        Err(CodecError::unsupported(format!("non-ASCII {what} '{name}'")))
    }
}

fn write_numeric<S: ElementSink>(
    sink: &mut S,
    name: &str,
    numeric: &NumericArray,
    global: bool,
) -> Result<()> {
    let data = numeric.data();
    let element_type = data.element_type();
    let mut flags = ArrayFlags::new(ArrayClass::for_element(element_type));
    flags.logical = element_type == ElementType::Logical;
    flags.complex = data.is_complex();
    write_header(sink, flags, global, numeric.dims(), name)?;

    let data_type = DataType::for_element(element_type);
    match data {
        NumericData::Int8(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::UInt8(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Int16(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::UInt16(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Int32(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::UInt32(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Int64(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::UInt64(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Single(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Double(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::Logical(v) => write_data(sink, data_type, v.as_slice()),
        NumericData::ComplexInt8(v) => write_complex(sink, data_type, v),
        NumericData::ComplexUInt8(v) => write_complex(sink, data_type, v),
        NumericData::ComplexInt16(v) => write_complex(sink, data_type, v),
        NumericData::ComplexUInt16(v) => write_complex(sink, data_type, v),
        NumericData::ComplexInt32(v) => write_complex(sink, data_type, v),
        NumericData::ComplexUInt32(v) => write_complex(sink, data_type, v),
        NumericData::ComplexInt64(v) => write_complex(sink, data_type, v),
        NumericData::ComplexUInt64(v) => write_complex(sink, data_type, v),
        NumericData::ComplexSingle(v) => write_complex(sink, data_type, v),
        NumericData::ComplexDouble(v) => write_complex(sink, data_type, v),
    }
}

fn write_char<S: ElementSink>(
    sink: &mut S,
    name: &str,
    chars: &CharArray,
    global: bool,
) -> Result<()> {
    write_header(sink, ArrayFlags::new(ArrayClass::Char), global, chars.dims(), name)?;
    write_data(sink, DataType::Utf16, chars.code_units().as_slice())
}

fn write_struct<S: ElementSink>(
    sink: &mut S,
    name: &str,
    structure: &StructArray,
    global: bool,
) -> Result<()> {
    write_header(sink, ArrayFlags::new(ArrayClass::Struct), global, structure.dims(), name)?;

    let names = structure
        .field_names()
        .map(|field| ascii(field, "field name"))
        .collect::<Result<Vec<_>>>()?;
    let stride = names.iter().map(|n| n.len()).max().map_or(1, |longest| longest + 1);
    write_data(sink, DataType::Int32, &[to_i32(stride, "field name length")?][..])?;
    let mut blob = vec![0u8; names.len() * stride];
    for (slot, field) in blob.chunks_mut(stride).zip(&names) {
        slot[..field.len()].copy_from_slice(field.as_bytes());
    }
    write_data(sink, DataType::Int8, blob.as_slice())?;

    for position in 0..structure.len() {
        for field in structure.fields() {
            write_matrix(sink, "", &field.values()[position], false)?;
        }
    }
    Ok(())
}

fn write_sparse<S, T>(
    sink: &mut S,
    name: &str,
    matrix: &SparseMatrix<T>,
    mut flags: ArrayFlags,
    global: bool,
    write_values: impl FnOnce(&mut S, &[T]) -> Result<()>,
) -> Result<()>
where
    S: ElementSink,
    T: SparseElement,
{
    let mut row_indices = Vec::with_capacity(matrix.nnz());
    let mut values = Vec::with_capacity(matrix.nnz());
    let mut column_starts = vec![0i32; matrix.cols() + 1];
    for (row, col, value) in matrix.entries() {
        row_indices.push(to_i32(row, "sparse row index")?);
        values.push(value);
        column_starts[col + 1] += 1;
    }
    for col in 0..matrix.cols() {
        column_starts[col + 1] += column_starts[col];
    }

    flags.nzmax = u32::try_from(values.len())
        .map_err(|_| CodecError::encode("MAT", "sparse array has too many entries"))?;
    write_header(sink, flags, global, matrix.dims(), name)?;
    write_data(sink, DataType::Int32, row_indices.as_slice())?;
    write_data(sink, DataType::Int32, column_starts.as_slice())?;
    write_values(sink, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::CellArray;
    use crate::encoding::sink::StreamSink;

    fn encode(name: &str, array: &Array) -> Vec<u8> {
        let mut sink = StreamSink::new(Vec::new());
        write_variable(&mut sink, name, array, false).unwrap();
        sink.into_inner()
    }

    #[test]
    fn test_short_tag_boundary() {
        let mut sink = StreamSink::new(Vec::new());
        write_data(&mut sink, DataType::UInt8, [true, false].as_slice()).unwrap();
        assert_eq!(sink.into_inner(), vec![2, 0, 2, 0, 1, 0, 0, 0]);

        let mut sink = StreamSink::new(Vec::new());
        write_data(&mut sink, DataType::UInt8, [7u8; 9].as_slice()).unwrap();
        let bytes = sink.into_inner();
        assert_eq!(bytes.len(), 8 + 16);
        assert_eq!(&bytes[..8], &[2, 0, 0, 0, 9, 0, 0, 0]);
        assert!(bytes[17..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_array_is_bare_tag() {
        assert_eq!(encode("x", &Array::Empty), vec![14, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_matrix_length_matches_contents() {
        let array: Array = NumericArray::from_vec(vec![1.0, 2.0, 3.0], &[1, 3])
            .unwrap()
            .into();
        let bytes = encode("abc", &array);
        let length = LittleEndian::read_u32(&bytes[4..8]) as usize;
        assert_eq!(bytes.len(), 8 + length);
        assert_eq!(bytes.len() % 8, 0);
        assert_eq!(variable_size("abc", &array, false).unwrap(), bytes.len() as u64);
        // flags: class double, no flag bits
        assert_eq!(&bytes[16..18], &[6, 0]);
    }

    #[test]
    fn test_nested_matrix_lengths() {
        let leaf: Array = NumericArray::from_vec(vec![5.0], &[1, 1]).unwrap().into();
        let inner: Array = CellArray::from_vec(vec![leaf.clone()], &[1, 1]).unwrap().into();
        let outer: Array = CellArray::from_vec(vec![inner.clone()], &[1, 1]).unwrap().into();
        let bytes = encode("c", &outer);
        assert_eq!(variable_size("c", &outer, false).unwrap(), bytes.len() as u64);

        // cell header: flags 16 + dims 16 + name 8
        let inner_at = 8 + 40;
        let inner_len = LittleEndian::read_u32(&bytes[inner_at + 4..inner_at + 8]) as u64;
        assert_eq!(inner_len + 8, variable_size("", &inner, false).unwrap());
        assert_eq!(inner_at as u64 + 8 + inner_len, bytes.len() as u64);
    }

    #[test]
    fn test_global_and_logical_flags() {
        let array: Array = NumericArray::from_vec(vec![true], &[1, 1]).unwrap().into();
        let mut sink = StreamSink::new(Vec::new());
        write_variable(&mut sink, "b", &array, true).unwrap();
        let bytes = sink.into_inner();
        assert_eq!(bytes[16], ArrayClass::UInt8.code());
        assert_eq!(bytes[17], ArrayFlags::LOGICAL | ArrayFlags::GLOBAL);
    }

    #[test]
    fn test_rejects_non_ascii_name() {
        let array: Array = CellArray::new(&[1, 1]).into();
        let mut sink = StreamSink::new(Vec::new());
        let err = write_variable(&mut sink, "naïve", &array, false).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported { .. }));
    }

    #[test]
    fn test_struct_without_fields() {
        let array: Array = StructArray::new(Vec::<String>::new(), &[1, 1]).into();
        let bytes = encode("s", &array);
        assert_eq!(bytes.len() % 8, 0);
    }
}
