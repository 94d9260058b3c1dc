// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Matrix element decoder.
//!
//! A matrix payload is a sequence of sub-elements: array flags, then (for
//! every class except opaque) dimensions and name, then class-specific data.

use num_complex::{Complex, Complex64};

use crate::core::array::Array;
use crate::core::cell::CellArray;
use crate::core::char_array::CharArray;
use crate::core::dims::element_count;
use crate::core::element::{ElementType, MatElement, NumericData, RealElement};
use crate::core::error::{CodecError, Result};
use crate::core::numeric::NumericArray;
use crate::core::opaque::{ObjectLink, OpaqueArray, OpaqueStorage};
use crate::core::sparse::{SparseArray, SparseElement, SparseMatrix};
use crate::core::structure::StructArray;
use crate::encoding::cursor::MatCursor;
use crate::encoding::element::{DataElement, ElementReader, Matrix};
use crate::encoding::tags::{ArrayClass, ArrayFlags};

impl ElementReader {
    /// Decode the contents of a matrix element.
    pub(crate) fn read_matrix(&self, cursor: &mut MatCursor<'_>) -> Result<Matrix> {
        let flags = self.read_flags(cursor)?;
        if flags.class == ArrayClass::Opaque {
            return self.read_opaque(cursor, flags);
        }
        let dims = self.read_dims(cursor)?;
        let name = self.read_name(cursor, "array name")?;
        tracing::trace!(name = %name, class = ?flags.class, dims = ?dims, "decoding matrix");
        let array = match flags.class {
            ArrayClass::Cell => self.read_cell(cursor, &dims)?,
            ArrayClass::Struct => self.read_struct(cursor, &dims)?,
            ArrayClass::Char => self.read_char(cursor, &dims)?,
            ArrayClass::Sparse => self.read_sparse(cursor, &dims, flags)?,
            ArrayClass::Object | ArrayClass::Function | ArrayClass::Opaque => {
                return Err(CodecError::UnsupportedClass {
                    class_code: flags.class.code(),
                })
            }
            class => {
                let element_type = match class.element_type() {
                    Some(_) if flags.logical => ElementType::Logical,
                    Some(element_type) => element_type,
                    None => {
                        return Err(CodecError::UnsupportedClass {
                            class_code: class.code(),
                        })
                    }
                };
                self.read_numeric(cursor, &dims, element_type, flags.complex)?
            }
        };
        Ok(Matrix {
            name,
            global: flags.global,
            array,
        })
    }

    fn read_numeric_element(&self, cursor: &mut MatCursor<'_>, context: &str) -> Result<NumericData> {
        match self.read_element(cursor)? {
            DataElement::Numeric(data) => Ok(data),
            other => Err(CodecError::unexpected_element(
                context,
                "numeric data",
                other.describe(),
            )),
        }
    }

    fn read_child(&self, cursor: &mut MatCursor<'_>, context: &str) -> Result<Array> {
        match self.read_element(cursor)? {
            DataElement::Matrix(matrix) => Ok(matrix.array),
            other => Err(CodecError::unexpected_element(context, "matrix", other.describe())),
        }
    }

    fn read_flags(&self, cursor: &mut MatCursor<'_>) -> Result<ArrayFlags> {
        let words = self
            .read_numeric_element(cursor, "array flags")?
            .cast::<u32>()
            .ok_or_else(|| CodecError::parse("array flags", "complex flags element"))?;
        let word = *words
            .first()
            .ok_or_else(|| CodecError::parse("array flags", "empty flags element"))?;
        let nzmax = words.get(1).copied().unwrap_or(0);
        let (class_code, flags) = ArrayFlags::from_word(word, nzmax);
        flags.ok_or(CodecError::UnsupportedClass { class_code })
    }

    fn read_dims(&self, cursor: &mut MatCursor<'_>) -> Result<Vec<usize>> {
        let values = self
            .read_numeric_element(cursor, "dimensions")?
            .cast::<i64>()
            .ok_or_else(|| CodecError::parse("dimensions", "complex dimensions element"))?;
        values
            .into_iter()
            .map(|d| {
                usize::try_from(d)
                    .map_err(|_| CodecError::parse("dimensions", format!("negative dimension {d}")))
            })
            .collect()
    }

    fn read_name(&self, cursor: &mut MatCursor<'_>, context: &str) -> Result<String> {
        let bytes = self
            .read_numeric_element(cursor, context)?
            .cast::<u8>()
            .ok_or_else(|| CodecError::parse(context, "complex name element"))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_numeric(
        &self,
        cursor: &mut MatCursor<'_>,
        dims: &[usize],
        element_type: ElementType,
        complex: bool,
    ) -> Result<Array> {
        let real = self.read_numeric_element(cursor, "real part")?;
        let imaginary = if complex {
            Some(self.read_numeric_element(cursor, "imaginary part")?)
        } else {
            None
        };
        let data = convert(&real, imaginary.as_ref(), element_type)?;
        let expected = element_count(dims);
        if data.len() != expected {
            return Err(CodecError::parse(
                "numeric data",
                format!("{} values stored for {} elements", data.len(), expected),
            ));
        }
        Ok(NumericArray::from_data(data, dims)?.into())
    }

    fn read_char(&self, cursor: &mut MatCursor<'_>, dims: &[usize]) -> Result<Array> {
        let array = match self.read_numeric_element(cursor, "char data")? {
            NumericData::UInt8(bytes) => CharArray::from_utf8_bytes(&bytes, dims),
            NumericData::UInt16(units) => CharArray::from_utf16_units(&units, dims),
            other => {
                return Err(CodecError::unexpected_element(
                    "char data",
                    "uint8 or uint16",
                    other.type_name(),
                ))
            }
        };
        Ok(array.into())
    }

    fn read_cell(&self, cursor: &mut MatCursor<'_>, dims: &[usize]) -> Result<Array> {
        let count = element_count(dims);
        let mut cells = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            cells.push(self.read_child(cursor, "cell element")?);
        }
        Ok(CellArray::from_vec(cells, dims)?.into())
    }

    fn read_struct(&self, cursor: &mut MatCursor<'_>, dims: &[usize]) -> Result<Array> {
        let stride = match self.read_numeric_element(cursor, "field name length")? {
            NumericData::Int32(v) if v.len() == 1 => v[0],
            other => {
                return Err(CodecError::unexpected_element(
                    "field name length",
                    "int32 scalar",
                    other.type_name(),
                ))
            }
        };
        let stride = usize::try_from(stride)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| {
                CodecError::parse("field name length", format!("invalid length {stride}"))
            })?;
        let blob = match self.read_numeric_element(cursor, "field names")? {
            NumericData::Int8(v) => v.into_iter().map(|b| b as u8).collect(),
            NumericData::UInt8(v) => v,
            other => {
                return Err(CodecError::unexpected_element(
                    "field names",
                    "int8",
                    other.type_name(),
                ))
            }
        };
        if blob.len() % stride != 0 {
            return Err(CodecError::parse(
                "field names",
                format!("{} bytes is not a multiple of {stride}", blob.len()),
            ));
        }
        let names: Vec<String> = blob
            .chunks(stride)
            .map(|chunk| {
                let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                String::from_utf8_lossy(&chunk[..end]).into_owned()
            })
            .collect();

        let count = element_count(dims);
        let mut values: Vec<Vec<Array>> = names
            .iter()
            .map(|_| Vec::with_capacity(count.min(cursor.remaining())))
            .collect();
        for _ in 0..count {
            for field in values.iter_mut() {
                field.push(self.read_child(cursor, "struct field value")?);
            }
        }
        let fields = names.into_iter().zip(values).collect();
        Ok(StructArray::from_fields(fields, dims)?.into())
    }

    fn read_sparse(
        &self,
        cursor: &mut MatCursor<'_>,
        dims: &[usize],
        flags: ArrayFlags,
    ) -> Result<Array> {
        let row_indices = match self.read_numeric_element(cursor, "sparse row indices")? {
            NumericData::Int32(v) => v,
            other => {
                return Err(CodecError::unexpected_element(
                    "sparse row indices",
                    "int32",
                    format!("row index element was {}", other.type_name()),
                ))
            }
        };
        let column_starts = match self.read_numeric_element(cursor, "sparse column pointers")? {
            NumericData::Int32(v) => v,
            other => {
                return Err(CodecError::unexpected_element(
                    "sparse column pointers",
                    "int32",
                    other.type_name(),
                ))
            }
        };
        let real = self.read_numeric_element(cursor, "sparse values")?;
        let imaginary = if flags.complex && !flags.logical {
            Some(self.read_numeric_element(cursor, "sparse imaginary values")?)
        } else {
            None
        };

        let layout = SparseLayout::new(dims, &row_indices, &column_starts)?;
        let array = if flags.logical {
            let values = real
                .cast::<u8>()
                .ok_or_else(|| CodecError::parse("sparse values", "complex logical data"))?;
            SparseArray::Logical(layout.fill(values.into_iter().map(|v| v != 0).collect())?)
        } else if let Some(imaginary) = imaginary {
            let re = real.to_f64_vec();
            let im = imaginary.to_f64_vec();
            let (Some(re), Some(im)) = (re, im) else {
                return Err(CodecError::parse("sparse values", "complex parts must be real"));
            };
            let values = re
                .into_iter()
                .zip(im)
                .map(|(re, im)| Complex64::new(re, im))
                .collect();
            SparseArray::Complex(layout.fill(values)?)
        } else {
            let values = real
                .to_f64_vec()
                .ok_or_else(|| CodecError::parse("sparse values", "unexpected complex data"))?;
            SparseArray::Double(layout.fill(values)?)
        };
        Ok(array.into())
    }

    fn read_opaque(&self, cursor: &mut MatCursor<'_>, flags: ArrayFlags) -> Result<Matrix> {
        let name = self.read_name(cursor, "object name")?;
        let type_description = self.read_name(cursor, "object type description")?;
        let class_name = self.read_name(cursor, "object class name")?;
        let storage = match self.read_element(cursor)? {
            DataElement::Matrix(inner) => match inner.array {
                Array::Numeric(numeric) if numeric.element_type() == ElementType::UInt32 => {
                    match numeric.as_slice::<u32>() {
                        Some(words) => OpaqueStorage::Link(ObjectLink::parse(words)?),
                        None => OpaqueStorage::Raw(Box::new(numeric.into())),
                    }
                }
                array => OpaqueStorage::Raw(Box::new(array)),
            },
            other => {
                return Err(CodecError::unexpected_element(
                    "object data",
                    "matrix",
                    other.describe(),
                ))
            }
        };
        tracing::trace!(name = %name, class = %class_name, "decoded class object");
        let object = OpaqueArray::new(type_description, class_name, storage, self.handle());
        Ok(Matrix {
            name,
            global: flags.global,
            array: object.into(),
        })
    }
}

/// Convert stored values to the declared element type.
fn convert(
    real: &NumericData,
    imaginary: Option<&NumericData>,
    element_type: ElementType,
) -> Result<NumericData> {
    match (element_type, imaginary) {
        (ElementType::Logical, _) => real
            .cast::<u8>()
            .map(|v| NumericData::Logical(v.into_iter().map(|x| x != 0).collect()))
            .ok_or_else(|| CodecError::parse("logical data", "complex storage")),
        (ElementType::Int8, im) => typed::<i8>(real, im),
        (ElementType::UInt8, im) => typed::<u8>(real, im),
        (ElementType::Int16, im) => typed::<i16>(real, im),
        (ElementType::UInt16, im) => typed::<u16>(real, im),
        (ElementType::Int32, im) => typed::<i32>(real, im),
        (ElementType::UInt32, im) => typed::<u32>(real, im),
        (ElementType::Int64, im) => typed::<i64>(real, im),
        (ElementType::UInt64, im) => typed::<u64>(real, im),
        (ElementType::Single, im) => typed::<f32>(real, im),
        (ElementType::Double, im) => typed::<f64>(real, im),
    }
}

fn typed<T>(real: &NumericData, imaginary: Option<&NumericData>) -> Result<NumericData>
where
    T: RealElement,
    Complex<T>: MatElement,
{
    let re = real
        .cast::<T>()
        .ok_or_else(|| CodecError::parse("numeric data", "nested complex storage"))?;
    let Some(imaginary) = imaginary else {
        return Ok(T::wrap(re));
    };
    let im = imaginary
        .cast::<T>()
        .ok_or_else(|| CodecError::parse("numeric data", "nested complex storage"))?;
    if re.len() != im.len() {
        return Err(CodecError::parse(
            "complex data",
            format!("{} real parts but {} imaginary parts", re.len(), im.len()),
        ));
    }
    Ok(Complex::<T>::wrap(
        re.into_iter()
            .zip(im)
            .map(|(re, im)| Complex::new(re, im))
            .collect(),
    ))
}

/// Validated compressed-sparse-column structure.
struct SparseLayout<'a> {
    dims: [usize; 2],
    row_indices: &'a [i32],
    column_starts: Vec<usize>,
}

impl<'a> SparseLayout<'a> {
    fn new(dims: &[usize], row_indices: &'a [i32], column_starts: &[i32]) -> Result<Self> {
        let malformed = |message: String| CodecError::parse("sparse array", message);
        let [rows, cols] = <[usize; 2]>::try_from(dims)
            .map_err(|_| malformed(format!("{} dimensions instead of 2", dims.len())))?;
        if column_starts.len() != cols + 1 {
            return Err(malformed(format!(
                "{} column pointers for {cols} columns",
                column_starts.len()
            )));
        }
        let column_starts: Vec<usize> = column_starts
            .iter()
            .map(|&p| usize::try_from(p).map_err(|_| malformed(format!("negative column pointer {p}"))))
            .collect::<Result<_>>()?;
        if column_starts.windows(2).any(|w| w[0] > w[1]) {
            return Err(malformed("column pointers decrease".to_string()));
        }
        let nnz = column_starts[cols];
        if row_indices.len() < nnz {
            return Err(malformed(format!(
                "{} row indices for {nnz} entries",
                row_indices.len()
            )));
        }
        if let Some(&bad) = row_indices[..nnz]
            .iter()
            .find(|&&r| usize::try_from(r).map_or(true, |r| r >= rows))
        {
            return Err(malformed(format!("row index {bad} outside {rows} rows")));
        }
        Ok(Self {
            dims: [rows, cols],
            row_indices,
            column_starts,
        })
    }

    fn fill<T: SparseElement>(&self, values: Vec<T>) -> Result<SparseMatrix<T>> {
        let nnz = self.column_starts[self.dims[1]];
        if values.len() < nnz {
            return Err(CodecError::parse(
                "sparse array",
                format!("{} values for {nnz} entries", values.len()),
            ));
        }
        let mut matrix = SparseMatrix::new(&self.dims)?;
        for col in 0..self.dims[1] {
            for k in self.column_starts[col]..self.column_starts[col + 1] {
                // validated in `new`
                let row = self.row_indices[k] as usize;
                matrix.insert_unchecked(row, col, values[k]);
            }
        }
        Ok(matrix)
    }
}
