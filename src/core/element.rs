// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Element types and typed numeric storage.
//!
//! [`ElementType`] is the closed set of primitive element types an array
//! can hold. [`NumericData`] is the owned, column-major buffer of one of
//! those types, real or complex. [`MatElement`] connects Rust types to the
//! matching buffer variant so callers can work with typed slices.

use std::fmt;

use num_complex::{Complex, Complex64};

/// Primitive element type of a numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit float
    Single,
    /// 64-bit float
    Double,
    /// Boolean, stored as uint8
    Logical,
}

impl ElementType {
    /// Size of one (real) element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            ElementType::Int8 | ElementType::UInt8 | ElementType::Logical => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Single => 4,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Double => 8,
        }
    }

    /// Lowercase type name as used by MATLAB's `class()`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Int8 => "int8",
            ElementType::UInt8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::UInt16 => "uint16",
            ElementType::Int32 => "int32",
            ElementType::UInt32 => "uint32",
            ElementType::Int64 => "int64",
            ElementType::UInt64 => "uint64",
            ElementType::Single => "single",
            ElementType::Double => "double",
            ElementType::Logical => "logical",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owned column-major element buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    /// `int8` values
    Int8(Vec<i8>),
    /// `uint8` values
    UInt8(Vec<u8>),
    /// `int16` values
    Int16(Vec<i16>),
    /// `uint16` values
    UInt16(Vec<u16>),
    /// `int32` values
    Int32(Vec<i32>),
    /// `uint32` values
    UInt32(Vec<u32>),
    /// `int64` values
    Int64(Vec<i64>),
    /// `uint64` values
    UInt64(Vec<u64>),
    /// `single` values
    Single(Vec<f32>),
    /// `double` values
    Double(Vec<f64>),
    /// `logical` values
    Logical(Vec<bool>),
    /// Complex `int8` values
    ComplexInt8(Vec<Complex<i8>>),
    /// Complex `uint8` values
    ComplexUInt8(Vec<Complex<u8>>),
    /// Complex `int16` values
    ComplexInt16(Vec<Complex<i16>>),
    /// Complex `uint16` values
    ComplexUInt16(Vec<Complex<u16>>),
    /// Complex `int32` values
    ComplexInt32(Vec<Complex<i32>>),
    /// Complex `uint32` values
    ComplexUInt32(Vec<Complex<u32>>),
    /// Complex `int64` values
    ComplexInt64(Vec<Complex<i64>>),
    /// Complex `uint64` values
    ComplexUInt64(Vec<Complex<u64>>),
    /// Complex `single` values
    ComplexSingle(Vec<Complex<f32>>),
    /// Complex `double` values
    ComplexDouble(Vec<Complex64>),
}

/// Apply one expression to the vector inside any variant.
macro_rules! dispatch {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            NumericData::Int8($v) => $body,
            NumericData::UInt8($v) => $body,
            NumericData::Int16($v) => $body,
            NumericData::UInt16($v) => $body,
            NumericData::Int32($v) => $body,
            NumericData::UInt32($v) => $body,
            NumericData::Int64($v) => $body,
            NumericData::UInt64($v) => $body,
            NumericData::Single($v) => $body,
            NumericData::Double($v) => $body,
            NumericData::Logical($v) => $body,
            NumericData::ComplexInt8($v) => $body,
            NumericData::ComplexUInt8($v) => $body,
            NumericData::ComplexInt16($v) => $body,
            NumericData::ComplexUInt16($v) => $body,
            NumericData::ComplexInt32($v) => $body,
            NumericData::ComplexUInt32($v) => $body,
            NumericData::ComplexInt64($v) => $body,
            NumericData::ComplexUInt64($v) => $body,
            NumericData::ComplexSingle($v) => $body,
            NumericData::ComplexDouble($v) => $body,
        }
    };
}

/// Convert every real variant to `Vec<$t>` with an `as` cast.
macro_rules! cast_real {
    ($data:expr, $t:ty) => {
        match $data {
            NumericData::Int8(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::UInt8(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Int16(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::UInt16(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Int32(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::UInt32(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Int64(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::UInt64(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Single(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Double(v) => Some(v.iter().map(|&x| x as $t).collect()),
            NumericData::Logical(v) => Some(v.iter().map(|&x| u8::from(x) as $t).collect()),
            _ => None,
        }
    };
}

/// Convert every complex variant to `Vec<Complex64>`.
macro_rules! widen_complex {
    ($data:expr) => {
        match $data {
            NumericData::ComplexInt8(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexUInt8(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexInt16(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexUInt16(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexInt32(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexUInt32(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexInt64(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexUInt64(v) => Some(widen(v, |x| x as f64)),
            NumericData::ComplexSingle(v) => Some(widen(v, f64::from)),
            NumericData::ComplexDouble(v) => Some(v.clone()),
            _ => None,
        }
    };
}

fn widen<T: Copy>(values: &[Complex<T>], f: impl Fn(T) -> f64) -> Vec<Complex64> {
    values
        .iter()
        .map(|c| Complex64::new(f(c.re), f(c.im)))
        .collect()
}

impl NumericData {
    /// Zero-filled buffer of `len` elements.
    #[must_use]
    pub fn zeros(element_type: ElementType, complex: bool, len: usize) -> Self {
        fn z<T: MatElement>(len: usize) -> NumericData {
            T::wrap(vec![T::default(); len])
        }
        match (element_type, complex) {
            (ElementType::Int8, false) => z::<i8>(len),
            (ElementType::UInt8, false) => z::<u8>(len),
            (ElementType::Int16, false) => z::<i16>(len),
            (ElementType::UInt16, false) => z::<u16>(len),
            (ElementType::Int32, false) => z::<i32>(len),
            (ElementType::UInt32, false) => z::<u32>(len),
            (ElementType::Int64, false) => z::<i64>(len),
            (ElementType::UInt64, false) => z::<u64>(len),
            (ElementType::Single, false) => z::<f32>(len),
            (ElementType::Double, false) => z::<f64>(len),
            (ElementType::Logical, _) => z::<bool>(len),
            (ElementType::Int8, true) => z::<Complex<i8>>(len),
            (ElementType::UInt8, true) => z::<Complex<u8>>(len),
            (ElementType::Int16, true) => z::<Complex<i16>>(len),
            (ElementType::UInt16, true) => z::<Complex<u16>>(len),
            (ElementType::Int32, true) => z::<Complex<i32>>(len),
            (ElementType::UInt32, true) => z::<Complex<u32>>(len),
            (ElementType::Int64, true) => z::<Complex<i64>>(len),
            (ElementType::UInt64, true) => z::<Complex<u64>>(len),
            (ElementType::Single, true) => z::<Complex<f32>>(len),
            (ElementType::Double, true) => z::<Complex64>(len),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    /// True if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Primitive element type (the component type for complex buffers).
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            NumericData::Int8(_) | NumericData::ComplexInt8(_) => ElementType::Int8,
            NumericData::UInt8(_) | NumericData::ComplexUInt8(_) => ElementType::UInt8,
            NumericData::Int16(_) | NumericData::ComplexInt16(_) => ElementType::Int16,
            NumericData::UInt16(_) | NumericData::ComplexUInt16(_) => ElementType::UInt16,
            NumericData::Int32(_) | NumericData::ComplexInt32(_) => ElementType::Int32,
            NumericData::UInt32(_) | NumericData::ComplexUInt32(_) => ElementType::UInt32,
            NumericData::Int64(_) | NumericData::ComplexInt64(_) => ElementType::Int64,
            NumericData::UInt64(_) | NumericData::ComplexUInt64(_) => ElementType::UInt64,
            NumericData::Single(_) | NumericData::ComplexSingle(_) => ElementType::Single,
            NumericData::Double(_) | NumericData::ComplexDouble(_) => ElementType::Double,
            NumericData::Logical(_) => ElementType::Logical,
        }
    }

    /// True for the complex variants.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        !matches!(
            self,
            NumericData::Int8(_)
                | NumericData::UInt8(_)
                | NumericData::Int16(_)
                | NumericData::UInt16(_)
                | NumericData::Int32(_)
                | NumericData::UInt32(_)
                | NumericData::Int64(_)
                | NumericData::UInt64(_)
                | NumericData::Single(_)
                | NumericData::Double(_)
                | NumericData::Logical(_)
        )
    }

    /// Human-readable type name, e.g. `"complex int16"`.
    #[must_use]
    pub fn type_name(&self) -> String {
        if self.is_complex() {
            format!("complex {}", self.element_type())
        } else {
            self.element_type().name().to_string()
        }
    }

    /// Typed view of the buffer.
    #[must_use]
    pub fn as_slice<T: MatElement>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    /// Mutable typed view of the buffer.
    pub fn as_mut_slice<T: MatElement>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self)
    }

    /// Real values converted to `T`, whatever the stored real type.
    ///
    /// MAT-files store numbers in the smallest type that holds them, so a
    /// double array may arrive as `uint8` data. Complex buffers yield `None`.
    #[must_use]
    pub fn cast<T: RealElement>(&self) -> Option<Vec<T>> {
        T::cast_from(self)
    }

    /// Real values as `f64`; `None` for complex buffers.
    #[must_use]
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        self.cast::<f64>()
    }

    /// Values as `Complex64`; real buffers get a zero imaginary part.
    #[must_use]
    pub fn to_complex_vec(&self) -> Option<Vec<Complex64>> {
        if let Some(real) = self.to_f64_vec() {
            return Some(real.into_iter().map(|x| Complex64::new(x, 0.0)).collect());
        }
        widen_complex!(self)
    }
}

/// A Rust type that can be stored in a [`NumericData`] buffer.
pub trait MatElement: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// Primitive element type (component type for complex values).
    const ELEMENT_TYPE: ElementType;
    /// True for `Complex<T>`.
    const COMPLEX: bool;

    /// Wrap a vector in the matching buffer variant.
    fn wrap(data: Vec<Self>) -> NumericData;

    /// Borrow the buffer if it holds this type.
    fn slice(data: &NumericData) -> Option<&[Self]>;

    /// Mutably borrow the buffer if it holds this type.
    fn slice_mut(data: &mut NumericData) -> Option<&mut [Self]>;
}

/// Real element types that any stored real buffer converts into.
pub trait RealElement: MatElement {
    /// Convert any real buffer; `None` for complex buffers.
    fn cast_from(data: &NumericData) -> Option<Vec<Self>>;
}

macro_rules! impl_element {
    ($t:ty, $ty:ident, $real:ident, $complex:ident) => {
        impl MatElement for $t {
            const ELEMENT_TYPE: ElementType = ElementType::$ty;
            const COMPLEX: bool = false;

            fn wrap(data: Vec<Self>) -> NumericData {
                NumericData::$real(data)
            }

            fn slice(data: &NumericData) -> Option<&[Self]> {
                match data {
                    NumericData::$real(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut NumericData) -> Option<&mut [Self]> {
                match data {
                    NumericData::$real(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl MatElement for Complex<$t> {
            const ELEMENT_TYPE: ElementType = ElementType::$ty;
            const COMPLEX: bool = true;

            fn wrap(data: Vec<Self>) -> NumericData {
                NumericData::$complex(data)
            }

            fn slice(data: &NumericData) -> Option<&[Self]> {
                match data {
                    NumericData::$complex(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut NumericData) -> Option<&mut [Self]> {
                match data {
                    NumericData::$complex(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl RealElement for $t {
            #[allow(clippy::unnecessary_cast)]
            fn cast_from(data: &NumericData) -> Option<Vec<Self>> {
                cast_real!(data, $t)
            }
        }
    };
}

impl_element!(i8, Int8, Int8, ComplexInt8);
impl_element!(u8, UInt8, UInt8, ComplexUInt8);
impl_element!(i16, Int16, Int16, ComplexInt16);
impl_element!(u16, UInt16, UInt16, ComplexUInt16);
impl_element!(i32, Int32, Int32, ComplexInt32);
impl_element!(u32, UInt32, UInt32, ComplexUInt32);
impl_element!(i64, Int64, Int64, ComplexInt64);
impl_element!(u64, UInt64, UInt64, ComplexUInt64);
impl_element!(f32, Single, Single, ComplexSingle);
impl_element!(f64, Double, Double, ComplexDouble);

impl MatElement for bool {
    const ELEMENT_TYPE: ElementType = ElementType::Logical;
    const COMPLEX: bool = false;

    fn wrap(data: Vec<Self>) -> NumericData {
        NumericData::Logical(data)
    }

    fn slice(data: &NumericData) -> Option<&[Self]> {
        match data {
            NumericData::Logical(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut NumericData) -> Option<&mut [Self]> {
        match data {
            NumericData::Logical(v) => Some(v),
            _ => None,
        }
    }
}
