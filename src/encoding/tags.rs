// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire-level codes: data element types, array classes and array flags.

use std::fmt;

use crate::core::element::ElementType;

/// Size of a full tag (type word + length word).
pub const TAG_SIZE: usize = 8;

/// Payload bytes that fit in a short tag.
pub const SHORT_PAYLOAD_SIZE: usize = 4;

/// Data element type codes (`mi*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Single = 7,
    Double = 9,
    Int64 = 12,
    UInt64 = 13,
    Matrix = 14,
    Compressed = 15,
    Utf8 = 16,
    Utf16 = 17,
    Utf32 = 18,
}

impl DataType {
    /// Decode a type code.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => DataType::Int8,
            2 => DataType::UInt8,
            3 => DataType::Int16,
            4 => DataType::UInt16,
            5 => DataType::Int32,
            6 => DataType::UInt32,
            7 => DataType::Single,
            9 => DataType::Double,
            12 => DataType::Int64,
            13 => DataType::UInt64,
            14 => DataType::Matrix,
            15 => DataType::Compressed,
            16 => DataType::Utf8,
            17 => DataType::Utf16,
            18 => DataType::Utf32,
            _ => return None,
        })
    }

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Element type used to store values of `element_type`.
    #[must_use]
    pub const fn for_element(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Int8 => DataType::Int8,
            ElementType::UInt8 | ElementType::Logical => DataType::UInt8,
            ElementType::Int16 => DataType::Int16,
            ElementType::UInt16 => DataType::UInt16,
            ElementType::Int32 => DataType::Int32,
            ElementType::UInt32 => DataType::UInt32,
            ElementType::Int64 => DataType::Int64,
            ElementType::UInt64 => DataType::UInt64,
            ElementType::Single => DataType::Single,
            ElementType::Double => DataType::Double,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Single => "single",
            DataType::Double => "double",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Matrix => "matrix",
            DataType::Compressed => "compressed",
            DataType::Utf8 => "utf8",
            DataType::Utf16 => "utf16",
            DataType::Utf32 => "utf32",
        };
        f.write_str(name)
    }
}

/// Array class codes (`mx*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayClass {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    UInt8 = 9,
    Int16 = 10,
    UInt16 = 11,
    Int32 = 12,
    UInt32 = 13,
    Int64 = 14,
    UInt64 = 15,
    Function = 16,
    Opaque = 17,
}

impl ArrayClass {
    /// Decode a class code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => ArrayClass::Cell,
            2 => ArrayClass::Struct,
            3 => ArrayClass::Object,
            4 => ArrayClass::Char,
            5 => ArrayClass::Sparse,
            6 => ArrayClass::Double,
            7 => ArrayClass::Single,
            8 => ArrayClass::Int8,
            9 => ArrayClass::UInt8,
            10 => ArrayClass::Int16,
            11 => ArrayClass::UInt16,
            12 => ArrayClass::Int32,
            13 => ArrayClass::UInt32,
            14 => ArrayClass::Int64,
            15 => ArrayClass::UInt64,
            16 => ArrayClass::Function,
            17 => ArrayClass::Opaque,
            _ => return None,
        })
    }

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Class of a dense array with elements of `element_type`.
    #[must_use]
    pub const fn for_element(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Int8 => ArrayClass::Int8,
            ElementType::UInt8 | ElementType::Logical => ArrayClass::UInt8,
            ElementType::Int16 => ArrayClass::Int16,
            ElementType::UInt16 => ArrayClass::UInt16,
            ElementType::Int32 => ArrayClass::Int32,
            ElementType::UInt32 => ArrayClass::UInt32,
            ElementType::Int64 => ArrayClass::Int64,
            ElementType::UInt64 => ArrayClass::UInt64,
            ElementType::Single => ArrayClass::Single,
            ElementType::Double => ArrayClass::Double,
        }
    }

    /// Element type of a dense numeric class.
    #[must_use]
    pub const fn element_type(self) -> Option<ElementType> {
        Some(match self {
            ArrayClass::Double => ElementType::Double,
            ArrayClass::Single => ElementType::Single,
            ArrayClass::Int8 => ElementType::Int8,
            ArrayClass::UInt8 => ElementType::UInt8,
            ArrayClass::Int16 => ElementType::Int16,
            ArrayClass::UInt16 => ElementType::UInt16,
            ArrayClass::Int32 => ElementType::Int32,
            ArrayClass::UInt32 => ElementType::UInt32,
            ArrayClass::Int64 => ElementType::Int64,
            ArrayClass::UInt64 => ElementType::UInt64,
            _ => return None,
        })
    }
}

/// Decoded array flags element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFlags {
    /// Array class
    pub class: ArrayClass,
    /// Logical data
    pub logical: bool,
    /// Declared `global`
    pub global: bool,
    /// Complex data
    pub complex: bool,
    /// Stored entries of a sparse array
    pub nzmax: u32,
}

impl ArrayFlags {
    /// Logical bit in the flag byte.
    pub const LOGICAL: u8 = 0x02;
    /// Global bit in the flag byte.
    pub const GLOBAL: u8 = 0x04;
    /// Complex bit in the flag byte.
    pub const COMPLEX: u8 = 0x08;

    /// Flags with no bits set.
    #[must_use]
    pub const fn new(class: ArrayClass) -> Self {
        Self {
            class,
            logical: false,
            global: false,
            complex: false,
            nzmax: 0,
        }
    }

    /// The flag byte (second byte of the first word).
    #[must_use]
    pub const fn flag_byte(&self) -> u8 {
        let mut byte = 0;
        if self.logical {
            byte |= Self::LOGICAL;
        }
        if self.global {
            byte |= Self::GLOBAL;
        }
        if self.complex {
            byte |= Self::COMPLEX;
        }
        byte
    }

    /// Parse the flag byte and class byte of the first word.
    #[must_use]
    pub fn from_word(word: u32, nzmax: u32) -> (u8, Option<Self>) {
        let class_code = (word & 0xff) as u8;
        let bits = ((word >> 8) & 0x0e) as u8;
        let flags = ArrayClass::from_code(class_code).map(|class| Self {
            class,
            logical: bits & Self::LOGICAL != 0,
            global: bits & Self::GLOBAL != 0,
            complex: bits & Self::COMPLEX != 0,
            nzmax,
        });
        (class_code, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_codes() {
        assert_eq!(DataType::from_code(9), Some(DataType::Double));
        assert_eq!(DataType::from_code(8), None);
        assert_eq!(DataType::from_code(11), None);
        assert_eq!(DataType::Compressed.code(), 15);
        assert_eq!(DataType::for_element(ElementType::Logical), DataType::UInt8);
    }

    #[test]
    fn test_array_class_codes() {
        assert_eq!(ArrayClass::from_code(17), Some(ArrayClass::Opaque));
        assert_eq!(ArrayClass::from_code(0), None);
        assert_eq!(ArrayClass::Sparse.code(), 5);
        assert_eq!(ArrayClass::Char.element_type(), None);
        assert_eq!(ArrayClass::Int64.element_type(), Some(ElementType::Int64));
    }

    #[test]
    fn test_flag_word_round_trip() {
        let mut flags = ArrayFlags::new(ArrayClass::Sparse);
        flags.logical = true;
        flags.global = true;
        let word = u32::from(flags.class.code()) | (u32::from(flags.flag_byte()) << 8);
        let (code, parsed) = ArrayFlags::from_word(word, 3);
        assert_eq!(code, 5);
        let parsed = parsed.unwrap();
        assert!(parsed.logical && parsed.global && !parsed.complex);
        assert_eq!(parsed.nzmax, 3);
    }

    #[test]
    fn test_flag_word_ignores_unknown_bits() {
        let (_, parsed) = ArrayFlags::from_word(0x0000_f106, 0);
        let parsed = parsed.unwrap();
        assert_eq!(parsed.class, ArrayClass::Double);
        assert!(!parsed.logical && !parsed.global && !parsed.complex);
    }
}
