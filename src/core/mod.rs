// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout matcodec.
//!
//! This module provides the value model:
//! - [`CodecError`] - Error taxonomy
//! - [`Array`] and its variants - Numeric, char, cell, struct, sparse and object arrays
//! - [`MatFile`] and [`Variable`] - File contents
//! - [`DataBuilder`] - Construction façade

pub mod array;
pub mod builder;
pub mod cell;
pub mod char_array;
pub mod dims;
pub mod element;
pub mod error;
pub mod file;
pub mod numeric;
pub mod opaque;
pub mod sparse;
pub mod structure;

pub use array::Array;
pub use builder::DataBuilder;
pub use cell::CellArray;
pub use char_array::{CharArray, CharEncoding};
pub use element::{ElementType, MatElement, NumericData, RealElement};
pub use error::{CodecError, Result};
pub use file::{MatFile, Variable};
pub use numeric::NumericArray;
pub use opaque::{
    ClassInfo, ObjectInfo, ObjectLink, OpaqueArray, OpaqueStorage, SubsystemData,
    SubsystemHandle,
};
pub use sparse::{SparseArray, SparseElement, SparseMatrix};
pub use structure::{StructArray, StructElement, StructField};
