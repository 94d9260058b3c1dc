// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for matcodec.
//!
//! Errors fall into three groups:
//! - Malformed input: the file is corrupt or uses a layout this codec does not read
//! - Unsupported operations: a valid request the codec cannot satisfy
//! - Contract violations: misuse of an already decoded value model
//!
//! Sink I/O failures are reported as [`CodecError::EncodeError`].

use std::fmt;

/// Errors that can occur while decoding, encoding or querying MAT-file data.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// Malformed record
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Stream ended inside a tag or payload
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// Unrecognized data type code in a tag
    UnknownDataType {
        /// Raw type code
        code: u32,
        /// Position of the tag
        cursor_pos: u64,
    },

    /// A data element of the wrong type where a specific one was required
    UnexpectedElement {
        /// Which part of the record was being read
        context: String,
        /// Required element type
        expected: String,
        /// Element type found
        found: String,
    },

    /// Array class code that this codec does not decode
    UnsupportedClass {
        /// Raw class code from the array flags
        class_code: u8,
    },

    /// Subsystem data block has an unexpected shape
    SubsystemError {
        /// Parsing stage
        stage: String,
        /// Error message
        message: String,
    },

    /// Compressed element could not be inflated or deflated
    Compression {
        /// Error message
        message: String,
    },

    /// File header declares big-endian byte order
    BigEndian,

    /// Unsupported type or feature
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Data length does not match the declared dimensions
    DimensionMismatch {
        /// Element count implied by the dimensions
        expected: usize,
        /// Element count supplied
        actual: usize,
    },

    /// Lookup of a variable that is not in the file
    VariableNotFound {
        /// Variable name
        name: String,
    },

    /// Lookup of a structure or object field that does not exist
    FieldNotFound {
        /// Field name
        field: String,
    },

    /// Multi-index outside the array bounds
    IndexOutOfBounds {
        /// Requested index
        index: Vec<usize>,
        /// Array dimensions
        dims: Vec<usize>,
    },

    /// Object link accessed before its subsystem data was resolved
    UnresolvedLink,

    /// Typed access with the wrong element type
    TypeMismatch {
        /// Requested type
        expected: String,
        /// Stored type
        found: String,
    },

    /// Encoding error or sink I/O failure
    EncodeError {
        /// Codec context (e.g., "MatFileWriter", "IO")
        codec: String,
        /// Error message
        message: String,
    },
}

impl CodecError {
    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create an "unexpected element" error.
    pub fn unexpected_element(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        CodecError::UnexpectedElement {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a subsystem data error.
    pub fn subsystem(stage: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::SubsystemError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a compression error.
    pub fn compression(message: impl Into<String>) -> Self {
        CodecError::Compression {
            message: message.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CodecError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(codec: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::EncodeError {
            codec: codec.into(),
            message: message.into(),
        }
    }

    /// Create a "variable not found" error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        CodecError::VariableNotFound { name: name.into() }
    }

    /// Create a "field not found" error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        CodecError::FieldNotFound {
            field: field.into(),
        }
    }

    /// Create an index out of bounds error.
    pub fn index_out_of_bounds(index: &[usize], dims: &[usize]) -> Self {
        CodecError::IndexOutOfBounds {
            index: index.to_vec(),
            dims: dims.to_vec(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// True for errors caused by a corrupt or unreadable file.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CodecError::ParseError { .. }
                | CodecError::BufferTooShort { .. }
                | CodecError::UnknownDataType { .. }
                | CodecError::UnexpectedElement { .. }
                | CodecError::UnsupportedClass { .. }
                | CodecError::SubsystemError { .. }
                | CodecError::Compression { .. }
                | CodecError::BigEndian
        )
    }

    /// True for errors caused by misuse of a decoded value model.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            CodecError::VariableNotFound { .. }
                | CodecError::FieldNotFound { .. }
                | CodecError::IndexOutOfBounds { .. }
                | CodecError::UnresolvedLink
                | CodecError::TypeMismatch { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::UnknownDataType { code, cursor_pos } => vec![
                ("code", code.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::UnexpectedElement {
                context,
                expected,
                found,
            } => vec![
                ("context", context.clone()),
                ("expected", expected.clone()),
                ("found", found.clone()),
            ],
            CodecError::UnsupportedClass { class_code } => {
                vec![("class", class_code.to_string())]
            }
            CodecError::SubsystemError { stage, message } => {
                vec![("stage", stage.clone()), ("message", message.clone())]
            }
            CodecError::Compression { message } => vec![("message", message.clone())],
            CodecError::BigEndian => vec![("endian", "big".to_string())],
            CodecError::Unsupported { feature } => vec![("feature", feature.clone())],
            CodecError::DimensionMismatch { expected, actual } => vec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            CodecError::VariableNotFound { name } => vec![("variable", name.clone())],
            CodecError::FieldNotFound { field } => vec![("field", field.clone())],
            CodecError::IndexOutOfBounds { index, dims } => vec![
                ("index", format!("{index:?}")),
                ("dims", format!("{dims:?}")),
            ],
            CodecError::UnresolvedLink => vec![("link", "unresolved".to_string())],
            CodecError::TypeMismatch { expected, found } => vec![
                ("expected", expected.clone()),
                ("found", found.clone()),
            ],
            CodecError::EncodeError { codec, message } => {
                vec![("codec", codec.clone()), ("message", message.clone())]
            }
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            CodecError::UnknownDataType { code, cursor_pos } => {
                write!(f, "Unknown data type {code} in tag at position {cursor_pos}")
            }
            CodecError::UnexpectedElement {
                context,
                expected,
                found,
            } => write!(f, "{context}: expected {expected} element, found {found}"),
            CodecError::UnsupportedClass { class_code } => {
                write!(f, "Unsupported array class {class_code}")
            }
            CodecError::SubsystemError { stage, message } => {
                write!(f, "Subsystem data error ({stage}): {message}")
            }
            CodecError::Compression { message } => write!(f, "Compression error: {message}"),
            CodecError::BigEndian => write!(f, "Big-endian files are not supported"),
            CodecError::Unsupported { feature } => {
                write!(f, "Unsupported feature: '{feature}'")
            }
            CodecError::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: dimensions describe {expected} elements, but {actual} were given"
            ),
            CodecError::VariableNotFound { name } => {
                write!(f, "Variable not found: '{name}'")
            }
            CodecError::FieldNotFound { field } => write!(f, "Field not found: '{field}'"),
            CodecError::IndexOutOfBounds { index, dims } => {
                write!(f, "Index {index:?} out of bounds for dimensions {dims:?}")
            }
            CodecError::UnresolvedLink => {
                write!(f, "Object link accessed before subsystem data was resolved")
            }
            CodecError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: requested {expected}, array holds {found}")
            }
            CodecError::EncodeError { codec, message } => {
                write!(f, "{codec} encode error: {message}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::EncodeError {
            codec: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for matcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
