// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The 128-byte file header.
//!
//! | bytes     | contents                              |
//! |-----------|---------------------------------------|
//! | 0..116    | descriptive text, space padded        |
//! | 116..124  | subsystem data offset                 |
//! | 124..126  | version (0x0100)                      |
//! | 126..128  | endian indicator, `"IM"` when little  |

use crate::core::error::{CodecError, Result};
use crate::encoding::cursor::MatCursor;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 128;

/// Bytes of descriptive text.
pub const TEXT_SIZE: usize = 116;

/// Version written by this crate.
pub const VERSION: i16 = 0x0100;

/// Endian indicator as stored by a little-endian producer.
const LITTLE_ENDIAN_INDICATOR: [u8; 2] = *b"IM";

/// Endian indicator as stored by a big-endian producer.
const BIG_ENDIAN_INDICATOR: [u8; 2] = *b"MI";

/// Offsets that mark subsystem data as absent.
const NO_SUBSYSTEM: [u64; 3] = [0, u64::MAX, 0x2020_2020_2020_2020];

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Descriptive text, trailing padding removed
    pub text: String,
    /// Absolute offset of the subsystem data block
    pub subsystem_offset: Option<u64>,
    /// Format version
    pub version: i16,
}

impl Header {
    /// Header with the given text and no subsystem data.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subsystem_offset: None,
            version: VERSION,
        }
    }

    /// Header with the standard descriptive text for the current platform and time.
    #[must_use]
    pub fn generated() -> Self {
        let created = chrono::Local::now().format("%a %b %d %H:%M:%S %Y");
        Self::new(format!(
            "MATLAB 5.0 MAT-file, Platform: {}, Created on: {created}",
            platform_name()
        ))
    }

    /// Parse a header at the cursor.
    pub fn read(cursor: &mut MatCursor<'_>) -> Result<Self> {
        let text_bytes = cursor.read_bytes(TEXT_SIZE)?;
        let offset = cursor.read_u64()?;
        let version = cursor.read_i16()?;
        let indicator = cursor.read_bytes(2)?;
        if indicator == BIG_ENDIAN_INDICATOR {
            return Err(CodecError::BigEndian);
        }
        if indicator != LITTLE_ENDIAN_INDICATOR {
            return Err(CodecError::parse(
                "header",
                format!("unknown endian indicator {indicator:02X?}"),
            ));
        }
        let text = String::from_utf8_lossy(text_bytes)
            .trim_end_matches([' ', '\0'])
            .to_string();
        let subsystem_offset = if NO_SUBSYSTEM.contains(&offset) || offset < HEADER_SIZE as u64 {
            None
        } else {
            Some(offset)
        };
        Ok(Self {
            text,
            subsystem_offset,
            version,
        })
    }

    /// Encode the header. Text is truncated or space-padded to 116 bytes;
    /// the subsystem offset is always written as zero.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [b' '; HEADER_SIZE];
        let text = self.text.as_bytes();
        let len = text.len().min(TEXT_SIZE);
        bytes[..len].copy_from_slice(&text[..len]);
        bytes[TEXT_SIZE..TEXT_SIZE + 8].fill(0);
        bytes[124..126].copy_from_slice(&self.version.to_le_bytes());
        bytes[126..128].copy_from_slice(&LITTLE_ENDIAN_INDICATOR);
        bytes
    }
}

fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "macOS",
        "linux" => "Linux",
        _ => "Unknown",
    }
}
