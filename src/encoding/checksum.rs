// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adler-32 checksum, as used in the zlib trailer of compressed elements.

use std::io::{self, Write};

const MOD_ADLER: u32 = 65521;

// Largest n such that 255 * n * (n + 1) / 2 + (n + 1) * (MOD_ADLER - 1) fits in u32.
const NMAX: usize = 5552;

/// Incremental Adler-32.
#[derive(Debug, Clone, Copy)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Checksum of the empty input.
    #[must_use]
    pub const fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    /// Current checksum.
    #[must_use]
    pub const fn value(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// Adler-32 of `data`.
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let mut checksum = Adler32::new();
    checksum.update(data);
    checksum.value()
}

/// Writer that checksums everything passing through it.
#[derive(Debug)]
pub struct ChecksumWriter<W> {
    inner: W,
    checksum: Adler32,
}

impl<W: Write> ChecksumWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            checksum: Adler32::new(),
        }
    }

    /// Checksum of the bytes written so far.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.checksum.value()
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> (W, u32) {
        let checksum = self.checksum.value();
        (self.inner, checksum)
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.checksum.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
