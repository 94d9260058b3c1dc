// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Output sinks for the element encoder.
//!
//! Matrix elements carry their byte length in the tag, so each matrix is
//! emitted twice: once into a [`SizeCalculator`] that only counts bytes, and
//! once into the real output. Both implement [`ElementSink`], so the same
//! emit path drives both passes. Nested matrices are not re-sized while
//! counting, which keeps a sizing pass linear in the tree size.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian};
use num_complex::Complex;

use crate::core::error::Result;

/// Values encoded per staging buffer.
const CHUNK_ELEMENTS: usize = 4096;

/// Destination of encoded element bytes.
pub trait ElementSink {
    /// Append raw bytes.
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Append a little-endian payload.
    fn put_payload<P: LePayload + ?Sized>(&mut self, payload: &P) -> Result<()>;

    /// True when bytes are only counted, so a matrix tag may carry any length.
    fn counts_only(&self) -> bool {
        false
    }
}

/// Data that can be written as little-endian bytes without materializing
/// the whole encoding first.
pub trait LePayload {
    /// Encoded length in bytes.
    fn byte_len(&self) -> usize;

    /// Write the encoding.
    fn write_le(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Primitive value with a fixed little-endian encoding.
pub trait LeValue: Copy + Default {
    /// Encoded size of one value.
    const SIZE: usize;

    /// Encode `values` into `out`, which is exactly `values.len() * SIZE` long.
    fn encode(values: &[Self], out: &mut [u8]);
}

impl LeValue for u8 {
    const SIZE: usize = 1;

    fn encode(values: &[Self], out: &mut [u8]) {
        out.copy_from_slice(values);
    }
}

impl LeValue for i8 {
    const SIZE: usize = 1;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (dst, &v) in out.iter_mut().zip(values) {
            *dst = v as u8;
        }
    }
}

impl LeValue for bool {
    const SIZE: usize = 1;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (dst, &v) in out.iter_mut().zip(values) {
            *dst = u8::from(v);
        }
    }
}

macro_rules! impl_le_value {
    ($t:ty, $size:expr, $write_into:ident) => {
        impl LeValue for $t {
            const SIZE: usize = $size;

            fn encode(values: &[Self], out: &mut [u8]) {
                LittleEndian::$write_into(values, out);
            }
        }
    };
}

impl_le_value!(i16, 2, write_i16_into);
impl_le_value!(u16, 2, write_u16_into);
impl_le_value!(i32, 4, write_i32_into);
impl_le_value!(u32, 4, write_u32_into);
impl_le_value!(i64, 8, write_i64_into);
impl_le_value!(u64, 8, write_u64_into);
impl_le_value!(f32, 4, write_f32_into);
impl_le_value!(f64, 8, write_f64_into);

fn write_values<T: LeValue>(values: &[T], out: &mut dyn Write) -> io::Result<()> {
    let mut staging = vec![0u8; values.len().min(CHUNK_ELEMENTS) * T::SIZE];
    for chunk in values.chunks(CHUNK_ELEMENTS) {
        let bytes = &mut staging[..chunk.len() * T::SIZE];
        T::encode(chunk, bytes);
        out.write_all(bytes)?;
    }
    Ok(())
}

impl<T: LeValue> LePayload for [T] {
    fn byte_len(&self) -> usize {
        self.len() * T::SIZE
    }

    fn write_le(&self, out: &mut dyn Write) -> io::Result<()> {
        write_values(self, out)
    }
}

/// One component (real or imaginary) of a complex buffer.
#[derive(Debug, Clone, Copy)]
pub struct ComplexPart<'a, T> {
    values: &'a [Complex<T>],
    imaginary: bool,
}

impl<'a, T> ComplexPart<'a, T> {
    pub fn real(values: &'a [Complex<T>]) -> Self {
        Self {
            values,
            imaginary: false,
        }
    }

    pub fn imaginary(values: &'a [Complex<T>]) -> Self {
        Self {
            values,
            imaginary: true,
        }
    }
}

impl<T: LeValue> LePayload for ComplexPart<'_, T> {
    fn byte_len(&self) -> usize {
        self.values.len() * T::SIZE
    }

    fn write_le(&self, out: &mut dyn Write) -> io::Result<()> {
        let mut parts = Vec::with_capacity(self.values.len().min(CHUNK_ELEMENTS));
        for chunk in self.values.chunks(CHUNK_ELEMENTS) {
            parts.clear();
            parts.extend(
                chunk
                    .iter()
                    .map(|c| if self.imaginary { c.im } else { c.re }),
            );
            write_values(&parts, out)?;
        }
        Ok(())
    }
}

/// Sink that only counts bytes.
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator {
    size: u64,
}

impl SizeCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes counted so far.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

impl ElementSink for SizeCalculator {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.size += bytes.len() as u64;
        Ok(())
    }

    fn put_payload<P: LePayload + ?Sized>(&mut self, payload: &P) -> Result<()> {
        self.size += payload.byte_len() as u64;
        Ok(())
    }

    fn counts_only(&self) -> bool {
        true
    }
}

/// Sink writing to any [`Write`].
#[derive(Debug)]
pub struct StreamSink<W> {
    inner: W,
    written: u64,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Bytes written through this sink.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ElementSink for StreamSink<W> {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    fn put_payload<P: LePayload + ?Sized>(&mut self, payload: &P) -> Result<()> {
        payload.write_le(&mut self.inner)?;
        self.written += payload.byte_len() as u64;
        Ok(())
    }
}
