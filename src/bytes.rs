//! Bounds checked reading of received packet buffers.
//!
//! Netlink attribute streams routinely arrive truncated or with lengths
//! that disagree with the enclosing buffer, so every read in this crate
//! goes through [`SliceCursor`] which refuses to hand out bytes past the
//! end of the buffer. Scalars are host endian on the wire.

use std::{cmp, mem};

use byteorder::{ByteOrder, NativeEndian};

use crate::err::DeError;

/// A cursor over a borrowed packet buffer.
///
/// All accessors either return a subslice of the underlying buffer or
/// fail with [`DeError::UnexpectedEob`]. A failed read leaves the
/// position untouched.
#[derive(Debug)]
pub struct SliceCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        SliceCursor { buf, pos: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns `true` when the cursor has been exhausted.
    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DeError> {
        if n > self.remaining() {
            return Err(DeError::UnexpectedEob);
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Borrow everything left in the buffer and advance to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }

    /// Advance up to `n` bytes, stopping at the end of the buffer.
    ///
    /// Used to step over alignment padding where a short final record
    /// is legal.
    pub fn skip(&mut self, n: usize) {
        self.pos = cmp::min(self.pos + n, self.buf.len());
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, DeError> {
        let bytes = self.take(mem::size_of::<u8>())?;
        Ok(bytes[0])
    }

    /// Read one byte as signed.
    pub fn read_i8(&mut self) -> Result<i8, DeError> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a host endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, DeError> {
        let bytes = self.take(mem::size_of::<u16>())?;
        Ok(<NativeEndian as ByteOrder>::read_u16(bytes))
    }

    /// Read a host endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, DeError> {
        let bytes = self.take(mem::size_of::<u32>())?;
        Ok(<NativeEndian as ByteOrder>::read_u32(bytes))
    }

    /// Read a host endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, DeError> {
        let bytes = self.take(mem::size_of::<i32>())?;
        Ok(<NativeEndian as ByteOrder>::read_i32(bytes))
    }

    /// Read a host endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, DeError> {
        let bytes = self.take(mem::size_of::<u64>())?;
        Ok(<NativeEndian as ByteOrder>::read_u64(bytes))
    }
}
