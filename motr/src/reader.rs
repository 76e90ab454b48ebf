/* Copyright (C) 2018 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Sequential reader of 32-bit integers over an in-memory catalog.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::error::ReadError;

/// Byte order of the integers in a catalog, decided by its magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            Self::Little => LittleEndian::read_u32(bytes),
            Self::Big => BigEndian::read_u32(bytes),
        }
    }
}

/// A cursor over borrowed bytes.
///
/// Every read is bounds checked: running past the end is reported as a [`ReadError`]
/// instead of returning short data.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            order,
        }
    }

    /// Moves the cursor to `offset`. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<(), ReadError> {
        if offset > self.data.len() {
            return Err(ReadError {
                offset,
                needed: 0,
                available: 0,
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Reads the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let available = self.data.len().saturating_sub(self.pos);
        if len > available {
            return Err(ReadError {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads `n` unsigned 32-bit integers, i.e. exactly `4 * n` bytes.
    pub fn read_u32s(&mut self, n: usize) -> Result<Vec<u32>, ReadError> {
        let len = n.checked_mul(4).ok_or(ReadError {
            offset: self.pos,
            needed: usize::MAX,
            available: self.data.len().saturating_sub(self.pos),
        })?;
        let order = self.order;
        Ok(self
            .read_bytes(len)?
            .chunks_exact(4)
            .map(|chunk| order.read_u32(chunk))
            .collect())
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let order = self.order;
        self.read_bytes(4).map(|bytes| order.read_u32(bytes))
    }
}
