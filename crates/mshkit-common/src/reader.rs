//! Bounded binary reader over byte slices.
//!
//! [`BinaryReader`] is a cursor over a byte slice that never reads past a
//! limit. The limit defaults to the end of the slice but can be narrowed to
//! the payload of an enclosing structure, which is how nested length-prefixed
//! records keep their children inside their own bytes.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// Offsets reported by [`position`](Self::position) are absolute offsets into
/// the original slice, regardless of the limit.
///
/// # Example
///
/// ```
/// use mshkit_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::bounded(&data, 0, 4);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert!(reader.is_empty());
/// assert!(reader.read_u32().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader over the whole slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            limit: data.len(),
        }
    }

    /// Create a reader over `data[position..limit]`.
    ///
    /// A limit past the end of the slice is clamped to the slice length.
    #[inline]
    pub fn bounded(data: &'a [u8], position: usize, limit: usize) -> Self {
        Self {
            data,
            position,
            limit: limit.min(data.len()),
        }
    }

    /// Get the current absolute position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the absolute offset reads may not cross.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Get the number of bytes remaining before the limit.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.limit
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}
