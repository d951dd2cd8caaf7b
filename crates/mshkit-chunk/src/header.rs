//! Chunk header structure.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Tag;

/// The 8-byte header in front of every chunk payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ChunkHeader {
    /// Chunk identifier.
    pub tag: Tag,
    /// Payload size in bytes, excluding this header.
    pub length: U32,
}

impl ChunkHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 8;
}
