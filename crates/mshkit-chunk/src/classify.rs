//! Chunk classification by tag.
//!
//! Whether a chunk holds raw bytes or nested chunks is never sniffed from
//! its payload. It is decided here, from the tag alone, by two fixed tables.

use crate::Tag;

/// Containers whose children are keyed by tag.
pub const UNIQUE_CONTAINER_TAGS: [Tag; 12] = [
    Tag::new(*b"HEDR"),
    Tag::new(*b"FINF"),
    Tag::new(*b"SINF"),
    Tag::new(*b"CAMR"),
    Tag::new(*b"SEGM"),
    Tag::new(*b"CLTH"),
    Tag::new(*b"ANM2"),
    Tag::new(*b"LGTP"),
    Tag::new(*b"LGTI"),
    Tag::new(*b"LGTS"),
    Tag::new(*b"MATD"),
    Tag::new(*b"MODL"),
];

/// Containers whose children are kept as an ordered list.
pub const ORDERED_CONTAINER_TAGS: [Tag; 3] = [
    Tag::new(*b"MATL"),
    Tag::new(*b"MSH2"),
    Tag::new(*b"GEOM"),
];

/// Material list. Its payload starts with a 4-byte material count that is
/// not a chunk header.
pub const MATL: Tag = Tag::new(*b"MATL");

/// The shape of a chunk body, as decided by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// Nested chunks keyed by tag; a repeated tag replaces the earlier child.
    Unique,
    /// Nested chunks in stream order, duplicates kept.
    Ordered,
    /// Opaque payload bytes.
    Leaf,
}

impl ChunkKind {
    /// Classify a tag.
    pub fn of(tag: Tag) -> Self {
        if UNIQUE_CONTAINER_TAGS.contains(&tag) {
            Self::Unique
        } else if ORDERED_CONTAINER_TAGS.contains(&tag) {
            Self::Ordered
        } else {
            Self::Leaf
        }
    }

    /// Whether chunks of this kind hold child chunks.
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Leaf)
    }
}

/// Bytes to skip at the start of a container payload before the first child.
pub(crate) fn child_prefix_len(tag: Tag) -> usize {
    if tag == MATL {
        4
    } else {
        0
    }
}
