//! Chunk tree nodes.

use crate::{ChunkHeader, ChunkKind, Tag};

/// One node of a parsed chunk tree.
///
/// Payload bytes are borrowed from the buffer the tree was parsed from.
/// Children are owned by their parent; the tree is never modified after
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chunk<'a> {
    tag: Tag,
    length: u32,
    body: Body<'a>,
}

/// The contents of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Body<'a> {
    /// Children keyed by tag, in order of first appearance.
    Unique(ChildMap<'a>),
    /// Children in stream order.
    Ordered(Vec<Chunk<'a>>),
    /// Raw payload.
    Leaf(&'a [u8]),
}

impl<'a> Chunk<'a> {
    pub(crate) fn new(tag: Tag, length: u32, body: Body<'a>) -> Self {
        Self { tag, length, body }
    }

    /// The chunk tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Declared payload length, excluding the 8-byte header.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Bytes this chunk occupies in its parent, header included.
    #[inline]
    pub fn span_len(&self) -> usize {
        self.length as usize + ChunkHeader::SIZE
    }

    /// The chunk body.
    #[inline]
    pub fn body(&self) -> &Body<'a> {
        &self.body
    }

    /// The body kind.
    pub fn kind(&self) -> ChunkKind {
        match self.body {
            Body::Unique(_) => ChunkKind::Unique,
            Body::Ordered(_) => ChunkKind::Ordered,
            Body::Leaf(_) => ChunkKind::Leaf,
        }
    }

    /// Whether this chunk holds raw bytes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.body, Body::Leaf(_))
    }

    /// Raw payload of a leaf chunk, `None` for containers.
    pub fn payload(&self) -> Option<&'a [u8]> {
        match self.body {
            Body::Leaf(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Direct children in body order. Empty for leaves.
    pub fn children(&self) -> std::slice::Iter<'_, Chunk<'a>> {
        match &self.body {
            Body::Unique(map) => map.iter(),
            Body::Ordered(list) => list.iter(),
            Body::Leaf(_) => std::slice::Iter::default(),
        }
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        match &self.body {
            Body::Unique(map) => map.len(),
            Body::Ordered(list) => list.len(),
            Body::Leaf(_) => 0,
        }
    }

    /// Keyed lookup of a child in a tag-keyed container.
    ///
    /// Returns `None` for ordered containers and leaves; use
    /// [`filter`](Self::filter) there.
    pub fn get(&self, tag: impl Into<Tag>) -> Option<&Chunk<'a>> {
        match &self.body {
            Body::Unique(map) => map.get(tag.into()),
            _ => None,
        }
    }
}

/// Tag-keyed children of a container.
///
/// Iterates in order of first appearance. Inserting a child whose tag is
/// already present replaces the earlier child at its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildMap<'a> {
    entries: Vec<Chunk<'a>>,
}

impl<'a> ChildMap<'a> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child, returning the child it replaced, if any.
    pub fn insert(&mut self, chunk: Chunk<'a>) -> Option<Chunk<'a>> {
        match self.entries.iter_mut().find(|c| c.tag == chunk.tag) {
            Some(slot) => Some(std::mem::replace(slot, chunk)),
            None => {
                self.entries.push(chunk);
                None
            }
        }
    }

    /// Look up a child by tag.
    pub fn get(&self, tag: Tag) -> Option<&Chunk<'a>> {
        self.entries.iter().find(|c| c.tag == tag)
    }

    /// Children in order of first appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, Chunk<'a>> {
        self.entries.iter()
    }

    /// Tags in order of first appearance.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.iter().map(|c| c.tag)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'m, 'a> IntoIterator for &'m ChildMap<'a> {
    type Item = &'m Chunk<'a>;
    type IntoIter = std::slice::Iter<'m, Chunk<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChildMap<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for chunk in &self.entries {
            map.serialize_entry(&chunk.tag, chunk)?;
        }
        map.end()
    }
}
