//! Structural queries over a parsed chunk tree.

use mshkit_common::BinaryReader;

use crate::{Chunk, Error, Result, Tag};

impl<'a> Chunk<'a> {
    /// Direct children with the given tag, in body order.
    ///
    /// Always empty for leaves.
    pub fn filter(&self, tag: impl Into<Tag>) -> Vec<&Chunk<'a>> {
        let tag = tag.into();
        self.children().filter(|child| child.tag() == tag).collect()
    }

    /// Every descendant with the given tag.
    ///
    /// Results are ordered as this node's direct matches first, then the
    /// matches of each child's subtree in child order. A node matched at
    /// several levels of that composition is listed once per level.
    pub fn filter_all(&self, tag: impl Into<Tag>) -> Vec<&Chunk<'a>> {
        let mut out = Vec::new();
        self.collect_all(tag.into(), &mut out);
        out
    }

    fn collect_all<'s>(&'s self, tag: Tag, out: &mut Vec<&'s Chunk<'a>>) {
        out.extend(self.filter(tag));
        for child in self.children() {
            child.collect_all(tag, out);
        }
    }

    /// Read the 4-byte little-endian count at the start of a leaf payload.
    pub fn scalar_count(&self) -> Result<u32> {
        let payload = self
            .payload()
            .ok_or_else(|| Error::NotALeaf { tag: self.tag() })?;
        BinaryReader::new(payload)
            .read_u32()
            .map_err(|_| Error::TooShort {
                tag: self.tag(),
                length: self.length(),
            })
    }

    /// Pre-order iterator over this chunk and all of its descendants.
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order traversal of a chunk subtree, see [`Chunk::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'s, 'a> {
    stack: Vec<&'s Chunk<'a>>,
}

impl<'s, 'a> Iterator for Walk<'s, 'a> {
    type Item = &'s Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().rev());
        Some(node)
    }
}
