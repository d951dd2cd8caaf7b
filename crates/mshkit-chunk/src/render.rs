//! Indented text dump of a chunk tree.
//!
//! Each node prints as `TAG:` followed by a decoded value for leaves, or by
//! its children on the following lines, indented one level deeper. Leaf
//! values are decoded by tag:
//!
//! | rule | applies to | output |
//! |---|---|---|
//! | text | `FINF`, `TX0D`..`TX9D`, `PRFX`, `PRNT`, `CTEX`, `NAME` | UTF-8 text, trailing NULs stripped |
//! | integer | `SHVO`, `MTYP`, `MNDX`, `FLGS`, `MATI` | first 4 bytes as little-endian u32 |
//! | hex | any other leaf up to `hex_limit` bytes | `01 02 ff` |
//! | placeholder | anything longer | `<len: N>` |
//!
//! Rendering never fails. A leaf that does not fit its tag's rule falls
//! through to the hex or placeholder rule.

use std::fmt::{self, Write};

use crate::{Body, Chunk, Tag};

// FINF is always read as a container, so the text rule never reaches it.
const TEXT_TAGS: [Tag; 5] = [
    Tag::new(*b"FINF"),
    Tag::new(*b"PRFX"),
    Tag::new(*b"PRNT"),
    Tag::new(*b"CTEX"),
    Tag::new(*b"NAME"),
];

const INTEGER_TAGS: [Tag; 5] = [
    Tag::new(*b"SHVO"),
    Tag::new(*b"MTYP"),
    Tag::new(*b"MNDX"),
    Tag::new(*b"FLGS"),
    Tag::new(*b"MATI"),
];

/// Layout options for [`render_with`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Spaces added per nesting level.
    pub indent_width: usize,
    /// Longest unrecognised leaf still dumped as hex.
    pub hex_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            hex_limit: 12,
        }
    }
}

/// Render a chunk tree with default options.
///
/// Lines are separated by `\n`; there is no trailing newline.
pub fn render(chunk: &Chunk<'_>) -> String {
    render_with(chunk, 0, &RenderOptions::default())
}

/// Render a chunk tree starting at `indent` spaces.
pub fn render_with(chunk: &Chunk<'_>, indent: usize, options: &RenderOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_node(&mut out, chunk, indent, options);
    out
}

fn is_text_tag(tag: Tag) -> bool {
    let [a, b, c, d] = tag.bytes();
    TEXT_TAGS.contains(&tag) || (a == b'T' && b == b'X' && c.is_ascii_digit() && d == b'D')
}

fn is_integer_tag(tag: Tag) -> bool {
    INTEGER_TAGS.contains(&tag)
}

fn write_node<W: Write>(out: &mut W, chunk: &Chunk<'_>, indent: usize, options: &RenderOptions) -> fmt::Result {
    write!(out, "{:indent$}{}:", "", chunk.tag(), indent = indent)?;

    match chunk.body() {
        Body::Leaf(payload) if is_text_tag(chunk.tag()) => {
            let text = String::from_utf8_lossy(payload);
            write!(out, " {}", text.trim_end_matches('\0'))
        }
        Body::Leaf(payload) if is_integer_tag(chunk.tag()) && payload.len() >= 4 => {
            let value = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
            write!(out, " {}", value)
        }
        Body::Leaf(payload) if payload.len() <= options.hex_limit => {
            out.write_char(' ')?;
            for (i, byte) in payload.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write!(out, "{:02x}", byte)?;
            }
            Ok(())
        }
        Body::Leaf(_) => write!(out, " <len: {}>", chunk.length()),
        Body::Unique(_) | Body::Ordered(_) => {
            for child in chunk.children() {
                out.write_char('\n')?;
                write_node(out, child, indent + options.indent_width, options)?;
            }
            Ok(())
        }
    }
}

impl Chunk<'_> {
    /// Render this chunk and its subtree starting at `indent` spaces.
    pub fn tree(&self, indent: usize) -> String {
        render_with(self, indent, &RenderOptions::default())
    }
}

impl fmt::Display for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0, &RenderOptions::default())
    }
}
