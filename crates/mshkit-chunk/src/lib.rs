//! Chunk tree reader for `.msh` model files.
//!
//! An `.msh` file is a tree of self-describing chunks. Every chunk starts
//! with an 8-byte header:
//!
//! - 4 bytes: tag, e.g. `HEDR`, `MODL`, `GEOM`
//! - 4 bytes: payload length (little-endian u32), excluding the header
//!
//! The tag alone decides what the payload holds (see [`ChunkKind`]):
//!
//! - **Unique containers** (`HEDR`, `MODL`, `MATD`, ...) hold child chunks
//!   keyed by tag. A repeated tag replaces the earlier child.
//! - **Ordered containers** (`MATL`, `MSH2`, `GEOM`) hold child chunks in
//!   stream order, duplicates kept. `MATL` payloads start with a 4-byte
//!   material count that is skipped.
//! - Everything else is a **leaf** of opaque bytes.
//!
//! Every child is checked against the end of its parent's payload; a length
//! that overruns it is a [`Error::BoundsError`].
//!
//! # Example
//!
//! ```no_run
//! use mshkit_chunk::{render, MshFile};
//!
//! let file = MshFile::open("model.msh")?;
//! let root = file.root()?;
//!
//! println!("{}", render(&root));
//!
//! for geometry in root.filter_all(b"GEOM") {
//!     println!("{} segments", geometry.filter(b"SEGM").len());
//! }
//! # Ok::<(), mshkit_chunk::Error>(())
//! ```

mod chunk;
mod classify;
mod error;
mod file;
mod header;
mod reader;
mod render;
mod search;
mod tag;

#[cfg(test)]
mod test_util;

pub use chunk::{Body, ChildMap, Chunk};
pub use classify::{ChunkKind, MATL, ORDERED_CONTAINER_TAGS, UNIQUE_CONTAINER_TAGS};
pub use error::{Error, Result};
pub use file::MshFile;
pub use header::ChunkHeader;
pub use reader::{
    parse, parse_root, parse_with, read_header, ParseOptions, DEFAULT_MAX_DEPTH, PARALLEL_MAX_DEPTH,
};
pub use render::{render, render_with, RenderOptions};
pub use search::Walk;
pub use tag::Tag;
