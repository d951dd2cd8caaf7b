//! mshkit - `.msh` model file inspection library.
//!
//! This crate provides a unified interface to the mshkit crates.
//!
//! # Crates
//!
//! - [`mshkit_common`] - Common utilities (bounded binary reading)
//! - [`mshkit_chunk`] - Chunk tree parsing, rendering and search
//!
//! # Example
//!
//! ```no_run
//! use mshkit::prelude::*;
//!
//! let file = MshFile::open("model.msh")?;
//! let root = file.root()?;
//!
//! for material in root.filter_all(b"MATD") {
//!     println!("{}", material);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use mshkit_chunk as chunk;
pub use mshkit_common as common;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mshkit_chunk::{
        parse_root, render, Body, Chunk, ChunkKind, MshFile, ParseOptions, RenderOptions, Tag,
    };
    pub use mshkit_common::BinaryReader;
}

// Re-export commonly used types at the crate root
pub use mshkit_chunk::{parse_root, render, Chunk, MshFile};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
