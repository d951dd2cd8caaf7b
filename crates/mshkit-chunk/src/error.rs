//! Error types for chunk tree parsing.

use thiserror::Error;

use crate::Tag;

/// Errors that can occur when reading a chunk tree.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] mshkit_common::Error),

    /// Fewer than 8 bytes were left where a chunk header was expected.
    #[error("truncated chunk header at offset {offset}: needed 8 bytes but only {available} available")]
    TruncatedHeader { offset: usize, available: usize },

    /// A declared length runs past the enclosing payload or the buffer.
    #[error("chunk {tag} at offset {offset} ends at {end}, past its bound {bound}")]
    BoundsError {
        tag: Tag,
        offset: usize,
        end: usize,
        bound: usize,
    },

    /// A leaf accessor was used on a container chunk.
    #[error("chunk {tag} is a container, not a leaf")]
    NotALeaf { tag: Tag },

    /// A leaf payload is too short for the requested interpretation.
    #[error("chunk {tag} payload is {length} bytes, too short for a 4-byte count")]
    TooShort { tag: Tag, length: u32 },

    /// Nesting went deeper than the configured limit.
    #[error("chunk nesting exceeds maximum depth of {depth}")]
    DepthExceeded { depth: usize },

    /// Text that cannot name a chunk tag.
    #[error("invalid chunk tag {text:?}: expected exactly 4 bytes")]
    InvalidTag { text: String },
}

/// Result type for chunk operations.
pub type Result<T> = std::result::Result<T, Error>;
