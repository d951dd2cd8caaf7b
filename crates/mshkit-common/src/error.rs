//! Error types for mshkit-common.

use thiserror::Error;

/// Common error type for mshkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of the readable window reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
