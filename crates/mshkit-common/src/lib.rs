//! Common utilities for mshkit.
//!
//! This crate provides the foundational pieces shared by the mshkit crates:
//!
//! - [`BinaryReader`] - Zero-copy, bounded binary reading from byte slices
//! - [`Error`] / [`Result`] - Errors raised while reading raw bytes

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
