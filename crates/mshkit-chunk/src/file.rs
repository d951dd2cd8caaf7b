//! MSH file handling.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{parse_with, Chunk, ParseOptions, Result};

/// An `.msh` model file loaded into memory.
///
/// The file owns its bytes; parsed trees borrow from it.
#[derive(Debug, Clone)]
pub struct MshFile {
    data: Vec<u8>,
}

impl MshFile {
    /// Wrap bytes that were already loaded.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read a file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        debug!(path = %path.display(), size = data.len(), "loaded file");
        Ok(Self { data })
    }

    /// Get the raw file bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parse the top-level chunk.
    pub fn root(&self) -> Result<Chunk<'_>> {
        self.root_with(&ParseOptions::default())
    }

    /// Parse the top-level chunk with explicit options.
    pub fn root_with(&self, options: &ParseOptions) -> Result<Chunk<'_>> {
        parse_with(&self.data, 0, options)
    }
}

impl From<Vec<u8>> for MshFile {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}
