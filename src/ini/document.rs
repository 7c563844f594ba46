//! Whole-file byte buffer the engine works on

use std::path::Path;

use super::codec::{self, Eol, Lines};
use super::PatchError;
use crate::utils::file::read_all;

/// The raw bytes of a configuration file
///
/// Read fresh for every operation and dropped afterwards; no document is
/// cached between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    bytes: Vec<u8>,
}

impl ConfigDocument {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ConfigDocument {
            bytes: bytes.into(),
        }
    }

    /// Reads the whole file at `path`
    pub fn read(path: &Path) -> Result<Self, PatchError> {
        read_all(path)
            .map(Self::from_bytes)
            .map_err(|source| PatchError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn lines(&self) -> Lines<'_> {
        codec::lines(&self.bytes)
    }

    pub fn dominant_eol(&self) -> Eol {
        codec::dominant_eol(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
