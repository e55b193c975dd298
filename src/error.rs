//! Error types shared across the crate.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The failure conditions surfaced by configuration loading, weight and case
/// I/O, and training setup.
///
/// Shape contracts inside the propagation hot path are programming errors and
/// stay as assertions; only externally supplied data produces these variants.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete control input. Fatal before any work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Externally supplied weights or cases do not match the declared
    /// topology.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A file read or write failed.
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
