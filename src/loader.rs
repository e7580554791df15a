//! Source loading boundary. Spec files reach the parser through a
//! [`SourceLoader`], so callers can swap the filesystem for anything else.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no source registered for '{0}'")]
    NotFound(PathBuf),
}

pub trait SourceLoader {
    fn load(&self, path: &Path) -> Result<String, LoadError>;
}

/// Reads spec files from disk.
#[derive(Debug, Clone, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<String, LoadError> {
        debug!("loading {}", path.display());
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Serves sources from memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: std::collections::HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.sources.insert(path.into(), source.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String, LoadError> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_path_buf()))
    }
}
