//! Scratch workspace for download and extraction

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{FetchError, Result};

const SCRATCH_PREFIX: &str = "ads-schemas-";

/// Uniquely named temporary directory owned by one run
///
/// The directory and everything in it is removed when the workspace is
/// dropped, on success and on every error path alike.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a workspace under the system temp directory
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    /// Create a workspace under `root`
    pub fn new_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)
            .map_err(FetchError::at(root))?;
        debug!(path = ?dir.path(), "created scratch workspace");
        Ok(Self { dir })
    }

    /// Root of the workspace
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file or directory inside the workspace
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }
}
