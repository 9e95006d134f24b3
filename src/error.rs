//! Error types for the schema fetcher

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Schema fetcher errors
///
/// Every variant is fatal: the pipeline aborts on the first one.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Download failed: {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download failed: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid archive {}: {source}", path.display())]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("no versions found under {}", ads_base.display())]
    NoVersionsFound { ads_base: PathBuf },

    #[error("IO error at {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl FetchError {
    /// Attach a path to an IO error
    pub(crate) fn at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| FetchError::Path { path, source }
    }
}
