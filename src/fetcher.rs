//! Schema fetch pipeline
//!
//! download → extract → resolve version → copy selected trees → discard
//! scratch workspace. Every step is fatal on error; the scratch workspace is
//! removed whichever way the run ends.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::archive::{extract_zip, ArchiveSource, HttpArchive};
use crate::copy::{replace_flat_protos, replace_tree};
use crate::error::{FetchError, Result};
use crate::scratch::ScratchWorkspace;
use crate::version::resolve_version_dir;

/// File name of the downloaded archive inside the scratch workspace
const ARCHIVE_NAME: &str = "googleapis.zip";

/// Top-level directory GitHub puts in a `master` branch snapshot
const SNAPSHOT_ROOT: &str = "googleapis-master";

/// Trees copied whole when the snapshot has them
pub const AUXILIARY_TREES: [&str; 3] = ["rpc", "type", "longrunning"];

/// What a run wrote to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Version the caller asked for
    pub requested_version: String,
    /// Version directory actually copied
    pub resolved_version: String,
    /// True when the requested version was missing and a newer one was used
    pub fell_back: bool,
    /// Destination directories that were replaced, in copy order
    pub materialized: Vec<PathBuf>,
    /// Total number of files written
    pub files_copied: usize,
}

/// Downloads the googleapis snapshot and materializes the ads proto tree
pub struct Fetcher<S = HttpArchive> {
    source: S,
    scratch_root: Option<PathBuf>,
}

impl Default for Fetcher<HttpArchive> {
    fn default() -> Self {
        Self::new(HttpArchive::default())
    }
}

impl<S: ArchiveSource> Fetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            scratch_root: None,
        }
    }

    /// Create scratch workspaces under `root` instead of the system temp dir
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Run the whole pipeline into `output_dir` for `version`
    pub fn fetch(&self, output_dir: &Path, version: &str) -> Result<FetchReport> {
        let scratch = match &self.scratch_root {
            Some(root) => ScratchWorkspace::new_in(root)?,
            None => ScratchWorkspace::new()?,
        };

        let archive_path = scratch.join(ARCHIVE_NAME);
        debug!(origin = self.source.origin(), ?archive_path, "fetching archive");
        self.source.download(&archive_path)?;
        extract_zip(&archive_path, scratch.path())?;

        let api_root = scratch.join(SNAPSHOT_ROOT).join("google");
        materialize(&api_root, output_dir, version)
    }
}

/// Copy the managed subtrees out of an extracted `google/` directory
pub fn materialize(api_root: &Path, output_dir: &Path, version: &str) -> Result<FetchReport> {
    let ads_base = api_root.join("ads").join("googleads");
    let resolution = resolve_version_dir(&ads_base, version)?;

    fs::create_dir_all(output_dir).map_err(FetchError::at(output_dir))?;
    let google_out = output_dir.join("google");

    let mut materialized = Vec::new();
    let mut files_copied = 0;

    let ads_dst = google_out
        .join("ads")
        .join("googleads")
        .join(&resolution.resolved);
    files_copied += replace_tree(&resolution.path, &ads_dst)?;
    materialized.push(ads_dst);

    let api_dst = google_out.join("api");
    files_copied += replace_flat_protos(&api_root.join("api"), &api_dst)?;
    materialized.push(api_dst);

    for name in AUXILIARY_TREES {
        let src = api_root.join(name);
        if !src.exists() {
            debug!(tree = name, "auxiliary tree absent; skipping");
            continue;
        }
        let dst = google_out.join(name);
        files_copied += replace_tree(&src, &dst)?;
        materialized.push(dst);
    }

    info!(
        version = %resolution.resolved,
        files = files_copied,
        output = ?output_dir,
        "schemas written"
    );

    Ok(FetchReport {
        requested_version: resolution.requested,
        resolved_version: resolution.resolved,
        fell_back: resolution.fell_back,
        materialized,
        files_copied,
    })
}

/// Fetch the ads schemas for `version` into `output_dir` from the public snapshot
pub fn fetch(output_dir: impl AsRef<Path>, version: &str) -> Result<FetchReport> {
    Fetcher::new(HttpArchive::default()).fetch(output_dir.as_ref(), version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn api_root(versions: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let google = tmp.path();
        for v in versions {
            write(
                &google.join(format!("ads/googleads/{v}/services/service.proto")),
                v,
            );
        }
        write(&google.join("api/http.proto"), "http");
        write(&google.join("rpc/status.proto"), "status");
        tmp
    }

    #[test]
    fn test_materialize_exact_version() {
        let root = api_root(&["v18", "v19"]);
        let out = TempDir::new().unwrap();

        let report = materialize(root.path(), out.path(), "v19").unwrap();

        assert_eq!(report.resolved_version, "v19");
        assert!(!report.fell_back);
        assert_eq!(report.files_copied, 3);
        let copied = out.path().join("google/ads/googleads/v19/services/service.proto");
        assert_eq!(fs::read_to_string(copied).unwrap(), "v19");
        assert!(!out.path().join("google/ads/googleads/v18").exists());
    }

    #[test]
    fn test_materialize_skips_missing_auxiliary_trees() {
        let root = api_root(&["v19"]);
        let out = TempDir::new().unwrap();

        let report = materialize(root.path(), out.path(), "v19").unwrap();

        assert!(out.path().join("google/rpc/status.proto").is_file());
        assert!(!out.path().join("google/type").exists());
        assert!(!out.path().join("google/longrunning").exists());
        assert_eq!(report.materialized.len(), 3);
    }

    #[test]
    fn test_materialize_without_versions_writes_nothing() {
        let root = api_root(&[]);
        let out = TempDir::new().unwrap();
        let target = out.path().join("schemas");

        let err = materialize(root.path(), &target, "v19").unwrap_err();

        assert!(matches!(err, FetchError::NoVersionsFound { .. }));
        assert!(!target.exists());
    }
}
