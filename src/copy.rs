//! Replace-not-merge copies into the output tree
//!
//! Every managed destination is deleted before it is written, so a run never
//! leaves files from an earlier run behind inside the subtrees it owns.

use std::fs::{self, File, FileTimes, Metadata};
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FetchError, Result};

/// Replace `dst` with a full recursive copy of `src`
///
/// Returns the number of files copied.
pub fn replace_tree(src: &Path, dst: &Path) -> Result<usize> {
    remove_existing(dst)?;
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(FetchError::at(parent))?;
    }

    let copied = copy_tree(src, dst)?;
    debug!(?src, ?dst, files = copied, "copied tree");
    Ok(copied)
}

/// Replace `dst` with the `*.proto` files directly under `src`
///
/// Subdirectories and other files are ignored. A missing `src` yields an
/// empty `dst`.
pub fn replace_flat_protos(src: &Path, dst: &Path) -> Result<usize> {
    remove_existing(dst)?;
    fs::create_dir_all(dst).map_err(FetchError::at(dst))?;

    let entries = match fs::read_dir(src) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(FetchError::at(src)(e)),
    };

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(FetchError::at(src))?;
        let path = entry.path();
        let is_proto = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(".proto"));
        if !is_proto || !path.is_file() {
            continue;
        }

        copy_file(&path, &dst.join(entry.file_name()))?;
        copied += 1;
    }

    debug!(?src, ?dst, files = copied, "copied proto files");
    Ok(copied)
}

/// Recursively copy `src` into `dst`, preserving permissions and timestamps
///
/// Symlinks are followed: the destination receives the files and directories
/// they point at, never the links themselves.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    // Children come before their directory so directory times survive the copy
    for entry in WalkDir::new(src).follow_links(true).contents_first(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(FetchError::at(&target))?;
            let metadata = entry.metadata()?;
            copy_metadata(&metadata, &target);
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(FetchError::at(parent))?;
        }
        copy_file(entry.path(), &target)?;
        copied += 1;
    }

    Ok(copied)
}

/// Copy one file and its metadata
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(FetchError::at(src))?;
    let metadata = fs::metadata(src).map_err(FetchError::at(src))?;
    copy_metadata(&metadata, dst);
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(FetchError::at(path)),
        Ok(_) => fs::remove_file(path).map_err(FetchError::at(path)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FetchError::at(path)(e)),
    }
}

/// Best-effort copy of permissions and access/modification times
fn copy_metadata(metadata: &Metadata, dst: &Path) {
    if let Err(err) = set_times(metadata, dst) {
        debug!(?dst, error = %err, "failed to copy timestamps (best effort)");
    }
    if let Err(err) = fs::set_permissions(dst, metadata.permissions()) {
        debug!(?dst, error = %err, "failed to copy permissions (best effort)");
    }
}

fn set_times(metadata: &Metadata, dst: &Path) -> io::Result<()> {
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    File::open(dst)?.set_times(times)
}
