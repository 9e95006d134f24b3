//! Archive download and extraction
//!
//! The snapshot is a GitHub branch zip: one top-level `googleapis-master/`
//! directory holding the whole repository.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::GOOGLEAPIS_ZIP;
use crate::error::{FetchError, Result};

/// Something that can produce the googleapis archive at a local path
pub trait ArchiveSource {
    /// Human-readable origin, used in logs
    fn origin(&self) -> &str;

    /// Write the archive to `dest`, returning the number of bytes written
    fn download(&self, dest: &Path) -> Result<u64>;
}

/// Archive fetched with a single blocking HTTP GET
#[derive(Debug, Clone)]
pub struct HttpArchive {
    url: String,
}

impl HttpArchive {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HttpArchive {
    fn default() -> Self {
        Self::new(GOOGLEAPIS_ZIP)
    }
}

impl ArchiveSource for HttpArchive {
    fn origin(&self) -> &str {
        &self.url
    }

    fn download(&self, dest: &Path) -> Result<u64> {
        info!(url = %self.url, "downloading archive");

        let download_err = |source| FetchError::Download {
            url: self.url.clone(),
            source,
        };

        let mut response = reqwest::blocking::get(&self.url).map_err(download_err)?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(dest).map_err(FetchError::at(dest))?;
        let bytes = response.copy_to(&mut file).map_err(download_err)?;

        info!(bytes, "download completed");
        Ok(bytes)
    }
}

/// Extract every entry of the zip at `archive_path` into `dest`
///
/// Returns the number of files written. Entries whose paths would escape
/// `dest` are skipped.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    debug!(?archive_path, ?dest, "extracting archive");

    let invalid = |source| FetchError::InvalidArchive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(FetchError::at(archive_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(invalid)?;
    fs::create_dir_all(dest).map_err(FetchError::at(dest))?;

    let mut extracted = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(invalid)?;

        let out_path: PathBuf = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => {
                warn!(name = entry.name(), "skipping entry with unsafe path");
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(FetchError::at(&out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(FetchError::at(parent))?;
        }
        let mut out = File::create(&out_path).map_err(FetchError::at(&out_path))?;
        io::copy(&mut entry, &mut out).map_err(FetchError::at(&out_path))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode().map(|m| m & 0o7777).filter(|m| *m != 0) {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(FetchError::at(&out_path))?;
        }

        extracted += 1;
    }

    info!(files = extracted, "archive extracted");
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, FileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, FileOptions::default()).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extracts_files_and_directories() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("snapshot.zip");
        write_zip(
            &zip_path,
            &[
                ("root/", ""),
                ("root/empty/", ""),
                ("root/google/api/http.proto", "syntax = \"proto3\";"),
            ],
        );

        let dest = tmp.path().join("out");
        let count = extract_zip(&zip_path, &dest).unwrap();

        assert_eq!(count, 1);
        assert!(dest.join("root/empty").is_dir());
        assert_eq!(
            fs::read_to_string(dest.join("root/google/api/http.proto")).unwrap(),
            "syntax = \"proto3\";"
        );
    }

    #[test]
    fn test_skips_entries_escaping_destination() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("evil.zip");
        write_zip(&zip_path, &[("../escape.txt", "nope"), ("ok.txt", "fine")]);

        let dest = tmp.path().join("out");
        let count = extract_zip(&zip_path, &dest).unwrap();

        assert_eq!(count, 1);
        assert!(dest.join("ok.txt").is_file());
        assert!(!tmp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_rejects_non_zip_file() {
        let tmp = TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.zip");
        fs::write(&bogus, "<html>not found</html>").unwrap();

        let err = extract_zip(&bogus, &tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidArchive { .. }));
    }

    #[test]
    fn test_http_archive_defaults_to_googleapis() {
        let source = HttpArchive::default();
        assert_eq!(source.origin(), GOOGLEAPIS_ZIP);
    }
}
