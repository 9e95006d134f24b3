//! Google Ads API version directories
//!
//! The googleads tree keeps one directory per API revision (`v17`, `v18`, ...).
//! A requested version is used verbatim when its directory exists; otherwise
//! the numerically greatest sibling stands in for it.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{FetchError, Result};

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v([0-9]+)$").unwrap())
}

/// A `v<digits>` directory name and its numeric suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdsVersion {
    number: u64,
    name: String,
}

impl AdsVersion {
    /// Parse a directory name such as "v19"
    ///
    /// Returns `None` for anything that is not `v` followed by ASCII digits,
    /// including suffixes too large for a `u64`.
    pub fn parse(name: &str) -> Option<Self> {
        let digits = version_pattern().captures(name)?.get(1)?.as_str();
        let number = digits.parse().ok()?;
        Some(Self {
            number,
            name: name.to_string(),
        })
    }

    /// Numeric suffix (19 for "v19")
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Directory name as found on disk
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AdsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialOrd for AdsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AdsVersion {
    // "v019" and "v19" share a number; the name keeps the order total
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Outcome of resolving the requested version against the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Version the caller asked for
    pub requested: String,
    /// Directory name actually used
    pub resolved: String,
    /// Absolute path of the resolved version directory
    pub path: PathBuf,
    /// True when the requested version was absent and a sibling was substituted
    pub fell_back: bool,
}

/// List all version directories directly under `ads_base`, oldest first
pub fn scan_versions(ads_base: &Path) -> Result<Vec<AdsVersion>> {
    let entries = match fs::read_dir(ads_base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(FetchError::at(ads_base)(e)),
    };

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(FetchError::at(ads_base))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(version) = entry.file_name().to_str().and_then(AdsVersion::parse) {
            versions.push(version);
        }
    }

    versions.sort();
    debug!(?ads_base, count = versions.len(), "scanned version directories");
    Ok(versions)
}

/// Pick the directory to copy for `requested`
///
/// Fails with [`FetchError::NoVersionsFound`] when the requested directory is
/// absent and no `v<digits>` sibling exists either.
pub fn resolve_version_dir(ads_base: &Path, requested: &str) -> Result<Resolution> {
    let candidate = ads_base.join(requested);
    if candidate.is_dir() {
        return Ok(Resolution {
            requested: requested.to_string(),
            resolved: requested.to_string(),
            path: candidate,
            fell_back: false,
        });
    }

    let latest = scan_versions(ads_base)?
        .pop()
        .ok_or_else(|| FetchError::NoVersionsFound {
            ads_base: ads_base.to_path_buf(),
        })?;

    info!("requested {} not found; using {}", requested, latest);

    Ok(Resolution {
        requested: requested.to_string(),
        path: ads_base.join(latest.name()),
        resolved: latest.name,
        fell_back: true,
    })
}
