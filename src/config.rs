//! Configuration for the schema fetcher
//!
//! Only two settings exist: where to write the proto tree and which Google
//! Ads API version to fetch. Values are layered with the `config` crate:
//! built-in defaults first, then explicit overrides (normally from the CLI).
//! No config files or environment variables are consulted.

use config_crate::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot of the googleapis repository fetched on every run
pub const GOOGLEAPIS_ZIP: &str =
    "https://github.com/googleapis/googleapis/archive/refs/heads/master.zip";

/// Fetcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Output directory for the proto tree
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Google Ads API version, e.g. "v19"
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_version() -> String {
    "v19".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            version: default_version(),
        }
    }
}

impl FetchConfig {
    /// Layer explicit overrides on top of the defaults
    pub fn load(output_dir: Option<&Path>, version: Option<&str>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .set_override_option("version", version.map(str::to_string))?
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        // Applied after the string-typed layer so non-UTF-8 paths keep their bytes
        if let Some(path) = output_dir {
            loaded.output_dir = path.to_path_buf();
        }
        Ok(loaded)
    }

    /// Get the output path (resolves relative paths against the current directory)
    pub fn output_path(&self) -> io::Result<PathBuf> {
        if self.output_dir.is_absolute() {
            Ok(self.output_dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.output_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("schemas"));
        assert_eq!(config.version, "v19");
    }

    #[test]
    fn test_load_without_overrides() {
        let config = FetchConfig::load(None, None).unwrap();
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn test_load_with_overrides() {
        let config = FetchConfig::load(Some(Path::new("out/protos")), Some("v21")).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out/protos"));
        assert_eq!(config.version, "v21");
    }

    #[test]
    fn test_partial_override_keeps_default() {
        let config = FetchConfig::load(None, Some("v17")).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("schemas"));
        assert_eq!(config.version, "v17");
    }

    #[test]
    fn test_output_path_is_absolute() {
        let config = FetchConfig::default();
        let path = config.output_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("schemas"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_output_path_kept() {
        let config = FetchConfig::load(Some(Path::new("/srv/protos")), None).unwrap();
        assert_eq!(config.output_path().unwrap(), PathBuf::from("/srv/protos"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_dir_round_trips() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"out\xffdir"));
        let config = FetchConfig::load(Some(raw), Some("v18")).unwrap();
        assert_eq!(config.output_dir.as_os_str().as_bytes(), b"out\xffdir");
        assert_eq!(config.version, "v18");
    }
}
