//! Google Ads Schema Fetcher
//!
//! Downloads a snapshot of the public `googleapis` repository and copies the
//! Google Ads protobuf definitions, plus the shared `google/*` protos they
//! import, into a local directory.
//!
//! ## Output layout
//!
//! ```text
//! schemas/
//! └── google/
//!     ├── ads/googleads/v19/   full copy of the resolved version
//!     ├── api/                 *.proto files only, no subdirectories
//!     ├── rpc/                 copied when present in the snapshot
//!     ├── type/                copied when present in the snapshot
//!     └── longrunning/         copied when present in the snapshot
//! ```
//!
//! Each of these subtrees is replaced wholesale on every run. Anything else in
//! the output directory is left alone.

pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod fetcher;
pub mod scratch;
pub mod version;

pub use archive::{ArchiveSource, HttpArchive};
pub use config::{FetchConfig, GOOGLEAPIS_ZIP};
pub use error::{FetchError, Result};
pub use fetcher::{fetch, FetchReport, Fetcher};
pub use scratch::ScratchWorkspace;
pub use version::{AdsVersion, Resolution};
