//! Change-detection cache for unit-test runners.
//!
//! Decides, for each test source file, whether it changed since the last run
//! so a runner can skip recompiling unchanged tests.
//!
//! # Features
//!
//! - Modification-time fingerprints hashed with SHA-256
//! - Two-generation comparison: the previous run's fingerprints are loaded
//!   once and each is reconciled at most once against the current run
//! - Deduplicated filename registry so a file discovered twice is only
//!   fingerprinted once
//! - Compact native-endian cache file, replaced atomically on persist
//! - Optional serde support
//!
//! # Example
//!
//! ```no_run
//! use convenient_unittest::{CacheConfig, FileStatus, TestFileSession};
//! use std::path::Path;
//!
//! # fn main() -> convenient_unittest::Result<()> {
//! let mut session = TestFileSession::open(CacheConfig::new("tests"))?;
//!
//! for name in ["math.c", "strings.c"] {
//!     if session.register_file(Path::new("tests"), name)? == FileStatus::Stale {
//!         println!("rebuilding {name}");
//!     }
//! }
//!
//! let summary = session.finish()?;
//! println!("{} of {} files changed", summary.stale, summary.tracked);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(unused_results)]

pub mod cache_file;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod registry;
pub mod report;
pub mod session;
pub mod tracker;

pub use config::{CacheConfig, DEFAULT_CACHE_FILE, DEFAULT_MAX_FILES};
pub use error::{Result, StalenessError};
pub use fingerprint::{Fingerprint, hash_str};
pub use registry::{FilenameRegistry, TrackedFile};
pub use report::AssertionFailure;
pub use session::{FileStatus, RunSummary, TestFileSession};
pub use tracker::StalenessTracker;
