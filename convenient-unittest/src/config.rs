//! Cache configuration.

use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default name of the cache file inside the test directory.
pub const DEFAULT_CACHE_FILE: &str = ".unittest-cache";

/// Default maximum number of tracked test files per run.
pub const DEFAULT_MAX_FILES: usize = 1024;

/// Where the cache lives and how many files it may track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Directory holding the test sources and the cache file
    pub test_dir: PathBuf,
    /// Cache file name, relative to `test_dir`
    pub cache_file: String,
    /// Maximum fingerprints per generation
    pub max_files: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            test_dir: PathBuf::from("tests"),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl CacheConfig {
    /// Configuration for `test_dir` with default file name and capacity.
    pub fn new(test_dir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
            ..Self::default()
        }
    }

    /// Use a different cache file name.
    #[must_use]
    pub fn with_cache_file(mut self, cache_file: impl Into<String>) -> Self {
        self.cache_file = cache_file.into();
        self
    }

    /// Use a different capacity.
    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Test directory.
    #[must_use]
    pub fn test_dir(&self) -> &Path {
        &self.test_dir
    }

    /// Full path of the cache file.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.test_dir.join(&self.cache_file)
    }
}
