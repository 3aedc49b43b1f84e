//! Per-run context owning the filename registry and the staleness tracker.

use crate::config::CacheConfig;
use crate::error::{Result, StalenessError};
use crate::fingerprint::Fingerprint;
use crate::registry::{FilenameRegistry, TrackedFile};
use crate::tracker::StalenessTracker;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of registering a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FileStatus {
    /// The file was registered earlier in this run; nothing was recorded
    AlreadyTracked,
    /// The fingerprint matched the previous run
    Unchanged,
    /// The file is new or changed since the previous run
    Stale,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    /// Files registered this run
    pub tracked: usize,
    /// Files that changed or are new
    pub stale: usize,
    /// Files unchanged since the previous run
    pub unchanged: usize,
    /// Previous-run fingerprints no current file matched
    pub disappeared: usize,
}

/// Change-detection state for one test run.
///
/// Built once per run: [`open`](Self::open) loads the previous generation,
/// [`register_file`](Self::register_file) is called for every candidate file
/// and [`finish`](Self::finish) persists the new generation.
#[derive(Debug)]
pub struct TestFileSession {
    config: CacheConfig,
    registry: FilenameRegistry,
    tracker: StalenessTracker,
}

impl TestFileSession {
    /// Create a session without loading the previous generation.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_files` is zero or `config.cache_file` is empty.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        assert!(!config.cache_file.is_empty(), "cache file name must not be empty");
        let tracker = StalenessTracker::new(config.max_files);
        Self {
            config,
            registry: FilenameRegistry::new(),
            tracker,
        }
    }

    /// Create a session and load the previous generation.
    ///
    /// # Errors
    ///
    /// See [`StalenessTracker::load_previous`].
    pub fn open(config: CacheConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.load_previous()?;
        Ok(session)
    }

    /// Load the previous generation from the configured cache file.
    ///
    /// # Errors
    ///
    /// See [`StalenessTracker::load_previous`].
    pub fn load_previous(&mut self) -> Result<()> {
        self.tracker
            .load_previous(&self.config.test_dir, &self.config.cache_file)
    }

    /// Register `filename` (relative to `test_dir`) for this run.
    ///
    /// Registering a name twice is a no-op returning
    /// [`FileStatus::AlreadyTracked`]. Otherwise the file's fingerprint is
    /// recorded in the current generation and compared against the previous
    /// one. On error nothing is recorded.
    ///
    /// # Errors
    ///
    /// - `StalenessError::DirectoryNotFound` if `test_dir` cannot be opened
    /// - `StalenessError::FileMetadata` if the file's mtime cannot be read
    /// - `StalenessError::CapacityExceeded` if the current generation is full
    ///
    /// # Panics
    ///
    /// Panics if `filename` is empty.
    pub fn register_file(&mut self, test_dir: &Path, filename: &str) -> Result<FileStatus> {
        assert!(!filename.is_empty(), "filename must not be empty");

        if self.registry.contains(filename) {
            debug!("{} already tracked", filename);
            return Ok(FileStatus::AlreadyTracked);
        }

        let _ = fs::read_dir(test_dir).map_err(|_| StalenessError::DirectoryNotFound {
            path: test_dir.to_path_buf(),
        })?;

        let fingerprint = Fingerprint::of_file(&test_dir.join(filename))?;
        self.tracker.record_current(fingerprint)?;
        let stale = self.tracker.is_stale(fingerprint);

        let (name, _) = self.registry.intern(filename);
        let tracked = self.registry.track(TrackedFile::new(name, fingerprint, stale));
        debug_assert!(tracked, "{filename} tracked twice");

        if stale {
            debug!("{} changed (fingerprint {})", filename, fingerprint);
            Ok(FileStatus::Stale)
        } else {
            debug!("{} unchanged", filename);
            Ok(FileStatus::Unchanged)
        }
    }

    /// Persist the current generation and summarize the run.
    ///
    /// # Errors
    ///
    /// See [`StalenessTracker::persist`].
    pub fn finish(&self) -> Result<RunSummary> {
        self.tracker
            .persist(&self.config.test_dir, &self.config.cache_file)?;

        let summary = self.summary();
        if summary.disappeared > 0 {
            warn!(
                "{} files tracked by the previous run were not seen",
                summary.disappeared
            );
        }
        info!(
            "{} tracked, {} stale, {} unchanged",
            summary.tracked, summary.stale, summary.unchanged
        );
        Ok(summary)
    }

    /// Counts for the run so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let tracked = self.registry.files().len();
        let stale = self.stale_files().count();
        RunSummary {
            tracked,
            stale,
            unchanged: tracked - stale,
            disappeared: self.tracker.unreconciled().len(),
        }
    }

    /// Files registered this run, in registration order.
    #[must_use]
    pub fn tracked_files(&self) -> &[TrackedFile] {
        self.registry.files()
    }

    /// Registered files that changed or are new.
    pub fn stale_files(&self) -> impl Iterator<Item = &TrackedFile> {
        self.registry.files().iter().filter(|file| file.is_stale())
    }

    /// Previous-run fingerprints not matched by any file so far.
    #[must_use]
    pub fn disappeared(&self) -> &[Fingerprint] {
        self.tracker.unreconciled()
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current fingerprint generation.
    #[must_use]
    pub fn current_generation(&self) -> &[Fingerprint] {
        self.tracker.current()
    }
}
