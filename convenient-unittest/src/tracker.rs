//! Two-generation staleness tracking.
//!
//! The previous generation is loaded once from the cache file. Each current
//! file's fingerprint is compared against it with [`StalenessTracker::is_stale`],
//! which consumes a match so every previous fingerprint reconciles at most
//! once. The current generation is built with
//! [`StalenessTracker::record_current`] and written back by
//! [`StalenessTracker::persist`] at the end of the run.

use crate::cache_file;
use crate::error::{Result, StalenessError};
use crate::fingerprint::Fingerprint;
use std::path::Path;
use tracing::{debug, info, warn};

/// Previous and current fingerprint generations for one run.
#[derive(Debug)]
pub struct StalenessTracker {
    capacity: usize,
    previous: Vec<Fingerprint>,
    current: Vec<Fingerprint>,
    loaded: bool,
}

impl StalenessTracker {
    /// Create a tracker holding at most `capacity` fingerprints per generation.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "tracker capacity must be non-zero");
        Self {
            capacity,
            previous: Vec::new(),
            current: Vec::new(),
            loaded: false,
        }
    }

    /// Maximum number of fingerprints per generation.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load the previous generation from `test_dir/filename`.
    ///
    /// A missing file is the first-run case: an empty placeholder is created
    /// and the previous generation stays empty. Only the first call in a
    /// tracker's lifetime has any effect.
    ///
    /// # Errors
    ///
    /// - `StalenessError::CacheRead` if the file cannot be read or is truncated
    /// - `StalenessError::CacheCreate` if the placeholder cannot be created
    /// - `StalenessError::CapacityExceeded` if the file holds more
    ///   fingerprints than the tracker's capacity
    pub fn load_previous(&mut self, test_dir: &Path, filename: &str) -> Result<()> {
        if self.loaded {
            debug!("Previous generation already loaded, skipping");
            return Ok(());
        }

        let path = test_dir.join(filename);
        let previous = match cache_file::read(&path)? {
            Some(previous) => previous,
            None => {
                warn!("No cache file at {}, treating all files as changed", path.display());
                cache_file::create_placeholder(&path)?;
                Vec::new()
            }
        };

        if previous.len() > self.capacity {
            return Err(StalenessError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        info!(
            "Loaded {} fingerprints from {}",
            previous.len(),
            path.display()
        );
        self.previous = previous;
        self.loaded = true;
        Ok(())
    }

    /// Whether `fingerprint` is absent from the previous generation.
    ///
    /// A match is removed from the previous generation (swap with the last
    /// entry), so asking again for the same fingerprint reports it stale.
    pub fn is_stale(&mut self, fingerprint: Fingerprint) -> bool {
        match self.previous.iter().position(|&seen| seen == fingerprint) {
            Some(index) => {
                let _ = self.previous.swap_remove(index);
                false
            }
            None => true,
        }
    }

    /// Append `fingerprint` to the current generation.
    ///
    /// # Errors
    ///
    /// `StalenessError::CapacityExceeded` if the current generation is full.
    /// The generation is left unchanged.
    pub fn record_current(&mut self, fingerprint: Fingerprint) -> Result<()> {
        if self.current.len() >= self.capacity {
            return Err(StalenessError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.current.push(fingerprint);
        Ok(())
    }

    /// Write the current generation to `test_dir/filename`, replacing any
    /// previous content.
    ///
    /// Call once after every file of the run has been recorded. Calling again
    /// rewrites the same content.
    ///
    /// # Errors
    ///
    /// `StalenessError::CacheWrite` if the file cannot be written.
    pub fn persist(&self, test_dir: &Path, filename: &str) -> Result<()> {
        let path = test_dir.join(filename);
        cache_file::write(&path, &self.current)?;
        info!(
            "Persisted {} fingerprints to {}",
            self.current.len(),
            path.display()
        );
        Ok(())
    }

    /// Previous-generation fingerprints not yet reconciled this run.
    ///
    /// After every current file has been checked these belong to files that
    /// disappeared since the last run.
    #[must_use]
    pub fn unreconciled(&self) -> &[Fingerprint] {
        &self.previous
    }

    /// Current generation in recording order.
    #[must_use]
    pub fn current(&self) -> &[Fingerprint] {
        &self.current
    }

    /// Whether the previous generation has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
