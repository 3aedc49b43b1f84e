//! Error taxonomy for the staleness cache.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading, comparing or persisting fingerprints.
///
/// None of these are recovered from locally. They propagate to the runner,
/// which reports the reason and terminates the run.
#[derive(Debug, thiserror::Error)]
pub enum StalenessError {
    /// The cache file exists but could not be opened or read, or its payload
    /// is shorter than its declared count.
    #[error("Error reading cache file {}: {source}", path.display())]
    CacheRead {
        /// Path of the cache file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The empty placeholder cache file could not be created on first run.
    #[error("Error creating cache file {}: {source}", path.display())]
    CacheCreate {
        /// Path of the cache file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The cache file could not be opened for writing or the write was short.
    #[error("Error writing cache file {}: {source}", path.display())]
    CacheWrite {
        /// Path of the cache file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The configured test directory does not exist or is not a directory.
    #[error("Test directory {} doesn't exist", path.display())]
    DirectoryNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// The current generation already holds `capacity` fingerprints.
    #[error("Cannot track more than {capacity} test files (raise max_files)")]
    CapacityExceeded {
        /// Configured maximum number of fingerprints
        capacity: usize,
    },

    /// The modification time of a candidate file could not be queried.
    #[error("Cannot read modification time of {}: {source}", path.display())]
    FileMetadata {
        /// Path of the candidate file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl StalenessError {
    /// Process exit code the runner uses for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CacheRead { .. } => 3,
            Self::CacheCreate { .. } | Self::CacheWrite { .. } => 4,
            Self::DirectoryNotFound { .. } => 5,
            Self::CapacityExceeded { .. } => 6,
            Self::FileMetadata { .. } => 7,
        }
    }
}

/// Result type for staleness cache operations.
pub type Result<T> = std::result::Result<T, StalenessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = StalenessError::DirectoryNotFound {
            path: PathBuf::from("/nonexistent"),
        };
        assert_eq!(err.to_string(), "Test directory /nonexistent doesn't exist");

        let err = StalenessError::CacheRead {
            path: PathBuf::from("tests/.unittest-cache"),
            source: io::Error::from(io::ErrorKind::UnexpectedEof),
        };
        assert!(err.to_string().starts_with("Error reading cache file tests/.unittest-cache"));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let capacity = StalenessError::CapacityExceeded { capacity: 4 };
        let missing = StalenessError::DirectoryNotFound {
            path: PathBuf::from("x"),
        };
        assert_ne!(capacity.exit_code(), missing.exit_code());
        assert!(capacity.exit_code() > 1);
    }
}
