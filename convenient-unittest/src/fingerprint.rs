//! Modification-time fingerprints.
//!
//! A fingerprint is the hash of a file's last-modification time rendered as a
//! fixed textual timestamp with one-second granularity. Two files modified in
//! the same second share a fingerprint and are reported unchanged even if
//! their contents differ.

use crate::error::{Result, StalenessError};
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `ctime(3)`-style layout used for the hashed timestamp text.
const TIMESTAMP_FORMAT: &str = "Last modified time: %a %b %e %H:%M:%S %Y\n";

/// Hash a string into a signed integer.
///
/// Deterministic across runs and platforms: the first eight bytes of the
/// SHA-256 digest, read little-endian. Used both for fingerprints and as the
/// bucket key of the filename registry.
#[must_use]
pub fn hash_str(text: &str) -> i64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    i64::from_le_bytes(head)
}

/// Render a modification time the way it is hashed.
#[must_use]
pub fn format_timestamp(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime).format(TIMESTAMP_FORMAT).to_string()
}

/// Fingerprint of a single test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fingerprint(i64);

impl Fingerprint {
    /// Wrap a raw fingerprint value, e.g. one decoded from the cache file.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw signed value as persisted.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Fingerprint of a modification time.
    #[must_use]
    pub fn of_mtime(mtime: SystemTime) -> Self {
        Self(hash_str(&format_timestamp(mtime)))
    }

    /// Fingerprint of the file at `path`, from its last-modification time.
    ///
    /// # Errors
    ///
    /// Returns `StalenessError::FileMetadata` if the file's metadata or
    /// modification time cannot be read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let mtime = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| StalenessError::FileMetadata {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::of_mtime(mtime))
    }
}

impl From<i64> for Fingerprint {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_hash_str_is_deterministic() {
        assert_eq!(hash_str("a.c"), hash_str("a.c"));
        assert_ne!(hash_str("a.c"), hash_str("b.c"));
    }

    #[test]
    fn test_timestamp_has_second_granularity() {
        let base = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let later_same_second = base + Duration::from_millis(750);
        assert_eq!(format_timestamp(base), format_timestamp(later_same_second));
        assert_eq!(Fingerprint::of_mtime(base), Fingerprint::of_mtime(later_same_second));

        let next_second = base + Duration::from_secs(1);
        assert_ne!(Fingerprint::of_mtime(base), Fingerprint::of_mtime(next_second));
    }

    #[test]
    fn test_timestamp_text_layout() {
        let text = format_timestamp(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert!(text.starts_with("Last modified time: "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_of_file_follows_mtime() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.c");
        let b = tmp.path().join("b.c");
        std::fs::write(&a, "int a;").unwrap();
        std::fs::write(&b, "int b; /* different content */").unwrap();

        let stamp = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(&a, stamp).unwrap();
        set_file_mtime(&b, stamp).unwrap();

        // Same second, different content: fingerprints collide
        assert_eq!(Fingerprint::of_file(&a).unwrap(), Fingerprint::of_file(&b).unwrap());
        assert_eq!(
            Fingerprint::of_file(&a).unwrap(),
            Fingerprint::of_mtime(UNIX_EPOCH + Duration::from_secs(1_600_000_000))
        );

        set_file_mtime(&b, FileTime::from_unix_time(1_600_000_060, 0)).unwrap();
        assert_ne!(Fingerprint::of_file(&a).unwrap(), Fingerprint::of_file(&b).unwrap());
    }

    #[test]
    fn test_of_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = Fingerprint::of_file(&tmp.path().join("missing.c")).unwrap_err();
        assert!(matches!(err, StalenessError::FileMetadata { .. }));
    }
}
