//! Interned filenames and the list of files tracked this run.

use crate::fingerprint::{Fingerprint, hash_str};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A test file known to the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackedFile {
    filename: Arc<str>,
    fingerprint: Fingerprint,
    stale: bool,
}

impl TrackedFile {
    /// Create a tracked-file record.
    #[must_use]
    pub fn new(filename: Arc<str>, fingerprint: Fingerprint, stale: bool) -> Self {
        Self {
            filename,
            fingerprint,
            stale,
        }
    }

    /// Interned filename, relative to the test directory.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Fingerprint computed this run.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Whether the file changed (or is new) since the last run.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Deduplicating filename store.
///
/// Each distinct filename is stored once for the registry's lifetime. Names
/// are bucketed by [`hash_str`] and compared by value within a bucket.
#[derive(Debug, Default)]
pub struct FilenameRegistry {
    buckets: HashMap<i64, Vec<Arc<str>>>,
    files: Vec<TrackedFile>,
}

impl FilenameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical copy of `name`, if already interned.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Arc<str>> {
        self.buckets
            .get(&hash_str(name))?
            .iter()
            .find(|&interned| &**interned == name)
    }

    /// Intern `name`, returning its canonical copy and whether it was
    /// already present.
    ///
    /// A name is copied into the registry at most once.
    pub fn intern(&mut self, name: &str) -> (Arc<str>, bool) {
        let bucket = self.buckets.entry(hash_str(name)).or_default();
        if let Some(interned) = bucket.iter().find(|&interned| &**interned == name) {
            return (Arc::clone(interned), true);
        }

        let interned: Arc<str> = Arc::from(name);
        bucket.push(Arc::clone(&interned));
        (interned, false)
    }

    /// Whether `name` has been interned.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of distinct interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Add a tracked-file record.
    ///
    /// Returns `false` and keeps the existing record if a file with the same
    /// name is already tracked.
    pub(crate) fn track(&mut self, file: TrackedFile) -> bool {
        if self.files.iter().any(|tracked| tracked.filename == file.filename) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Tracked files in discovery order.
    #[must_use]
    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut registry = FilenameRegistry::new();

        let (first, present) = registry.intern("a.c");
        assert!(!present);
        let (second, present) = registry.intern(&String::from("a.c"));
        assert!(present);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_names() {
        let mut registry = FilenameRegistry::new();
        let _ = registry.intern("a.c");
        let _ = registry.intern("b.c");
        let _ = registry.intern("a.c");

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("b.c"));
        assert!(!registry.contains("c.c"));
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut registry = FilenameRegistry::new();
        assert!(registry.lookup("a.c").is_none());
        assert!(registry.is_empty());

        let (interned, _) = registry.intern("a.c");
        let found = registry.lookup("a.c").unwrap();
        assert!(Arc::ptr_eq(&interned, found));
    }

    #[test]
    fn test_track_keeps_order() {
        let mut registry = FilenameRegistry::new();
        let (a, _) = registry.intern("a.c");
        let (b, _) = registry.intern("b.c");
        assert!(registry.track(TrackedFile::new(a, Fingerprint::new(1), true)));
        assert!(registry.track(TrackedFile::new(b, Fingerprint::new(2), false)));

        let names: Vec<_> = registry.files().iter().map(TrackedFile::filename).collect();
        assert_eq!(names, ["a.c", "b.c"]);
        assert!(registry.files()[0].is_stale());
        assert_eq!(registry.files()[1].fingerprint(), Fingerprint::new(2));
    }

    #[test]
    fn test_track_rejects_second_record_for_name() {
        let mut registry = FilenameRegistry::new();
        let (a, _) = registry.intern("a.c");
        assert!(registry.track(TrackedFile::new(Arc::clone(&a), Fingerprint::new(1), true)));
        assert!(!registry.track(TrackedFile::new(a, Fingerprint::new(2), false)));

        assert_eq!(registry.files().len(), 1);
        assert_eq!(registry.files()[0].fingerprint(), Fingerprint::new(1));
        assert!(registry.files()[0].is_stale());
    }
}
