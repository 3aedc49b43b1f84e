//! Change check for a test directory

use convenient_unittest::cache_file::temp_path;
use convenient_unittest::{CacheConfig, FileStatus, Result, StalenessError, TestFileSession};
use std::ffi::OsStr;
use tracing::debug;

/// Run one load/compare/persist cycle and print the status of each file.
pub fn check(config: &CacheConfig, ext: Option<&str>, files: &[String]) -> Result<()> {
    let files = if files.is_empty() {
        discover(config, ext)?
    } else {
        files.to_vec()
    };

    let mut session = TestFileSession::open(config.clone())?;

    println!("🔍 Checking {} test files in {}", files.len(), config.test_dir.display());
    for name in &files {
        match session.register_file(&config.test_dir, name)? {
            FileStatus::Stale => println!("  changed    {name}"),
            FileStatus::Unchanged => println!("  unchanged  {name}"),
            FileStatus::AlreadyTracked => debug!("Skipping duplicate {}", name),
        }
    }

    let summary = session.finish()?;

    println!();
    println!(
        "✅ {} tracked, {} changed, {} unchanged",
        summary.tracked, summary.stale, summary.unchanged
    );
    if summary.disappeared > 0 {
        println!("   {} files from the previous run are gone", summary.disappeared);
    }

    Ok(())
}

/// Regular files directly inside the test directory, sorted by name.
///
/// The cache file and its temp sibling are never candidates.
pub fn discover(config: &CacheConfig, ext: Option<&str>) -> Result<Vec<String>> {
    if !config.test_dir.is_dir() {
        return Err(StalenessError::DirectoryNotFound {
            path: config.test_dir.clone(),
        });
    }

    let cache_path = config.cache_path();
    let temp_path = temp_path(&cache_path);

    let mut files: Vec<String> = walkdir::WalkDir::new(&config.test_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path() != cache_path && entry.path() != temp_path)
        .filter(|entry| {
            ext.is_none_or(|ext| entry.path().extension() == Some(OsStr::new(ext)))
        })
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use tempfile::TempDir;

    fn write_test_file(config: &CacheConfig, name: &str, unix_secs: i64) {
        let path = config.test_dir.join(name);
        std::fs::write(&path, "TEST(case) {}").unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
    }

    #[test]
    fn test_discover_filters_and_skips_cache() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path());
        write_test_file(&config, "b.c", 1_700_000_000);
        write_test_file(&config, "a.c", 1_700_000_000);
        write_test_file(&config, "notes.txt", 1_700_000_000);
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(config.cache_path(), b"").unwrap();

        assert_eq!(discover(&config, Some("c")).unwrap(), ["a.c", "b.c"]);
        assert_eq!(discover(&config, None).unwrap(), ["a.c", "b.c", "notes.txt"]);
    }

    #[test]
    fn test_discover_keeps_files_sharing_the_cache_stem() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path()).with_cache_file("suite.cache");
        write_test_file(&config, "suite.tmp", 1_700_000_000);
        std::fs::write(config.cache_path(), b"").unwrap();
        std::fs::write(tmp.path().join("suite.cache.tmp"), b"").unwrap();

        assert_eq!(discover(&config, None).unwrap(), ["suite.tmp"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path().join("absent"));
        let err = discover(&config, None).unwrap_err();
        assert!(matches!(err, StalenessError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_check_persists_generation() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path());
        write_test_file(&config, "a.c", 1_700_000_000);
        write_test_file(&config, "b.c", 1_700_000_060);

        check(&config, Some("c"), &[]).unwrap();

        let stored = convenient_unittest::cache_file::read(&config.cache_path())
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_check_explicit_duplicates() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path());
        write_test_file(&config, "a.c", 1_700_000_000);

        let files = vec!["a.c".to_string(), "a.c".to_string()];
        check(&config, None, &files).unwrap();

        let stored = convenient_unittest::cache_file::read(&config.cache_path())
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 1);
    }
}
