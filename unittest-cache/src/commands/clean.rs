//! Cache removal

use convenient_unittest::{CacheConfig, Result, StalenessError};
use std::fs;
use std::io;

/// Remove the cache file. A missing file is not an error.
pub fn clean(config: &CacheConfig) -> Result<()> {
    let path = config.cache_path();
    match fs::remove_file(&path) {
        Ok(()) => {
            println!("🧹 Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("No cache found at: {}", path.display());
            Ok(())
        }
        Err(source) => Err(StalenessError::CacheWrite { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_cache() {
        let tmp = TempDir::new().unwrap();
        let config = CacheConfig::new(tmp.path());
        fs::write(config.cache_path(), b"").unwrap();

        clean(&config).unwrap();
        assert!(!config.cache_path().exists());

        // Second clean finds nothing and still succeeds
        clean(&config).unwrap();
    }
}
