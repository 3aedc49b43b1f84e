//! Inspect the persisted generation

use convenient_unittest::{CacheConfig, Result, cache_file};
use serde_json::json;

/// Print the fingerprints stored by the last run.
pub fn show(config: &CacheConfig, as_json: bool) -> Result<()> {
    let path = config.cache_path();
    let Some(fingerprints) = cache_file::read(&path)? else {
        println!("No cache found at: {}", path.display());
        println!("Run `unittest-cache check` to create it.");
        return Ok(());
    };

    if as_json {
        let report = json!({
            "path": path,
            "count": fingerprints.len(),
            "fingerprints": fingerprints,
        });
        println!("{report:#}");
        return Ok(());
    }

    println!("Cache file:   {}", path.display());
    println!("Fingerprints: {}", fingerprints.len());
    for fingerprint in &fingerprints {
        println!("  {fingerprint}");
    }
    Ok(())
}
