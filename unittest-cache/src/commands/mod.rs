//! unittest-cache command-line interface
//!
//! - `check`: compare test files against the previous run and persist the new fingerprints
//! - `show`: print the persisted fingerprints
//! - `clean`: remove the cache file

use clap::{Parser, Subcommand};
use convenient_unittest::{CacheConfig, DEFAULT_CACHE_FILE, DEFAULT_MAX_FILES};
use std::path::PathBuf;

pub mod check;
pub mod clean;
pub mod show;

/// Change-detection cache for unit-test runners
#[derive(Parser)]
#[command(name = "unittest-cache")]
#[command(about = "Detect which unit-test sources changed since the last run")]
#[command(version)]
pub struct Cli {
    /// Directory holding the test sources and the cache file
    #[arg(short = 'd', long, default_value = "tests", env = "UNITTEST_TEST_DIR", global = true)]
    pub test_dir: PathBuf,

    /// Cache file name inside the test directory
    #[arg(long, default_value = DEFAULT_CACHE_FILE, env = "UNITTEST_CACHE_FILE", global = true)]
    pub cache_file: String,

    /// Maximum number of test files tracked per run
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_FILES,
        env = "UNITTEST_MAX_FILES",
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_files: usize,

    /// Log per-file decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare test files with the previous run and record this run
    Check {
        /// Only consider files with this extension when discovering files
        #[arg(long)]
        ext: Option<String>,

        /// Files to check, relative to the test directory (default: every file in it)
        files: Vec<String>,
    },

    /// Print the fingerprints stored by the last run
    Show {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Remove the cache file so the next run treats every file as changed
    Clean,
}

impl Cli {
    /// Cache configuration from the global arguments.
    pub fn config(&self) -> CacheConfig {
        CacheConfig::new(&self.test_dir)
            .with_cache_file(&self.cache_file)
            .with_max_files(self.max_files)
    }
}

/// Dispatch the selected subcommand.
pub fn run(cli: &Cli) -> convenient_unittest::Result<()> {
    let config = cli.config();
    match &cli.command {
        Commands::Check { ext, files } => check::check(&config, ext.as_deref(), files),
        Commands::Show { json } => show::show(&config, *json),
        Commands::Clean => clean::clean(&config),
    }
}
