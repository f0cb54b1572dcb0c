//! # Sync Command Implementation
//!
//! Reads the manifest, installs every dependency (reusing pins from the lock
//! file where the dependency has not changed) and writes the lock file back.
//!
//! - `--upgrade` ignores existing pins and re-resolves every ref.
//! - `--dry-run` installs but leaves the lock file untouched.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use git_source_cache::defaults::{lock_path_for, MANIFEST_FILE};
use git_source_cache::lockfile::LockFile;
use git_source_cache::manifest::Manifest;
use git_source_cache::suggestions;
use git_source_cache::sync;

use super::SourceArgs;

/// Install every dependency in a manifest
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the manifest listing git dependencies
    #[arg(short, long, value_name = "FILE", default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Path to the lock file (defaults to the manifest path with a .lock extension)
    #[arg(long, value_name = "FILE")]
    pub lock: Option<PathBuf>,

    /// Ignore pinned commits and resolve every ref again
    #[arg(long)]
    pub upgrade: bool,

    /// Install packages but do not write the lock file
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    if !args.manifest.exists() {
        return Err(suggestions::manifest_not_found(&args.manifest));
    }
    let manifest = Manifest::from_file(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;

    let lock_path = args
        .lock
        .clone()
        .unwrap_or_else(|| lock_path_for(&args.manifest));
    let lock = LockFile::load(&lock_path)?;

    let source = args.source.source();
    let result = sync::sync(&source, &manifest, &lock, args.upgrade)?;

    for package in &result.packages {
        println!(
            "{} {} {}",
            package.name(),
            package.commit().unwrap_or_default(),
            package.dir.display()
        );
    }

    if args.dry_run {
        println!("Dry run: {} not written", lock_path.display());
    } else if result.lock != lock || !lock_path.exists() {
        result.lock.write(&lock_path)?;
        println!("Wrote {}", lock_path.display());
    } else {
        println!("{} is up to date", lock_path.display());
    }
    Ok(())
}
