//! # Cache Command Implementation
//!
//! ## Subcommands
//!
//! - **`list`**: Display every snapshot in the cache
//! - **`dir`**: Print where the snapshot for a pinned package lives

use anyhow::Result;
use clap::{Args, Subcommand};

use git_source_cache::package::PackageId;
use git_source_cache::snapshot::CachedSnapshot;
use git_source_cache::suggestions;

use super::{PackageArgs, SourceArgs};

/// Inspect the package cache
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: CacheSubcommand,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List all cached snapshots
    List(ListArgs),
    /// Print the snapshot directory of a pinned package
    Dir(DirArgs),
}

/// Arguments for the cache list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the cache dir command
#[derive(Args, Debug)]
pub struct DirArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Commit the package is pinned to
    #[arg(long, value_name = "COMMIT", value_parser = super::parse_commit)]
    pub resolved_ref: Option<String>,
}

/// Execute the `cache` command.
pub fn execute(args: CacheArgs) -> Result<()> {
    match args.command {
        CacheSubcommand::List(list_args) => execute_list(&args.source, list_args),
        CacheSubcommand::Dir(dir_args) => execute_dir(&args.source, dir_args),
    }
}

/// Execute the `cache list` command.
fn execute_list(source_args: &SourceArgs, args: ListArgs) -> Result<()> {
    let cache_root = source_args.cache_root();
    let snapshots = source_args.source().cached_snapshots()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No cached packages found in: {}", cache_root.display());
        return Ok(());
    }
    display_table(&snapshots);
    Ok(())
}

/// Execute the `cache dir` command.
fn execute_dir(source_args: &SourceArgs, args: DirArgs) -> Result<()> {
    let commit = args
        .resolved_ref
        .ok_or_else(|| suggestions::missing_resolved_ref(&args.package.name))?;
    let id = PackageId::unversioned(args.package.name.clone(), args.package.description())
        .with_resolved_ref(commit);

    println!("{}", source_args.source().cache_directory_for(&id)?.display());
    Ok(())
}

fn display_table(snapshots: &[CachedSnapshot]) {
    let width = snapshots
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("PACKAGE".len());

    println!("{:<width$}  COMMIT", "PACKAGE", width = width);
    for snapshot in snapshots {
        println!(
            "{:<width$}  {}",
            snapshot.name,
            &snapshot.commit[..snapshot.commit.len().min(12)],
            width = width
        );
    }
    println!("\n{} cached package(s)", snapshots.len());
}
