//! # Resolve Command Implementation
//!
//! Resolves a package's ref to a commit and prints the pinned description as
//! YAML, followed by the directory `install` would use for it.

use anyhow::{Context, Result};
use clap::Args;

use git_source_cache::package::PackageId;

use super::{PackageArgs, SourceArgs};

/// Pin a git package to a commit
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Only print the commit hash
    #[arg(long)]
    pub short: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let source = args.source.source();
    let id = PackageId::unversioned(args.package.name.clone(), args.package.description());

    let resolved = source
        .resolve_id(&id)
        .with_context(|| format!("Failed to resolve {}", id))?;
    let commit = resolved.description.resolved_ref().unwrap_or_default();

    if args.short {
        println!("{}", commit);
        return Ok(());
    }

    print!("{}", serde_yaml::to_string(&resolved.description)?);
    println!("# cache: {}", source.cache_directory_for(&resolved)?.display());
    Ok(())
}
