//! # Install Command Implementation
//!
//! Installs a single git package into the cache and prints the snapshot
//! directory. With `--resolved-ref` the given commit is installed as is and
//! the mirror is only touched if that commit is not cached yet.

use anyhow::{Context, Result};
use clap::Args;

use git_source_cache::package::PackageId;

use super::{PackageArgs, SourceArgs};

/// Install one git package
#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Install this exact commit instead of resolving the ref
    #[arg(long, value_name = "COMMIT", value_parser = super::parse_commit)]
    pub resolved_ref: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `install` command.
pub fn execute(args: InstallArgs) -> Result<()> {
    let source = args.source.source();

    let mut id = PackageId::unversioned(args.package.name.clone(), args.package.description());
    if let Some(commit) = &args.resolved_ref {
        id = id.with_resolved_ref(commit.clone());
    }

    let package = source
        .install(&id)
        .with_context(|| format!("Failed to install {}", id))?;

    println!("{}", package.dir.display());
    Ok(())
}
