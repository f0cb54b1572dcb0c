//! # CLI Command Implementations
//!
//! Each subcommand lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `git_source_cache` library.

pub mod cache;
pub mod install;
pub mod resolve;
pub mod sync;

use std::path::PathBuf;

use clap::Args;
use git_source_cache::defaults::default_cache_root;
use git_source_cache::description::{validate_commit, PackageDescription};
use git_source_cache::package::validate_package_name;
use git_source_cache::source::{GitSource, SourceOptions};

/// Cache location and network options shared by every command.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// The root directory for the package cache.
    ///
    /// If not provided, it defaults to the system's cache directory
    /// (e.g., `~/.cache/git-source-cache` on Linux).
    #[arg(long, value_name = "DIR", env = "GIT_SOURCE_CACHE", global = true)]
    pub cache_root: Option<PathBuf>,

    /// Use cached mirrors only; never fetch
    #[arg(long, global = true)]
    pub offline: bool,
}

impl SourceArgs {
    pub fn cache_root(&self) -> PathBuf {
        self.cache_root.clone().unwrap_or_else(default_cache_root)
    }

    pub fn source(&self) -> GitSource {
        GitSource::new(SourceOptions::new(self.cache_root()).offline(self.offline))
    }
}

/// Identifies one git package on the command line.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Package name
    #[arg(value_parser = parse_package_name)]
    pub name: String,

    /// Repository URL
    pub url: String,

    /// Branch, tag or commit to use (defaults to the repository's HEAD)
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,
}

impl PackageArgs {
    pub fn description(&self) -> PackageDescription {
        match &self.git_ref {
            Some(r#ref) => PackageDescription::new(&self.url, Some(r#ref.clone())),
            None => PackageDescription::Bare(self.url.clone()),
        }
    }
}

fn parse_package_name(name: &str) -> git_source_cache::error::Result<String> {
    validate_package_name(name)?;
    Ok(name.to_string())
}

/// Value parser for `--resolved-ref`.
pub fn parse_commit(commit: &str) -> git_source_cache::error::Result<String> {
    validate_commit(commit)?;
    Ok(commit.to_string())
}
