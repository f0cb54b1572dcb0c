//! # Git Source Cache
//!
//! This library turns git dependencies (a repository URL plus an optional
//! ref) into reproducible, locally cached, immutable package snapshots.
//!
//! ## Quick Example
//!
//! ```no_run
//! use git_source_cache::description::PackageDescription;
//! use git_source_cache::package::PackageId;
//! use git_source_cache::source::{GitSource, SourceOptions};
//!
//! let source = GitSource::new(SourceOptions::new("/tmp/git-source-cache"));
//! let id = PackageId::unversioned(
//!     "tool",
//!     PackageDescription::new("https://github.com/example/tool.git", Some("v1.0.0".into())),
//! );
//!
//! // Pin the ref to a commit, then install that commit.
//! let pinned = source.resolve_id(&id).unwrap();
//! let package = source.install(&pinned).unwrap();
//! println!("{} installed at {}", package.name(), package.dir.display());
//! ```
//!
//! ## Core Concepts
//!
//! - **Descriptions (`description`)**: a bare URL or a `url`/`ref`/`resolved-ref`
//!   mapping, with validation and equivalence rules.
//! - **Mirrors (`mirror`)**: one bare clone per upstream URL, fetched instead of
//!   re-cloned.
//! - **Revisions (`revision`)**: effective ref to commit hash, skipped entirely
//!   for pinned descriptions.
//! - **Snapshots (`snapshot`)**: one immutable working copy per
//!   (package, commit), published atomically.
//! - **Source (`source`)**: `install`, `resolve_id` and `cache_directory_for`.
//! - **Manifest, lock file and sync (`manifest`, `lockfile`, `sync`)**: install
//!   a whole dependency list in parallel and record the pins.

pub mod defaults;
pub mod description;
pub mod error;
pub mod git;
pub mod layout;
pub mod locks;
pub mod lockfile;
pub mod manifest;
pub mod mirror;
pub mod package;
pub mod revision;
pub mod snapshot;
pub mod source;
pub mod suggestions;
pub mod sync;

#[cfg(test)]
mod layout_proptest;
#[cfg(test)]
mod test_support;
