//! # Revision Snapshots
//!
//! A snapshot is a full working copy of a repository checked out at a single
//! commit, stored as `<root>/<name>-<commit>`. Because a commit hash fixes the
//! content for good, a snapshot is created once and never updated.
//!
//! Creation happens in a staging directory next to the final path and is
//! published with a single rename, so the final directory only ever exists
//! complete. Failed attempts remove their staging directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::description::DEFAULT_REF;
use crate::error::{Error, Result};
use crate::git::{path_arg, GitRunner};
use crate::layout::{CacheLayout, MIRROR_DIR, STAGING_PREFIX};
use crate::locks::PathLocks;
use crate::revision::rev_parse;

/// A snapshot directory found in the cache.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CachedSnapshot {
    pub name: String,
    pub commit: String,
    pub path: PathBuf,
}

pub struct SnapshotManager {
    git: Arc<dyn GitRunner>,
    layout: CacheLayout,
    locks: PathLocks,
}

impl SnapshotManager {
    pub fn new(git: Arc<dyn GitRunner>, layout: CacheLayout) -> Self {
        Self {
            git,
            layout,
            locks: PathLocks::new(),
        }
    }

    /// Where the snapshot of `name` at `commit` lives.
    pub fn snapshot_path(&self, name: &str, commit: &str) -> PathBuf {
        self.layout.snapshot_path(name, commit)
    }

    /// Makes sure the snapshot of `name` at `commit` exists and returns its
    /// path.
    ///
    /// An existing directory is returned as is. Otherwise the mirror is cloned
    /// into a staging directory and the commit checked out there, unless the
    /// effective ref is `HEAD` and the clone already sits on the commit.
    pub fn ensure_snapshot(
        &self,
        mirror: &Path,
        name: &str,
        commit: &str,
        effective_ref: &str,
    ) -> Result<PathBuf> {
        let path = self.snapshot_path(name, commit);
        self.locks.with_lock(&path, || {
            if path.is_dir() {
                debug!("Snapshot {} already exists", path.display());
                return Ok(());
            }

            let staging = CacheLayout::staging_path(&path);
            if staging.exists() {
                warn!("Removing leftover staging directory {}", staging.display());
                fs::remove_dir_all(&staging)?;
            }
            fs::create_dir_all(self.layout.root())?;

            info!("Creating snapshot {} at {}", name, commit);
            let created = self
                .populate(mirror, &staging, commit, effective_ref)
                .and_then(|_| {
                    fs::rename(&staging, &path).map_err(|e| Error::Cache {
                        message: format!("could not publish {}: {}", path.display(), e),
                    })
                });
            if let Err(e) = created {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
            Ok(())
        })?;
        Ok(path)
    }

    fn populate(&self, mirror: &Path, staging: &Path, commit: &str, effective_ref: &str) -> Result<()> {
        self.git
            .run(&["clone", &path_arg(mirror), &path_arg(staging)], None)?;

        if effective_ref == DEFAULT_REF {
            let head = rev_parse(self.git.as_ref(), staging, &path_arg(mirror), DEFAULT_REF)?;
            if head == commit {
                return Ok(());
            }
            debug!("Mirror HEAD moved to {}, checking out {}", head, commit);
        }

        self.git
            .run(&["checkout", "--quiet", commit, "--"], Some(staging))?;
        Ok(())
    }

    /// Lists the snapshots present in the cache, sorted by directory name.
    pub fn cached_snapshots(&self) -> Result<Vec<CachedSnapshot>> {
        let root = self.layout.root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name == MIRROR_DIR || file_name.starts_with(STAGING_PREFIX) {
                continue;
            }
            if let Some((name, commit)) = split_snapshot_name(&file_name) {
                snapshots.push(CachedSnapshot {
                    name: name.to_string(),
                    commit: commit.to_string(),
                    path: entry.path(),
                });
            }
        }
        snapshots.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(snapshots)
    }
}

/// Splits `<name>-<commit>` at the last dash.
fn split_snapshot_name(dir_name: &str) -> Option<(&str, &str)> {
    let (name, commit) = dir_name.rsplit_once('-')?;
    if name.is_empty() || !crate::git::is_commit_hash(commit) {
        return None;
    }
    Some((name, commit))
}
