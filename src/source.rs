//! # Git Package Source
//!
//! `GitSource` is the entry point the dependency manager talks to. It ties the
//! layers together:
//!
//! 1. **Mirrors** (`mirror`): one bare clone per upstream URL, cloned once and
//!    fetched on later resolutions.
//! 2. **Revision resolution** (`revision`): the description's effective ref is
//!    turned into a commit hash against the mirror, or taken verbatim from
//!    `resolved-ref`.
//! 3. **Snapshots** (`snapshot`): one checked-out working copy per
//!    (package name, commit), created once and reused forever.
//!
//! The git executable is reached through the [`GitRunner`] trait so tests can
//! swap in a scripted implementation, the same way the cache layout can be
//! pointed at a temporary directory.
//!
//! `GitSource` is `Send + Sync`; callers may install many packages in
//! parallel. Work on the same mirror or the same snapshot is serialized
//! internally.

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use serde_yaml::Value;

use crate::description::{self, PackageDescription};
use crate::error::{Error, Result};
use crate::git::{tool_missing, GitRunner, SystemGit};
use crate::layout::CacheLayout;
use crate::mirror::MirrorManager;
use crate::package::{Package, PackageId};
use crate::revision::RevisionResolver;
use crate::snapshot::{CachedSnapshot, SnapshotManager};

/// Settings for a [`GitSource`].
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Root of the on-disk cache.
    pub cache_root: PathBuf,
    /// Never fetch; only use mirrors that are already on disk.
    pub offline: bool,
}

impl SourceOptions {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            offline: false,
        }
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// Package source backed by git repositories.
pub struct GitSource {
    git: Arc<dyn GitRunner>,
    layout: CacheLayout,
    mirrors: MirrorManager,
    resolver: RevisionResolver,
    snapshots: SnapshotManager,
}

impl GitSource {
    /// Creates a source that runs the system's `git`.
    pub fn new(options: SourceOptions) -> Self {
        Self::with_runner(Arc::new(SystemGit::new()), options)
    }

    /// Creates a source with a custom [`GitRunner`].
    pub fn with_runner(git: Arc<dyn GitRunner>, options: SourceOptions) -> Self {
        let layout = CacheLayout::new(options.cache_root);
        Self {
            mirrors: MirrorManager::new(Arc::clone(&git), layout.clone(), options.offline),
            resolver: RevisionResolver::new(Arc::clone(&git), layout.clone()),
            snapshots: SnapshotManager::new(Arc::clone(&git), layout.clone()),
            git,
            layout,
        }
    }

    pub fn cache_root(&self) -> &std::path::Path {
        self.layout.root()
    }

    /// Installs `id` into the cache and returns a handle to its snapshot.
    ///
    /// The returned package id is pinned to the commit that was installed.
    /// A pinned id whose snapshot already exists is served without running
    /// git at all.
    pub fn install(&self, id: &PackageId) -> Result<Package> {
        id.validate()?;
        self.require_git()?;
        let description = &id.description;
        let url = description.url();

        let (mirror, commit) = match description.resolved_ref() {
            Some(commit) => {
                let path = self.snapshots.snapshot_path(&id.name, commit);
                if path.is_dir() {
                    debug!("{} is already installed at {}", id.name, path.display());
                    return Ok(Package::new(id.clone(), path));
                }
                (self.mirrors.ensure_commit(url, commit)?, commit.to_string())
            }
            None => {
                let mirror = self.mirrors.ensure_mirror(url)?;
                (mirror, self.resolver.resolve(description)?)
            }
        };

        let dir = self.snapshots.ensure_snapshot(
            &mirror,
            &id.name,
            &commit,
            description.effective_ref(),
        )?;
        Ok(Package::new(id.with_resolved_ref(commit), dir))
    }

    /// Returns `id` with its description pinned to the commit its effective
    /// ref currently resolves to.
    ///
    /// `url` and `ref` are left as they are. Already pinned ids come back
    /// unchanged without touching the mirror.
    pub fn resolve_id(&self, id: &PackageId) -> Result<PackageId> {
        id.validate()?;
        if id.description.resolved_ref().is_some() {
            return Ok(id.clone());
        }
        self.require_git()?;
        self.mirrors.ensure_mirror(id.description.url())?;
        let commit = self.resolver.resolve(&id.description)?;
        Ok(id.with_resolved_ref(commit))
    }

    /// Where `install` puts (or has put) the snapshot for `id`.
    ///
    /// Pure path computation; `id` must be pinned.
    pub fn cache_directory_for(&self, id: &PackageId) -> Result<PathBuf> {
        id.validate()?;
        let commit = id
            .description
            .resolved_ref()
            .ok_or_else(|| Error::Unresolved {
                package: id.name.clone(),
            })?;
        Ok(self.snapshots.snapshot_path(&id.name, commit))
    }

    /// Where the mirror for `description`'s URL lives.
    pub fn mirror_path(&self, description: &PackageDescription) -> PathBuf {
        self.mirrors.mirror_path(description.url())
    }

    /// Validates a raw description; see [`PackageDescription::parse`].
    pub fn validate_description(&self, raw: &Value, from_lock_file: bool) -> Result<()> {
        description::validate_description(raw, from_lock_file)
    }

    /// Whether two descriptions are the same dependency.
    pub fn descriptions_equal(&self, a: &PackageDescription, b: &PackageDescription) -> bool {
        description::descriptions_equal(a, b)
    }

    /// Snapshots currently present in the cache.
    pub fn cached_snapshots(&self) -> Result<Vec<CachedSnapshot>> {
        self.snapshots.cached_snapshots()
    }

    fn require_git(&self) -> Result<()> {
        if self.git.is_available() {
            Ok(())
        } else {
            Err(tool_missing())
        }
    }
}
