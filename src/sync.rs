//! Installing every manifest dependency and producing the new lock file.
//!
//! Each dependency whose locked description is still equivalent to the
//! manifest's keeps its pinned commit, so re-running sync never touches the
//! network for it. Everything else is resolved against its mirror. All
//! packages are handled in parallel with rayon; the [`GitSource`] serializes
//! work on shared mirrors and snapshots.

use log::info;
use rayon::prelude::*;

use crate::error::Result;
use crate::lockfile::LockFile;
use crate::manifest::Manifest;
use crate::package::{Package, PackageId};
use crate::source::GitSource;

/// Outcome of a sync.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Installed packages in name order.
    pub packages: Vec<Package>,
    /// Lock file describing exactly the installed packages.
    pub lock: LockFile,
}

/// The ids to install: locked where the lock still matches, fresh otherwise.
///
/// With `upgrade` every lock entry is ignored.
pub fn plan(manifest: &Manifest, lock: &LockFile, upgrade: bool) -> Vec<PackageId> {
    manifest
        .dependencies
        .iter()
        .map(|(name, description)| match lock.get(name) {
            Some(locked) if !upgrade && locked.description.equivalent(description) => {
                locked.clone()
            }
            _ => PackageId::unversioned(name.clone(), description.clone()),
        })
        .collect()
}

/// Resolves and installs every dependency of `manifest`.
///
/// The first failure is returned; nothing is retried.
pub fn sync(source: &GitSource, manifest: &Manifest, lock: &LockFile, upgrade: bool) -> Result<SyncResult> {
    let ids = plan(manifest, lock, upgrade);

    let packages = ids
        .par_iter()
        .map(|id| -> Result<Package> {
            let resolved = source.resolve_id(id)?;
            let package = source.install(&resolved)?;
            info!("{} -> {}", package.id, package.dir.display());
            Ok(package)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut new_lock = LockFile::default();
    for package in &packages {
        new_lock.insert(package.id.clone());
    }

    Ok(SyncResult {
        packages,
        lock: new_lock,
    })
}
