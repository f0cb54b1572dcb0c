//! # Repository Mirrors
//!
//! One bare `git clone --mirror` per upstream URL lives under
//! `<root>/cache/`. The first resolution that needs a URL clones it; later
//! resolutions fetch into the existing mirror. Mirrors are never deleted here.
//!
//! All work on one mirror path runs under that path's lock, so a clone and a
//! fetch of the same URL can never interleave. Mirrors of different URLs are
//! handled in parallel.
//!
//! A mirror is fetched at most once per `MirrorManager`: once it has been
//! cloned or fetched, later calls in the same process reuse it as is.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::git::{classify_remote_error, path_arg, GitRunner};
use crate::layout::CacheLayout;
use crate::locks::PathLocks;

pub struct MirrorManager {
    git: Arc<dyn GitRunner>,
    layout: CacheLayout,
    locks: PathLocks,
    refreshed: Mutex<HashSet<PathBuf>>,
    offline: bool,
}

impl MirrorManager {
    pub fn new(git: Arc<dyn GitRunner>, layout: CacheLayout, offline: bool) -> Self {
        Self {
            git,
            layout,
            locks: PathLocks::new(),
            refreshed: Mutex::new(HashSet::new()),
            offline,
        }
    }

    /// Where the mirror of `url` lives. Depends on the URL only.
    pub fn mirror_path(&self, url: &str) -> PathBuf {
        self.layout.mirror_path(url)
    }

    /// Makes sure an up-to-date mirror of `url` exists and returns its path.
    ///
    /// Clones the mirror if it is missing, otherwise fetches into it unless it
    /// was already refreshed by this manager or the manager is offline.
    pub fn ensure_mirror(&self, url: &str) -> Result<PathBuf> {
        let path = self.mirror_path(url);
        self.locks.with_lock(&path, || {
            if path.is_dir() {
                self.refresh(url, &path)
            } else {
                self.create(url, &path)
            }
        })?;
        Ok(path)
    }

    /// Makes sure the mirror of `url` contains `commit` and returns its path.
    ///
    /// An existing mirror that already has the commit is used without touching
    /// the network. Otherwise the mirror is cloned, or fetched once. A commit
    /// the mirror still lacks afterwards is [`Error::RevisionNotFound`].
    pub fn ensure_commit(&self, url: &str, commit: &str) -> Result<PathBuf> {
        let path = self.mirror_path(url);
        self.locks.with_lock(&path, || {
            if path.is_dir() {
                if self.has_commit(&path, commit) {
                    debug!("Mirror {} already contains {}", path.display(), commit);
                    return Ok(());
                }
                self.refresh(url, &path)?;
            } else {
                self.create(url, &path)?;
            }

            if self.has_commit(&path, commit) {
                Ok(())
            } else {
                Err(Error::RevisionNotFound {
                    url: url.to_string(),
                    r#ref: commit.to_string(),
                    hint: Some(
                        "The pinned commit is not in the repository; run 'sync --upgrade' to re-resolve it"
                            .to_string(),
                    ),
                })
            }
        })?;
        Ok(path)
    }

    /// Whether `commit` is present in the mirror at `path`.
    pub fn has_commit(&self, path: &Path, commit: &str) -> bool {
        self.git
            .run(&["cat-file", "-e", &format!("{}^{{commit}}", commit)], Some(path))
            .is_ok()
    }

    fn create(&self, url: &str, path: &Path) -> Result<()> {
        if self.offline {
            return Err(Error::Network {
                url: url.to_string(),
                message: "no cached mirror is available while offline".to_string(),
            });
        }

        let staging = CacheLayout::staging_path(path);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(self.layout.mirrors_dir())?;

        info!("Cloning {} into {}", url, path.display());
        let cloned = self
            .git
            .run(&["clone", "--mirror", url, &path_arg(&staging)], None)
            .map_err(|e| classify_remote_error(url, e))
            .and_then(|_| fs::rename(&staging, path).map_err(Error::from));
        if let Err(e) = cloned {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        self.mark_refreshed(path)
    }

    fn refresh(&self, url: &str, path: &Path) -> Result<()> {
        if self.offline {
            debug!("Offline, using mirror {} as is", path.display());
            return Ok(());
        }
        if self.is_refreshed(path)? {
            debug!("Mirror {} already fetched in this run", path.display());
            return Ok(());
        }

        info!("Fetching {} into {}", url, path.display());
        self.git
            .run(&["fetch"], Some(path))
            .map_err(|e| classify_remote_error(url, e))?;
        self.mark_refreshed(path)
    }

    fn is_refreshed(&self, path: &Path) -> Result<bool> {
        let refreshed = self.refreshed.lock().map_err(|_| Error::LockPoisoned {
            context: "refreshed mirror set".to_string(),
        })?;
        Ok(refreshed.contains(path))
    }

    fn mark_refreshed(&self, path: &Path) -> Result<()> {
        let mut refreshed = self.refreshed.lock().map_err(|_| Error::LockPoisoned {
            context: "refreshed mirror set".to_string(),
        })?;
        refreshed.insert(path.to_path_buf());
        Ok(())
    }
}
