//! On-disk layout of the cache.
//!
//! ```text
//! <root>/
//!   <name>-<commit>/          revision snapshots (checked-out working copies)
//!   cache/
//!     <repo>-<url hash>/      bare mirrors, one per upstream URL
//! ```
//!
//! Every path here is a pure function of its inputs so the same URL or
//! (name, commit) pair maps to the same directory across runs.
//!
//! Mirrors are prefixed with the repository name taken from the URL rather
//! than a package name, so every package using one URL shares one mirror.
//! Snapshot names are only safe because package names are single path
//! components and commits are hex hashes; both are checked on input.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::description::normalize_url;

/// Name of the subdirectory holding repository mirrors.
pub const MIRROR_DIR: &str = "cache";

/// Prefix of in-progress clone directories.
pub const STAGING_PREFIX: &str = ".staging-";

/// Hex SHA-256 of the full normalized URL.
///
/// `DefaultHasher` is not stable across Rust releases, so a cryptographic hash
/// is used to keep mirror paths valid between runs.
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Human-readable repository name taken from the last URL path component.
pub fn repo_name(url: &str) -> String {
    let normalized = normalize_url(url);
    let last = normalized
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or_default();

    let safe: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.is_empty() || safe.chars().all(|c| c == '.') {
        "repo".to_string()
    } else {
        safe
    }
}

/// Directory name of the mirror for `url`.
pub fn mirror_dir_name(url: &str) -> String {
    format!("{}-{}", repo_name(url), url_hash(url))
}

/// Directory name of the snapshot for `name` at `commit`.
pub fn snapshot_dir_name(name: &str, commit: &str) -> String {
    format!("{}-{}", name, commit)
}

/// Cache root plus the path derivations beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every mirror.
    pub fn mirrors_dir(&self) -> PathBuf {
        self.root.join(MIRROR_DIR)
    }

    /// Where the mirror for `url` lives.
    pub fn mirror_path(&self, url: &str) -> PathBuf {
        self.mirrors_dir().join(mirror_dir_name(url))
    }

    /// Where the snapshot of `name` at `commit` lives.
    pub fn snapshot_path(&self, name: &str, commit: &str) -> PathBuf {
        self.root.join(snapshot_dir_name(name, commit))
    }

    /// Sibling directory a clone into `target` is staged in before the final
    /// rename.
    pub fn staging_path(target: &Path) -> PathBuf {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!("{}{}", STAGING_PREFIX, name))
    }
}
