//! Turning a description's effective ref into a commit hash.
//!
//! A description that already carries `resolved-ref` is answered without
//! looking at the mirror at all, so pinned dependencies never need the
//! network to resolve.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::description::PackageDescription;
use crate::error::{Error, Result};
use crate::git::{is_commit_hash, GitRunner};
use crate::layout::CacheLayout;

pub struct RevisionResolver {
    git: Arc<dyn GitRunner>,
    layout: CacheLayout,
}

impl RevisionResolver {
    pub fn new(git: Arc<dyn GitRunner>, layout: CacheLayout) -> Self {
        Self { git, layout }
    }

    /// Resolves `description` to a commit hash.
    ///
    /// Pinned descriptions return their `resolved-ref` verbatim. Otherwise the
    /// effective ref is looked up in the mirror, which must already exist and
    /// be fresh; this never modifies the mirror.
    pub fn resolve(&self, description: &PackageDescription) -> Result<String> {
        if let Some(pinned) = description.resolved_ref() {
            debug!("Using pinned revision {} for {}", pinned, description.url());
            return Ok(pinned.to_string());
        }

        let mirror = self.layout.mirror_path(description.url());
        rev_parse(
            self.git.as_ref(),
            &mirror,
            description.url(),
            description.effective_ref(),
        )
    }
}

/// Looks up the commit `rev` points to inside the repository at `repo`.
pub fn rev_parse(git: &dyn GitRunner, repo: &Path, url: &str, rev: &str) -> Result<String> {
    let not_found = || Error::RevisionNotFound {
        url: url.to_string(),
        r#ref: rev.to_string(),
        hint: Some(
            "Check the ref for typos; if it was force-pushed away upstream, pick a new one"
                .to_string(),
        ),
    };

    let lines = match git.run(&["rev-parse", "--verify", &format!("{}^{{commit}}", rev)], Some(repo)) {
        Ok(lines) => lines,
        Err(Error::GitCommand { .. }) => return Err(not_found()),
        Err(e) => return Err(e),
    };

    let hash = lines
        .first()
        .map(|line| line.trim().to_string())
        .unwrap_or_default();
    if !is_commit_hash(&hash) {
        return Err(not_found());
    }
    Ok(hash)
}
