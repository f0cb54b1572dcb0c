//! Shared fixtures for integration tests: throwaway local git repositories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Whether a `git` executable is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Runs git in `dir` with a fixed identity, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local upstream repository with a `main` branch.
pub struct Upstream {
    _dir: TempDir,
    path: PathBuf,
}

impl Upstream {
    /// Creates a repository whose `main` holds one commit writing `contents`
    /// to `file.txt`.
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("upstream");
        std::fs::create_dir(&path).unwrap();

        git(&path, &["init", "--quiet"]);
        git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        let upstream = Self { _dir: dir, path };
        upstream.commit(contents);
        upstream
    }

    /// Path usable as the repository URL.
    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commits `contents` to `file.txt` on the current branch and returns the hash.
    pub fn commit(&self, contents: &str) -> String {
        std::fs::write(self.path.join("file.txt"), contents).unwrap();
        git(&self.path, &["add", "file.txt"]);
        git(&self.path, &["commit", "--quiet", "-m", contents]);
        self.head()
    }

    pub fn head(&self) -> String {
        git(&self.path, &["rev-parse", "HEAD"])
    }

    /// Creates `branch` at the current commit.
    pub fn branch(&self, branch: &str) {
        git(&self.path, &["branch", branch]);
    }

    pub fn checkout(&self, branch: &str) {
        git(&self.path, &["checkout", "--quiet", branch]);
    }

    pub fn tag(&self, tag: &str) {
        git(&self.path, &["tag", tag]);
    }
}

/// Reads `file.txt` from an installed snapshot.
pub fn snapshot_contents(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("file.txt")).expect("snapshot is missing file.txt")
}
