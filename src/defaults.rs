//! Default values for git-source-cache configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Environment variable overriding the cache root.
pub const CACHE_ENV: &str = "GIT_SOURCE_CACHE";

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "git-deps.yaml";

/// Returns the default cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/git-source-cache` (XDG Base Directory)
/// - macOS: `~/Library/Caches/git-source-cache`
/// - Windows: `{FOLDERID_LocalAppData}\git-source-cache`
///
/// Falls back to `.git-source-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `GIT_SOURCE_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("git-source-cache"))
        .unwrap_or_else(|| PathBuf::from(".git-source-cache"))
}

/// Lock file that belongs to `manifest`: same name, `.lock` extension.
pub fn lock_path_for(manifest: &std::path::Path) -> PathBuf {
    manifest.with_extension("lock")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_root_returns_path() {
        let expected = match dirs::cache_dir() {
            Some(dir) => dir.join("git-source-cache"),
            None => PathBuf::from(".git-source-cache"),
        };
        assert_eq!(default_cache_root(), expected);
    }

    #[test]
    fn test_default_cache_root_is_absolute_or_fallback() {
        let cache_root = default_cache_root();
        // Either absolute (normal case) or relative fallback
        assert!(
            cache_root.is_absolute() || cache_root.starts_with(".git-source-cache"),
            "Expected absolute path or fallback, got: {:?}",
            cache_root
        );
    }

    #[test]
    fn test_lock_path_for() {
        assert_eq!(
            lock_path_for(std::path::Path::new("project/git-deps.yaml")),
            PathBuf::from("project/git-deps.lock")
        );
    }
}
