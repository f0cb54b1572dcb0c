//! # Error Suggestions
//!
//! Helpers for CLI errors that tell users what went wrong AND how to fix it.

use std::path::Path;

/// Generate an error for when the manifest file is not found.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest file not found: {path}\n\n\
         hint: Create a git-deps.yaml file listing your git dependencies\n\
         hint: Use -m/--manifest to specify a different path",
        path = path.display()
    )
}

/// Generate an error for a snapshot lookup without a pinned commit.
pub fn missing_resolved_ref(name: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "No commit given for '{name}'\n\n\
         hint: Pass --resolved-ref <COMMIT> to locate an installed snapshot\n\
         hint: Run 'git-source-cache resolve' to find the commit for a ref"
    )
}
