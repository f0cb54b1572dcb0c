//! # Error Handling
//!
//! This module defines the centralized error type for the git source cache.
//! It uses `thiserror` to build a single `Error` enum whose variants carry
//! enough context (URL, ref, command, stderr, hints) to tell the user what
//! went wrong and, where possible, how to fix it.
//!
//! The variants map onto the failure classes of the cache:
//!
//! - **`ToolMissing`**: the `git` executable could not be found or run.
//! - **`Format`**: a package description or lock entry is malformed.
//! - **`GitClone`**, **`GitCommand`**, **`Network`**: a clone, fetch, checkout
//!   or other git invocation failed.
//! - **`RevisionNotFound`**: a ref does not exist in the local mirror.
//! - **`Unresolved`**: an operation needed a pinned commit but the package
//!   description carries no `resolved-ref`.
//!
//! Everything reported by the git runner is propagated unchanged. Nothing in
//! this crate retries or recovers silently.

use thiserror::Error;

fn format_hint(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for git source cache operations
#[derive(Error, Debug)]
pub enum Error {
    /// The version control executable is not installed or cannot be run.
    #[error("Cannot find a working `{tool}` executable{}", format_hint(hint))]
    ToolMissing {
        tool: String,
        /// Optional hint for how to install or expose the tool
        hint: Option<String>,
    },

    /// A package description failed validation.
    ///
    /// The message names the offending keys when extra keys were present.
    #[error("Invalid package description: {message}{}", format_hint(hint))]
    Format {
        message: String,
        /// Optional hint for how to fix the description
        hint: Option<String>,
    },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}: {message}{}", format_hint(hint))]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed in {location}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        location: String,
        stderr: String,
    },

    /// A git operation failed because the remote could not be reached.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The requested ref does not exist in the repository mirror.
    #[error("Could not find git ref '{r#ref}' in {url}{}", format_hint(hint))]
    RevisionNotFound {
        url: String,
        r#ref: String,
        hint: Option<String>,
    },

    /// The package has not been pinned to a commit yet.
    #[error("Package '{package}' has no resolved-ref; resolve it before asking for its directory")]
    Unresolved { package: String },

    /// An error occurred while creating or moving a cache entry.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// A lock file or manifest could not be understood.
    #[error("Lock file error in {path}: {message}")]
    LockFile { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Error {
    /// Shorthand for a [`Error::Format`] without a hint.
    pub fn format(message: impl Into<String>) -> Self {
        Error::Format {
            message: message.into(),
            hint: None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
