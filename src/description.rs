//! # Package Descriptions
//!
//! A git dependency is described either by a bare URL string or by a mapping
//! with a required `url`, an optional `ref` (branch, tag or commit-ish) and,
//! once the dependency has been pinned, a `resolved-ref` holding the commit
//! hash it resolved to.
//!
//! ```yaml
//! # bare form
//! my_package: https://github.com/example/my_package.git
//!
//! # structured form
//! other_package:
//!   url: https://github.com/example/other_package.git
//!   ref: v1.2.0
//! ```
//!
//! `resolved-ref` is written by the cache itself and is only accepted when a
//! description is loaded from a lock file.

use serde::Serialize;
use serde_yaml::Value;

use crate::error::{Error, Result};

/// The ref used when a description does not name one.
pub const DEFAULT_REF: &str = "HEAD";

const URL_KEY: &str = "url";
const REF_KEY: &str = "ref";
const RESOLVED_REF_KEY: &str = "resolved-ref";

/// A user-supplied description of where a git package lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackageDescription {
    /// A repository URL with no pinned ref.
    Bare(String),
    /// A repository URL with an optional ref and an optional pinned commit.
    Structured {
        url: String,
        #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
        r#ref: Option<String>,
        #[serde(rename = "resolved-ref", skip_serializing_if = "Option::is_none")]
        resolved_ref: Option<String>,
    },
}

impl PackageDescription {
    /// Creates a structured description with the given URL and ref.
    pub fn new(url: impl Into<String>, r#ref: Option<String>) -> Self {
        PackageDescription::Structured {
            url: url.into(),
            r#ref,
            resolved_ref: None,
        }
    }

    /// Parses a raw YAML value into a description.
    ///
    /// `from_lock_file` must be true when the value comes from persisted lock
    /// state; only then is `resolved-ref` allowed.
    pub fn parse(raw: &Value, from_lock_file: bool) -> Result<Self> {
        let map = match raw {
            Value::String(url) => return Ok(PackageDescription::Bare(url.clone())),
            Value::Mapping(map) => map,
            other => {
                return Err(Error::format(format!(
                    "expected a URL string or a mapping, found {}",
                    value_kind(other)
                )))
            }
        };

        let mut extra = Vec::new();
        for key in map.keys() {
            match key.as_str() {
                Some(URL_KEY) | Some(REF_KEY) => {}
                Some(RESOLVED_REF_KEY) if from_lock_file => {}
                Some(name) => extra.push(format!("\"{}\"", name)),
                None => extra.push(format!("{:?}", key)),
            }
        }
        if !extra.is_empty() {
            return Err(Error::Format {
                message: format!("unexpected keys {}", extra.join(", ")),
                hint: Some("Git descriptions may only contain \"url\" and \"ref\"".to_string()),
            });
        }

        let url = match map.get(URL_KEY) {
            Some(Value::String(url)) => url.clone(),
            Some(other) => {
                return Err(Error::format(format!(
                    "\"url\" must be a string, found {}",
                    value_kind(other)
                )))
            }
            None => {
                return Err(Error::Format {
                    message: "missing required key \"url\"".to_string(),
                    hint: Some("Add 'url:' pointing at the git repository".to_string()),
                })
            }
        };

        let resolved_ref = optional_string(map.get(RESOLVED_REF_KEY), RESOLVED_REF_KEY)?;
        if let Some(commit) = &resolved_ref {
            validate_commit(commit)?;
        }

        Ok(PackageDescription::Structured {
            url,
            r#ref: optional_string(map.get(REF_KEY), REF_KEY)?,
            resolved_ref,
        })
    }

    /// The repository URL exactly as written.
    pub fn url(&self) -> &str {
        match self {
            PackageDescription::Bare(url) => url,
            PackageDescription::Structured { url, .. } => url,
        }
    }

    /// The ref the user asked for, if any.
    pub fn requested_ref(&self) -> Option<&str> {
        match self {
            PackageDescription::Bare(_) => None,
            PackageDescription::Structured { r#ref, .. } => r#ref.as_deref(),
        }
    }

    /// The commit this description has been pinned to, if any.
    pub fn resolved_ref(&self) -> Option<&str> {
        match self {
            PackageDescription::Bare(_) => None,
            PackageDescription::Structured { resolved_ref, .. } => resolved_ref.as_deref(),
        }
    }

    /// The ref that resolution actually uses.
    ///
    /// A pinned commit wins over the requested ref, which wins over
    /// [`DEFAULT_REF`].
    pub fn effective_ref(&self) -> &str {
        self.resolved_ref()
            .or_else(|| self.requested_ref())
            .unwrap_or(DEFAULT_REF)
    }

    /// Returns a copy pinned to `commit`, keeping `url` and `ref` unchanged.
    pub fn with_resolved_ref(&self, commit: impl Into<String>) -> Self {
        PackageDescription::Structured {
            url: self.url().to_string(),
            r#ref: self.requested_ref().map(str::to_string),
            resolved_ref: Some(commit.into()),
        }
    }

    /// Whether two descriptions name the same dependency.
    ///
    /// Only the normalized URL and the requested ref take part; the pinned
    /// commit does not.
    pub fn equivalent(&self, other: &PackageDescription) -> bool {
        normalize_url(self.url()) == normalize_url(other.url())
            && self.requested_ref() == other.requested_ref()
    }
}

/// Checks a raw description without keeping the parsed value.
pub fn validate_description(raw: &Value, from_lock_file: bool) -> Result<()> {
    PackageDescription::parse(raw, from_lock_file).map(|_| ())
}

/// Rejects anything but a full hex commit hash.
///
/// Pinned commits become snapshot directory names and git arguments.
pub fn validate_commit(commit: &str) -> Result<()> {
    if crate::git::is_commit_hash(commit) {
        return Ok(());
    }
    Err(Error::Format {
        message: format!("\"resolved-ref\" {:?} is not a commit hash", commit),
        hint: Some("Pinned commits are full 40 or 64 character hex hashes".to_string()),
    })
}

/// Whether two descriptions refer to the same logical dependency.
pub fn descriptions_equal(a: &PackageDescription, b: &PackageDescription) -> bool {
    a.equivalent(b)
}

/// Normalizes a repository URL for comparison and cache keys.
///
/// URLs the `url` crate understands are re-serialized, which lowercases the
/// scheme and host and drops default ports. scp-style addresses and local
/// paths are only trimmed.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let trimmed = trimmed.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() { url.trim() } else { trimmed };

    match url::Url::parse(trimmed) {
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(parsed) if parsed.scheme().len() > 1 && parsed.has_host() => {
            parsed.as_str().trim_end_matches('/').to_string()
        }
        _ => trimmed.to_string(),
    }
}

fn optional_string(value: Option<&Value>, key: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::format(format!(
            "\"{}\" must be a string, found {}",
            key,
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
