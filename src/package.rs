//! Package identities and installed package handles.

use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Serialize;

use crate::description::{validate_commit, PackageDescription};
use crate::error::{Error, Result};

/// Checks that `name` can be used as the first half of a snapshot directory
/// name: a single path component that does not start with a dot.
pub fn validate_package_name(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        Some("is empty")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name.starts_with('.') {
        Some("starts with '.'")
    } else if name.chars().any(char::is_control) {
        Some("contains control characters")
    } else {
        None
    };

    match problem {
        None => Ok(()),
        Some(problem) => Err(Error::Format {
            message: format!("package name {:?} {}", name, problem),
            hint: Some("Package names must be a single file name such as 'my-lib'".to_string()),
        }),
    }
}

/// A dependency as chosen by the version solver: name, version and the git
/// description it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageId {
    pub name: String,
    pub version: Version,
    pub description: PackageDescription,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: Version, description: PackageDescription) -> Self {
        Self {
            name: name.into(),
            version,
            description,
        }
    }

    /// Shorthand for an id at version `0.0.0`.
    pub fn unversioned(name: impl Into<String>, description: PackageDescription) -> Self {
        Self::new(name, Version::new(0, 0, 0), description)
    }

    /// Checks the name and, when pinned, the commit before either is turned
    /// into a path or a git argument.
    pub fn validate(&self) -> Result<()> {
        validate_package_name(&self.name)?;
        if let Some(commit) = self.description.resolved_ref() {
            validate_commit(commit)?;
        }
        Ok(())
    }

    /// A copy of this id whose description is pinned to `commit`.
    pub fn with_resolved_ref(&self, commit: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.with_resolved_ref(commit),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} from git {}", self.name, self.version, self.description.url())?;
        if let Some(r#ref) = self.description.requested_ref() {
            write!(f, " at {}", r#ref)?;
        }
        Ok(())
    }
}

/// An installed package: its pinned id and the snapshot directory holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub id: PackageId,
    pub dir: PathBuf,
}

impl Package {
    pub fn new(id: PackageId, dir: PathBuf) -> Self {
        Self { id, dir }
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The commit the package was installed from.
    pub fn commit(&self) -> Option<&str> {
        self.id.description.resolved_ref()
    }
}
