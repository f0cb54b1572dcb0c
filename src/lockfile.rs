//! # Lock File
//!
//! The lock file records, for every dependency, the version the solver picked
//! and the description pinned to a commit:
//!
//! ```yaml
//! packages:
//!   lib:
//!     version: 0.0.0
//!     description:
//!       url: https://github.com/example/lib.git
//!       ref: v2.1.0
//!       resolved-ref: 4f2a9c0d1e8b7a6f5e4d3c2b1a0f9e8d7c6b5a49
//! ```
//!
//! Descriptions read from here may carry `resolved-ref`. Entries are written
//! in name order so the file is stable under version control.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use semver::Version;
use serde::Serialize;
use serde_yaml::Value;

use crate::description::PackageDescription;
use crate::error::{Error, Result};
use crate::manifest::in_dependency;
use crate::package::{validate_package_name, PackageId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFile {
    pub packages: BTreeMap<String, PackageId>,
}

#[derive(Serialize)]
struct LockedPackage<'a> {
    version: &'a Version,
    description: &'a PackageDescription,
}

#[derive(Serialize)]
struct LockDocument<'a> {
    packages: BTreeMap<&'a str, LockedPackage<'a>>,
}

impl LockFile {
    /// Parse a lock file from a YAML string
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        let packages = match &root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(map) => match map.get("packages") {
                None | Some(Value::Null) => return Ok(Self::default()),
                Some(Value::Mapping(packages)) => packages,
                Some(_) => return Err(Error::format("\"packages\" must be a mapping")),
            },
            _ => return Err(Error::format("lock file must be a mapping")),
        };

        let mut locked = BTreeMap::new();
        for (name, entry) in packages {
            let name = name
                .as_str()
                .ok_or_else(|| Error::format(format!("package name {:?} is not a string", name)))?;
            validate_package_name(name)?;
            let version = match entry.get("version") {
                Some(Value::String(v)) => Version::parse(v)?,
                None => Version::new(0, 0, 0),
                Some(_) => {
                    return Err(in_dependency(name, Error::format("\"version\" must be a string")))
                }
            };
            let raw = entry.get("description").ok_or_else(|| {
                in_dependency(name, Error::format("missing required key \"description\""))
            })?;
            let description =
                PackageDescription::parse(raw, true).map_err(|e| in_dependency(name, e))?;
            locked.insert(
                name.to_string(),
                PackageId::new(name, version, description),
            );
        }
        Ok(Self { packages: locked })
    }

    /// Load a lock file, or an empty one if `path` does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::LockFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        let document = LockDocument {
            packages: self
                .packages
                .iter()
                .map(|(name, id)| {
                    (
                        name.as_str(),
                        LockedPackage {
                            version: &id.version,
                            description: &id.description,
                        },
                    )
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    /// Write the lock file to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        info!("Wrote {} locked packages to {}", self.packages.len(), path.display());
        Ok(())
    }

    /// The locked id for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&PackageId> {
        self.packages.get(name)
    }

    pub fn insert(&mut self, id: PackageId) {
        self.packages.insert(id.name.clone(), id);
    }
}
