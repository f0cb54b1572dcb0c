//! # Dependency Manifest
//!
//! The manifest lists git dependencies by name:
//!
//! ```yaml
//! dependencies:
//!   tool: https://github.com/example/tool.git
//!   lib:
//!     url: https://github.com/example/lib.git
//!     ref: v2.1.0
//! ```
//!
//! Descriptions are validated as user input, so `resolved-ref` is rejected
//! here; pins only come from the lock file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::description::PackageDescription;
use crate::error::{Error, Result};
use crate::package::validate_package_name;

/// Parsed manifest: dependency name to description, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub dependencies: BTreeMap<String, PackageDescription>,
}

impl Manifest {
    /// Parse a manifest from a YAML string
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        let deps = match &root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(map) => match map.get("dependencies") {
                None | Some(Value::Null) => return Ok(Self::default()),
                Some(Value::Mapping(deps)) => deps,
                Some(_) => return Err(Error::format("\"dependencies\" must be a mapping")),
            },
            _ => return Err(Error::format("manifest must be a mapping")),
        };

        let mut dependencies = BTreeMap::new();
        for (name, raw) in deps {
            let name = name
                .as_str()
                .ok_or_else(|| Error::format(format!("dependency name {:?} is not a string", name)))?;
            validate_package_name(name)?;
            let description =
                PackageDescription::parse(raw, false).map_err(|e| in_dependency(name, e))?;
            dependencies.insert(name.to_string(), description);
        }
        Ok(Self { dependencies })
    }

    /// Load and parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Prefixes a description error with the dependency it belongs to.
pub(crate) fn in_dependency(name: &str, error: Error) -> Error {
    match error {
        Error::Format { message, hint } => Error::Format {
            message: format!("dependency '{}': {}", name, message),
            hint,
        },
        other => other,
    }
}
