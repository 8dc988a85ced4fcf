//! Catalog and registry documents.
//!
//! A package source serves a JSON array of [`PackageRecord`]:
//!
//! ```text
//! [{ "name": "jq", "version": "1.7.1", "deps": ["oniguruma"] }, ...]
//! ```
//!
//! The installed registry is a JSON array of [`InstalledEntry`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{PackageName, Version};

/// Metadata for one package version published by a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name; also the binary's file name.
    #[serde(default)]
    pub name: PackageName,

    /// Version published by the source.
    #[serde(default)]
    pub version: Version,

    /// Names of packages that must be installed first.
    #[serde(
        rename = "deps",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dependencies: Vec<PackageName>,
}

impl PackageRecord {
    /// Convenience constructor used by tests and tooling.
    pub fn new(name: &str, version: &str, dependencies: &[&str]) -> Self {
        Self {
            name: PackageName::new(name),
            version: Version::new(version),
            dependencies: dependencies.iter().map(|d| PackageName::new(d)).collect(),
        }
    }
}

/// One package installed by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledEntry {
    /// Package name (unique within the registry).
    pub name: PackageName,
    /// Whatever version token was last installed successfully.
    pub version: Version,
}

impl InstalledEntry {
    /// Create a registry entry.
    pub fn new(name: PackageName, version: Version) -> Self {
        Self { name, version }
    }
}

/// Release document describing the newest build of the tool itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseInfo {
    /// Released version.
    #[serde(default)]
    pub version: String,
    /// Download URL of the release binary (may be empty).
    #[serde(default)]
    pub binary: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PackageName>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PackageName>>::deserialize(deserializer)?.unwrap_or_default())
}
