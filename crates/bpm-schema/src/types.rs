use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Reasons a string cannot be used as an installable package name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name is empty or only whitespace.
    #[error("package name is empty")]
    Empty,

    /// The name would escape the binary directory or is not a plain file name.
    #[error("package name '{0}' is not a valid file name")]
    NotAFileName(String),
}

/// A package name as it appears in catalogs, the registry and on disk.
///
/// Names are compared exactly; the same string is used as the file name of the
/// installed binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Wrap a name without validation (catalog and registry data).
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Create a name that is safe to use as a file name inside the binary
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for blank input and
    /// [`NameError::NotAFileName`] for names containing path separators,
    /// NUL bytes, or consisting of `.`/`..`.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(NameError::NotAFileName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for PackageName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A version token.
///
/// Usually dot-separated numbers, but any string is legal: `latest` is stored
/// verbatim when that is what was installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Create a new version from the given string (stored as-is).
    pub fn new(v: &str) -> Self {
        Self(v.to_string())
    }

    /// The `latest` token.
    pub fn latest() -> Self {
        Self::new(crate::LATEST)
    }

    /// Returns `true` for the literal `latest` token.
    pub fn is_latest(&self) -> bool {
        self.0 == crate::LATEST
    }

    /// Return the version string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for Version {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_plain_names() {
        assert_eq!(PackageName::parse("ripgrep").unwrap(), "ripgrep");
        assert_eq!(PackageName::parse("  fd  ").unwrap(), "fd");
        assert_eq!(PackageName::parse("my-tool.sh").unwrap(), "my-tool.sh");
    }

    #[test]
    fn test_parse_rejects_paths() {
        assert_eq!(PackageName::parse(""), Err(NameError::Empty));
        assert!(PackageName::parse("../etc/passwd").is_err());
        assert!(PackageName::parse("a/b").is_err());
        assert!(PackageName::parse("..").is_err());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_ne!(PackageName::new("Tool"), PackageName::new("tool"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Version::latest()).unwrap();
        assert_eq!(json, "\"latest\"");
    }
}
