//! Version comparison and constraints
//!
//! Supports:
//! - Latest: `latest` (passed through to the artifact URL untouched)
//! - Minimum: `>1.2.0` or `>=1.2.0` (resolved against the catalog)
//! - Exact: `1.2.0`

use crate::types::Version;

/// Returns `true` if version `a` is greater than or equal to version `b`.
///
/// Both strings are split on `.` and compared component-wise as integers,
/// padding the shorter one with zeros. Components that are not integers count
/// as `0`. Equal versions compare as `true`.
pub fn is_greater_or_equal(a: &str, b: &str) -> bool {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();
    let component = |parts: &[&str], i: usize| -> i64 {
        parts.get(i).and_then(|s| s.parse().ok()).unwrap_or(0)
    };

    for i in 0..std::cmp::max(a_parts.len(), b_parts.len()) {
        let av = component(&a_parts, i);
        let bv = component(&b_parts, i);
        if av != bv {
            return av > bv;
        }
    }
    true
}

/// A requested version as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Constraint {
    /// Newest build; never resolved locally.
    #[default]
    Latest,
    /// Highest catalog version that is at least this baseline.
    AtLeast(Version),
    /// This exact version token.
    Exact(Version),
}

impl Constraint {
    /// Parse a version token like `latest`, `>1.2.0`, `>=1.2` or `1.2.0`.
    ///
    /// An empty token means `latest`.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec.is_empty() || spec == crate::LATEST {
            Self::Latest
        } else if spec.starts_with('>') {
            Self::AtLeast(Version::new(spec.trim_matches(|c| c == '>' || c == '=')))
        } else {
            Self::Exact(Version::new(spec))
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "{}", crate::LATEST),
            Self::AtLeast(v) => write!(f, ">{v}"),
            Self::Exact(v) => write!(f, "{v}"),
        }
    }
}
