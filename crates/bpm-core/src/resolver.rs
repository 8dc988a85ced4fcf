//! Version resolution against the catalog.

use bpm_schema::{Constraint, Version, is_greater_or_equal};

use crate::catalog::Catalog;

/// Turn a constraint into the version token used in the artifact URL.
///
/// `latest` and exact versions pass through untouched. For `>base`, the
/// catalog records named `name` are scanned in source order and each one that
/// is greater than or equal to the running best replaces it. Because equal
/// versions count as greater-or-equal, ties go to the later record.
///
/// If no source could be reached, or every source served an empty list,
/// `>base` resolves to `latest`. If the name is missing from a non-empty
/// catalog, the baseline is returned unchanged.
pub fn resolve(catalog: &Catalog, name: &str, constraint: &Constraint) -> Version {
    let baseline = match constraint {
        Constraint::Latest => return Version::latest(),
        Constraint::Exact(v) => return v.clone(),
        Constraint::AtLeast(v) => v,
    };

    if catalog.is_unavailable() || catalog.is_empty() {
        tracing::debug!("Catalog empty, resolving {name} {constraint} to latest");
        return Version::latest();
    }

    let mut best = baseline;
    let mut matched = false;
    for version in catalog.versions_of(name) {
        matched = true;
        if is_greater_or_equal(version, best) {
            best = version;
        }
    }

    if !matched {
        tracing::debug!("No catalog record for {name}, using baseline {baseline}");
    }
    best.clone()
}
