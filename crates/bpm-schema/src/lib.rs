//! Shared types for bpm.
//!
//! Everything that crosses a wire or touches disk lives here: catalog records
//! served by package sources, entries of the installed-package registry, the
//! release document used for self-updates, and the version comparison rules
//! every other crate relies on.

pub mod record;
pub mod types;
pub mod version;

// Re-exports
pub use record::{InstalledEntry, PackageRecord, ReleaseInfo};
pub use types::{NameError, PackageName, Version};
pub use version::{Constraint, is_greater_or_equal};

/// Literal version token meaning "whatever the server considers newest".
pub const LATEST: &str = "latest";
