//! Package removal.

use bpm_schema::{InstalledEntry, PackageName, Version};

use super::context::Context;
use super::error::RemoveError;
use crate::io::place::{Deletion, delete_binary};
use crate::registry::InstalledRegistry;

/// Result of a single [`remove`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The binary, the registry entry, or both were removed.
    Removed {
        file_deleted: bool,
        entry: Option<InstalledEntry>,
    },
    /// Neither a binary nor a registry entry existed.
    NothingToRemove,
    /// The user declined the confirmation prompt.
    Cancelled,
}

/// Delete the binary for `name` and drop its registry entry.
///
/// A missing binary or a missing entry is tolerated. The registry is saved
/// even when nothing changed.
pub fn remove(
    ctx: &Context<'_>,
    registry: &mut InstalledRegistry,
    name: &str,
) -> Result<RemoveOutcome, RemoveError> {
    if !ctx.confirm.confirm(&format!("Remove {name}?")) {
        return Ok(RemoveOutcome::Cancelled);
    }

    let version = registry
        .get(name)
        .map_or_else(Version::default, |e| e.version.clone());
    let display_name = PackageName::new(name);
    ctx.reporter.removing(&display_name);

    let file_deleted = match PackageName::parse(name) {
        Ok(valid) => {
            let path = ctx.layout.binary_path(&valid);
            match delete_binary(&path, ctx.elevation) {
                Ok(Deletion::Direct | Deletion::Elevated) => true,
                Ok(Deletion::Missing) => {
                    ctx.reporter.warning(&format!(
                        "File not found, nothing to delete: {}",
                        path.display()
                    ));
                    false
                }
                Err(e) => {
                    ctx.reporter.error(&format!("Failed to delete {}: {e}", path.display()));
                    false
                }
            }
        }
        Err(e) => {
            tracing::debug!("Not touching the binary directory for '{name}': {e}");
            false
        }
    };

    let entry = registry.update(|r| r.remove(name))?;

    if !file_deleted && entry.is_none() {
        ctx.reporter.warning(&format!("Nothing was deleted for {name}"));
        return Ok(RemoveOutcome::NothingToRemove);
    }

    ctx.reporter.done(&display_name, &version, "removed");
    Ok(RemoveOutcome::Removed {
        file_deleted,
        entry,
    })
}
