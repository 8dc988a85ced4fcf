//! Remove command

use anyhow::{Context, Result};
use bpm_core::{RemoveOutcome, Reporter, ops};

use super::Session;

/// Remove `name`'s binary and registry entry.
pub fn remove(session: &mut Session, name: &str) -> Result<()> {
    let (ctx, registry) = session.parts();
    let outcome = ops::remove(&ctx, registry, name)
        .with_context(|| format!("Failed to remove {name}"))?;

    match outcome {
        RemoveOutcome::Removed { .. } => session.output.success(&format!("Removed: {name}")),
        RemoveOutcome::NothingToRemove => {}
        RemoveOutcome::Cancelled => session.output.info("Cancelled"),
    }
    Ok(())
}
