//! Update commands

use anyhow::{Result, bail};
use bpm_core::{InstallOutcome, Reporter, ops};
use bpm_schema::Constraint;

use super::Session;

/// Reinstall `name` at `latest`.
pub async fn update(session: &mut Session, name: &str) -> Result<()> {
    session.output.info(&format!("Updating package: {name}"));
    super::install::install(session, name, bpm_schema::LATEST).await
}

/// Reinstall every installed package at `latest`, continuing past failures.
pub async fn update_all(session: &mut Session) -> Result<()> {
    let names = session.registry.names();
    if names.is_empty() {
        session.output.warning("No packages installed.");
        return Ok(());
    }

    session.sweep_downloads();
    let catalog = session.catalog().await;
    let mut failed = Vec::new();

    for name in &names {
        session.output.info(&format!("Updating package: {name}"));
        let (ctx, registry) = session.parts();
        match ops::install(&ctx, &catalog, registry, name, &Constraint::Latest).await {
            Ok(InstallOutcome::Installed { name, version, .. }) => {
                session.output.success(&format!("Updated: {name} ({version})"));
            }
            Ok(InstallOutcome::Cancelled) => session.output.info(&format!("Skipped {name}")),
            Err(e) => {
                session.output.error(&format!("Update of {name} failed: {e}"));
                failed.push(name.to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} package(s) failed to update: {}",
            failed.len(),
            names.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
