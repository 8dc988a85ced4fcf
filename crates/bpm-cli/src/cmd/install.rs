//! Install command

use anyhow::{Context, Result};
use bpm_core::{InstallOutcome, Reporter, ops};
use bpm_schema::{Constraint, PackageName};

use super::Session;

/// Install `name` at the version token `version`.
pub async fn install(session: &mut Session, name: &str, version: &str) -> Result<()> {
    session.sweep_downloads();
    let package = PackageName::parse(name).with_context(|| format!("Cannot install '{name}'"))?;
    let name = package.as_str();
    let constraint = Constraint::parse(version);
    session
        .output
        .info(&format!("Installing package: {name} version: {constraint}"));

    let catalog = session.catalog().await;
    if let Some(record) = catalog.find(name) {
        if !record.dependencies.is_empty() {
            let deps: Vec<&str> = record.dependencies.iter().map(|d| d.as_str()).collect();
            session
                .output
                .info(&format!("Dependencies: {}", deps.join(", ")));
        }
    }

    let (ctx, registry) = session.parts();
    let outcome = ops::install(&ctx, &catalog, registry, name, &constraint)
        .await
        .with_context(|| format!("Install of {name} failed"))?;

    match outcome {
        InstallOutcome::Installed { name, version, .. } => {
            session
                .output
                .success(&format!("Installed: {name} ({version})"));
            warn_if_shadowed(session, &name);
        }
        InstallOutcome::Cancelled => session.output.info("Cancelled"),
    }
    Ok(())
}

/// Warn when the binary directory is not on PATH or another binary of the
/// same name would be found first.
fn warn_if_shadowed(session: &Session, name: &str) {
    let bin_dir = &session.layout.bin_dir;
    let path_env = std::env::var_os("PATH").unwrap_or_default();
    if !std::env::split_paths(&path_env).any(|p| &p == bin_dir) {
        session
            .output
            .warning(&format!("{} is not in your PATH.", bin_dir.display()));
        return;
    }

    if let Ok(found) = which::which(name) {
        if !found.starts_with(bin_dir) {
            session.output.warning(&format!(
                "'{name}' is shadowed by {}",
                found.display()
            ));
        }
    }
}
