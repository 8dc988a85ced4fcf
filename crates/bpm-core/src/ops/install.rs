//! Package installation.
//!
//! Resolve the version, install missing dependencies depth-first, download the
//! artifact, place it, then record it. The registry is only written after the
//! binary is in place, so a failure at any earlier step leaves it untouched.

use std::path::Path;

use bpm_schema::{Constraint, InstalledEntry, PackageName, Version};
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::context::Context;
use super::error::InstallError;
use crate::catalog::Catalog;
use crate::io::download::staging_file;
use crate::io::place::{Placement, make_executable, place_binary};
use crate::registry::InstalledRegistry;
use crate::resolver::resolve;

/// Result of a single [`install`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed {
        name: PackageName,
        version: Version,
        placement: Placement,
        /// An existing registry entry was replaced.
        updated: bool,
    },
    /// The user declined the confirmation prompt.
    Cancelled,
}

/// Install `name` at `constraint`, including any missing dependencies.
pub async fn install(
    ctx: &Context<'_>,
    catalog: &Catalog,
    registry: &mut InstalledRegistry,
    name: &str,
    constraint: &Constraint,
) -> Result<InstallOutcome, InstallError> {
    if ctx.layout.bin_base.trim().is_empty() {
        return Err(InstallError::Config("bin_base is not set".to_string()));
    }
    let name = PackageName::parse(name)?;
    let mut in_progress = Vec::new();
    install_recursive(
        ctx,
        catalog,
        registry,
        &name,
        constraint.clone(),
        &mut in_progress,
    )
    .await
}

fn install_recursive<'a>(
    ctx: &'a Context<'a>,
    catalog: &'a Catalog,
    registry: &'a mut InstalledRegistry,
    name: &'a PackageName,
    constraint: Constraint,
    in_progress: &'a mut Vec<PackageName>,
) -> LocalBoxFuture<'a, Result<InstallOutcome, InstallError>> {
    async move {
        if in_progress.contains(name) {
            let mut chain = in_progress.clone();
            chain.push(name.clone());
            return Err(InstallError::DependencyCycle(chain));
        }

        let version = resolve(catalog, name, &constraint);
        tracing::debug!("Resolved {name} {constraint} -> {version}");

        in_progress.push(name.clone());
        let deps = ensure_dependencies(ctx, catalog, registry, name, in_progress).await;
        in_progress.pop();
        deps?;

        let url = ctx.layout.artifact_url(name, &version);
        ctx.reporter.info(&format!("Downloading from: {url}"));
        if !ctx.confirm.confirm("Proceed with install/update?") {
            ctx.reporter.warning(&format!("Skipped {name}"));
            return Ok(InstallOutcome::Cancelled);
        }

        let dest = ctx.layout.binary_path(name);
        let placement = fetch_and_place(ctx, &url, name, &version, &dest).await?;

        let entry = InstalledEntry::new(name.clone(), version.clone());
        let updated = registry.update(|r| r.upsert(entry))?;

        let detail = match placement {
            Placement::Direct => dest.display().to_string(),
            Placement::Elevated => format!("{} (elevated)", dest.display()),
        };
        ctx.reporter.done(name, &version, &detail);

        Ok(InstallOutcome::Installed {
            name: name.clone(),
            version,
            placement,
            updated,
        })
    }
    .boxed_local()
}

/// Install every dependency of `name` that is not already in the registry.
async fn ensure_dependencies(
    ctx: &Context<'_>,
    catalog: &Catalog,
    registry: &mut InstalledRegistry,
    name: &PackageName,
    in_progress: &mut Vec<PackageName>,
) -> Result<(), InstallError> {
    let Some(record) = catalog.find(name) else {
        return Ok(());
    };

    for dep in &record.dependencies {
        if registry.contains(dep) {
            tracing::debug!("Dependency {dep} of {name} already installed");
            continue;
        }

        let failed = |source: InstallError| InstallError::DependencyFailed {
            package: name.clone(),
            dependency: dep.clone(),
            source: Box::new(source),
        };
        let dep_name = PackageName::parse(dep).map_err(|e| failed(e.into()))?;

        ctx.reporter
            .info(&format!("Installing dependency {dep_name} for {name}"));
        match install_recursive(
            ctx,
            catalog,
            registry,
            &dep_name,
            Constraint::Latest,
            in_progress,
        )
        .await
        {
            Ok(InstallOutcome::Installed { .. }) => {}
            Ok(InstallOutcome::Cancelled) => {
                return Err(InstallError::DependencyDeclined {
                    package: name.clone(),
                    dependency: dep_name,
                });
            }
            Err(e @ InstallError::DependencyCycle(_)) => return Err(e),
            Err(e) => return Err(failed(e)),
        }
    }
    Ok(())
}

/// Download `url` into the staging directory and place it at `dest`.
///
/// Shared by package installs and self-update. The staged file is removed
/// whether or not placement succeeds.
pub async fn fetch_and_place(
    ctx: &Context<'_>,
    url: &str,
    name: &PackageName,
    version: &Version,
    dest: &Path,
) -> Result<Placement, InstallError> {
    let staged = staging_file(ctx.layout.tmp_dir(), name)?;

    if let Err(source) = ctx
        .transport
        .download(url, staged.path(), |current, total| {
            ctx.reporter.downloading(name, version, current, total);
        })
        .await
    {
        ctx.reporter.failed(name, version, &source.to_string());
        return Err(InstallError::DownloadFailed {
            name: name.clone(),
            source,
        });
    }

    make_executable(staged.path())?;
    ctx.reporter.installing(name, version);

    place_binary(staged.path(), dest, ctx.elevation).map_err(|e| {
        ctx.reporter.failed(name, version, &e.to_string());
        InstallError::InstallFailed {
            name: name.clone(),
            direct: e.direct,
            elevated: e.elevated,
        }
    })
}
