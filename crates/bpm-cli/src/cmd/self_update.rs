//! Update check and self-update for bpm
use anyhow::{Context, Result};
use bpm_core::config::{RELEASE_URL, SELF_BINARY_URL};
use bpm_core::{Reporter, ops};
use bpm_schema::{PackageName, ReleaseInfo, Version, is_greater_or_equal};

use super::Session;

/// Release document location; `BPM_RELEASE_URL` overrides the default.
fn release_url() -> String {
    std::env::var("BPM_RELEASE_URL").unwrap_or_else(|_| RELEASE_URL.to_string())
}

/// `true` if `remote` names a different release that is not older than `current`.
pub fn is_update(current: &str, remote: &str) -> bool {
    !remote.is_empty() && remote != current && is_greater_or_equal(remote, current)
}

/// Announce a newer bpm release. Failure is only a warning.
pub async fn check_for_update(session: &Session) {
    session.output.info("Checking for bpm updates...");
    match session
        .transport
        .fetch_json::<ReleaseInfo>(&release_url())
        .await
    {
        Ok(release) if is_update(crate::VERSION, &release.version) => {
            session.output.warning(&format!(
                "Update available: {} (run 'bpm self-update')",
                release.version
            ));
        }
        Ok(_) => session.output.success("bpm is up to date."),
        Err(e) => session.output.warning(&format!("Update check failed: {e}")),
    }
}

/// Replace the running bpm binary with the latest release.
pub async fn self_update(session: &mut Session) -> Result<()> {
    let release = match session
        .transport
        .fetch_json::<ReleaseInfo>(&release_url())
        .await
    {
        Ok(release) => release,
        Err(e) => {
            tracing::debug!("No release document ({e}), using the default binary URL");
            ReleaseInfo::default()
        }
    };

    let url = if release.binary.is_empty() {
        SELF_BINARY_URL.to_string()
    } else {
        release.binary.clone()
    };
    let version = if release.version.is_empty() {
        Version::latest()
    } else {
        Version::new(&release.version)
    };

    let dest = std::env::current_exe().context("Cannot locate the running bpm binary")?;
    if !session.confirm("Update bpm?") {
        session.output.info("Cancelled");
        return Ok(());
    }

    session.sweep_downloads();
    let (ctx, _) = session.parts();
    ctx.reporter.info(&format!("Downloading bpm update from {url}"));
    ops::fetch_and_place(&ctx, &url, &PackageName::new("bpm"), &version, &dest)
        .await
        .context("Update failed")?;

    session.output.success(&format!("bpm updated ({version})"));
    Ok(())
}
