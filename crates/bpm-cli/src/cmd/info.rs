//! Info command

use anyhow::Result;
use bpm_core::paths::{config_path, registry_path};

use super::Session;

/// Print the tool version and where it keeps its files.
pub fn info(session: &Session) -> Result<()> {
    let out = &session.output;
    out.line(&format!("bpm {}", crate::VERSION));
    out.line(&format!("Version: {}", crate::VERSION));
    out.line(&format!("Config: {}", config_path(&session.home).display()));
    out.line(&format!(
        "Registry: {} ({} installed)",
        registry_path(&session.home).display(),
        session.registry.len()
    ));
    out.line(&format!("Binaries: {}", session.layout.bin_dir.display()));
    Ok(())
}
