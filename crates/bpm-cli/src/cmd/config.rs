//! Config commands: `set` and `config`

use anyhow::{Context, Result};
use bpm_core::paths::config_path;
use bpm_core::{ConfigKey, Reporter};

use super::Session;

/// Validate and persist one configuration value.
pub fn set(session: &mut Session, key: &str, value: &str) -> Result<()> {
    let key = session.config.set(key, value)?;
    let path = config_path(&session.home);
    session
        .config
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    session
        .output
        .success(&format!("{key} = {}", session.config.get(key)));
    Ok(())
}

/// Print one configuration value, or all of them.
pub fn show(session: &Session, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let key: ConfigKey = key.parse()?;
            session.output.line(&session.config.get(key));
        }
        None => {
            for key in ConfigKey::ALL {
                session
                    .output
                    .line(&format!("{key}={}", session.config.get(key)));
            }
        }
    }
    Ok(())
}
