use dirs::config_dir;
use std::path::{Path, PathBuf};

/// Returns the bpm home directory, or None if no per-user config directory
/// can be resolved.
///
/// `BPM_HOME` overrides the default of `<config_dir>/bpm`.
pub fn try_bpm_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BPM_HOME") {
        if !val.is_empty() {
            return Some(PathBuf::from(val));
        }
    }
    config_dir().map(|d| d.join("bpm"))
}

/// Config file: <home>/bpm.conf
pub fn config_path(home: &Path) -> PathBuf {
    home.join("bpm.conf")
}

/// Installed-package registry: <home>/installed.json
pub fn registry_path(home: &Path) -> PathBuf {
    home.join("installed.json")
}

/// Download staging area: <home>/tmp
pub fn tmp_path(home: &Path) -> PathBuf {
    home.join("tmp")
}

/// Default directory binaries are installed into.
pub fn default_bin_dir() -> PathBuf {
    PathBuf::from("/usr/bin")
}
