//! Persistent key=value configuration.
//!
//! ```text
//! repos=https://example.com/packages.json,https://mirror.example.com/packages.json
//! bin_base=https://example.com
//! check_update=true
//! bin_dir=/usr/bin
//! ```
//!
//! A missing file is created with built-in defaults on first run. An
//! unreadable file falls back to defaults; it is never fatal.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::paths::default_bin_dir;

/// Package source used when none is configured.
pub const DEFAULT_REPO: &str =
    "https://raw.githubusercontent.com/ssl1th3r/gopmpackagesupdate/main/packages/packages.json";

/// Release document consulted by the update check.
pub const RELEASE_URL: &str =
    "https://raw.githubusercontent.com/ssl1th3r/gopmpackagesupdate/main/releases/latest.json";

/// Fallback download location for the tool's own binary.
pub const SELF_BINARY_URL: &str = "https://github.com/ssl1th3r/gopmpackagesupdate/raw/main/bin/gopm";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown config key '{0}' (expected one of: repos, bin_base, check_update, bin_dir)")]
    UnknownKey(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: ConfigKey, reason: String },
}

/// The settable configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Repos,
    BinBase,
    CheckUpdate,
    BinDir,
}

impl ConfigKey {
    /// Every key, in file order.
    pub const ALL: [ConfigKey; 4] = [Self::Repos, Self::BinBase, Self::CheckUpdate, Self::BinDir];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Repos => "repos",
            Self::BinBase => "bin_base",
            Self::CheckUpdate => "check_update",
            Self::BinDir => "bin_dir",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// How a [`Config`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the existing file.
    File,
    /// The file did not exist and was written with defaults.
    Created,
    /// The file could not be read or created; defaults are in effect.
    Defaults,
}

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Catalog source URLs, scanned in this order.
    pub repos: Vec<String>,
    /// Base URL artifacts are downloaded from.
    pub bin_base: String,
    /// Check for a newer release of the tool at startup.
    pub check_update: bool,
    /// Directory binaries are installed into.
    pub bin_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: vec![DEFAULT_REPO.to_string()],
            bin_base: default_bin_base(),
            check_update: true,
            bin_dir: default_bin_dir(),
        }
    }
}

/// The default repo URL with its last path segment removed.
pub fn default_bin_base() -> String {
    DEFAULT_REPO
        .rfind('/')
        .map_or(DEFAULT_REPO, |idx| &DEFAULT_REPO[..idx])
        .to_string()
}

impl Config {
    /// Load the config at `path`, creating it with defaults if it is missing.
    pub fn load(path: &Path) -> (Self, ConfigSource) {
        match std::fs::read_to_string(path) {
            Ok(text) => (Self::parse(&text), ConfigSource::File),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save(path) {
                    Ok(()) => (config, ConfigSource::Created),
                    Err(e) => {
                        tracing::warn!("Failed to write default config {}: {e}", path.display());
                        (config, ConfigSource::Defaults)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read config {}: {e}", path.display());
                (Self::default(), ConfigSource::Defaults)
            }
        }
    }

    /// Parse key=value lines. Unknown keys, blank lines and `#` comments are
    /// ignored; missing `repos`/`bin_base` fall back to the defaults.
    pub fn parse(text: &str) -> Self {
        let mut config = Self {
            repos: Vec::new(),
            bin_base: String::new(),
            check_update: true,
            bin_dir: default_bin_dir(),
        };

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "repos" => config.repos.extend(split_list(value)),
                "bin_base" => config.bin_base = value.to_string(),
                "check_update" => config.check_update = value.eq_ignore_ascii_case("true"),
                "bin_dir" if !value.is_empty() => config.bin_dir = PathBuf::from(value),
                other => tracing::debug!("Ignoring unknown config key '{other}'"),
            }
        }

        if config.repos.is_empty() {
            config.repos.push(DEFAULT_REPO.to_string());
        }
        if config.bin_base.is_empty() {
            config.bin_base = default_bin_base();
        }
        config
    }

    /// Serialize to the on-disk format.
    pub fn render(&self) -> String {
        ConfigKey::ALL
            .iter()
            .map(|key| format!("{key}={}\n", self.get(*key)))
            .collect()
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;
        Ok(())
    }

    /// Current value of `key` as it would be written to disk.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Repos => self.repos.join(","),
            ConfigKey::BinBase => self.bin_base.clone(),
            ConfigKey::CheckUpdate => self.check_update.to_string(),
            ConfigKey::BinDir => self.bin_dir.display().to_string(),
        }
    }

    /// Set `key` to `value` in memory. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for unrecognised keys and
    /// [`ConfigError::InvalidValue`] for empty lists/paths or non-boolean
    /// `check_update` values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<ConfigKey, ConfigError> {
        let key: ConfigKey = key.parse()?;
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key,
            reason: reason.to_string(),
        };

        match key {
            ConfigKey::Repos => {
                let repos: Vec<String> = split_list(value).collect();
                if repos.is_empty() {
                    return Err(invalid("at least one repository URL is required"));
                }
                self.repos = repos;
            }
            ConfigKey::BinBase => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.bin_base = value.to_string();
            }
            ConfigKey::CheckUpdate => {
                self.check_update = match value.to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid("expected 'true' or 'false'")),
                };
            }
            ConfigKey::BinDir => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.bin_dir = PathBuf::from(value);
            }
        }
        Ok(key)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}
