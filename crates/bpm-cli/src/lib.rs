//! bpm - a binary package manager
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
//!
//! Installs single-file executables published by one or more package
//! sources into a binary directory, and keeps track of what it installed.
//!
//! # Directory Layout
//!
//! ```text
//! $BPM_HOME (default: <config_dir>/bpm)
//! ├── bpm.conf        # repos, bin_base, check_update, bin_dir
//! ├── installed.json  # what bpm installed, and at which version
//! └── tmp/            # download staging
//! ```

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};

/// Version reported by `--version`, `info` and the update check.
pub const VERSION: &str = env!("BPM_VERSION");

#[derive(Debug, Parser)]
#[command(name = "bpm")]
#[command(author, version = VERSION, about = "bpm - a binary package manager")]
pub struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a package and its missing dependencies
    #[command(visible_alias = "dwld")]
    Install {
        /// Package name
        name: String,
        /// Version: latest, >1.2.0 (at least), or an exact version
        #[arg(long = "ver", default_value = bpm_schema::LATEST)]
        version: String,
    },
    /// Reinstall a package at its latest version
    #[command(visible_alias = "upd")]
    Update {
        /// Package name
        name: String,
    },
    /// Reinstall every installed package at its latest version
    #[command(name = "update-all", visible_alias = "updateall")]
    UpdateAll,
    /// Remove a package
    Remove {
        /// Package name
        name: String,
    },
    /// Update bpm itself to the latest release
    #[command(name = "self-update", visible_alias = "updatepm")]
    SelfUpdate,
    /// List available packages
    List {
        /// List installed packages instead
        #[arg(long, short)]
        installed: bool,
    },
    /// Search available packages by name
    Search {
        /// Case-insensitive substring of the package name
        query: String,
    },
    /// Set a configuration value
    Set {
        /// One of: repos, bin_base, check_update, bin_dir
        key: String,
        /// New value (repos is comma-separated)
        value: String,
    },
    /// Show configuration values
    Config {
        /// Show only this key
        key: Option<String>,
    },
    /// Show version and file locations
    Info,
}

impl Commands {
    /// Whether the startup update check should run before this command.
    pub fn wants_update_check(&self) -> bool {
        !matches!(
            self,
            Self::Info | Self::Set { .. } | Self::Config { .. } | Self::SelfUpdate
        )
    }
}
