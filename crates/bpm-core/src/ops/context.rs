//! Shared operation context.
//!
//! Groups the collaborators every install and remove step needs, so the
//! engine functions take one argument instead of five.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::Reporter;
use crate::config::Config;
use crate::io::download::Transport;
use crate::io::place::Elevation;
use crate::prompt::Confirm;

/// Where artifacts come from and where binaries go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Artifact base URL.
    pub bin_base: String,
    /// Directory binaries are installed into.
    pub bin_dir: PathBuf,
    /// Staging directory for downloads.
    pub tmp_dir: PathBuf,
}

impl Layout {
    pub fn from_config(config: &Config, tmp_dir: PathBuf) -> Self {
        Self {
            bin_base: config.bin_base.clone(),
            bin_dir: config.bin_dir.clone(),
            tmp_dir,
        }
    }

    /// `<bin_base>/<name>/<version>/<name>`
    pub fn artifact_url(&self, name: &str, version: &str) -> String {
        format!(
            "{}/{name}/{version}/{name}",
            self.bin_base.trim_end_matches('/')
        )
    }

    /// Installed location of the binary for `name`.
    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }
}

/// Groups common state used during install and remove operations.
pub struct Context<'a> {
    pub transport: &'a Transport,
    pub layout: &'a Layout,
    pub confirm: &'a dyn Confirm,
    pub elevation: &'a dyn Elevation,
    pub reporter: &'a dyn Reporter,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
