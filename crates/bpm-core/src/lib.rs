//! bpm-core - catalog, resolution and install engine for bpm
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
//!
//! # Overview
//!
//! A package is a single executable published by a package source. Sources
//! serve a JSON catalog; artifacts live under `<bin_base>/<name>/<version>/<name>`
//! and are installed into one binary directory.
//!
//! # Directory Layout
//!
//! ```text
//! $BPM_HOME (default: <config_dir>/bpm)
//! ├── bpm.conf        # key=value configuration
//! ├── installed.json  # installed-package registry
//! └── tmp/            # download staging (*.part)
//! ```
//!
//! Each CLI invocation fetches one [`Catalog`], loads one
//! [`InstalledRegistry`], and threads both through the engine explicitly.

pub mod catalog;
pub mod config;
pub mod io;
pub mod ops;
pub mod paths;
pub mod prompt;
pub mod registry;
pub mod reporter;
pub mod resolver;

pub use catalog::{Catalog, SourceUnavailable};
pub use config::{Config, ConfigError, ConfigKey, ConfigSource};
pub use io::download::{Transport, TransportError, sweep_stale_downloads};
pub use io::place::{Elevation, NoElevation, Placement, Sudo};
pub use ops::{Context, InstallError, InstallOutcome, Layout, RemoveError, RemoveOutcome};
pub use prompt::{AssumeYes, Confirm};
pub use registry::{InstalledRegistry, RegistryError};
pub use reporter::{NullReporter, Reporter};
pub use resolver::resolve;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("bpm/", env!("CARGO_PKG_VERSION"));
