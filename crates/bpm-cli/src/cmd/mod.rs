//! Command implementations.
//!
//! Every command runs against one [`Session`]: the configuration, registry and
//! transport loaded once at startup.

pub mod config;
pub mod info;
pub mod install;
pub mod list;
pub mod remove;
pub mod search;
pub mod self_update;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bpm_core::ops::{Context, Layout};
use bpm_core::paths::{config_path, registry_path, tmp_path};
use bpm_core::{
    AssumeYes, Catalog, Config, ConfigSource, Confirm, InstalledRegistry, Reporter, Sudo,
    Transport, sweep_stale_downloads,
};

use crate::ui::{Output, StdinConfirm};

/// State shared by every command in one invocation.
pub struct Session {
    pub home: PathBuf,
    pub config: Config,
    pub registry: InstalledRegistry,
    pub transport: Transport,
    pub layout: Layout,
    pub output: Output,
    confirm: Box<dyn Confirm>,
    elevation: Sudo,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("home", &self.home)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load config and registry from `home`, creating the config on first run.
    pub fn open(home: PathBuf, assume_yes: bool) -> Result<Self> {
        let output = Output::new();

        let (config, source) = Config::load(&config_path(&home));
        match source {
            ConfigSource::Created => output.info(&format!(
                "Created default config at {}",
                config_path(&home).display()
            )),
            ConfigSource::Defaults => output.warning("Using built-in default configuration"),
            ConfigSource::File => {}
        }

        let registry = InstalledRegistry::load(registry_path(&home));
        let transport = Transport::new().context("Failed to create HTTP client")?;
        let layout = Layout::from_config(&config, tmp_path(&home));
        let confirm: Box<dyn Confirm> = if assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(StdinConfirm)
        };

        Ok(Self {
            home,
            config,
            registry,
            transport,
            layout,
            output,
            confirm,
            elevation: Sudo,
        })
    }

    /// Fetch the catalog from every configured source.
    pub async fn catalog(&self) -> Catalog {
        Catalog::fetch(&self.transport, &self.config.repos, &self.output).await
    }

    /// Engine context plus the registry it mutates.
    pub fn parts(&mut self) -> (Context<'_>, &mut InstalledRegistry) {
        let ctx = Context {
            transport: &self.transport,
            layout: &self.layout,
            confirm: self.confirm.as_ref(),
            elevation: &self.elevation,
            reporter: &self.output,
        };
        (ctx, &mut self.registry)
    }

    /// Ask the configured confirmation provider.
    pub fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    /// Delete downloads left behind by interrupted runs.
    pub fn sweep_downloads(&self) {
        let removed = sweep_stale_downloads(self.layout.tmp_dir());
        if removed > 0 {
            tracing::debug!("Removed {removed} stale download(s)");
        }
    }
}
