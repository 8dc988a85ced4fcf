//! bpm - a binary package manager CLI

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bpm_cli::cmd::{self, Session};
use bpm_cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let home = bpm_core::paths::try_bpm_home()
        .context("Could not determine a config directory; set BPM_HOME")?;
    let mut session = Session::open(home, cli.yes)?;

    if session.config.check_update && cli.command.wants_update_check() {
        cmd::self_update::check_for_update(&session).await;
    }

    match cli.command {
        Commands::Install { name, version } => {
            cmd::install::install(&mut session, &name, &version).await
        }
        Commands::Update { name } => cmd::update::update(&mut session, &name).await,
        Commands::UpdateAll => cmd::update::update_all(&mut session).await,
        Commands::Remove { name } => cmd::remove::remove(&mut session, &name),
        Commands::SelfUpdate => cmd::self_update::self_update(&mut session).await,
        Commands::List { installed } => cmd::list::list(&session, installed).await,
        Commands::Search { query } => cmd::search::search(&session, &query).await,
        Commands::Set { key, value } => cmd::config::set(&mut session, &key, &value),
        Commands::Config { key } => cmd::config::show(&session, key.as_deref()),
        Commands::Info => cmd::info::info(&session),
    }
}
