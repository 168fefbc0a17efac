//! tubearchive - mirror a Tube Archivist catalog into a local SQLite cache.

mod app;
mod cli;
mod commands;
mod help;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubearchive_core::{load_settings, validate_settings, Settings};

use app::App;
use cli::{Cli, Command, ConfigAction};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start the async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        debug!("{:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load(config: Option<PathBuf>, database: Option<PathBuf>) -> Result<Settings> {
    let mut settings = load_settings(config.as_deref()).context("Failed to load settings")?;
    if let Some(path) = database {
        settings.database.path = path;
    }
    validate_settings(&settings).context("Invalid settings")?;
    Ok(settings)
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        database,
        command,
        ..
    } = cli;

    // Help needs neither settings nor the database.
    if let Command::Help { command } = &command {
        match command {
            Some(name) => print!("{}", help::render_command(name)?),
            None => print!("{}", help::render_overview()?),
        }
        return Ok(());
    }

    let app = App::open(load(config, database)?)?;

    match command {
        Command::Config { action } => match action {
            ConfigAction::Set { url, token } => commands::config::set(&app, url, token),
            ConfigAction::Get => commands::config::get(&app),
        },
        Command::Sync { target } => commands::sync::run(&app, target).await,
        Command::Stats { view } => commands::stats::run(&app, view),
        Command::Search { scope } => commands::search::run(&app, &scope),
        Command::Redownload { yes, target } => {
            commands::redownload::run(&app, target.into(), yes).await
        }
        Command::Help { .. } => Ok(()),
    }
}
