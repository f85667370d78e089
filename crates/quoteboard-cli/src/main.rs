//! Quoteboard CLI
//!
//! Command-line interface for Quoteboard - quote browsing and remote sync.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use quoteboard_core::{Config, HttpRemoteSource, QuoteStore, SqliteKv, SyncController};

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Commands, ConfigCommands, ConflictCommands};
use output::{Output, OutputFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => output.error(&e),
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);

    let mut store = open_store(&config)?;

    // Sync before read commands (to show the latest quotes)
    if config.sync_enabled && cli.command.is_read() {
        store = auto_sync(store, &config, output).await?;
    }

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Random { category } => commands::quote::random(&mut store, category, output),
        Commands::Add {
            text,
            category,
            push,
        } => commands::quote::add(&mut store, &config, text, category, push, output).await,
        Commands::List { category } => commands::quote::list(&mut store, category, output),
        Commands::Categories => commands::quote::categories(&store, output),
        Commands::Export { output: path } => {
            commands::transfer::export(&store, &config, path, output)
        }
        Commands::Import { file } => commands::transfer::import(&mut store, file, output),
        Commands::Push { text } => commands::quote::push(&store, &config, text, output).await,
        Commands::Sync => {
            let controller = sync_controller(store, &config)?;
            commands::sync::sync(&controller, output).await
        }
        Commands::Watch { interval } => {
            let controller = sync_controller(store, &config)?;
            commands::sync::watch(controller, &config, interval, output).await
        }
        Commands::Conflicts { command } => {
            let controller = sync_controller(store, &config)?;
            handle_conflict_command(command, &controller, output).await
        }
        Commands::Status => {
            let controller = sync_controller(store, &config)?;
            commands::status::show(&controller, &config, output).await
        }
    }
}

fn open_store(config: &Config) -> Result<QuoteStore> {
    let path = config.database_path();
    let kv = SqliteKv::open(&path)
        .with_context(|| format!("Failed to open quote database {:?}", path))?;
    Ok(QuoteStore::open(Box::new(kv)))
}

fn sync_controller(store: QuoteStore, config: &Config) -> Result<SyncController<HttpRemoteSource>> {
    let remote =
        HttpRemoteSource::from_config(config).context("Failed to create HTTP client")?;
    Ok(SyncController::new(store, remote))
}

async fn handle_conflict_command(
    command: Option<ConflictCommands>,
    controller: &SyncController<HttpRemoteSource>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConflictCommands::List) | None => commands::conflicts::list(controller, output).await,
        Some(ConflictCommands::KeepLocal { number }) => {
            commands::conflicts::keep_local(controller, number, output).await
        }
        Some(ConflictCommands::AcceptServer { number }) => {
            commands::conflicts::accept_server(controller, number, output).await
        }
        Some(ConflictCommands::AcceptAll) => {
            commands::conflicts::accept_all(controller, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&std::path::PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Sync before a read command; failures only warn
async fn auto_sync(store: QuoteStore, config: &Config, output: &Output) -> Result<QuoteStore> {
    let controller = sync_controller(store, config)?;

    if let Err(e) = controller.sync_now().await {
        if !output.is_quiet() {
            eprintln!("⚠ Auto-sync failed: {}", e);
        }
    }

    Ok(controller.into_store())
}
