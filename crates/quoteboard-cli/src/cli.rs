use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quoteboard")]
#[command(about = "Quoteboard - browse, collect and sync quotes")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a random quote from a category
    Random {
        /// Category (defaults to the last one used)
        category: Option<String>,
    },
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
        /// Also send the quote to the remote endpoint
        #[arg(long)]
        push: bool,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Only quotes in this category ("all" clears the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Export all quotes as JSON
    Export {
        /// Output file ("-" for stdout, defaults to quotes.json in the data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// JSON file containing an array of quotes
        file: PathBuf,
    },
    /// Send an existing quote to the remote endpoint
    Push {
        /// Text of the quote (case-insensitive)
        text: String,
    },
    /// Sync once with the remote source
    Sync,
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between syncs (defaults to sync_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Review conflicts from the last sync
    Conflicts {
        #[command(subcommand)]
        command: Option<ConflictCommands>,
    },
    /// Show store and sync status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConflictCommands {
    /// List pending conflicts
    #[command(alias = "ls")]
    List,
    /// Restore the local category for a conflict
    KeepLocal {
        /// Conflict number as shown by `conflicts list`
        number: usize,
    },
    /// Keep the server category for a conflict
    AcceptServer {
        /// Conflict number as shown by `conflicts list`
        number: usize,
    },
    /// Keep the server category for every conflict
    AcceptAll,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, sync_enabled, sync_interval_secs, request_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

impl Commands {
    /// Commands that only read the store and benefit from a sync first
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Commands::Random { .. }
                | Commands::List { .. }
                | Commands::Categories
                | Commands::Export { .. }
        )
    }
}
