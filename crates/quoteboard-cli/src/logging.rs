//! Logging setup
//!
//! Logs go to stderr, or to `log_file` when configured. `RUST_LOG` overrides
//! the level chosen from `-v` flags.

use std::fs::OpenOptions;

use quoteboard_core::Config;
use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a level name
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn default_filter(verbosity: u8) -> String {
    let level = level_for(verbosity);
    format!("quoteboard_core={},quoteboard_cli={}", level, level)
}

/// Initialize the global subscriber (ignored if already initialized)
pub fn init(config: &Config, verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    if let Some(ref path) = config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file)
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
