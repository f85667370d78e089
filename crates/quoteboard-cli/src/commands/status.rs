//! Status command handler

use anyhow::Result;

use quoteboard_core::{Config, HttpRemoteSource, SyncController};

use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show(
    controller: &SyncController<HttpRemoteSource>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let ctx = controller.context().await;
    let quotes = ctx.store.len();
    let categories = ctx.store.categories().len();
    let filter = ctx.store.last_filter();
    let last_sync = ctx.state.last_sync;
    let pending = ctx.state.pending_conflicts.len();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "remote_url": config.remote_url,
                    "sync_enabled": config.sync_enabled,
                    "sync_interval_secs": config.sync_interval_secs,
                    "last_sync": last_sync,
                    "pending_conflicts": pending,
                    "counts": {
                        "quotes": quotes,
                        "categories": categories
                    },
                    "filter": filter.to_string(),
                    "database": config.database_path()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", quotes);
        }
        OutputFormat::Human => {
            println!("Quoteboard Status");
            println!("=================");
            println!();
            println!("Sync:");
            println!("  Server:    {}", config.remote_url);
            println!(
                "  Auto-sync: {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Interval:  {}s", config.sync_interval_secs);
            println!(
                "  Last sync: {}",
                last_sync
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            println!("  Conflicts: {}", pending);
            println!();
            println!("Storage:");
            println!("  Database: {}", config.database_path().display());
            println!();
            println!("Contents:");
            println!("  Quotes:     {}", quotes);
            println!("  Categories: {}", categories);
            println!("  Filter:     {}", filter);
        }
    }

    Ok(())
}
