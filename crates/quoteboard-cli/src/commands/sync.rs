//! Sync command handlers

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use quoteboard_core::sync::{spawn_sync_poller, SyncEvent};
use quoteboard_core::{Config, HttpRemoteSource, SyncController, SyncOutcome};

use crate::output::Output;

/// Sync once with the remote source
pub async fn sync(controller: &SyncController<HttpRemoteSource>, output: &Output) -> Result<()> {
    output.message(&format!(
        "Syncing with {}...",
        controller.remote().url()
    ));

    let outcome = controller.sync_now().await?;
    report(&outcome, output);

    if let SyncOutcome::Updated { conflicts, .. } = outcome {
        if conflicts > 0 {
            output.message("Review them with `quoteboard conflicts`.");
        }
    }

    Ok(())
}

/// Sync periodically until Ctrl-C
pub async fn watch(
    controller: SyncController<HttpRemoteSource>,
    config: &Config,
    interval: Option<u64>,
    output: &Output,
) -> Result<()> {
    let interval = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.sync_interval());

    let mut events = controller.take_events();
    let controller = Arc::new(controller);
    let handle = spawn_sync_poller(Arc::clone(&controller), interval);

    output.message(&format!(
        "Watching {} every {}s (Ctrl-C to stop)",
        controller.remote().url(),
        interval.as_secs()
    ));
    handle.sync_now().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = recv(&mut events) => {
                match event {
                    Some(SyncEvent::Completed(outcome)) => report(&outcome, output),
                    Some(SyncEvent::Error(e)) => output.message(&format!("Sync failed: {}", e)),
                    Some(SyncEvent::StatusChanged(_)) => {}
                    None => break,
                }
            }
        }
    }

    handle.shutdown().await;
    output.message("Stopped.");
    Ok(())
}

async fn recv(
    events: &mut Option<tokio::sync::mpsc::UnboundedReceiver<SyncEvent>>,
) -> Option<SyncEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Status line for a finished sync
fn describe(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::NoUpdates => "No updates from server.".to_string(),
        SyncOutcome::AlreadyRunning => "A sync is already in progress.".to_string(),
        SyncOutcome::Updated {
            added,
            updated,
            conflicts,
        } => format!(
            "Quotes synced with server: {} added, {} updated, {} conflict(s).",
            added, updated, conflicts
        ),
    }
}

fn report(outcome: &SyncOutcome, output: &Output) {
    match outcome {
        SyncOutcome::Updated { .. } => output.success(&describe(outcome)),
        _ => output.message(&describe(outcome)),
    }
}
