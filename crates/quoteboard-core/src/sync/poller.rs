//! Periodic sync
//!
//! A background task that requests a sync pass every interval (no jitter, no
//! backoff) and on demand. Each pass is spawned on its own task so a slow pass
//! does not delay the timer; overlapping requests are turned away by the
//! controller's in-flight guard. Shutting the poller down stops new passes
//! and waits for running ones to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::controller::SyncController;
use crate::remote::RemoteSource;

/// Commands sent to the poller task
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a pass now, independent of the timer
    SyncNow,
    /// Stop the poller
    Shutdown,
}

/// Handle for controlling the background poller
pub struct SyncHandle {
    pub command_tx: mpsc::Sender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Request an immediate pass
    pub async fn sync_now(&self) -> bool {
        self.command_tx.send(SyncCommand::SyncNow).await.is_ok()
    }

    /// Stop the poller and wait for it and any running pass to finish
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
        if let Err(e) = self.task.await {
            warn!("Sync poller ended abnormally: {}", e);
        }
    }
}

/// Spawn a background task that syncs every `interval`
///
/// The first timed pass happens one interval after spawning.
pub fn spawn_sync_poller<R>(controller: Arc<SyncController<R>>, interval: Duration) -> SyncHandle
where
    R: RemoteSource + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let task = tokio::spawn(sync_poller_task(controller, interval, command_rx));

    SyncHandle { command_tx, task }
}

async fn sync_poller_task<R>(
    controller: Arc<SyncController<R>>,
    interval: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
) where
    R: RemoteSource + 'static,
{
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut passes = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Periodic sync tick");
                spawn_pass(&mut passes, &controller);
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => spawn_pass(&mut passes, &controller),
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
            Some(joined) = passes.join_next(), if !passes.is_empty() => {
                log_join(joined);
            }
        }
    }

    if !passes.is_empty() {
        debug!("Waiting for {} running sync pass(es)", passes.len());
    }
    while let Some(joined) = passes.join_next().await {
        log_join(joined);
    }

    debug!("Sync poller stopped");
}

fn spawn_pass<R>(passes: &mut JoinSet<()>, controller: &Arc<SyncController<R>>)
where
    R: RemoteSource + 'static,
{
    let controller = Arc::clone(controller);
    passes.spawn(async move {
        // Outcomes and failures are also reported through controller events
        if let Err(e) = controller.sync_now().await {
            warn!("Periodic sync failed: {}", e);
        }
    });
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!("Sync pass ended abnormally: {}", e);
    }
}
