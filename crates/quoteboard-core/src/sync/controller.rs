//! Sync controller
//!
//! Runs sync passes: fetch remote quotes, snapshot conflicts, merge with the
//! server-wins policy, persist, and record the conflicts for review.
//!
//! Only one pass runs at a time. A pass requested while another is in flight
//! returns `SyncOutcome::AlreadyRunning` immediately instead of interleaving
//! with it. A started pass always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::state::SyncState;
use crate::conflict::detect_conflicts;
use crate::error::QuoteError;
use crate::merge::merge_with_report;
use crate::models::Conflict;
use crate::remote::RemoteSource;
use crate::storage::StorageError;
use crate::store::QuoteStore;

/// Controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No pass running
    Idle,
    /// A pass is in flight
    Syncing,
}

/// Result of a sync request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote returned nothing (or could not be reached); store untouched
    NoUpdates,
    /// Remote quotes were merged into the store
    Updated {
        /// Remote quotes that were new locally
        added: usize,
        /// Local quotes whose category the server overwrote
        updated: usize,
        /// Conflicts now pending review
        conflicts: usize,
    },
    /// Another pass was in flight; nothing was done
    AlreadyRunning,
}

/// Events emitted by the controller
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Status changed
    StatusChanged(SyncStatus),
    /// A pass finished
    Completed(SyncOutcome),
    /// A pass failed while persisting
    Error(String),
}

/// Errors from sync and conflict resolution
#[derive(Error, Debug)]
pub enum SyncError {
    /// Conflict index out of range
    #[error("No conflict #{index} ({pending} pending)")]
    NoSuchConflict { index: usize, pending: usize },

    /// Saving the merged quotes failed
    #[error(transparent)]
    Store(#[from] QuoteError),

    /// Saving the sync state failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Store and sync state, guarded together
pub struct SyncContext {
    pub store: QuoteStore,
    pub state: SyncState,
}

impl SyncContext {
    /// Persist `state`, then adopt it; a failed write keeps the old state
    fn commit_state(&mut self, state: SyncState) -> Result<(), StorageError> {
        state.save(self.store.kv_mut())?;
        self.state = state;
        Ok(())
    }

    fn conflict(&self, index: usize) -> Result<Conflict, SyncError> {
        let pending = self.state.pending_conflicts.len();
        self.state
            .pending_conflicts
            .get(index)
            .cloned()
            .ok_or(SyncError::NoSuchConflict { index, pending })
    }

    /// State with the conflict at `index` resolved
    fn without_conflict(&self, index: usize) -> SyncState {
        let mut state = self.state.clone();
        state.pending_conflicts.remove(index);
        state
    }
}

/// Clears the in-flight flag when a pass ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates sync passes and conflict resolution
pub struct SyncController<R> {
    remote: R,
    context: Mutex<SyncContext>,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
    status_rx: watch::Receiver<SyncStatus>,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
    event_rx: StdMutex<Option<mpsc::UnboundedReceiver<SyncEvent>>>,
}

impl<R: RemoteSource> SyncController<R> {
    /// Create a controller, restoring sync state from the store's key-value store
    pub fn new(store: QuoteStore, remote: R) -> Self {
        let state = SyncState::load(store.kv());
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            remote,
            context: Mutex::new(SyncContext { store, state }),
            in_flight: AtomicBool::new(false),
            status: status_tx,
            status_rx,
            event_tx,
            event_rx: StdMutex::new(Some(event_rx)),
        }
    }

    /// Get the current status
    pub fn status(&self) -> SyncStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<SyncEvent>> {
        self.event_rx.lock().ok().and_then(|mut rx| rx.take())
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Lock the store and sync state
    pub async fn context(&self) -> MutexGuard<'_, SyncContext> {
        self.context.lock().await
    }

    /// Consume the controller and return the store
    pub fn into_store(self) -> QuoteStore {
        self.context.into_inner().store
    }

    pub async fn pending_conflicts(&self) -> Vec<Conflict> {
        self.context.lock().await.state.pending_conflicts.clone()
    }

    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.context.lock().await.state.last_sync
    }

    /// Run one sync pass unless one is already running
    pub async fn sync_now(&self) -> Result<SyncOutcome, SyncError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in flight, skipping");
            return Ok(SyncOutcome::AlreadyRunning);
        }
        let _in_flight = InFlight(&self.in_flight);

        self.set_status(SyncStatus::Syncing);
        let result = self.run_pass().await;
        self.set_status(SyncStatus::Idle);

        match &result {
            Ok(outcome) => self.emit(SyncEvent::Completed(outcome.clone())),
            Err(e) => {
                warn!("Sync failed: {}", e);
                self.emit(SyncEvent::Error(e.to_string()));
            }
        }

        result
    }

    async fn run_pass(&self) -> Result<SyncOutcome, SyncError> {
        let remote = self.remote.fetch_quotes().await;
        if remote.is_empty() {
            info!("Sync complete, no updates from remote");
            return Ok(SyncOutcome::NoUpdates);
        }

        let mut ctx = self.context.lock().await;

        // Conflicts must be taken before the merge overwrites local categories
        let conflicts = detect_conflicts(ctx.store.quotes(), &remote);
        let report = merge_with_report(ctx.store.quotes(), &remote);

        ctx.store.replace_all(report.quotes)?;

        if ctx.state.has_conflicts() {
            debug!(
                "Dropping {} unresolved conflict(s) from the previous sync",
                ctx.state.pending_conflicts.len()
            );
        }
        let conflict_count = conflicts.len();
        ctx.commit_state(SyncState {
            last_sync: Some(Utc::now()),
            pending_conflicts: conflicts,
        })?;

        info!(
            "Sync complete: added={}, updated={}, conflicts={}",
            report.added, report.updated, conflict_count
        );

        Ok(SyncOutcome::Updated {
            added: report.added,
            updated: report.updated,
            conflicts: conflict_count,
        })
    }

    /// Resolve a conflict in favour of the local category
    ///
    /// The merge already wrote the server category, so the local one is
    /// written back to the store. The conflict stays pending if anything
    /// fails to save.
    pub async fn keep_local(&self, index: usize) -> Result<Conflict, SyncError> {
        let mut ctx = self.context.lock().await;
        let conflict = ctx.conflict(index)?;

        ctx.store
            .set_category(&conflict.local.text, &conflict.local.category)?;
        let state = ctx.without_conflict(index);
        ctx.commit_state(state)?;

        info!("Kept local category '{}'", conflict.local.category);
        Ok(conflict)
    }

    /// Resolve a conflict in favour of the server category
    pub async fn accept_server(&self, index: usize) -> Result<Conflict, SyncError> {
        let mut ctx = self.context.lock().await;
        let conflict = ctx.conflict(index)?;

        ctx.store
            .set_category(&conflict.server.text, &conflict.server.category)?;
        let state = ctx.without_conflict(index);
        ctx.commit_state(state)?;

        info!("Accepted server category '{}'", conflict.server.category);
        Ok(conflict)
    }

    /// Accept the server category for every pending conflict
    pub async fn accept_all_server(&self) -> Result<usize, SyncError> {
        let mut ctx = self.context.lock().await;
        let count = ctx.state.pending_conflicts.len();

        for conflict in ctx.state.pending_conflicts.clone() {
            ctx.store
                .set_category(&conflict.server.text, &conflict.server.category)?;
        }
        let state = SyncState {
            pending_conflicts: Vec::new(),
            ..ctx.state.clone()
        };
        ctx.commit_state(state)?;

        info!("Accepted server category for {} conflict(s)", count);
        Ok(count)
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.status.send(status);
        self.emit(SyncEvent::StatusChanged(status));
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.event_tx.send(event);
    }
}
