//! Remote sync
//!
//! Keeps the local quote store up to date with a remote source.
//!
//! ## Pass
//!
//! 1. Fetch remote quotes (empty on failure, reported as "no updates")
//! 2. Detect conflicts against the current store
//! 3. Merge with the server-wins policy and persist
//! 4. Replace the pending conflicts and stamp the sync time
//!
//! ## Usage
//!
//! ```ignore
//! let controller = Arc::new(SyncController::new(store, HttpRemoteSource::from_config(&config)?));
//! controller.sync_now().await?;
//!
//! let handle = spawn_sync_poller(controller.clone(), config.sync_interval());
//! ```

mod controller;
mod poller;
mod state;

pub use controller::{SyncContext, SyncController, SyncError, SyncEvent, SyncOutcome, SyncStatus};
pub use poller::{spawn_sync_poller, SyncCommand, SyncHandle};
pub use state::SyncState;
