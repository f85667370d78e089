//! Sync state persistence
//!
//! Stores the time of the last successful sync and the conflicts waiting for
//! review, so a later session can resolve what an earlier one detected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Conflict;
use crate::storage::{KeyValueStore, StorageResult, SYNC_STATE_KEY};

/// Persistent sync state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// When the last sync pass that received remote quotes finished
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Conflicts detected by the last sync, in remote order
    #[serde(default)]
    pub pending_conflicts: Vec<Conflict>,
}

impl SyncState {
    /// Create a new sync state (nothing synced yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state from the key-value store, empty if absent or unreadable
    pub fn load(kv: &dyn KeyValueStore) -> Self {
        match kv.get(SYNC_STATE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Stored sync state is unreadable, starting fresh: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Failed to read sync state: {}", e);
                Self::default()
            }
        }
    }

    /// Save state to the key-value store
    pub fn save(&self, kv: &mut dyn KeyValueStore) -> StorageResult<()> {
        let json = serde_json::to_string(self)?;
        kv.set(SYNC_STATE_KEY, &json)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.pending_conflicts.is_empty()
    }
}
