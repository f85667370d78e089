//! Quoteboard Core Library
//!
//! This crate provides the core functionality for Quoteboard, a small
//! quote collection that can be browsed by category and kept in sync with
//! a remote source.
//!
//! # Architecture
//!
//! - **Data layer**: `QuoteStore`, the category index, conflict detection and
//!   the server-wins merge. These are plain functions over `Quote` slices.
//! - **Persistence**: a key-value capability (`KeyValueStore`) backed by SQLite
//!   on disk or a `HashMap` in memory.
//! - **Sync**: `SyncController` orchestrates fetch, detect and merge, and
//!   tracks conflicts awaiting review.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let kv = SqliteKv::open(&config.database_path())?;
//! let mut store = QuoteStore::open(Box::new(kv));
//!
//! store.add_quote("Stay hungry, stay foolish.", "Motivation")?;
//! let categories = store.categories();
//! ```
//!
//! # Modules
//!
//! - `models`: Quote and Conflict records
//! - `store`: Quote Store (add, import, export, filtering)
//! - `categories`: Category index and filters
//! - `conflict`: Conflict detector
//! - `merge`: Server-wins merge engine
//! - `remote`: Remote quote source adapter
//! - `sync`: Sync controller and periodic poller
//! - `storage`: Key-value persistence
//! - `config`: Application configuration

pub mod categories;
pub mod config;
pub mod conflict;
pub mod error;
pub mod merge;
pub mod models;
pub mod remote;
pub mod storage;
pub mod store;
pub mod sync;

pub use categories::{filter_quotes, populate_categories, CategoryFilter};
pub use config::Config;
pub use conflict::detect_conflicts;
pub use error::{QuoteError, QuoteResult};
pub use merge::{merge, merge_with_report, MergeReport};
pub use models::{default_quotes, Conflict, Quote};
pub use remote::{HttpRemoteSource, RemoteSource};
pub use storage::{KeyValueStore, MemoryKv, SqliteKv, StorageError, StorageResult};
pub use store::QuoteStore;
pub use sync::{SyncController, SyncError, SyncOutcome, SyncState, SyncStatus};
