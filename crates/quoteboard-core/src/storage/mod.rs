//! Storage layer
//!
//! Persists quotes and UI preferences as plain string values.
//!
//! ## Keys
//!
//! - `quotes`: JSON array of `{text, category}`
//! - `lastCategory`, `lastFilter`: plain strings
//! - `syncState`: JSON-encoded `SyncState`
//! - `lastQuote`: session-only, kept in a `MemoryKv`

pub mod error;
pub mod kv;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use schema::{init_schema, schema_version, SCHEMA_VERSION};

/// Storage key for the quote list
pub const QUOTES_KEY: &str = "quotes";
/// Storage key for the last selected category
pub const LAST_CATEGORY_KEY: &str = "lastCategory";
/// Storage key for the last applied filter
pub const LAST_FILTER_KEY: &str = "lastFilter";
/// Storage key for the last displayed quote (session store)
pub const LAST_QUOTE_KEY: &str = "lastQuote";
/// Storage key for persisted sync state
pub const SYNC_STATE_KEY: &str = "syncState";
