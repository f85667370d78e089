//! SQLite schema for the key-value store
//!
//! The schema version lives in SQLite's `user_version` pragma. A fresh
//! database reports 0.

use rusqlite::{Connection, Result};
use tracing::info;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Version the database was last migrated to
pub fn schema_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Bring the schema up to `SCHEMA_VERSION`
///
/// Does nothing on an up-to-date database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    info!("Migrating key-value schema from v{} to v{}", version, SCHEMA_VERSION);
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        -- Plain string values keyed by name ("quotes", "lastCategory", ...)
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_is_migrated() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        init_schema(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
        let kv_exists: bool = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv'")
            .unwrap()
            .exists([])
            .unwrap();
        assert!(kv_exists);
    }

    #[test]
    fn test_init_keeps_existing_values() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES ('quotes', '[]', 0)",
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let value: String = conn
            .query_row("SELECT value FROM kv WHERE key = 'quotes'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(value, "[]");
    }
}
