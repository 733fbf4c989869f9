/// Durable client-side key-value storage
///
/// The history collection is persisted as a single JSON value under a fixed
/// key. This module defines the storage contract plus the SQLite-backed
/// implementation used by the running application.

use std::path::PathBuf;

use rusqlite::Connection;
use thiserror::Error;

/// Failure of a durable read or write
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("storage read failed: {0}")]
    ReadFailed(String),
}

/// Contract for the durable store
///
/// Reads happen once at startup; writes replace the full value on every
/// mutation. A failed write must be reported, never silently dropped.
/// `Send` because the application state that owns the store is handed to
/// the UI runtime at startup.
pub trait DurableStore: Send {
    /// Fetch the value for a key, or None if absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for a key
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// SQLite-backed durable store
///
/// The database file lives in the user's data directory:
/// - Linux: ~/.local/share/restyle/restyle.db
/// - macOS: ~/Library/Application Support/restyle/restyle.db
/// - Windows: %APPDATA%\restyle\restyle.db
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the on-disk store
    pub fn open() -> Result<Self, StoreError> {
        let db_path = Self::db_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }

        let conn = Connection::open(&db_path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        println!("📁 Durable store initialized at: {}", db_path.display());

        let store = SqliteStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let store = SqliteStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the database file
    fn db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("restyle");
        path.push("restyle.db");
        path
    }

    /// Create the key-value table if it does not exist yet
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (
                    key     TEXT PRIMARY KEY,
                    value   TEXT NOT NULL
                )",
                [],
            )
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl DurableStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        use rusqlite::OptionalExtension;

        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

/// Fallback store used when the on-disk database cannot be opened
///
/// Reads find nothing and writes fail, which the history store reports as
/// persistence degradation while keeping its in-memory state authoritative.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl DurableStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(
            "durable storage could not be opened".to_string(),
        ))
    }
}

/// Test doubles shared with the history tests
#[cfg(test)]
pub mod fakes {
    use std::collections::HashMap;

    use super::{DurableStore, StoreError};

    /// Plain in-memory map, always succeeds
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        pub values: HashMap<String, String>,
    }

    impl MemoryStore {
        pub fn with(key: &str, value: &str) -> Self {
            let mut values = HashMap::new();
            values.insert(key.to_string(), value.to_string());
            MemoryStore { values }
        }
    }

    impl DurableStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Store whose writes always fail (simulates quota exhaustion)
    #[derive(Debug, Default)]
    pub struct FailingStore;

    impl DurableStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::WriteFailed("quota exceeded".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        // Full replacement on rewrite
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }
}
