//! Key-value store contract with SQLite and in-memory backends.
//!
//! # Invariants
//! - `set` is an upsert: the latest value for a key wins.
//! - `get` returns `None` for keys that were never written.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends and collection encoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the write for a non-database reason.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode collection `{key}`: {source}")
            }
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque text key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw text for `key`, bypassing collection encoding.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
