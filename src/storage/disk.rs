//! Durable Store Module
//!
//! SQLite-backed durable tier. Carries the same operation set as the memory
//! tier minus TTL and eviction: entries live until deleted.
//!
//! Callers are serialized by a mutex over the single connection; the router
//! runs these blocking calls on the blocking thread pool.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{KeyValue, StorageRow};

// == Durable Store ==
/// Persistent keyed storage with a group column.
#[derive(Debug)]
pub struct DiskStore {
    conn: Mutex<Connection>,
}

impl DiskStore {
    // == Constructor ==
    /// Opens the database at `path`, creating the file and the schema when
    /// absent. An open failure here is fatal to startup.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS store (
                key TEXT PRIMARY KEY,
                value TEXT,
                group_name TEXT
            )",
            [],
        )?;
        info!(path = %path.display(), "database opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS store (
                key TEXT PRIMARY KEY,
                value TEXT,
                group_name TEXT
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // == Set ==
    /// Idempotent upsert inside an explicit transaction: committed on
    /// success, rolled back when the engine errors.
    pub fn set(&self, key: &str, value: &str, group: &str) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO store (key, value, group_name) VALUES (?1, ?2, ?3)",
            params![key, value, group],
        )?;
        tx.commit()?;

        debug!(key = %key, "durable set committed");
        Ok(true)
    }

    // == Get ==
    /// Returns the value stored under `key`, or the empty string when absent.
    pub fn get(&self, key: &str) -> Result<String> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM store WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    // == Get Group ==
    /// Returns every (key, value) pair whose group column equals `group`.
    pub fn get_group(&self, group: &str) -> Result<Vec<KeyValue>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT key, value FROM store WHERE group_name = ?1")?;
        let rows = stmt.query_map(params![group], |row| {
            Ok(KeyValue {
                key: row.get(0)?,
                value: row.get(1)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    // == Delete ==
    /// Removes the row under `key`. Returns the number of rows removed
    /// (0 or 1).
    pub fn delete(&self, key: &str) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM store WHERE key = ?1", params![key])?;
        debug!(key = %key, changed, "durable delete");
        Ok(changed as u64)
    }

    // == Delete Group ==
    /// Removes every row whose group column equals `group`. Returns the
    /// number of rows removed.
    pub fn delete_group(&self, group: &str) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM store WHERE group_name = ?1", params![group])?;
        debug!(group = %group, changed, "durable group delete");
        Ok(changed as u64)
    }

    // == List ==
    /// Returns every row in the table.
    pub fn list(&self) -> Result<Vec<StorageRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT key, value, group_name FROM store")?;
        let rows = stmt.query_map([], |row| {
            Ok(StorageRow {
                key: row.get(0)?,
                value: row.get(1)?,
                group: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}
