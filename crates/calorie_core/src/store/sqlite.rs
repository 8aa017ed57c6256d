//! SQLite-backed key-value backend.
//!
//! # Responsibility
//! - Persist tracker keys durably in the `kv_store` table.
//! - Create the table on first open and refuse files written by a newer
//!   schema.
//!
//! # Invariants
//! - One row per key; `set_item` is an upsert on the primary key.
//! - Each single-key write is atomic at the SQLite statement level.
//! - `PRAGMA user_version` equals `SCHEMA_VERSION` once a file is opened.

use super::{KeyValueBackend, StoreError, StoreResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const KV_TABLE: &str = "kv_store";

/// Layout version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const CREATE_KV_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Durable backend over an owned SQLite connection.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (or creates) a tracker database file.
    ///
    /// # Side effects
    /// - Creates `kv_store` when missing.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory tracker database.
    pub fn open_in_memory() -> StoreResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Wraps a connection that already carries the tracker layout.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not
    ///   `SCHEMA_VERSION`.
    /// - `MissingRequiredTable` when `kv_store` is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let actual_version = user_version(&conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(StoreError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(StoreError::MissingRequiredTable(KV_TABLE));
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<SqliteBackend> {
    let started_at = Instant::now();
    info!("event=db_open module=store status=start mode={mode}");

    let result = connect()
        .map_err(StoreError::from)
        .and_then(|conn| {
            prepare_layout(&conn)?;
            SqliteBackend::try_new(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=store status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=store status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn prepare_layout(conn: &Connection) -> StoreResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let version = user_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(CREATE_KV_TABLE_SQL)?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

fn user_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
