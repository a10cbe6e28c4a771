//! Persistent fetch state backed by SQLite
//!
//! [`Store`] owns the single connection to `<data_dir>/harvest.db`. Writes are
//! collected in an open transaction until [`Store::commit`]; dropping a store
//! without committing discards them, exactly like a killed process would.

mod artists;
mod albums;
mod markers;
pub mod migrations;
mod schema;
mod songs;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::{Connection, OptionalExtension};

use crate::error::{HarvestError, Result};
use crate::map_db_err;

pub use migrations::{Migration, LATEST_VERSION, MIGRATIONS};
pub use summary::{LevelCount, StoreSummary};

/// Database file name inside the data directory
pub const DB_FILE: &str = "harvest.db";

/// How long to wait on a lock held by an external reader
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable fetch-state store
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open or create the store in `dir`, bringing its schema up to date.
    ///
    /// Fails with `StoreUnavailable` when the directory or file cannot be
    /// created or read, and with `MigrationFailed` when a schema step fails.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_with(dir, MIGRATIONS)
    }

    /// Open using an explicit migration list
    pub fn open_with(dir: &Path, steps: &[Migration]) -> Result<Self> {
        let start = Instant::now();

        fs::create_dir_all(dir).map_err(|e| HarvestError::store_unavailable(dir, e))?;
        let path = dir.join(DB_FILE);

        let mut conn =
            Connection::open(&path).map_err(|e| HarvestError::store_unavailable(&path, e))?;

        Self::configure(&conn).map_err(|e| HarvestError::store_unavailable(&path, e))?;
        schema::create_base_schema(&conn).map_err(|e| HarvestError::store_unavailable(&path, e))?;

        let version = migrations::run_migrations(&mut conn, steps)?;

        tracing::debug!(
            path = %path.display(),
            schema_version = version,
            elapsed = ?start.elapsed(),
            "Store opened"
        );

        Ok(Store { conn, path })
    }

    fn configure(conn: &Connection) -> rusqlite::Result<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // Readers (e.g. `harvest status` from another shell) must not block the writer
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        let enabled: bool = conn.pragma_query_value(None, "foreign_keys", |r| r.get(0))?;
        if !enabled {
            return Err(rusqlite::Error::InvalidQuery);
        }
        Ok(())
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably persist every write since the last commit
    pub fn commit(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn
            .execute_batch("COMMIT")
            .map_err(map_db_err!("commit pending writes"))?;
        tracing::trace!("Committed pending writes");
        Ok(())
    }

    /// Commit pending writes and release the connection
    pub fn close(self) -> Result<()> {
        self.commit()?;
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, e)| HarvestError::db_operation("close store", e))?;
        tracing::debug!(path = %path.display(), "Store closed");
        Ok(())
    }

    /// Whether writes are waiting for a commit
    pub fn has_pending_writes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Total rows changed through this handle since it was opened
    pub fn total_changes(&self) -> Result<u64> {
        let changes: i64 = self
            .conn
            .query_row("SELECT total_changes()", [], |r| r.get(0))
            .map_err(map_db_err!("count changes"))?;
        Ok(changes.max(0) as u64)
    }

    /// Persisted schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn).map_err(map_db_err!("read schema version"))
    }

    /// Open a write transaction unless one is already pending
    fn begin_pending(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN")
                .map_err(map_db_err!("begin transaction"))?;
        }
        Ok(())
    }

    /// Read a 0/1 flag by key; an absent row reads as false
    fn flag(&self, sql: &str, key: &str, operation: &str) -> Result<bool> {
        let value: Option<i64> = self
            .conn
            .query_row(sql, [key], |r| r.get(0))
            .optional()
            .map_err(map_db_err!(operation))?;
        Ok(value.unwrap_or(0) != 0)
    }
}

/// Completion timestamp for `completed_at` columns
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

#[cfg(test)]
mod tests;
