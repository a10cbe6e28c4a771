//! Forward-only schema migrations
//!
//! The schema version lives in SQLite's `user_version` header field. Each
//! [`Migration`] establishes one version; the runner applies every step above
//! the stored version, each inside its own transaction together with the
//! version bump, so a failed step leaves the file at the previous version.
//! Steps are additive only: older binaries must still be able to read a
//! migrated file.

use rusqlite::{Connection, Result as SqlResult};

use super::schema::column_exists;
use crate::error::{HarvestError, Result};

/// One schema upgrade step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version this step establishes
    pub version: u32,
    pub name: &'static str,
    pub apply: fn(&Connection) -> SqlResult<()>,
}

/// Every migration shipped with this binary, in order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 0,
        name: "baseline",
        apply: baseline,
    },
    Migration {
        version: 1,
        name: "song lyrics flag",
        apply: add_lyrics_flag,
    },
    Migration {
        version: 2,
        name: "child lookup indices",
        apply: add_child_indices,
    },
    Migration {
        version: 3,
        name: "liked artists",
        apply: add_liked_artists,
    },
];

/// Version established by the last shipped migration
pub const LATEST_VERSION: u32 = 3;

fn baseline(_conn: &Connection) -> SqlResult<()> {
    Ok(())
}

fn add_lyrics_flag(conn: &Connection) -> SqlResult<()> {
    if column_exists(conn, "songs", "lyrics_downloaded")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE songs ADD COLUMN lyrics_downloaded INTEGER NOT NULL DEFAULT 0",
        [],
    )?;
    Ok(())
}

fn add_child_indices(conn: &Connection) -> SqlResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_albums_artist ON albums(artist_id);
         CREATE INDEX IF NOT EXISTS idx_songs_album ON songs(album_id);",
    )
}

fn add_liked_artists(conn: &Connection) -> SqlResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS liked_artists (
            artist_id TEXT NOT NULL PRIMARY KEY,
            FOREIGN KEY (artist_id) REFERENCES artists (artist_id)
                ON UPDATE CASCADE
                ON DELETE CASCADE
        );",
    )?;
    // Older files treated every known artist as liked once the liked list was fetched
    conn.execute(
        "INSERT OR IGNORE INTO liked_artists (artist_id)
         SELECT artist_id FROM artists
         WHERE EXISTS (
             SELECT 1 FROM fetched_artists WHERE id = 0 AND have_fetched_all_artists = 1
         )
         ORDER BY rowid",
        [],
    )?;
    Ok(())
}

/// Read the persisted schema version; a fresh file reads as 0
pub fn current_version(conn: &Connection) -> SqlResult<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |r| r.get(0))?;
    Ok(version.max(0) as u32)
}

fn failed(step: &Migration, error: impl std::fmt::Display) -> HarvestError {
    HarvestError::MigrationFailed {
        version: step.version,
        name: step.name.to_string(),
        reason: error.to_string(),
    }
}

/// Apply every step above the stored version, returning the resulting version
pub fn run_migrations(conn: &mut Connection, steps: &[Migration]) -> Result<u32> {
    for pair in steps.windows(2) {
        if pair[1].version <= pair[0].version {
            return Err(failed(
                &pair[1],
                format!("listed after version {}", pair[0].version),
            ));
        }
    }

    let mut current = current_version(conn).map_err(|e| HarvestError::MigrationFailed {
        version: 0,
        name: "read schema version".to_string(),
        reason: e.to_string(),
    })?;

    let latest = steps.last().map(|s| s.version).unwrap_or(0);
    if current > latest {
        tracing::warn!(
            stored = current,
            latest,
            "Store was written by a newer version; continuing with additive schema"
        );
        return Ok(current);
    }

    for step in steps {
        if current >= step.version {
            tracing::trace!(version = step.version, name = step.name, "Migration already applied");
            continue;
        }

        let tx = conn.transaction().map_err(|e| failed(step, e))?;
        (step.apply)(&tx).map_err(|e| failed(step, e))?;
        tx.pragma_update(None, "user_version", step.version)
            .map_err(|e| failed(step, e))?;
        tx.commit().map_err(|e| failed(step, e))?;

        tracing::info!(
            "Store schema updated from version {} to {} ({})",
            current,
            step.version,
            step.name
        );
        current = step.version;
    }

    Ok(current)
}
