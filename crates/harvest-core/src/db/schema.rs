//! Baseline SQLite schema for harvest
//!
//! This is the version 0 shape. Anything added later lives in
//! [`super::migrations`] so that old files and new files end up identical.

use rusqlite::{Connection, Result};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS artists (
    artist_id TEXT NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    download_completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT DEFAULT NULL
);

CREATE TABLE IF NOT EXISTS albums (
    album_id TEXT NOT NULL PRIMARY KEY,
    artist_id TEXT NOT NULL,
    name TEXT NOT NULL,
    download_completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT DEFAULT NULL,
    FOREIGN KEY (artist_id) REFERENCES artists (artist_id)
        ON UPDATE CASCADE
        ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS songs (
    song_id TEXT NOT NULL PRIMARY KEY,
    album_id TEXT NOT NULL,
    artist_id TEXT NOT NULL,
    name TEXT NOT NULL,
    track_number INTEGER NOT NULL,
    disc_number INTEGER NOT NULL,
    quality_kbps INTEGER NOT NULL,
    full_filepath TEXT DEFAULT NULL,
    download_completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT DEFAULT NULL,
    FOREIGN KEY (artist_id) REFERENCES artists (artist_id)
        ON UPDATE CASCADE
        ON DELETE CASCADE,
    FOREIGN KEY (album_id) REFERENCES albums (album_id)
        ON UPDATE CASCADE
        ON DELETE CASCADE
);

-- Single row: id is pinned to 0
CREATE TABLE IF NOT EXISTS fetched_artists (
    id INTEGER PRIMARY KEY CHECK (id = 0),
    have_fetched_all_artists INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS fetched_albums (
    artist_id TEXT NOT NULL PRIMARY KEY,
    have_fetched_all_albums INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (artist_id) REFERENCES artists (artist_id)
        ON UPDATE CASCADE
        ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS fetched_songs (
    album_id TEXT NOT NULL PRIMARY KEY,
    have_fetched_all_songs INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (album_id) REFERENCES albums (album_id)
        ON UPDATE CASCADE
        ON DELETE CASCADE
);
"#;

/// Create any missing baseline tables. Never drops or alters existing ones.
pub fn create_base_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Whether `table` currently has `column`
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
