use std::path::{Path, PathBuf};

use rusqlite::{params, OptionalExtension, Row};

use super::{now_timestamp, Store};
use crate::error::{HarvestError, Result};
use crate::map_db_err;
use crate::model::{SongRecord, SongStub};

const SONG_COLUMNS: &str = "song_id, album_id, artist_id, name, track_number, disc_number, \
     quality_kbps, full_filepath, download_completed, completed_at, lyrics_downloaded";

fn song_from_row(r: &Row<'_>) -> rusqlite::Result<SongRecord> {
    Ok(SongRecord {
        id: r.get(0)?,
        album_id: r.get(1)?,
        artist_id: r.get(2)?,
        name: r.get(3)?,
        track_number: r.get(4)?,
        disc_number: r.get(5)?,
        quality_kbps: r.get(6)?,
        full_filepath: r.get::<_, Option<String>>(7)?.map(PathBuf::from),
        download_completed: r.get::<_, i64>(8)? != 0,
        completed_at: r.get(9)?,
        lyrics_downloaded: r.get::<_, i64>(10)? != 0,
    })
}

impl Store {
    /// Insert song stubs. Songs already present keep their original columns.
    ///
    /// Returns the number of songs that were new.
    pub fn upsert_songs(&self, songs: &[SongStub]) -> Result<usize> {
        self.begin_pending()?;
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO songs
                    (song_id, album_id, artist_id, name, track_number, disc_number, quality_kbps)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (song_id) DO NOTHING",
            )
            .map_err(map_db_err!("prepare song insert"))?;
        let mut inserted = 0;
        for song in songs {
            inserted += stmt
                .execute(params![
                    song.id,
                    song.album_id,
                    song.artist_id,
                    song.name,
                    song.track_number,
                    song.disc_number,
                    song.quality_kbps,
                ])
                .map_err(map_db_err!("insert song"))?;
        }
        Ok(inserted)
    }

    pub fn is_song_done(&self, song_id: &str) -> Result<bool> {
        self.flag(
            "SELECT download_completed FROM songs WHERE song_id = ?1",
            song_id,
            "read song completion",
        )
    }

    /// Record a transferred song and where it landed.
    ///
    /// `file_path` must be absolute. Re-marking a done song changes nothing.
    pub fn mark_song_done(&self, song_id: &str, file_path: &Path) -> Result<bool> {
        if !file_path.is_absolute() {
            return Err(HarvestError::invalid_value(
                "song file path (must be absolute)",
                file_path.display(),
            ));
        }
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE songs SET full_filepath = ?2, download_completed = 1, completed_at = ?3
                 WHERE song_id = ?1 AND download_completed = 0",
                params![song_id, file_path.to_string_lossy(), now_timestamp()],
            )
            .map_err(map_db_err!("mark song done"))?;
        Ok(updated > 0)
    }

    /// Resolve a song the catalog cannot serve. It counts as done but has no file.
    pub fn mark_song_unavailable(&self, song_id: &str) -> Result<bool> {
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE songs SET full_filepath = NULL, download_completed = 1, completed_at = ?2
                 WHERE song_id = ?1 AND download_completed = 0",
                params![song_id, now_timestamp()],
            )
            .map_err(map_db_err!("mark song unavailable"))?;
        Ok(updated > 0)
    }

    pub fn lyrics_downloaded(&self, song_id: &str) -> Result<bool> {
        self.flag(
            "SELECT lyrics_downloaded FROM songs WHERE song_id = ?1",
            song_id,
            "read lyrics flag",
        )
    }

    pub fn mark_lyrics_downloaded(&self, song_id: &str) -> Result<bool> {
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE songs SET lyrics_downloaded = 1 WHERE song_id = ?1 AND lyrics_downloaded = 0",
                [song_id],
            )
            .map_err(map_db_err!("mark lyrics downloaded"))?;
        Ok(updated > 0)
    }

    pub fn song(&self, song_id: &str) -> Result<Option<SongRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM songs WHERE song_id = ?1", SONG_COLUMNS),
                [song_id],
                song_from_row,
            )
            .optional()
            .map_err(map_db_err!("read song"))
    }

    /// Songs of an album in the order they were first enumerated
    pub fn songs_for_album(&self, album_id: &str) -> Result<Vec<SongRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!(
                "SELECT {} FROM songs WHERE album_id = ?1 ORDER BY rowid",
                SONG_COLUMNS
            ))
            .map_err(map_db_err!("prepare song query"))?;
        let songs = stmt
            .query_map([album_id], song_from_row)
            .map_err(map_db_err!("query songs"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_db_err!("read songs"))?;
        Ok(songs)
    }
}
