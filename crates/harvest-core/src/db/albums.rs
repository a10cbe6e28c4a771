use rusqlite::{params, OptionalExtension};

use super::{now_timestamp, Store};
use crate::error::Result;
use crate::map_db_err;
use crate::model::{AlbumRecord, AlbumStub};

impl Store {
    /// Insert album stubs under an artist. Existing albums keep their first name.
    ///
    /// Returns the number of albums that were new.
    pub fn upsert_albums(&self, artist_id: &str, albums: &[AlbumStub]) -> Result<usize> {
        self.begin_pending()?;
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO albums (album_id, artist_id, name) VALUES (?1, ?2, ?3)
                 ON CONFLICT (album_id) DO NOTHING",
            )
            .map_err(map_db_err!("prepare album insert"))?;
        let mut inserted = 0;
        for album in albums {
            inserted += stmt
                .execute(params![album.id, artist_id, album.name])
                .map_err(map_db_err!("insert album"))?;
        }
        Ok(inserted)
    }

    pub fn is_album_done(&self, album_id: &str) -> Result<bool> {
        self.flag(
            "SELECT download_completed FROM albums WHERE album_id = ?1",
            album_id,
            "read album completion",
        )
    }

    /// Flag the album as completed. Re-marking keeps the first completion time.
    pub fn mark_album_done(&self, album_id: &str) -> Result<bool> {
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE albums SET download_completed = 1, completed_at = ?2
                 WHERE album_id = ?1 AND download_completed = 0",
                params![album_id, now_timestamp()],
            )
            .map_err(map_db_err!("mark album done"))?;
        Ok(updated > 0)
    }

    pub fn album(&self, album_id: &str) -> Result<Option<AlbumRecord>> {
        self.conn
            .query_row(
                "SELECT album_id, artist_id, name, download_completed, completed_at
                 FROM albums WHERE album_id = ?1",
                [album_id],
                |r| {
                    Ok(AlbumRecord {
                        id: r.get(0)?,
                        artist_id: r.get(1)?,
                        name: r.get(2)?,
                        download_completed: r.get::<_, i64>(3)? != 0,
                        completed_at: r.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(map_db_err!("read album"))
    }

    /// Album ids of an artist in the order they were first enumerated
    pub fn album_ids_for_artist(&self, artist_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT album_id FROM albums WHERE artist_id = ?1 ORDER BY rowid")
            .map_err(map_db_err!("prepare album query"))?;
        let ids = stmt
            .query_map([artist_id], |r| r.get(0))
            .map_err(map_db_err!("query albums"))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(map_db_err!("read albums"))?;
        Ok(ids)
    }
}
