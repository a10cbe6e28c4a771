//! "Fully enumerated" markers per parent

use rusqlite::{params, OptionalExtension};

use super::Store;
use crate::error::Result;
use crate::map_db_err;

impl Store {
    /// Whether the complete album list of the artist has been stored
    pub fn albums_enumerated(&self, artist_id: &str) -> Result<bool> {
        self.flag(
            "SELECT have_fetched_all_albums FROM fetched_albums WHERE artist_id = ?1",
            artist_id,
            "read album enumeration marker",
        )
    }

    pub fn set_albums_enumerated(&self, artist_id: &str, value: bool) -> Result<()> {
        self.begin_pending()?;
        self.conn
            .execute(
                "INSERT INTO fetched_albums (artist_id, have_fetched_all_albums) VALUES (?1, ?2)
                 ON CONFLICT (artist_id)
                 DO UPDATE SET have_fetched_all_albums = excluded.have_fetched_all_albums",
                params![artist_id, value],
            )
            .map_err(map_db_err!("set album enumeration marker"))?;
        Ok(())
    }

    /// Whether the complete song list of the album has been stored
    pub fn songs_enumerated(&self, album_id: &str) -> Result<bool> {
        self.flag(
            "SELECT have_fetched_all_songs FROM fetched_songs WHERE album_id = ?1",
            album_id,
            "read song enumeration marker",
        )
    }

    pub fn set_songs_enumerated(&self, album_id: &str, value: bool) -> Result<()> {
        self.begin_pending()?;
        self.conn
            .execute(
                "INSERT INTO fetched_songs (album_id, have_fetched_all_songs) VALUES (?1, ?2)
                 ON CONFLICT (album_id)
                 DO UPDATE SET have_fetched_all_songs = excluded.have_fetched_all_songs",
                params![album_id, value],
            )
            .map_err(map_db_err!("set song enumeration marker"))?;
        Ok(())
    }

    /// Whether the liked-artists list has been stored
    pub fn liked_artists_enumerated(&self) -> Result<bool> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT have_fetched_all_artists FROM fetched_artists WHERE id = 0",
                [],
                |r| r.get(0),
            )
            .optional()
            .map_err(map_db_err!("read liked artists marker"))?;
        Ok(value.unwrap_or(0) != 0)
    }

    pub fn set_liked_artists_enumerated(&self, value: bool) -> Result<()> {
        self.begin_pending()?;
        self.conn
            .execute(
                "INSERT INTO fetched_artists (id, have_fetched_all_artists) VALUES (0, ?1)
                 ON CONFLICT (id)
                 DO UPDATE SET have_fetched_all_artists = excluded.have_fetched_all_artists",
                [value],
            )
            .map_err(map_db_err!("set liked artists marker"))?;
        Ok(())
    }
}
