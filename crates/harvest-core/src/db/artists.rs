use rusqlite::{params, OptionalExtension};

use super::{now_timestamp, Store};
use crate::error::Result;
use crate::map_db_err;
use crate::model::{ArtistRecord, ArtistStub};

impl Store {
    /// Insert the artist unless it is already known. Returns whether a row was added.
    pub fn upsert_artist(&self, artist: &ArtistStub) -> Result<bool> {
        self.begin_pending()?;
        let inserted = self
            .conn
            .execute(
                "INSERT INTO artists (artist_id, name) VALUES (?1, ?2)
                 ON CONFLICT (artist_id) DO NOTHING",
                params![artist.id, artist.name],
            )
            .map_err(map_db_err!("insert artist"))?;
        Ok(inserted > 0)
    }

    /// Replace a placeholder name (the id itself) once the real name is known
    pub fn refine_artist_name(&self, artist_id: &str, name: &str) -> Result<bool> {
        if name.trim().is_empty() || name == artist_id {
            return Ok(false);
        }
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE artists SET name = ?2 WHERE artist_id = ?1 AND name = artist_id",
                params![artist_id, name],
            )
            .map_err(map_db_err!("rename artist"))?;
        Ok(updated > 0)
    }

    /// Whether every album of the artist has been handled
    pub fn is_artist_done(&self, artist_id: &str) -> Result<bool> {
        self.flag(
            "SELECT download_completed FROM artists WHERE artist_id = ?1",
            artist_id,
            "read artist completion",
        )
    }

    /// Flag the artist as completed. Re-marking keeps the first completion time.
    pub fn mark_artist_done(&self, artist_id: &str) -> Result<bool> {
        self.begin_pending()?;
        let updated = self
            .conn
            .execute(
                "UPDATE artists SET download_completed = 1, completed_at = ?2
                 WHERE artist_id = ?1 AND download_completed = 0",
                params![artist_id, now_timestamp()],
            )
            .map_err(map_db_err!("mark artist done"))?;
        Ok(updated > 0)
    }

    pub fn artist(&self, artist_id: &str) -> Result<Option<ArtistRecord>> {
        self.conn
            .query_row(
                "SELECT artist_id, name, download_completed, completed_at
                 FROM artists WHERE artist_id = ?1",
                [artist_id],
                |r| {
                    Ok(ArtistRecord {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        download_completed: r.get::<_, i64>(2)? != 0,
                        completed_at: r.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(map_db_err!("read artist"))
    }

    /// Record the liked-artists listing: artist rows plus their liked membership
    pub fn upsert_liked_artists(&self, artists: &[ArtistStub]) -> Result<usize> {
        self.begin_pending()?;
        let mut added = 0;
        for artist in artists {
            self.upsert_artist(artist)?;
            added += self
                .conn
                .execute(
                    "INSERT INTO liked_artists (artist_id) VALUES (?1)
                     ON CONFLICT (artist_id) DO NOTHING",
                    [&artist.id],
                )
                .map_err(map_db_err!("insert liked artist"))?;
        }
        Ok(added)
    }

    /// Liked artist ids in the order they were first listed
    pub fn liked_artist_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT artist_id FROM liked_artists ORDER BY rowid")
            .map_err(map_db_err!("prepare liked artist query"))?;
        let ids = stmt
            .query_map([], |r| r.get(0))
            .map_err(map_db_err!("query liked artists"))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(map_db_err!("read liked artists"))?;
        Ok(ids)
    }
}
