use serde::Serialize;

use super::Store;
use crate::error::Result;
use crate::map_db_err;

/// Total and completed rows of one hierarchy level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub total: u64,
    pub done: u64,
}

/// Snapshot of the store for status reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub schema_version: u32,
    pub liked_artists: u64,
    pub liked_artists_enumerated: bool,
    pub artists: LevelCount,
    pub albums: LevelCount,
    pub songs: LevelCount,
    /// Songs resolved without a file because the catalog could not serve them
    pub songs_unavailable: u64,
    pub lyrics: u64,
}

impl Store {
    fn level_count(&self, table: &str) -> Result<LevelCount> {
        let (total, done): (i64, i64) = self
            .conn
            .query_row(
                &format!(
                    "SELECT COUNT(*), COALESCE(SUM(download_completed != 0), 0) FROM {}",
                    table
                ),
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .map_err(map_db_err!("count rows"))?;
        Ok(LevelCount {
            total: total.max(0) as u64,
            done: done.max(0) as u64,
        })
    }

    pub fn summary(&self) -> Result<StoreSummary> {
        let liked_artists: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM liked_artists", [], |r| r.get(0))
            .map_err(map_db_err!("count liked artists"))?;
        let lyrics: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM songs WHERE lyrics_downloaded != 0",
                [],
                |r| r.get(0),
            )
            .map_err(map_db_err!("count lyrics"))?;

        let songs_unavailable: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM songs
                 WHERE download_completed != 0 AND full_filepath IS NULL",
                [],
                |r| r.get(0),
            )
            .map_err(map_db_err!("count unavailable songs"))?;

        Ok(StoreSummary {
            schema_version: self.schema_version()?,
            liked_artists: liked_artists.max(0) as u64,
            liked_artists_enumerated: self.liked_artists_enumerated()?,
            artists: self.level_count("artists")?,
            albums: self.level_count("albums")?,
            songs: self.level_count("songs")?,
            songs_unavailable: songs_unavailable.max(0) as u64,
            lyrics: lyrics.max(0) as u64,
        })
    }
}
