//! Entity records exchanged with the catalog and read back from the store

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// An artist as listed by the catalog (liked artists, album credits)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistStub {
    pub id: String,
    pub name: String,
}

/// An album as listed under an artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumStub {
    pub id: String,
    pub name: String,
}

/// Album details needed to lay out files on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub release_date: String,
}

/// A song as listed under an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongStub {
    pub id: String,
    pub album_id: String,
    pub artist_id: String,
    pub name: String,
    pub track_number: u32,
    pub disc_number: u32,
    pub quality_kbps: u32,
}

/// Per-track metadata looked up right before a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub album_name: String,
    pub is_playable: bool,
    pub release_year: Option<i32>,
    pub disc_number: u32,
    pub track_number: u32,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Malformed {
            reason: format!("empty {}", field),
        });
    }
    Ok(())
}

impl ArtistStub {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        require_non_empty("artist id", &self.id)?;
        require_non_empty("artist name", &self.name)
    }
}

impl AlbumStub {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        require_non_empty("album id", &self.id)?;
        require_non_empty("album name", &self.name)
    }
}

impl SongStub {
    pub fn validate(&self) -> Result<(), CatalogError> {
        require_non_empty("song id", &self.id)?;
        require_non_empty("song album id", &self.album_id)?;
        require_non_empty("song artist id", &self.artist_id)?;
        require_non_empty("song name", &self.name)?;
        if self.track_number == 0 || self.disc_number == 0 {
            return Err(CatalogError::Malformed {
                reason: format!(
                    "song {} has track {} on disc {}",
                    self.id, self.track_number, self.disc_number
                ),
            });
        }
        Ok(())
    }
}

/// Stored artist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    pub download_completed: bool,
    pub completed_at: Option<String>,
}

/// Stored album row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumRecord {
    pub id: String,
    pub artist_id: String,
    pub name: String,
    pub download_completed: bool,
    pub completed_at: Option<String>,
}

/// Stored song row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRecord {
    pub id: String,
    pub album_id: String,
    pub artist_id: String,
    pub name: String,
    pub track_number: u32,
    pub disc_number: u32,
    pub quality_kbps: u32,
    pub full_filepath: Option<PathBuf>,
    pub download_completed: bool,
    pub completed_at: Option<String>,
    pub lyrics_downloaded: bool,
}

impl SongRecord {
    /// The listing stub this row was created from
    pub fn stub(&self) -> SongStub {
        SongStub {
            id: self.id.clone(),
            album_id: self.album_id.clone(),
            artist_id: self.artist_id.clone(),
            name: self.name.clone(),
            track_number: self.track_number,
            disc_number: self.disc_number,
            quality_kbps: self.quality_kbps,
        }
    }
}
