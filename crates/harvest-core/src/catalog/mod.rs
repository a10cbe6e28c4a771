//! Boundary to the remote catalog
//!
//! The traversal only talks to the catalog through [`CatalogService`]. Network
//! clients, authentication and retry policy live behind implementations of this
//! trait; the bundled [`ManifestCatalog`] serves an exported catalog from disk.

mod manifest;
mod reference;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AudioFormat;
use crate::model::{AlbumInfo, AlbumStub, ArtistStub, SongStub, TrackMetadata};

pub use manifest::{Manifest, ManifestAlbum, ManifestArtist, ManifestCatalog, ManifestSong};
pub use reference::{parse_catalog_ref, split_refs, CatalogRef};

/// Hierarchy level of a catalog entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Artist,
    Album,
    Song,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Artist => write!(f, "artist"),
            EntityKind::Album => write!(f, "album"),
            EntityKind::Song => write!(f, "song"),
        }
    }
}

/// Failures reported by a catalog implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Permanent for this id in the current pass
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Network-level failure; the caller may retry on a later run
    #[error("{operation} failed: {reason}")]
    Transient { operation: String, reason: String },

    /// The catalog answered with data that fails validation
    #[error("malformed catalog data: {reason}")]
    Malformed { reason: String },
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn transient(operation: impl Into<String>, reason: impl fmt::Display) -> Self {
        CatalogError::Transient {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Remote catalog operations consumed by the traversal.
///
/// Calls block until the catalog answers; timeouts belong to the
/// implementation. Children are returned in catalog order.
pub trait CatalogService {
    fn list_liked_artists(&self) -> CatalogResult<Vec<ArtistStub>>;

    fn list_artist_albums(&self, artist_id: &str) -> CatalogResult<Vec<AlbumStub>>;

    fn fetch_album_info(&self, album_id: &str) -> CatalogResult<AlbumInfo>;

    fn list_album_songs(&self, album_id: &str, artist_id: &str) -> CatalogResult<Vec<SongStub>>;

    fn fetch_track_metadata(&self, song_id: &str) -> CatalogResult<TrackMetadata>;

    /// Transfer the audio payload to `destination`, returning the final path.
    ///
    /// The final path may differ from `destination` (e.g. a different
    /// extension after conversion).
    fn download_audio(
        &self,
        song_id: &str,
        destination: &Path,
        format: AudioFormat,
    ) -> CatalogResult<PathBuf>;

    /// Synced lyrics for a song, if the catalog has any
    fn fetch_lyrics(&self, _song_id: &str) -> CatalogResult<Option<String>> {
        Ok(None)
    }
}
