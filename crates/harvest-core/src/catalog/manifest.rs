//! File-backed catalog served from an exported JSON manifest

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CatalogError, CatalogResult, CatalogService, EntityKind};
use crate::config::AudioFormat;
use crate::error::{HarvestError, Result};
use crate::model::{AlbumInfo, AlbumStub, ArtistStub, SongStub, TrackMetadata};

/// Top-level manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Ids of artists the account follows
    #[serde(default)]
    pub liked_artists: Vec<String>,

    #[serde(default)]
    pub artists: Vec<ManifestArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub albums: Vec<ManifestAlbum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub songs: Vec<ManifestSong>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSong {
    pub id: String,
    pub name: String,
    pub track_number: u32,
    #[serde(default = "default_disc_number")]
    pub disc_number: u32,
    #[serde(default = "default_quality")]
    pub quality_kbps: u32,
    #[serde(default = "default_playable")]
    pub playable: bool,
    /// Audio file to copy on download, relative to the manifest
    pub source: PathBuf,
    #[serde(default)]
    pub lyrics: Option<String>,
}

fn default_disc_number() -> u32 {
    1
}

fn default_quality() -> u32 {
    160
}

fn default_playable() -> bool {
    true
}

/// (artist index, album index)
type AlbumPos = (usize, usize);
/// (artist index, album index, song index)
type SongPos = (usize, usize, usize);

/// A [`CatalogService`] answering from a [`Manifest`]
#[derive(Debug)]
pub struct ManifestCatalog {
    manifest: Manifest,
    base_dir: PathBuf,
    artists: HashMap<String, usize>,
    albums: HashMap<String, AlbumPos>,
    songs: HashMap<String, SongPos>,
}

impl ManifestCatalog {
    /// Load a manifest file; relative song sources resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HarvestError::FailedOperation {
            operation: format!("read catalog manifest {}", path.display()),
            reason: e.to_string(),
        })?;
        let manifest: Manifest = serde_json::from_str(&content)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::new(manifest, base_dir))
    }

    pub fn new(manifest: Manifest, base_dir: PathBuf) -> Self {
        let mut artists = HashMap::new();
        let mut albums = HashMap::new();
        let mut songs = HashMap::new();

        for (ai, artist) in manifest.artists.iter().enumerate() {
            artists.entry(artist.id.clone()).or_insert(ai);
            for (bi, album) in artist.albums.iter().enumerate() {
                albums.entry(album.id.clone()).or_insert((ai, bi));
                for (si, song) in album.songs.iter().enumerate() {
                    songs.entry(song.id.clone()).or_insert((ai, bi, si));
                }
            }
        }

        Self {
            manifest,
            base_dir,
            artists,
            albums,
            songs,
        }
    }

    fn artist(&self, artist_id: &str) -> CatalogResult<&ManifestArtist> {
        self.artists
            .get(artist_id)
            .map(|&ai| &self.manifest.artists[ai])
            .ok_or_else(|| CatalogError::not_found(EntityKind::Artist, artist_id))
    }

    fn album(&self, album_id: &str) -> CatalogResult<(&ManifestArtist, &ManifestAlbum)> {
        let &(ai, bi) = self
            .albums
            .get(album_id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Album, album_id))?;
        let artist = &self.manifest.artists[ai];
        Ok((artist, &artist.albums[bi]))
    }

    fn song(&self, song_id: &str) -> CatalogResult<(&ManifestArtist, &ManifestAlbum, &ManifestSong)> {
        let &(ai, bi, si) = self
            .songs
            .get(song_id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Song, song_id))?;
        let artist = &self.manifest.artists[ai];
        let album = &artist.albums[bi];
        Ok((artist, album, &album.songs[si]))
    }
}

impl CatalogService for ManifestCatalog {
    fn list_liked_artists(&self) -> CatalogResult<Vec<ArtistStub>> {
        self.manifest
            .liked_artists
            .iter()
            .map(|id| self.artist(id).map(|a| ArtistStub::new(&a.id, &a.name)))
            .collect()
    }

    fn list_artist_albums(&self, artist_id: &str) -> CatalogResult<Vec<AlbumStub>> {
        let artist = self.artist(artist_id)?;
        Ok(artist
            .albums
            .iter()
            .map(|album| AlbumStub::new(&album.id, &album.name))
            .collect())
    }

    fn fetch_album_info(&self, album_id: &str) -> CatalogResult<AlbumInfo> {
        let (artist, album) = self.album(album_id)?;
        Ok(AlbumInfo {
            id: album.id.clone(),
            name: album.name.clone(),
            artist_name: artist.name.clone(),
            release_date: album.release_date.clone(),
        })
    }

    fn list_album_songs(&self, album_id: &str, artist_id: &str) -> CatalogResult<Vec<SongStub>> {
        let (_, album) = self.album(album_id)?;
        Ok(album
            .songs
            .iter()
            .map(|song| SongStub {
                id: song.id.clone(),
                album_id: album.id.clone(),
                artist_id: artist_id.to_string(),
                name: song.name.clone(),
                track_number: song.track_number,
                disc_number: song.disc_number,
                quality_kbps: song.quality_kbps,
            })
            .collect())
    }

    fn fetch_track_metadata(&self, song_id: &str) -> CatalogResult<TrackMetadata> {
        let (artist, album, song) = self.song(song_id)?;
        let release_year = album
            .release_date
            .get(..4)
            .and_then(|year| year.parse().ok());
        Ok(TrackMetadata {
            id: song.id.clone(),
            name: song.name.clone(),
            artist_name: artist.name.clone(),
            album_name: album.name.clone(),
            is_playable: song.playable,
            release_year,
            disc_number: song.disc_number,
            track_number: song.track_number,
        })
    }

    fn download_audio(
        &self,
        song_id: &str,
        destination: &Path,
        format: AudioFormat,
    ) -> CatalogResult<PathBuf> {
        let (_, _, song) = self.song(song_id)?;
        let source = self.base_dir.join(&song.source);

        let final_path = match (format, source.extension()) {
            (AudioFormat::Source, Some(ext)) => destination.with_extension(ext),
            _ => destination.to_path_buf(),
        };

        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CatalogError::transient(format!("create {}", parent.display()), e))?;
        }
        fs::copy(&source, &final_path)
            .map_err(|e| CatalogError::transient(format!("transfer {}", song_id), e))?;

        Ok(final_path)
    }

    fn fetch_lyrics(&self, song_id: &str) -> CatalogResult<Option<String>> {
        let (_, _, song) = self.song(song_id)?;
        Ok(song.lyrics.clone())
    }
}
