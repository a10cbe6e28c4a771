
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::{tempdir, TempDir};

use super::FetchOptions;
use crate::catalog::{CatalogError, CatalogResult, CatalogService, EntityKind};
use crate::config::AudioFormat;
use crate::db::Store;
use crate::model::{AlbumInfo, AlbumStub, ArtistStub, SongStub, TrackMetadata};

pub(super) const ALBUM_WAIT: Duration = Duration::from_secs(30);
pub(super) const SONG_WAIT: Duration = Duration::from_secs(5);

/// In-memory catalog that records every call it answers
#[derive(Default)]
pub(super) struct StubCatalog {
    liked: Vec<String>,
    artist_names: HashMap<String, String>,
    albums: HashMap<String, Vec<AlbumStub>>,
    songs: HashMap<String, Vec<SongStub>>,
    album_artist: HashMap<String, String>,
    release_dates: HashMap<String, String>,
    pub unplayable: HashSet<String>,
    pub missing: HashSet<String>,
    /// Song ids, or `albums:<artist>` / `songs:<album>`, that fail transiently
    pub transient: RefCell<HashSet<String>>,
    pub lyrics: HashMap<String, String>,
    /// Raise the flag once this song has been downloaded
    pub interrupt_after: Option<(String, Arc<AtomicBool>)>,
    calls: RefCell<Vec<String>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artist with `(album_id, [song_id])` entries, songs numbered from 1
    pub fn artist(mut self, id: &str, name: &str, albums: &[(&str, &[&str])]) -> Self {
        self.artist_names.insert(id.to_string(), name.to_string());
        let entry = self.albums.entry(id.to_string()).or_default();
        for (album_id, song_ids) in albums {
            entry.push(AlbumStub::new(*album_id, format!("Album {}", album_id)));
            self.album_artist
                .insert(album_id.to_string(), id.to_string());
            self.release_dates
                .insert(album_id.to_string(), "2020-01-01".to_string());
            let songs = song_ids
                .iter()
                .enumerate()
                .map(|(i, song_id)| SongStub {
                    id: song_id.to_string(),
                    album_id: album_id.to_string(),
                    artist_id: id.to_string(),
                    name: format!("Song {}", song_id),
                    track_number: i as u32 + 1,
                    disc_number: 1,
                    quality_kbps: 320,
                })
                .collect();
            self.songs.insert(album_id.to_string(), songs);
        }
        self
    }

    pub fn liked(mut self, ids: &[&str]) -> Self {
        self.liked = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn add_album(&mut self, artist_id: &str, album_id: &str, song_ids: &[&str]) {
        let name = self.artist_names[artist_id].clone();
        let existing = std::mem::take(self).artist(artist_id, &name, &[(album_id, song_ids)]);
        *self = existing;
    }

    pub fn song_mut(&mut self, song_id: &str) -> &mut SongStub {
        self.songs
            .values_mut()
            .flatten()
            .find(|s| s.id == song_id)
            .unwrap()
    }

    pub fn fail_transiently(&self, key: &str) {
        self.transient.borrow_mut().insert(key.to_string());
    }

    pub fn recover(&self) {
        self.transient.borrow_mut().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check_transient(&self, key: &str) -> CatalogResult<()> {
        if self.transient.borrow().contains(key) {
            return Err(CatalogError::transient(key, "connection reset"));
        }
        Ok(())
    }

    fn find_song(&self, song_id: &str) -> CatalogResult<&SongStub> {
        self.songs
            .values()
            .flatten()
            .find(|s| s.id == song_id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Song, song_id))
    }
}

impl CatalogService for StubCatalog {
    fn list_liked_artists(&self) -> CatalogResult<Vec<ArtistStub>> {
        self.record("liked".to_string());
        Ok(self
            .liked
            .iter()
            .map(|id| ArtistStub::new(id, &self.artist_names[id]))
            .collect())
    }

    fn list_artist_albums(&self, artist_id: &str) -> CatalogResult<Vec<AlbumStub>> {
        self.record(format!("albums:{}", artist_id));
        self.check_transient(&format!("albums:{}", artist_id))?;
        self.albums
            .get(artist_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntityKind::Artist, artist_id))
    }

    fn fetch_album_info(&self, album_id: &str) -> CatalogResult<AlbumInfo> {
        self.record(format!("info:{}", album_id));
        let artist_id = self
            .album_artist
            .get(album_id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Album, album_id))?;
        Ok(AlbumInfo {
            id: album_id.to_string(),
            name: format!("Album {}", album_id),
            artist_name: self.artist_names[artist_id].clone(),
            release_date: self.release_dates[album_id].clone(),
        })
    }

    fn list_album_songs(&self, album_id: &str, _artist_id: &str) -> CatalogResult<Vec<SongStub>> {
        self.record(format!("songs:{}", album_id));
        self.check_transient(&format!("songs:{}", album_id))?;
        self.songs
            .get(album_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntityKind::Album, album_id))
    }

    fn fetch_track_metadata(&self, song_id: &str) -> CatalogResult<TrackMetadata> {
        self.record(format!("metadata:{}", song_id));
        if self.missing.contains(song_id) {
            return Err(CatalogError::not_found(EntityKind::Song, song_id));
        }
        let song = self.find_song(song_id)?;
        Ok(TrackMetadata {
            id: song.id.clone(),
            name: song.name.clone(),
            artist_name: self.artist_names[&song.artist_id].clone(),
            album_name: format!("Album {}", song.album_id),
            is_playable: !self.unplayable.contains(song_id),
            release_year: Some(2020),
            disc_number: song.disc_number,
            track_number: song.track_number,
        })
    }

    fn download_audio(
        &self,
        song_id: &str,
        destination: &Path,
        _format: AudioFormat,
    ) -> CatalogResult<PathBuf> {
        self.record(format!("download:{}", song_id));
        self.check_transient(song_id)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::transient("download", e))?;
        }
        fs::write(destination, song_id).map_err(|e| CatalogError::transient("download", e))?;
        if let Some((after, flag)) = &self.interrupt_after {
            if after == song_id {
                flag.store(true, Ordering::SeqCst);
            }
        }
        Ok(destination.to_path_buf())
    }

    fn fetch_lyrics(&self, song_id: &str) -> CatalogResult<Option<String>> {
        self.record(format!("lyrics:{}", song_id));
        Ok(self.lyrics.get(song_id).cloned())
    }
}

/// The two-album artist used throughout: A1 → AL1 (S1, S2), AL2 (S3)
pub(super) fn two_album_catalog() -> StubCatalog {
    StubCatalog::new().artist("A1", "Artist One", &[("AL1", &["S1", "S2"]), ("AL2", &["S3"])])
}

pub(super) struct Fixture {
    pub dir: TempDir,
    pub store: Store,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("data")).unwrap();
        Self { dir, store }
    }

    /// Simulate a restart: drop the handle without committing and reopen
    pub fn reopen(self) -> Self {
        let Fixture { dir, store } = self;
        drop(store);
        let store = Store::open(&dir.path().join("data")).unwrap();
        Self { dir, store }
    }

    pub fn music_dir(&self) -> PathBuf {
        self.dir.path().join("music")
    }

    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            music_dir: self.music_dir(),
            audio_format: AudioFormat::Mp3,
            skip_existing: false,
            lyrics: false,
            album_wait: ALBUM_WAIT,
            song_wait: SONG_WAIT,
        }
    }

    /// Where the stub catalog's songs land for album `album_id` of "Artist One"
    pub fn song_file(&self, album_id: &str, track: u32, song_id: &str) -> PathBuf {
        self.music_dir()
            .join("Artist One")
            .join(format!("2020-01-01 - Album {}", album_id))
            .join(format!("Artist One - {:02} - Song {}.mp3", track, song_id))
    }
}
