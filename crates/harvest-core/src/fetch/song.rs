use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::album::AlbumContext;
use super::layout;
use super::Orchestrator;
use crate::catalog::{CatalogError, EntityKind};
use crate::error::Result;
use crate::fetch::report::RunReport;
use crate::model::{AlbumInfo, SongStub, TrackMetadata};

/// Extensions that count as an already-downloaded song
const ADOPTABLE_EXTENSIONS: [&str; 2] = ["mp3", "ogg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SongOutcome {
    AlreadyDone,
    Downloaded,
    Adopted,
    Unavailable,
    Failed,
}

impl Orchestrator<'_> {
    pub(crate) fn walk_song(
        &mut self,
        song: &SongStub,
        album: &mut AlbumContext,
        report: &mut RunReport,
    ) -> Result<SongOutcome> {
        if self.store.is_song_done(&song.id)? {
            tracing::info!(song_id = %song.id, name = %song.name, "Skipping song, already downloaded");
            report.songs_skipped += 1;
            return Ok(SongOutcome::AlreadyDone);
        }

        report.catalog_requests += 1;
        let metadata = match self.catalog.fetch_track_metadata(&song.id) {
            Ok(metadata) => metadata,
            Err(CatalogError::NotFound { .. }) => {
                return self.song_unavailable(song, "could not get track info", report)
            }
            Err(e) => return Ok(self.song_failed(song, e, report)),
        };
        if !metadata.is_playable {
            return self.song_unavailable(song, "not playable", report);
        }

        let info = self.album_info(album, &metadata, report)?;
        let destination = layout::song_path(
            &layout::album_dir(&self.options.music_dir, &info),
            &info.artist_name,
            song,
            album.multi_disc,
            self.options.audio_format,
        );

        if self.options.skip_existing {
            if let Some(path) = existing_file(&destination) {
                self.store.mark_song_done(&song.id, &path)?;
                self.store.commit()?;
                tracing::info!(
                    song_id = %song.id,
                    name = %song.name,
                    path = %path.display(),
                    "Song already on disk, recorded without downloading"
                );
                report.songs_adopted += 1;
                return Ok(SongOutcome::Adopted);
            }
        }

        tracing::info!(song_id = %song.id, name = %song.name, "Downloading song");
        report.catalog_requests += 1;
        let downloaded =
            match self
                .catalog
                .download_audio(&song.id, &destination, self.options.audio_format)
            {
                Ok(path) => path,
                Err(CatalogError::NotFound { .. }) => {
                    return self.song_unavailable(song, "audio not found", report)
                }
                Err(e) => return Ok(self.song_failed(song, e, report)),
            };

        let path = match fs::canonicalize(&downloaded) {
            Ok(path) => path,
            Err(e) => {
                let reason = format!("downloaded file {} is missing: {}", downloaded.display(), e);
                return Ok(self.song_failed(song, reason, report));
            }
        };
        self.store.mark_song_done(&song.id, &path)?;
        self.store.commit()?;
        tracing::info!(
            song_id = %song.id,
            name = %song.name,
            path = %path.display(),
            "Finished downloading song"
        );
        report.songs_downloaded += 1;

        if self.options.lyrics {
            self.save_lyrics(song, &path, report)?;
        }

        let wait = self.options.song_wait;
        self.pause_for(wait);
        Ok(SongOutcome::Downloaded)
    }

    /// Album details for the destination path, fetched once per album
    fn album_info(
        &mut self,
        album: &mut AlbumContext,
        metadata: &TrackMetadata,
        report: &mut RunReport,
    ) -> Result<AlbumInfo> {
        if let Some(info) = &album.info {
            return Ok(info.clone());
        }

        report.catalog_requests += 1;
        let info = match self.catalog.fetch_album_info(&album.album_id) {
            Ok(info) => {
                self.store
                    .refine_artist_name(&album.artist_id, &info.artist_name)?;
                info
            }
            Err(e) => {
                tracing::warn!(
                    album_id = %album.album_id,
                    error = %e,
                    "Could not look up album, naming files from track metadata"
                );
                AlbumInfo {
                    id: album.album_id.clone(),
                    name: if metadata.album_name.is_empty() {
                        album.name.clone()
                    } else {
                        metadata.album_name.clone()
                    },
                    artist_name: metadata.artist_name.clone(),
                    release_date: metadata
                        .release_year
                        .map(|y| y.to_string())
                        .unwrap_or_default(),
                }
            }
        };
        album.info = Some(info.clone());
        Ok(info)
    }

    fn song_unavailable(
        &mut self,
        song: &SongStub,
        reason: &str,
        report: &mut RunReport,
    ) -> Result<SongOutcome> {
        self.store.mark_song_unavailable(&song.id)?;
        self.store.commit()?;
        tracing::warn!(song_id = %song.id, name = %song.name, reason, "Skipping unavailable song");
        report.songs_unavailable += 1;
        Ok(SongOutcome::Unavailable)
    }

    fn song_failed(
        &self,
        song: &SongStub,
        reason: impl fmt::Display,
        report: &mut RunReport,
    ) -> SongOutcome {
        tracing::warn!(
            song_id = %song.id,
            name = %song.name,
            reason = %reason,
            "Song failed, will retry on the next run"
        );
        report.songs_failed += 1;
        report.fail(EntityKind::Song, &song.id, reason);
        SongOutcome::Failed
    }

    /// Write lyrics next to the audio file. Never affects song completion.
    fn save_lyrics(&mut self, song: &SongStub, audio: &Path, report: &mut RunReport) -> Result<()> {
        if self.store.lyrics_downloaded(&song.id)? {
            return Ok(());
        }

        report.catalog_requests += 1;
        let lyrics = match self.catalog.fetch_lyrics(&song.id) {
            Ok(Some(lyrics)) => lyrics,
            Ok(None) => {
                tracing::debug!(song_id = %song.id, "No lyrics available");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(song_id = %song.id, error = %e, "Could not fetch lyrics");
                return Ok(());
            }
        };

        let path = audio.with_extension("lrc");
        if let Err(e) = fs::write(&path, lyrics) {
            tracing::warn!(song_id = %song.id, path = %path.display(), error = %e, "Could not save lyrics");
            return Ok(());
        }
        self.store.mark_lyrics_downloaded(&song.id)?;
        self.store.commit()?;
        tracing::debug!(song_id = %song.id, path = %path.display(), "Saved lyrics");
        report.lyrics_saved += 1;
        Ok(())
    }
}

/// Absolute path of a file already at the destination under an adoptable extension
fn existing_file(destination: &Path) -> Option<PathBuf> {
    ADOPTABLE_EXTENSIONS
        .iter()
        .map(|ext| destination.with_extension(ext))
        .filter(|candidate| candidate.is_file())
        .find_map(|candidate| fs::canonicalize(candidate).ok())
}
