use super::song::SongOutcome;
use super::{Orchestrator, Outcome, Walk};
use crate::catalog::EntityKind;
use crate::error::Result;
use crate::fetch::report::RunReport;
use crate::model::{AlbumInfo, AlbumStub, ArtistStub, SongStub};

/// What the song walk needs to know about the album it belongs to
#[derive(Debug)]
pub(crate) struct AlbumContext {
    pub album_id: String,
    pub artist_id: String,
    pub name: String,
    /// Fetched on the first song that needs a destination
    pub info: Option<AlbumInfo>,
    pub multi_disc: bool,
}

impl Orchestrator<'_> {
    /// Album walk entered directly, without its artist having been walked
    pub(crate) fn walk_single_album(
        &mut self,
        album_id: &str,
        artist_id: &str,
        report: &mut RunReport,
    ) -> Result<Walk> {
        let stored = self.store.album(album_id)?;
        if let Some(album) = &stored {
            return self.walk_album(album_id, &album.artist_id, false, None, report);
        }

        report.catalog_requests += 1;
        let info = match self.catalog.fetch_album_info(album_id) {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(album_id, error = %e, "Could not look up album");
                report.fail(EntityKind::Album, album_id, &e);
                return Ok(Walk {
                    outcome: Outcome::Failed,
                    did_work: true,
                });
            }
        };

        let artist_name = non_empty_or(&info.artist_name, artist_id);
        self.store
            .upsert_artist(&ArtistStub::new(artist_id, artist_name))?;
        self.store.refine_artist_name(artist_id, &info.artist_name)?;
        self.store.upsert_albums(
            artist_id,
            &[AlbumStub::new(album_id, non_empty_or(&info.name, album_id))],
        )?;
        self.store.commit()?;

        self.walk_album(album_id, artist_id, false, Some(info), report)
    }

    pub(crate) fn walk_album(
        &mut self,
        album_id: &str,
        artist_id: &str,
        force: bool,
        prefetched: Option<AlbumInfo>,
        report: &mut RunReport,
    ) -> Result<Walk> {
        let requests_before = report.catalog_requests;
        let stored = self.store.album(album_id)?;
        let name = stored
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| album_id.to_string());

        let was_done = stored.as_ref().is_some_and(|a| a.download_completed);
        if !force && was_done {
            tracing::info!(album_id, name = %name, "Skipping album, already downloaded");
            report.albums_skipped += 1;
            return Ok(Walk {
                outcome: Outcome::Skipped,
                did_work: false,
            });
        }

        tracing::info!(album_id, name = %name, "Fetching album");
        let songs = match self.album_songs(album_id, artist_id, &name, force, report)? {
            Some(songs) => songs,
            None => {
                self.store.commit()?;
                return Ok(Walk {
                    outcome: Outcome::Failed,
                    did_work: true,
                });
            }
        };

        if songs.is_empty() {
            tracing::warn!(album_id, name = %name, "Album has no songs, leaving it incomplete");
            report.empty_listings += 1;
            self.store.commit()?;
            return Ok(Walk {
                outcome: Outcome::Empty,
                did_work: report.catalog_requests > requests_before,
            });
        }

        let mut context = AlbumContext {
            album_id: album_id.to_string(),
            artist_id: artist_id.to_string(),
            name: name.clone(),
            info: prefetched,
            multi_disc: songs.iter().any(|s| s.disc_number > 1),
        };

        let mut unresolved = 0usize;
        let mut resolved_now = 0usize;
        for song in &songs {
            self.check_interrupt()?;
            match self.walk_song(song, &mut context, report)? {
                SongOutcome::Failed => unresolved += 1,
                SongOutcome::AlreadyDone => {}
                _ => resolved_now += 1,
            }
        }

        let outcome = if unresolved == 0 {
            if self.store.mark_album_done(album_id)? {
                report.albums_completed += 1;
            }
            self.store.commit()?;
            tracing::info!(album_id, name = %name, "Finished album");
            Outcome::Completed
        } else {
            self.store.commit()?;
            tracing::warn!(
                album_id,
                name = %name,
                songs_left = unresolved,
                "Album incomplete, will resume on the next run"
            );
            Outcome::Incomplete
        };

        // A forced pass over a finished album only re-lists; that costs no wait
        let did_work = if was_done {
            resolved_now > 0
        } else {
            report.catalog_requests > requests_before
        };
        Ok(Walk { outcome, did_work })
    }

    /// Songs to walk in catalog order, or `None` when the listing failed
    fn album_songs(
        &mut self,
        album_id: &str,
        artist_id: &str,
        name: &str,
        force: bool,
        report: &mut RunReport,
    ) -> Result<Option<Vec<SongStub>>> {
        if !force && self.store.songs_enumerated(album_id)? {
            tracing::debug!(album_id, "Songs already enumerated");
            let songs = self.store.songs_for_album(album_id)?;
            return Ok(Some(songs.iter().map(|s| s.stub()).collect()));
        }

        report.catalog_requests += 1;
        let listing = match self.catalog.list_album_songs(album_id, artist_id) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(album_id, name, error = %e, "Could not list songs");
                report.fail(EntityKind::Album, album_id, &e);
                return Ok(None);
            }
        };

        let songs: Vec<SongStub> = listing
            .into_iter()
            .filter_map(|mut song| {
                if let Err(e) = song.validate() {
                    tracing::warn!(album_id, song_id = %song.id, error = %e, "Dropping invalid song");
                    return None;
                }
                if song.album_id != album_id {
                    tracing::warn!(
                        album_id,
                        song_id = %song.id,
                        listed_album = %song.album_id,
                        "Dropping song listed under another album"
                    );
                    return None;
                }
                // Featured artists may not have a row of their own
                song.artist_id = artist_id.to_string();
                Some(song)
            })
            .collect();

        if songs.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let added = self.store.upsert_songs(&songs)?;
        self.store.set_songs_enumerated(album_id, true)?;
        self.store.commit()?;
        tracing::info!(album_id, listed = songs.len(), added, "Enumerated songs");

        Ok(Some(songs))
    }
}

fn non_empty_or<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
