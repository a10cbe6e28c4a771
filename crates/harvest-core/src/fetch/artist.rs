use super::{Orchestrator, Outcome, Walk};
use crate::catalog::EntityKind;
use crate::error::{HarvestError, Result};
use crate::fetch::report::RunReport;
use crate::model::{AlbumStub, ArtistStub};

impl Orchestrator<'_> {
    pub(crate) fn walk_artist(
        &mut self,
        artist_id: &str,
        force: bool,
        report: &mut RunReport,
    ) -> Result<Walk> {
        let requests_before = report.catalog_requests;
        let stored = self.store.artist(artist_id)?;

        if !force && stored.as_ref().is_some_and(|a| a.download_completed) {
            let name = stored.as_ref().map(|a| a.name.as_str()).unwrap_or(artist_id);
            tracing::info!(artist_id, name, "Skipping artist, already downloaded");
            report.artists_skipped += 1;
            return Ok(Walk {
                outcome: Outcome::Skipped,
                did_work: false,
            });
        }

        // The real name arrives later with album info when we only have an id
        let name = stored
            .map(|a| a.name)
            .unwrap_or_else(|| artist_id.to_string());
        self.store.upsert_artist(&ArtistStub::new(artist_id, &name))?;
        tracing::info!(artist_id, name = %name, force, "Fetching artist");

        let album_ids = match self.artist_album_ids(artist_id, &name, force, report)? {
            Some(ids) => ids,
            None => {
                self.store.commit()?;
                return Ok(Walk {
                    outcome: Outcome::Failed,
                    did_work: true,
                });
            }
        };

        if album_ids.is_empty() {
            tracing::warn!(artist_id, name = %name, "Artist has no albums, leaving it incomplete");
            report.empty_listings += 1;
            self.store.commit()?;
            return Ok(Walk {
                outcome: Outcome::Empty,
                did_work: report.catalog_requests > requests_before,
            });
        }

        let mut unresolved = 0usize;
        for album_id in &album_ids {
            self.check_interrupt()?;
            let walk = match self.walk_album(album_id, artist_id, force, None, report) {
                Ok(walk) => walk,
                Err(HarvestError::ReferentialViolation { operation, reason }) => {
                    tracing::error!(album_id = %album_id, %operation, %reason, "Aborting album");
                    report.fail(EntityKind::Album, album_id, reason);
                    unresolved += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            if !walk.outcome.resolved() {
                unresolved += 1;
            }
            if walk.did_work {
                let wait = self.options.album_wait;
                self.pause_for(wait);
            }
        }

        let outcome = if unresolved == 0 {
            if self.store.mark_artist_done(artist_id)? {
                report.artists_completed += 1;
            }
            self.store.commit()?;
            tracing::info!(artist_id, name = %name, "Finished artist");
            Outcome::Completed
        } else {
            self.store.commit()?;
            tracing::warn!(
                artist_id,
                name = %name,
                albums_left = unresolved,
                "Artist incomplete, will resume on the next run"
            );
            Outcome::Incomplete
        };

        Ok(Walk {
            outcome,
            did_work: report.catalog_requests > requests_before,
        })
    }

    /// Album ids to walk, or `None` when the listing failed
    fn artist_album_ids(
        &mut self,
        artist_id: &str,
        name: &str,
        force: bool,
        report: &mut RunReport,
    ) -> Result<Option<Vec<String>>> {
        if !force && self.store.albums_enumerated(artist_id)? {
            tracing::debug!(artist_id, "Albums already enumerated");
            return self.store.album_ids_for_artist(artist_id).map(Some);
        }

        report.catalog_requests += 1;
        let listing = match self.catalog.list_artist_albums(artist_id) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(artist_id, name, error = %e, "Could not list albums");
                report.fail(EntityKind::Artist, artist_id, &e);
                return Ok(None);
            }
        };

        let albums: Vec<AlbumStub> = listing
            .into_iter()
            .filter(|a| match a.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(artist_id, album_id = %a.id, error = %e, "Dropping invalid album");
                    false
                }
            })
            .collect();

        // An empty answer may be transient; leave the marker unset so the next run asks again
        if albums.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let added = self.store.upsert_albums(artist_id, &albums)?;
        self.store.set_albums_enumerated(artist_id, true)?;
        self.store.commit()?;
        tracing::info!(artist_id, listed = albums.len(), added, "Enumerated albums");

        Ok(Some(albums.into_iter().map(|a| a.id).collect()))
    }
}
