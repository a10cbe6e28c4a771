//! Resumable artist → album → song traversal
//!
//! Every level follows the same shape: skip when done, enumerate children
//! unless a marker says they are already stored, walk the children in catalog
//! order, then mark the parent done once every child resolved. Writes are
//! committed after each finished song and each completion mark, so a killed
//! run loses at most the song that was in flight.

mod album;
mod artist;
pub mod layout;
mod pacing;
mod report;
mod song;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{CatalogService, EntityKind};
use crate::config::{AudioFormat, HarvestConfig};
use crate::db::Store;
use crate::error::{HarvestError, Result};
use crate::model::ArtistStub;

pub use pacing::{Pause, RecordedPauses, ThreadSleep};
pub use report::{RunReport, UnitFailure};

/// Knobs for a traversal run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub music_dir: PathBuf,
    pub audio_format: AudioFormat,
    pub skip_existing: bool,
    pub lyrics: bool,
    /// Pause after an album that did real work
    pub album_wait: Duration,
    /// Pause after each transferred song
    pub song_wait: Duration,
}

impl FetchOptions {
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            music_dir: config.music_dir.clone(),
            audio_format: config.audio_format,
            skip_existing: config.skip_existing,
            lyrics: config.lyrics,
            album_wait: Duration::from_secs(config.antiban.album_wait_secs),
            song_wait: Duration::from_secs(config.antiban.song_wait_secs),
        }
    }
}

/// Which artists a full run walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The account's liked artists, enumerated once and then read from the store
    LikedArtists,
    Artists(Vec<String>),
}

/// How a walk over one parent ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Already done before this run touched it
    Skipped,
    /// Every child resolved and the completion mark is written
    Completed,
    /// Some child is still undone
    Incomplete,
    /// The child listing was empty
    Empty,
    /// The child listing could not be fetched
    Failed,
}

impl Outcome {
    pub(crate) fn resolved(self) -> bool {
        matches!(self, Outcome::Skipped | Outcome::Completed)
    }
}

/// Result of walking one parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Walk {
    pub outcome: Outcome,
    /// Whether the walk issued any catalog request
    pub did_work: bool,
}

/// Drives the traversal against one store and one catalog
pub struct Orchestrator<'a> {
    store: &'a Store,
    catalog: &'a dyn CatalogService,
    options: FetchOptions,
    pause: Box<dyn Pause + 'a>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a Store, catalog: &'a dyn CatalogService, options: FetchOptions) -> Self {
        Self {
            store,
            catalog,
            options,
            pause: Box::new(ThreadSleep),
            interrupt: None,
        }
    }

    /// Replace the sleeping pause (tests record pauses instead)
    pub fn with_pause(mut self, pause: impl Pause + 'a) -> Self {
        self.pause = Box::new(pause);
        self
    }

    /// Stop before the next unit of work once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Walk one artist and everything under it
    ///
    /// An interrupted run still returns its report, with `interrupted` set.
    pub fn run_artist(&mut self, artist_id: &str, force: bool) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::default();
        let walked = self.artist_unit(artist_id, force, &mut report);
        self.finish(walked, &mut report)?;
        crate::trace_time!(start, "run_artist", artist_id = artist_id);
        Ok(report)
    }

    /// Walk a single album of `artist_id`
    pub fn run_album(&mut self, album_id: &str, artist_id: &str) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::default();
        let walked = match self.walk_single_album(album_id, artist_id, &mut report) {
            Ok(_) => Ok(()),
            Err(HarvestError::ReferentialViolation { operation, reason }) => {
                tracing::error!(album_id, %operation, %reason, "Aborting album");
                report.fail(EntityKind::Album, album_id, reason);
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.finish(walked, &mut report)?;
        crate::trace_time!(start, "run_album", album_id = album_id);
        Ok(report)
    }

    /// Walk every selected artist in order
    pub fn run_full(&mut self, selection: &Selection, force: bool) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::default();
        let walked = self.walk_selection(selection, force, &mut report);
        self.finish(walked, &mut report)?;
        crate::trace_time!(start, "run_full");
        Ok(report)
    }

    fn walk_selection(
        &mut self,
        selection: &Selection,
        force: bool,
        report: &mut RunReport,
    ) -> Result<()> {
        let artist_ids = match selection {
            Selection::LikedArtists => self.liked_artist_ids(force, report)?,
            Selection::Artists(ids) => ids.clone(),
        };

        tracing::info!(artists = artist_ids.len(), "Starting run");
        for artist_id in &artist_ids {
            self.check_interrupt()?;
            self.artist_unit(artist_id, force, report)?;
        }
        Ok(())
    }

    /// Commit after a walk; an interruption becomes a flag on the report
    fn finish(&self, walked: Result<()>, report: &mut RunReport) -> Result<()> {
        match walked {
            Ok(()) => self.store.commit(),
            Err(HarvestError::Interrupted) => {
                report.interrupted = true;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Liked artists from the store, listing them from the catalog first when needed
    fn liked_artist_ids(&mut self, force: bool, report: &mut RunReport) -> Result<Vec<String>> {
        if force || !self.store.liked_artists_enumerated()? {
            report.catalog_requests += 1;
            match self.catalog.list_liked_artists() {
                Ok(listing) => {
                    let artists: Vec<ArtistStub> = listing
                        .into_iter()
                        .filter(|a| match a.validate() {
                            Ok(()) => true,
                            Err(e) => {
                                tracing::warn!(artist_id = %a.id, error = %e, "Dropping invalid artist");
                                false
                            }
                        })
                        .collect();
                    let added = self.store.upsert_liked_artists(&artists)?;
                    self.store.set_liked_artists_enumerated(true)?;
                    self.store.commit()?;
                    tracing::info!(listed = artists.len(), added, "Enumerated liked artists");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Could not list liked artists");
                    report.fail(EntityKind::Artist, "liked", &e);
                }
            }
        } else {
            tracing::debug!("Liked artists already enumerated");
        }
        self.store.liked_artist_ids()
    }

    /// One artist as a unit: a referential violation aborts it, not the run
    fn artist_unit(
        &mut self,
        artist_id: &str,
        force: bool,
        report: &mut RunReport,
    ) -> Result<()> {
        match self.walk_artist(artist_id, force, report) {
            Ok(_) => Ok(()),
            Err(HarvestError::ReferentialViolation { operation, reason }) => {
                tracing::error!(artist_id, %operation, %reason, "Aborting artist");
                report.fail(EntityKind::Artist, artist_id, reason);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Commit and stop if an interrupt was requested
    fn check_interrupt(&self) -> Result<()> {
        let requested = self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst));
        if requested {
            self.store.commit()?;
            tracing::warn!("Interrupted, progress saved");
            return Err(HarvestError::Interrupted);
        }
        Ok(())
    }

    fn pause_for(&mut self, duration: Duration) {
        if !duration.is_zero() {
            self.pause.pause(duration);
        }
    }
}
