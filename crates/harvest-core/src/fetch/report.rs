use serde::Serialize;

use crate::catalog::EntityKind;

/// A unit of work that could not be completed in this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: EntityKind,
    pub id: String,
    pub reason: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &EntityKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&kind.to_string())
}

/// What a run did, for user-facing reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub artists_completed: u64,
    pub albums_completed: u64,
    pub songs_downloaded: u64,
    /// Songs found on disk and recorded without a transfer
    pub songs_adopted: u64,
    /// Songs the catalog cannot serve; resolved without a file
    pub songs_unavailable: u64,
    pub songs_failed: u64,
    pub artists_skipped: u64,
    pub albums_skipped: u64,
    pub songs_skipped: u64,
    /// Parents whose child listing came back empty
    pub empty_listings: u64,
    pub lyrics_saved: u64,
    pub catalog_requests: u64,
    pub failures: Vec<UnitFailure>,
    /// The run stopped early on request; everything counted here is committed
    pub interrupted: bool,
}

impl RunReport {
    /// Units whose completion flag was set during this run
    pub fn newly_completed(&self) -> u64 {
        self.artists_completed
            + self.albums_completed
            + self.songs_downloaded
            + self.songs_adopted
            + self.songs_unavailable
    }

    /// The run finished and no unit failed at the enumeration or transfer level
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    pub(crate) fn fail(&mut self, kind: EntityKind, id: &str, reason: impl ToString) {
        self.failures.push(UnitFailure {
            kind,
            id: id.to_string(),
            reason: reason.to_string(),
        });
    }
}
