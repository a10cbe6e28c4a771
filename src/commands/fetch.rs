//! `harvest artist|album|liked` - run the resumable traversal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use harvest_core::error::{HarvestError, Result};
use harvest_core::fetch::{Orchestrator, RunReport, Selection};

use crate::cli::{Cli, OutputFormat};
use crate::commands::dispatch::CommandContext;

/// What a fetch command walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Artists(Vec<String>),
    Album { album_id: String, artist_id: String },
    Liked,
}

/// Exit status used when a second Ctrl-C abandons the run
const ABANDON_EXIT_CODE: i32 = 130;

/// Flag raised by Ctrl-C; the traversal checks it before every unit
///
/// A second Ctrl-C exits at once. Everything finished before the last commit
/// is already on disk.
fn interrupt_flag() -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);

    let _ = ctrlc::set_handler(move || {
        if raise_interrupt(&interrupted_clone) {
            tracing::warn!("Interrupted again, exiting without waiting for the current unit");
            std::process::exit(ABANDON_EXIT_CODE);
        }
        tracing::warn!("Interrupt requested, stopping after the current unit (Ctrl-C again to quit now)");
    });

    interrupted
}

/// Set the flag, returning whether it was already set
fn raise_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

pub fn execute(ctx: &CommandContext, target: FetchTarget, force: bool) -> Result<()> {
    let options = ctx.fetch_options()?;
    let catalog = ctx.open_catalog()?;
    let store = ctx.open_store()?;

    tracing::debug!(
        music_dir = %options.music_dir.display(),
        format = %options.audio_format,
        elapsed = ?ctx.start.elapsed(),
        "fetch_setup"
    );

    let result = {
        let mut orchestrator =
            Orchestrator::new(&store, &catalog, options).with_interrupt(interrupt_flag());
        match &target {
            FetchTarget::Artists(ids) if ids.len() == 1 => orchestrator.run_artist(&ids[0], force),
            FetchTarget::Artists(ids) => {
                orchestrator.run_full(&Selection::Artists(ids.clone()), force)
            }
            FetchTarget::Album {
                album_id,
                artist_id,
            } => orchestrator.run_album(album_id, artist_id),
            FetchTarget::Liked => orchestrator.run_full(&Selection::LikedArtists, force),
        }
    };

    // Completed work is flushed whether or not the run finished
    let closed = store.close();
    let report = result?;
    closed?;

    print_report(ctx.cli, &report)?;
    tracing::debug!(elapsed = ?ctx.start.elapsed(), "fetch_done");

    if report.interrupted {
        return Err(HarvestError::Interrupted);
    }
    if !report.is_success() {
        return Err(HarvestError::FailedOperation {
            operation: "fetch".to_string(),
            reason: format!(
                "{} unit(s) failed; run again to retry them",
                report.failures.len()
            ),
        });
    }
    Ok(())
}

fn print_report(cli: &Cli, report: &RunReport) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let mut output = serde_json::to_value(report)?;
            output["newly_completed"] = serde_json::json!(report.newly_completed());
            output["status"] = serde_json::json!(if report.is_success() { "ok" } else { "partial" });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if cli.quiet {
                return Ok(());
            }
            println!(
                "Songs: {} downloaded, {} already on disk, {} unavailable, {} failed, {} skipped",
                report.songs_downloaded,
                report.songs_adopted,
                report.songs_unavailable,
                report.songs_failed,
                report.songs_skipped
            );
            println!(
                "Albums completed: {}  Artists completed: {}",
                report.albums_completed, report.artists_completed
            );
            println!("Newly completed: {}", report.newly_completed());
            if report.interrupted {
                println!("Interrupted; run again to continue");
            }
            for failure in &report.failures {
                println!("  failed {} {}: {}", failure.kind, failure.id, failure.reason);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_interrupt_requests_exit() {
        let flag = AtomicBool::new(false);
        assert!(!raise_interrupt(&flag));
        assert!(flag.load(Ordering::SeqCst));
        assert!(raise_interrupt(&flag));
    }
}
