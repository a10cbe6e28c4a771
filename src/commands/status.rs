//! `harvest status` - summarize the fetch-state store

use harvest_core::error::Result;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let summary = store.summary()?;
    let path = store.path().to_path_buf();
    store.close()?;

    match ctx.cli.format {
        OutputFormat::Json => {
            let mut output = serde_json::to_value(&summary)?;
            output["store"] = serde_json::json!(path.display().to_string());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("Store: {}", path.display());
            println!("Schema version: {}", summary.schema_version);
            println!(
                "Liked artists: {}{}",
                summary.liked_artists,
                if summary.liked_artists_enumerated {
                    ""
                } else {
                    " (not enumerated yet)"
                }
            );
            println!(
                "Artists: {}/{} done",
                summary.artists.done, summary.artists.total
            );
            println!(
                "Albums:  {}/{} done",
                summary.albums.done, summary.albums.total
            );
            println!(
                "Songs:   {}/{} done ({} unavailable)",
                summary.songs.done, summary.songs.total, summary.songs_unavailable
            );
            if !ctx.cli.quiet && summary.lyrics > 0 {
                println!("Lyrics:  {}", summary.lyrics);
            }
        }
    }
    Ok(())
}
