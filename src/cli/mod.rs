//! CLI argument parsing for harvest
//!
//! Global flags select the data directory, the catalog and the output format;
//! fetch settings given here override `<data_dir>/config.toml`.

pub mod output;
pub mod parse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use harvest_core::config::AudioFormat;
pub use output::OutputFormat;
use parse::parse_audio_format;

/// Harvest - resumable bulk fetcher for a music catalog
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding harvest.db and config.toml (default: ~/.harvest)
    #[arg(long, global = true, env = "HARVEST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Catalog manifest (JSON) to fetch from
    #[arg(long, global = true, env = "HARVEST_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. `harvest=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Root folder for downloaded music
    #[arg(long, global = true)]
    pub music_dir: Option<PathBuf>,

    /// Audio format to request (mp3, ogg, source)
    #[arg(long, global = true, value_parser = parse_audio_format)]
    pub audio_format: Option<AudioFormat>,

    /// Seconds to wait after each album that did work
    #[arg(long, global = true, env = "ANTI_BAN_WAIT_TIME_ALBUMS")]
    pub album_wait: Option<u64>,

    /// Seconds to wait after each downloaded song
    #[arg(long, global = true, env = "ANTI_BAN_WAIT_TIME")]
    pub song_wait: Option<u64>,

    /// Download even when a file with the same name already exists
    #[arg(long, global = true)]
    pub no_skip_existing: bool,

    /// Save synced lyrics next to each song
    #[arg(long, global = true)]
    pub lyrics: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every album of one or more artists
    Artist {
        /// Artist ids or catalog URLs; several may be joined with `,` or `;`
        #[arg(required = true)]
        refs: Vec<String>,

        /// Re-list albums and songs even for completed artists
        #[arg(long)]
        force: bool,
    },

    /// Fetch a single album
    Album {
        /// Album id or catalog URL
        reference: String,

        /// Artist the album is filed under
        #[arg(long)]
        artist: String,
    },

    /// Fetch every liked artist
    Liked {
        /// Re-list liked artists and their albums
        #[arg(long)]
        force: bool,
    },

    /// Show what the store knows
    Status,
}
