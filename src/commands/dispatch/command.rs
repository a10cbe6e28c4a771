//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use harvest_core::bail_usage;
use harvest_core::catalog::ManifestCatalog;
use harvest_core::config::HarvestConfig;
use harvest_core::db::Store;
use harvest_core::error::Result;
use harvest_core::fetch::FetchOptions;

use crate::cli::{Cli, Commands};
use crate::commands::fetch::{self, FetchTarget};
use crate::commands::{refs, status};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub data_dir: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, data_dir: &'a PathBuf, start: Instant) -> Self {
        Self {
            cli,
            data_dir,
            start,
        }
    }

    pub fn open_store(&self) -> Result<Store> {
        Store::open(self.data_dir)
    }

    /// Config file values with command line overrides applied
    pub fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = HarvestConfig::load_or_default(self.data_dir)?;
        let cli = self.cli;
        if let Some(dir) = &cli.music_dir {
            config.music_dir = dir.clone();
        }
        if let Some(format) = cli.audio_format {
            config.audio_format = format;
        }
        if let Some(secs) = cli.album_wait {
            config.antiban.album_wait_secs = secs;
        }
        if let Some(secs) = cli.song_wait {
            config.antiban.song_wait_secs = secs;
        }
        if cli.no_skip_existing {
            config.skip_existing = false;
        }
        if cli.lyrics {
            config.lyrics = true;
        }
        Ok(config)
    }

    pub fn fetch_options(&self) -> Result<FetchOptions> {
        let config = self.load_config()?;
        Ok(FetchOptions::from_config(&config))
    }

    pub fn open_catalog(&self) -> Result<ManifestCatalog> {
        let Some(path) = self.cli.catalog.as_deref() else {
            bail_usage!("no catalog given; pass --catalog <FILE> or set HARVEST_CATALOG");
        };
        ManifestCatalog::load(resolve(path).as_path())
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("harvest {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Resumable bulk fetcher for a music catalog.");
        println!();
        println!("Run `harvest --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Artist { refs: inputs, force } => {
                let artist_ids = refs::artist_ids(inputs)?;
                fetch::execute(ctx, FetchTarget::Artists(artist_ids), *force)
            }
            Commands::Album { reference, artist } => {
                let album_id = refs::album_id(reference)?;
                let artist_id = refs::artist_id(artist)?;
                fetch::execute(
                    ctx,
                    FetchTarget::Album {
                        album_id,
                        artist_id,
                    },
                    false,
                )
            }
            Commands::Liked { force } => fetch::execute(ctx, FetchTarget::Liked, *force),
            Commands::Status => status::execute(ctx),
        }
    }
}
