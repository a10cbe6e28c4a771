//! Command dispatch logic for harvest

use std::time::Instant;

use harvest_core::config::default_data_dir;
use harvest_core::error::Result;
use tracing::debug;

use crate::cli::Cli;

mod command;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);

    debug!(data_dir = %data_dir.display(), elapsed = ?start.elapsed(), "resolve_data_dir");

    let ctx = CommandContext::new(cli, &data_dir, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
