//! Configuration for harvest
//!
//! Configuration is stored in `<data_dir>/config.toml`. A missing file means
//! defaults; command line flags override whatever the file says.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use types::{AntibanConfig, AudioFormat, HarvestConfig};

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default data directory (`~/.harvest`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".harvest"))
        .unwrap_or_else(|| PathBuf::from(".harvest"))
}

impl HarvestConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: HarvestConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `<data_dir>/config.toml`, falling back to defaults when absent
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}
