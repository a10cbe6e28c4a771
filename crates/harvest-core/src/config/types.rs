//! Configuration type definitions

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

/// Audio container requested from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Ogg,
    /// Keep whatever the catalog serves, without conversion
    Source,
}

impl AudioFormat {
    /// Extension used for the requested destination path
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg | AudioFormat::Source => "ogg",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "mp3"),
            AudioFormat::Ogg => write!(f, "ogg"),
            AudioFormat::Source => write!(f, "source"),
        }
    }
}

impl FromStr for AudioFormat {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "ogg" => Ok(AudioFormat::Ogg),
            "source" => Ok(AudioFormat::Source),
            other => Err(HarvestError::invalid_value(
                "audio format (expected mp3, ogg or source)",
                other,
            )),
        }
    }
}

/// Harvest configuration, read from `<data_dir>/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Root folder for downloaded music
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    #[serde(default)]
    pub audio_format: AudioFormat,

    /// Adopt files already present at the destination instead of downloading
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,

    /// Fetch lyrics next to each downloaded song
    #[serde(default)]
    pub lyrics: bool,

    #[serde(default)]
    pub antiban: AntibanConfig,
}

/// Pauses between completed units of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntibanConfig {
    /// Seconds to wait after an album (or artist) that did real work
    #[serde(default = "default_album_wait_secs")]
    pub album_wait_secs: u64,

    /// Seconds to wait after each transferred song
    #[serde(default = "default_song_wait_secs")]
    pub song_wait_secs: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            audio_format: AudioFormat::default(),
            skip_existing: default_skip_existing(),
            lyrics: false,
            antiban: AntibanConfig::default(),
        }
    }
}

impl Default for AntibanConfig {
    fn default() -> Self {
        Self {
            album_wait_secs: default_album_wait_secs(),
            song_wait_secs: default_song_wait_secs(),
        }
    }
}

fn default_music_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("Music"))
        .join("Harvest")
}

fn default_skip_existing() -> bool {
    true
}

fn default_album_wait_secs() -> u64 {
    30
}

fn default_song_wait_secs() -> u64 {
    5
}
