use harvest_core::config::AudioFormat;

/// Parse `--audio-format` for clap
pub fn parse_audio_format(s: &str) -> Result<AudioFormat, String> {
    s.parse().map_err(|e: harvest_core::error::HarvestError| e.to_string())
}
