//! Where songs land on disk

use std::path::{Path, PathBuf};

use crate::config::AudioFormat;
use crate::model::{AlbumInfo, SongStub};

const STRIPPED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '\'', '<', '>', '"'];

/// Make a string safe to use as a single path component
pub fn sanitize(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .map(|c| if c == '|' { '-' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_end_matches('.').to_string();
    if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned
    }
}

/// `<music_dir>/<artist>/<release_date> - <album>`
pub fn album_dir(music_dir: &Path, album: &AlbumInfo) -> PathBuf {
    let folder = if album.release_date.trim().is_empty() {
        album.name.clone()
    } else {
        format!("{} - {}", album.release_date, album.name)
    };
    music_dir
        .join(sanitize(&album.artist_name))
        .join(sanitize(&folder))
}

/// Destination of one song inside its album folder.
///
/// Albums spanning several discs get a `Disc NN` sub-folder.
pub fn song_path(
    album_dir: &Path,
    artist_name: &str,
    song: &SongStub,
    multi_disc: bool,
    format: AudioFormat,
) -> PathBuf {
    let dir = if multi_disc {
        album_dir.join(format!("Disc {:02}", song.disc_number))
    } else {
        album_dir.to_path_buf()
    };
    let stem = sanitize(&format!(
        "{} - {:02} - {}",
        artist_name, song.track_number, song.name
    ));
    dir.join(format!("{}.{}", stem, format.extension()))
}
