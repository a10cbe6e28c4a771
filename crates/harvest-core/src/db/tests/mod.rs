mod predicates;

use crate::model::{AlbumStub, ArtistStub, SongStub};

pub(crate) fn song(id: &str, album_id: &str, artist_id: &str, track: u32) -> SongStub {
    SongStub {
        id: id.to_string(),
        album_id: album_id.to_string(),
        artist_id: artist_id.to_string(),
        name: format!("Song {}", id),
        track_number: track,
        disc_number: 1,
        quality_kbps: 320,
    }
}

pub(crate) fn seed_album(store: &super::Store, artist_id: &str, album_id: &str) {
    store
        .upsert_artist(&ArtistStub::new(artist_id, format!("Artist {}", artist_id)))
        .unwrap();
    store
        .upsert_albums(
            artist_id,
            &[AlbumStub::new(album_id, format!("Album {}", album_id))],
        )
        .unwrap();
}
