use super::{seed_album, song};
use crate::db::*;
use crate::error::HarvestError;
use crate::model::{AlbumStub, ArtistStub};
use tempfile::tempdir;

fn open() -> (tempfile::TempDir, Store) {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn test_predicates_false_for_absent_rows() {
    let (_dir, store) = open();
    assert!(!store.is_artist_done("nope").unwrap());
    assert!(!store.is_album_done("nope").unwrap());
    assert!(!store.is_song_done("nope").unwrap());
    assert!(!store.albums_enumerated("nope").unwrap());
    assert!(!store.songs_enumerated("nope").unwrap());
    assert!(!store.liked_artists_enumerated().unwrap());
    assert!(!store.lyrics_downloaded("nope").unwrap());
}

#[test]
fn test_predicates_false_for_explicit_zero() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.set_albums_enumerated("A1", false).unwrap();

    assert!(!store.is_artist_done("A1").unwrap());
    assert!(!store.is_album_done("AL1").unwrap());
    assert!(!store.albums_enumerated("A1").unwrap());
}

#[test]
fn test_artist_completion_sets_timestamp_once() {
    let (_dir, store) = open();
    store.upsert_artist(&ArtistStub::new("A1", "Name")).unwrap();

    assert!(store.mark_artist_done("A1").unwrap());
    let first = store.artist("A1").unwrap().unwrap();
    assert!(first.download_completed);
    assert!(first.completed_at.is_some());

    assert!(!store.mark_artist_done("A1").unwrap());
    let second = store.artist("A1").unwrap().unwrap();
    assert_eq!(first.completed_at, second.completed_at);
}

#[test]
fn test_marking_absent_rows_changes_nothing() {
    let (dir, store) = open();
    assert!(!store.mark_artist_done("ghost").unwrap());
    assert!(!store.mark_album_done("ghost").unwrap());
    assert!(!store
        .mark_song_done("ghost", &dir.path().join("ghost.mp3"))
        .unwrap());
    assert!(store.artist("ghost").unwrap().is_none());
}

#[test]
fn test_reenumeration_does_not_duplicate_or_rename_albums() {
    let (_dir, store) = open();
    store.upsert_artist(&ArtistStub::new("A1", "Name")).unwrap();

    let first = [AlbumStub::new("AL1", "Original"), AlbumStub::new("AL2", "Two")];
    assert_eq!(store.upsert_albums("A1", &first).unwrap(), 2);

    let second = [
        AlbumStub::new("AL1", "Renamed"),
        AlbumStub::new("AL2", "Two"),
        AlbumStub::new("AL3", "New"),
    ];
    assert_eq!(store.upsert_albums("A1", &second).unwrap(), 1);

    assert_eq!(
        store.album_ids_for_artist("A1").unwrap(),
        vec!["AL1", "AL2", "AL3"]
    );
    assert_eq!(store.album("AL1").unwrap().unwrap().name, "Original");
}

#[test]
fn test_reenumeration_keeps_song_completion() {
    let (dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.upsert_songs(&[song("S1", "AL1", "A1", 1)]).unwrap();
    let path = dir.path().join("s1.mp3");
    store.mark_song_done("S1", &path).unwrap();

    let mut renamed = song("S1", "AL1", "A1", 7);
    renamed.name = "Other".to_string();
    assert_eq!(store.upsert_songs(&[renamed]).unwrap(), 0);

    let stored = store.song("S1").unwrap().unwrap();
    assert!(stored.download_completed);
    assert_eq!(stored.track_number, 1);
    assert_eq!(stored.name, "Song S1");
    assert_eq!(stored.full_filepath.as_deref(), Some(path.as_path()));
}

#[test]
fn test_song_requires_existing_album() {
    let (_dir, store) = open();
    store.upsert_artist(&ArtistStub::new("A1", "Name")).unwrap();

    let err = store
        .upsert_songs(&[song("S1", "missing", "A1", 1)])
        .unwrap_err();
    assert!(matches!(err, HarvestError::ReferentialViolation { .. }));
}

#[test]
fn test_album_requires_existing_artist() {
    let (_dir, store) = open();
    let err = store
        .upsert_albums("missing", &[AlbumStub::new("AL1", "x")])
        .unwrap_err();
    assert!(matches!(err, HarvestError::ReferentialViolation { .. }));
}

#[test]
fn test_mark_song_done_requires_absolute_path() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.upsert_songs(&[song("S1", "AL1", "A1", 1)]).unwrap();

    let err = store
        .mark_song_done("S1", std::path::Path::new("relative/s1.mp3"))
        .unwrap_err();
    assert!(matches!(err, HarvestError::InvalidValue { .. }));
    assert!(!store.is_song_done("S1").unwrap());
}

#[test]
fn test_enumeration_markers_upsert() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");

    store.set_albums_enumerated("A1", true).unwrap();
    store.set_albums_enumerated("A1", true).unwrap();
    assert!(store.albums_enumerated("A1").unwrap());

    store.set_songs_enumerated("AL1", true).unwrap();
    assert!(store.songs_enumerated("AL1").unwrap());
    store.set_songs_enumerated("AL1", false).unwrap();
    assert!(!store.songs_enumerated("AL1").unwrap());

    store.set_liked_artists_enumerated(true).unwrap();
    store.set_liked_artists_enumerated(true).unwrap();
    assert!(store.liked_artists_enumerated().unwrap());
    let rows: i64 = store
        .conn
        .query_row("SELECT COUNT(*) FROM fetched_artists", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_liked_artist_row_is_pinned() {
    let (_dir, store) = open();
    let err = store
        .conn
        .execute("INSERT INTO fetched_artists VALUES (1, 1)", [])
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn test_liked_artists_keep_listing_order() {
    let (_dir, store) = open();
    let listing = [
        ArtistStub::new("B", "Second Letter"),
        ArtistStub::new("A", "First Letter"),
    ];
    assert_eq!(store.upsert_liked_artists(&listing).unwrap(), 2);
    assert_eq!(store.upsert_liked_artists(&listing).unwrap(), 0);
    assert_eq!(store.liked_artist_ids().unwrap(), vec!["B", "A"]);
}

#[test]
fn test_placeholder_artist_name_is_refined_once() {
    let (_dir, store) = open();
    store.upsert_artist(&ArtistStub::new("A1", "A1")).unwrap();

    assert!(store.refine_artist_name("A1", "Real Name").unwrap());
    assert!(!store.refine_artist_name("A1", "Another Name").unwrap());
    assert_eq!(store.artist("A1").unwrap().unwrap().name, "Real Name");
}

#[test]
fn test_cascade_delete_removes_children() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.upsert_songs(&[song("S1", "AL1", "A1", 1)]).unwrap();
    store.set_songs_enumerated("AL1", true).unwrap();

    store
        .conn
        .execute("DELETE FROM artists WHERE artist_id = 'A1'", [])
        .unwrap();

    assert!(store.album("AL1").unwrap().is_none());
    assert!(store.song("S1").unwrap().is_none());
    assert!(!store.songs_enumerated("AL1").unwrap());
}

#[test]
fn test_lyrics_flag() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.upsert_songs(&[song("S1", "AL1", "A1", 1)]).unwrap();

    assert!(store.mark_lyrics_downloaded("S1").unwrap());
    assert!(!store.mark_lyrics_downloaded("S1").unwrap());
    assert!(store.lyrics_downloaded("S1").unwrap());
}

#[test]
fn test_songs_for_album_in_listing_order() {
    let (_dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store
        .upsert_songs(&[
            song("S9", "AL1", "A1", 2),
            song("S1", "AL1", "A1", 1),
        ])
        .unwrap();

    let ids: Vec<_> = store
        .songs_for_album("AL1")
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["S9", "S1"]);
}

#[test]
fn test_unavailable_song_is_done_without_file() {
    let (dir, store) = open();
    seed_album(&store, "A1", "AL1");
    store.upsert_songs(&[song("S1", "AL1", "A1", 1)]).unwrap();

    assert!(store.mark_song_unavailable("S1").unwrap());
    let stored = store.song("S1").unwrap().unwrap();
    assert!(stored.download_completed);
    assert!(stored.completed_at.is_some());
    assert!(stored.full_filepath.is_none());

    assert!(!store
        .mark_song_done("S1", &dir.path().join("s1.mp3"))
        .unwrap());
    assert!(store.song("S1").unwrap().unwrap().full_filepath.is_none());
}
