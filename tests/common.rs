use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::PathBuf;

pub fn harvest() -> Command {
    cargo_bin_cmd!("harvest")
}

/// A throwaway data dir, music dir and manifest catalog
pub struct Env {
    pub root: tempfile::TempDir,
}

#[allow(dead_code)]
impl Env {
    /// A1 "Artist One": AL1 (S1, S2), AL2 (S3, unplayable S4); A2 "Artist Two": AL9 (S9)
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let sources = root.path().join("sources");
        fs::create_dir_all(&sources).unwrap();
        for id in ["S1", "S2", "S3", "S9"] {
            fs::write(sources.join(format!("{}.mp3", id)), id).unwrap();
        }

        let manifest = serde_json::json!({
            "liked_artists": ["A2", "A1"],
            "artists": [
                {
                    "id": "A1",
                    "name": "Artist One",
                    "albums": [
                        {
                            "id": "AL1",
                            "name": "First",
                            "release_date": "2001-02-03",
                            "songs": [
                                {"id": "S1", "name": "One", "track_number": 1, "source": "sources/S1.mp3",
                                 "lyrics": "[00:00.50]one"},
                                {"id": "S2", "name": "Two", "track_number": 2, "source": "sources/S2.mp3"}
                            ]
                        },
                        {
                            "id": "AL2",
                            "name": "Second",
                            "release_date": "2005",
                            "songs": [
                                {"id": "S3", "name": "Three", "track_number": 1, "source": "sources/S3.mp3"},
                                {"id": "S4", "name": "Gone", "track_number": 2, "source": "sources/S4.mp3",
                                 "playable": false}
                            ]
                        }
                    ]
                },
                {
                    "id": "A2",
                    "name": "Artist Two",
                    "albums": [
                        {
                            "id": "AL9",
                            "name": "Only",
                            "release_date": "2010-10-10",
                            "songs": [
                                {"id": "S9", "name": "Nine", "track_number": 1, "source": "sources/S9.mp3"}
                            ]
                        }
                    ]
                }
            ]
        });
        fs::write(
            root.path().join("catalog.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();

        Self { root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn music_dir(&self) -> PathBuf {
        self.root.path().join("music")
    }

    pub fn catalog(&self) -> PathBuf {
        self.root.path().join("catalog.json")
    }

    pub fn db(&self) -> PathBuf {
        self.data_dir().join("harvest.db")
    }

    /// `harvest` with this environment's directories and no anti-ban waits
    pub fn cmd(&self) -> Command {
        let mut cmd = harvest();
        cmd.env_remove("HARVEST_DATA_DIR")
            .env_remove("HARVEST_CATALOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--catalog")
            .arg(self.catalog())
            .arg("--music-dir")
            .arg(self.music_dir())
            .args(["--album-wait", "0", "--song-wait", "0"]);
        cmd
    }

    pub fn query_count(&self, sql: &str) -> i64 {
        let conn = rusqlite::Connection::open(self.db()).unwrap();
        conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }

    pub fn song_path(&self, song_id: &str) -> Option<PathBuf> {
        let conn = rusqlite::Connection::open(self.db()).unwrap();
        conn.query_row(
            "SELECT full_filepath FROM songs WHERE song_id = ?1",
            [song_id],
            |r| r.get::<_, Option<String>>(0),
        )
        .unwrap()
        .map(PathBuf::from)
    }
}
