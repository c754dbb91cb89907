//! End-to-end synchronization against a recording in-memory remote and a
//! file-backed resolution cache.

use std::cell::RefCell;
use std::collections::HashMap;

use playlist_sync::errors::{Result, SyncError};
use playlist_sync::models::{PlaylistContents, PlaylistSummary, SearchQuery, SearchResults};
use playlist_sync::remote::{Catalog, PlaylistService};
use playlist_sync::{
    CatalogRecord, PlaylistSynchronizer, RawTrackRef, ResolutionCache, SyncOutcome,
};

struct Playlist {
    key: String,
    name: String,
    tracks: Vec<String>,
}

/// Catalog searchable by exact query text, plus owned playlists.
#[derive(Default)]
struct MemoryRemote {
    catalog: HashMap<String, Vec<CatalogRecord>>,
    searches: RefCell<Vec<String>>,
    playlists: RefCell<Vec<Playlist>>,
}

impl MemoryRemote {
    fn with_track(mut self, query: &str, record: CatalogRecord) -> Self {
        self.catalog.entry(query.to_string()).or_default().push(record);
        self
    }

    fn with_playlist(self, key: &str, name: &str, tracks: &[&str]) -> Self {
        self.playlists.borrow_mut().push(Playlist {
            key: key.to_string(),
            name: name.to_string(),
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    fn tracks_of(&self, name: &str) -> Vec<String> {
        self.playlists
            .borrow()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.tracks.clone())
            .unwrap_or_default()
    }
}

impl Catalog for MemoryRemote {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        self.searches.borrow_mut().push(query.text.clone());
        let results = self.catalog.get(&query.text).cloned().unwrap_or_default();
        Ok(SearchResults {
            total_count: results.len() as i64,
            results,
        })
    }
}

impl PlaylistService for MemoryRemote {
    fn list_owned_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        Ok(self
            .playlists
            .borrow()
            .iter()
            .map(|p| PlaylistSummary {
                key: p.key.clone(),
                name: p.name.clone(),
            })
            .collect())
    }

    fn fetch_with_tracks(&self, playlist_key: &str) -> Result<PlaylistContents> {
        let playlists = self.playlists.borrow();
        let p = playlists
            .iter()
            .find(|p| p.key == playlist_key)
            .ok_or_else(|| SyncError::remote("get", "missing"))?;
        Ok(PlaylistContents {
            key: p.key.clone(),
            name: p.name.clone(),
            length: p.tracks.len(),
            tracks: p
                .tracks
                .iter()
                .map(|k| CatalogRecord::new(k.as_str(), "", ""))
                .collect(),
        })
    }

    fn remove_tracks_at(
        &self,
        playlist_key: &str,
        start: usize,
        count: usize,
        _track_keys: &[String],
    ) -> Result<()> {
        let mut playlists = self.playlists.borrow_mut();
        let p = playlists
            .iter_mut()
            .find(|p| p.key == playlist_key)
            .ok_or_else(|| SyncError::remote("removeFromPlaylist", "missing"))?;
        p.tracks.drain(start..start + count);
        Ok(())
    }

    fn append_tracks(&self, playlist_key: &str, track_keys: &[String]) -> Result<()> {
        let mut playlists = self.playlists.borrow_mut();
        let p = playlists
            .iter_mut()
            .find(|p| p.key == playlist_key)
            .ok_or_else(|| SyncError::remote("addToPlaylist", "missing"))?;
        p.tracks.extend_from_slice(track_keys);
        Ok(())
    }

    fn create_playlist(&self, name: &str, _description: &str, track_keys: &[String]) -> Result<String> {
        let key = format!("new-{}", self.playlists.borrow().len());
        self.playlists.borrow_mut().push(Playlist {
            key: key.clone(),
            name: name.to_string(),
            tracks: track_keys.to_vec(),
        });
        Ok(key)
    }
}

fn remote() -> MemoryRemote {
    MemoryRemote::default().with_track(
        "Daft Punk Get Lucky",
        CatalogRecord::new("t-lucky", "Get Lucky", "Daft Punk"),
    )
}

fn input() -> Vec<RawTrackRef> {
    vec![
        RawTrackRef::new("Daft Punk", "Get Lucky"),
        RawTrackRef::new("Unknown Artist", "Untitled 9999"),
    ]
}

#[test]
fn places_only_resolved_tracks_regardless_of_prior_contents() {
    let dir = tempfile::tempdir().unwrap();
    let remote = remote().with_playlist("p1", "Chart", &["old-1", "old-2", "old-3"]);
    let mut cache = ResolutionCache::open(&dir.path().join("found_tracks.sqlite3")).unwrap();

    let report = PlaylistSynchronizer::new(&remote, &mut cache)
        .sync("Chart", "Weekly chart", &input())
        .unwrap();
    cache.close().unwrap();

    assert_eq!(report.placed, 1);
    assert_eq!(report.requested, 2);
    assert_eq!(report.outcome, SyncOutcome::Updated);
    assert_eq!(remote.tracks_of("Chart"), vec!["t-lucky"]);
}

#[test]
fn second_run_is_served_from_cache_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("found_tracks.sqlite3");
    let remote = remote();
    let tracks = vec![RawTrackRef::new("Daft Punk", "Get Lucky")];

    let mut cache = ResolutionCache::open(&path).unwrap();
    let first = PlaylistSynchronizer::new(&remote, &mut cache)
        .sync("Chart", "", &tracks)
        .unwrap();
    cache.close().unwrap();
    let searches_after_first = remote.searches.borrow().len();
    assert_eq!(searches_after_first, 1);

    let mut cache = ResolutionCache::open(&path).unwrap();
    let second = PlaylistSynchronizer::new(&remote, &mut cache)
        .sync("Chart", "", &tracks)
        .unwrap();
    cache.close().unwrap();

    assert_eq!(remote.searches.borrow().len(), searches_after_first);
    assert_eq!(first.track_keys, second.track_keys);
    assert_eq!(first.outcome, SyncOutcome::Created);
    assert_eq!(second.outcome, SyncOutcome::Updated);
}

#[test]
fn repeated_sync_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let remote = remote().with_track(
        "Justice D.A.N.C.E. ",
        CatalogRecord::new("t-dance", "D.A.N.C.E.", "Justice"),
    );
    let tracks = vec![
        RawTrackRef::new("Justice", "D.A.N.C.E. (Radio Edit)"),
        RawTrackRef::new("Daft Punk", "Get Lucky"),
        RawTrackRef::new("Unknown Artist", "Untitled 9999"),
    ];
    let mut cache = ResolutionCache::open(&dir.path().join("found_tracks.sqlite3")).unwrap();

    PlaylistSynchronizer::new(&remote, &mut cache)
        .sync("Chart", "", &tracks)
        .unwrap();
    let first = remote.tracks_of("Chart");
    PlaylistSynchronizer::new(&remote, &mut cache)
        .sync("Chart", "", &tracks)
        .unwrap();
    cache.close().unwrap();

    assert_eq!(first, vec!["t-dance", "t-lucky"]);
    assert_eq!(remote.tracks_of("Chart"), first);
    assert_eq!(remote.playlists.borrow().len(), 1);
}
