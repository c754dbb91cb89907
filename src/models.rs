//! Core data models for playlist synchronization.
//!
//! Raw input pairs, catalog records returned by the remote search API, and
//! the playlist shapes consumed by the synchronizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Input Models
// ============================================================================

/// One `(artist, title)` pair exactly as an ingestion source supplied it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrackRef {
    pub artist: String,
    pub title: String,
}

impl RawTrackRef {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

impl<A: Into<String>, T: Into<String>> From<(A, T)> for RawTrackRef {
    fn from((artist, title): (A, T)) -> Self {
        RawTrackRef::new(artist, title)
    }
}

impl std::fmt::Display for RawTrackRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

// ============================================================================
// Catalog Models
// ============================================================================

/// Track record owned by the remote catalog.
///
/// Only `key`, `name` and `artist` are interpreted; every other field the
/// remote returns is carried along in `extra` so cached snapshots stay
/// complete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub key: String,
    pub name: String,
    pub artist: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogRecord {
    pub fn new(key: impl Into<String>, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            artist: artist.into(),
            extra: Map::new(),
        }
    }
}

/// Result type filter for catalog searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Track,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Track => "Track",
        }
    }
}

/// One catalog search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub kind: SearchKind,
    /// Ask the remote to match any term rather than requiring all of them.
    pub match_any: bool,
}

impl SearchQuery {
    pub fn tracks(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SearchKind::Track,
            match_any: true,
        }
    }
}

/// Search response in remote order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "track_count", default)]
    pub total_count: i64,
    #[serde(default)]
    pub results: Vec<CatalogRecord>,
}

impl SearchResults {
    /// A response with a zero count is a miss even if the remote padded
    /// `results`.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0 || self.results.is_empty()
    }
}

// ============================================================================
// Playlist Models
// ============================================================================

/// Entry from the caller's own playlist listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PlaylistSummary {
    pub key: String,
    pub name: String,
}

/// A playlist fetched together with its full track list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlaylistContents {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub tracks: Vec<CatalogRecord>,
}

impl PlaylistContents {
    pub fn track_keys(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.key.clone()).collect()
    }
}

// ============================================================================
// Run Results
// ============================================================================

/// Whether the synchronizer created the playlist or replaced an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
}

/// Summary of one synchronization run.
#[derive(Clone, Debug)]
pub struct SyncReport {
    pub requested: usize,
    pub placed: usize,
    pub playlist_key: String,
    pub outcome: SyncOutcome,
    pub track_keys: Vec<String>,
    /// Inputs that could not be resolved, for the caller's summary only.
    pub unresolved: Vec<RawTrackRef>,
}

impl SyncReport {
    /// Percentage of requested tracks that were placed.
    pub fn match_rate(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            100.0 * self.placed as f64 / self.requested as f64
        }
    }
}
