//! Remote catalog and playlist APIs consumed by the resolver and synchronizer.
//!
//! All calls block until the remote answers. Any error returned here is a
//! fatal [`SyncError::Remote`](crate::errors::SyncError) for the current run.

use crate::errors::Result;
use crate::models::{PlaylistContents, PlaylistSummary, SearchQuery, SearchResults};

/// Track search against the remote catalog.
pub trait Catalog {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults>;
}

/// Playlists owned by the authenticated user.
pub trait PlaylistService {
    fn list_owned_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    fn fetch_with_tracks(&self, playlist_key: &str) -> Result<PlaylistContents>;

    /// Remove `count` tracks starting at `start`; `track_keys` must name the
    /// tracks currently at those positions.
    fn remove_tracks_at(
        &self,
        playlist_key: &str,
        start: usize,
        count: usize,
        track_keys: &[String],
    ) -> Result<()>;

    fn append_tracks(&self, playlist_key: &str, track_keys: &[String]) -> Result<()>;

    /// Returns the new playlist's key.
    fn create_playlist(&self, name: &str, description: &str, track_keys: &[String])
        -> Result<String>;
}

/// Pre-authenticated session handle.
pub trait Session {
    fn authenticated(&self) -> bool;
}
