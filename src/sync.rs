//! Make a named remote playlist contain exactly the resolved input tracks.
//!
//! Tracks are looked up in the resolution cache first and resolved against
//! the catalog on a miss. Unresolvable inputs are dropped. An existing
//! playlist is cleared and rewritten in full; a missing one is created.
//! Clearing and appending are separate remote calls, so a failure between
//! them leaves the playlist empty. The remove count is the playlist's
//! reported `length`, even when the reply lists fewer tracks.

use log::info;

use crate::cache::{CacheKey, ResolutionCache};
use crate::errors::Result;
use crate::models::{CatalogRecord, RawTrackRef, SyncOutcome, SyncReport};
use crate::progress::{playlist_spinner, ResolveProgress};
use crate::remote::{Catalog, PlaylistService};
use crate::resolver::{Resolution, TrackResolver};

pub struct PlaylistSynchronizer<'a, R: Catalog + PlaylistService + ?Sized> {
    remote: &'a R,
    cache: &'a mut ResolutionCache,
}

impl<'a, R: Catalog + PlaylistService + ?Sized> PlaylistSynchronizer<'a, R> {
    pub fn new(remote: &'a R, cache: &'a mut ResolutionCache) -> Self {
        Self { remote, cache }
    }

    /// Cached record for the exact pair, or a fresh resolution that is then
    /// written to the cache.
    pub fn lookup(&mut self, track: &RawTrackRef) -> Result<Option<CatalogRecord>> {
        let key = CacheKey::new(&track.artist, &track.title);
        info!("Looking for: {}", key);

        if let Some(record) = self.cache.get(&key)? {
            info!(" found it in the cache: {}", record.key);
            return Ok(Some(record));
        }

        match TrackResolver::new(self.remote).resolve(&track.artist, &track.title)? {
            Resolution::Found(record) => {
                info!(" found it on the site: {}", record.key);
                self.cache.put(&key, &record)?;
                Ok(Some(record))
            }
            Resolution::NotFound { queries } => {
                info!(" not found after {} queries", queries);
                Ok(None)
            }
        }
    }

    /// Resolve every input in order, splitting them into found records and
    /// unresolved inputs.
    pub fn resolve_all(
        &mut self,
        tracks: &[RawTrackRef],
    ) -> Result<(Vec<CatalogRecord>, Vec<RawTrackRef>)> {
        let mut progress = ResolveProgress::start(tracks.len());
        let mut found = Vec::with_capacity(tracks.len());
        let mut unresolved = Vec::new();

        for track in tracks {
            match self.lookup(track)? {
                Some(record) => {
                    found.push(record);
                    progress.record(true);
                }
                None => {
                    unresolved.push(track.clone());
                    progress.record(false);
                }
            }
        }

        progress.finish();
        Ok((found, unresolved))
    }

    pub fn sync(
        &mut self,
        name: &str,
        description: &str,
        tracks: &[RawTrackRef],
    ) -> Result<SyncReport> {
        let (found, unresolved) = self.resolve_all(tracks)?;
        info!("Found {} / {} tracks", found.len(), tracks.len());

        let track_keys: Vec<String> = found.into_iter().map(|r| r.key).collect();

        let spinner = playlist_spinner(name);
        let (playlist_key, outcome) = self.write_playlist(name, description, &track_keys)?;
        spinner.finish_with_message(match outcome {
            SyncOutcome::Created => "Created the playlist",
            SyncOutcome::Updated => "Updated the playlist",
        });

        Ok(SyncReport {
            requested: tracks.len(),
            placed: track_keys.len(),
            playlist_key,
            outcome,
            track_keys,
            unresolved,
        })
    }

    fn write_playlist(
        &self,
        name: &str,
        description: &str,
        track_keys: &[String],
    ) -> Result<(String, SyncOutcome)> {
        let existing = self
            .remote
            .list_owned_playlists()?
            .into_iter()
            .find(|p| p.name == name);

        let Some(summary) = existing else {
            let key = self.remote.create_playlist(name, description, track_keys)?;
            info!("Created the playlist {}", key);
            return Ok((key, SyncOutcome::Created));
        };

        info!("Found the playlist {}", summary.key);
        let current = self.remote.fetch_with_tracks(&summary.key)?;
        if current.length > 0 {
            self.remote
                .remove_tracks_at(&summary.key, 0, current.length, &current.track_keys())?;
        }
        if !track_keys.is_empty() {
            self.remote.append_tracks(&summary.key, track_keys)?;
        }
        info!("Updated the playlist {}", summary.key);
        Ok((summary.key, SyncOutcome::Updated))
    }
}
