//! Playlist synchronization library - shared modules for all binaries.
//!
//! Resolves noisy `(artist, title)` pairs against a remote catalog and makes
//! a named remote playlist contain exactly the resolved tracks.

pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod remote;
pub mod resolver;
pub mod similarity;
pub mod sync;

pub use cache::{CacheKey, ResolutionCache};
pub use errors::{Result, SyncError};
pub use models::{CatalogRecord, RawTrackRef, SyncOutcome, SyncReport};
pub use resolver::{Resolution, TrackResolver};
pub use sync::PlaylistSynchronizer;
