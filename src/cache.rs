//! Persistent resolution cache.
//!
//! Maps the exact `(artist, title)` an ingestion source supplied to the
//! catalog record it resolved to, so repeat runs skip the remote search.
//! Entries never expire and are never refreshed from the catalog.
//!
//! ```sql
//! CREATE TABLE found_tracks (
//!     cache_key   TEXT PRIMARY KEY,   -- JSON ["artist","title"]
//!     record      TEXT NOT NULL,      -- JSON CatalogRecord snapshot
//!     created_at  INTEGER NOT NULL    -- unix seconds
//! );
//! ```
//!
//! Every `put` autocommits. The connection holds an exclusive lock for its
//! whole lifetime, so a second process opening the same file fails at open.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::{Result, SyncError};
use crate::models::CatalogRecord;

// ============================================================================
// Cache Key
// ============================================================================

/// Canonical, case-preserving serialization of a raw `(artist, title)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(artist: &str, title: &str) -> Self {
        // serializing a pair of &str cannot fail
        let encoded = serde_json::to_string(&(artist, title)).unwrap_or_default();
        CacheKey(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Cache
// ============================================================================

pub struct ResolutionCache {
    conn: Connection,
}

impl ResolutionCache {
    /// Open (creating if needed) the cache file and take the exclusive lock.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!("Opened resolution cache at {}", path.display());
        Self::init(conn)
    }

    /// Cache that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // a locked file is an immediate error, not a wait
        conn.busy_timeout(Duration::ZERO)?;
        conn.execute_batch(
            "PRAGMA locking_mode = EXCLUSIVE;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;

             CREATE TABLE IF NOT EXISTS found_tracks (
                 cache_key TEXT PRIMARY KEY,
                 record TEXT NOT NULL,
                 created_at INTEGER NOT NULL
             );

             BEGIN EXCLUSIVE;
             COMMIT;",
        )?;
        Ok(Self { conn })
    }

    pub fn get(&self, key: &CacheKey) -> Result<Option<CatalogRecord>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM found_tracks WHERE cache_key = ?1",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store a snapshot; durable once this returns.
    pub fn put(&mut self, key: &CacheKey, record: &CatalogRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.conn.execute(
            "INSERT OR REPLACE INTO found_tracks (cache_key, record, created_at)
             VALUES (?1, ?2, ?3)",
            params![key.as_str(), json, now],
        )?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM found_tracks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> Result<Vec<(CacheKey, CatalogRecord)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cache_key, record FROM found_tracks ORDER BY rowid")?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let record: String = row.get(1)?;
            entries.push((CacheKey(key), serde_json::from_str(&record)?));
        }
        Ok(entries)
    }

    /// Checkpoint and close, surfacing any close failure.
    pub fn close(self) -> Result<()> {
        // in-memory databases have no WAL to checkpoint; ignore that result
        let _ = self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);");
        self.conn
            .close()
            .map_err(|(_, err)| SyncError::Cache(err))
    }
}
