//! List resolution cache entries for auditing stale or wrong matches.
//!
//! Usage: cache-inspect [cache.sqlite3] [--filter TEXT]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use playlist_sync::config::default_cache_path;
use playlist_sync::ResolutionCache;

#[derive(Parser)]
#[command(name = "cache-inspect")]
#[command(about = "List cached (artist, title) → catalog record resolutions")]
struct Args {
    /// Cache file (default: ~/.cache/playlist-sync/found_tracks.sqlite3)
    cache: Option<PathBuf>,

    /// Only show entries whose key or record mentions this text (case-insensitive)
    #[arg(long)]
    filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.cache.unwrap_or_else(default_cache_path);
    if !path.exists() {
        println!("No cache at {}", path.display());
        return Ok(());
    }

    let cache = ResolutionCache::open(&path)
        .with_context(|| format!("Failed to open cache {}", path.display()))?;
    let entries = cache.entries().context("Failed to read cache entries")?;
    cache.close().context("Failed to close cache")?;

    let filter = args.filter.map(|f| f.to_lowercase());
    let mut shown = 0;
    for (key, record) in &entries {
        if let Some(f) = &filter {
            let haystack = format!("{} {} {}", key, record.artist, record.name).to_lowercase();
            if !haystack.contains(f.as_str()) {
                continue;
            }
        }
        println!("{}  →  [{}] {} - {}", key, record.key, record.artist, record.name);
        shown += 1;
    }

    println!("{:-<60}", "");
    println!("{} of {} entries", shown, entries.len());
    Ok(())
}
