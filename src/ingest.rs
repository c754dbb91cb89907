//! Reading raw `(artist, title)` pairs handed over by an ingestion source.
//!
//! Sources either write one `Artist - Title` line per track or a JSON array
//! of `[artist, title]` pairs / `{"artist": .., "title": ..}` objects.
//! Malformed entries become degenerate pairs rather than errors.

use std::io::{BufRead, Read};

use clap::ValueEnum;
use serde::Deserialize;

use crate::errors::{Result, SyncError};
use crate::models::RawTrackRef;

/// Separator used by chart feeds between artist and title
pub const DEFAULT_SEPARATOR: &str = " - ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Lines,
    Json,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPair {
    Fields(Vec<String>),
    Object {
        artist: String,
        #[serde(default)]
        title: String,
    },
}

impl From<JsonPair> for RawTrackRef {
    fn from(pair: JsonPair) -> Self {
        match pair {
            JsonPair::Fields(fields) => {
                let mut fields = fields.into_iter();
                let artist = fields.next().unwrap_or_default();
                let title = fields.next().unwrap_or_default();
                RawTrackRef::new(artist, title)
            }
            JsonPair::Object { artist, title } => RawTrackRef::new(artist, title),
        }
    }
}

/// Split once on `separator`. Without a separator the whole line is the
/// artist and the title is empty. Blank lines yield `None`.
pub fn parse_line(line: &str, separator: &str) -> Option<RawTrackRef> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    Some(match line.split_once(separator) {
        Some((artist, title)) => RawTrackRef::new(artist, title),
        None => RawTrackRef::new(line, ""),
    })
}

pub fn read_lines<R: BufRead>(reader: R, separator: &str) -> Result<Vec<RawTrackRef>> {
    let mut tracks = Vec::new();
    for line in reader.lines() {
        if let Some(track) = parse_line(&line?, separator) {
            tracks.push(track);
        }
    }
    Ok(tracks)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawTrackRef>> {
    let pairs: Vec<JsonPair> = serde_json::from_reader(reader)
        .map_err(|e| SyncError::Config(format!("invalid track list: {e}")))?;
    Ok(pairs.into_iter().map(RawTrackRef::from).collect())
}

pub fn read_pairs<R: BufRead>(
    reader: R,
    format: InputFormat,
    separator: &str,
) -> Result<Vec<RawTrackRef>> {
    match format {
        InputFormat::Lines => read_lines(reader, separator),
        InputFormat::Json => read_json(reader),
    }
}
