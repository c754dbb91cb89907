//! Resolve a noisy `(artist, title)` pair to a single catalog record.
//!
//! Each positional (artist form, title form) pair becomes one catalog
//! search, in order. A search with no results moves on to the next pair.
//! The first search that returns anything decides the outcome: the first
//! candidate whose artist and name both match the original terms wins, and
//! if none match the track is not found. Later pairs are not tried.

use log::{debug, warn};

use crate::errors::Result;
use crate::models::{CatalogRecord, SearchQuery};
use crate::normalize::{form_pairs, Term};
use crate::remote::Catalog;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Found(CatalogRecord),
    /// `queries` is how many searches were issued before giving up.
    NotFound { queries: usize },
}

impl Resolution {
    pub fn into_record(self) -> Option<CatalogRecord> {
        match self {
            Resolution::Found(record) => Some(record),
            Resolution::NotFound { .. } => None,
        }
    }
}

pub struct TrackResolver<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> TrackResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, artist: &str, title: &str) -> Result<Resolution> {
        let artist = Term::new(artist);
        let title = Term::new(title);
        let mut queries = 0;

        for (artist_form, title_form) in form_pairs(&artist, &title) {
            let text = format!("{} {}", artist_form, title_form);
            debug!("Searching catalog: {}", text);
            let results = self.catalog.search(&SearchQuery::tracks(text.as_str()))?;
            queries += 1;

            if results.is_empty() {
                warn!("search failed for: {}", text);
                continue;
            }

            let candidate = results
                .results
                .into_iter()
                .find(|c| artist.matches(&c.artist) && title.matches(&c.name));
            return Ok(match candidate {
                Some(record) => Resolution::Found(record),
                None => {
                    warn!("search succeeded but match failed: {}", text);
                    Resolution::NotFound { queries }
                }
            });
        }

        Ok(Resolution::NotFound { queries })
    }
}
