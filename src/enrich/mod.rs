//! Poster enrichment
//!
//! This module handles:
//! - Picking the films that still lack a poster (bounded per run)
//! - Looking each one up, one after the other, through a `PosterLookup`
//! - Collecting per-film outcomes into a report the store merges in one commit
//! - Downloading and caching poster thumbnails for display (poster_cache.rs)
use std::sync::Arc;

use crate::error::CatalogResult;
use crate::state::data::{Film, FilmId};

pub mod poster_cache;
pub mod tmdb;

/// Default number of films looked up per run
pub const ENRICHMENT_CAP: usize = 30;

/// Lookup service mapping a film to a poster URL
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterLookup: Send + Sync {
    /// Full poster URL of the best match, `None` when nothing matched.
    /// The year narrows the search when known.
    async fn find_poster(&self, title: &str, year: Option<i32>) -> CatalogResult<Option<String>>;
}

/// A film selected for lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: FilmId,
    pub title: String,
    pub year: Option<i32>,
}

/// Result of looking up one film
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(String),
    NoMatch,
    Failed(String),
}

/// Outcomes of one enrichment run, in lookup order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub outcomes: Vec<(FilmId, LookupOutcome)>,
}

impl EnrichmentReport {
    /// Poster URLs to merge into the catalog
    pub fn posters(&self) -> impl Iterator<Item = (FilmId, &str)> {
        self.outcomes.iter().filter_map(|(id, outcome)| match outcome {
            LookupOutcome::Found(url) => Some((*id, url.as_str())),
            _ => None,
        })
    }

    pub fn found(&self) -> usize {
        self.posters().count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, LookupOutcome::Failed(_)))
            .count()
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }
}

/// First `cap` films without a poster, in catalog order
pub fn select_candidates(films: &[Film], cap: usize) -> Vec<Candidate> {
    films
        .iter()
        .filter(|film| film.needs_poster())
        .take(cap)
        .map(|film| Candidate {
            id: film.id,
            title: film.title.clone(),
            year: film.year,
        })
        .collect()
}

/// Look up every candidate in order, one request at a time.
///
/// Failures are logged and recorded, never retried, and never stop the run.
pub async fn run(candidates: Vec<Candidate>, lookup: Arc<dyn PosterLookup>) -> EnrichmentReport {
    tracing::info!(candidates = candidates.len(), "Poster enrichment started");

    let mut report = EnrichmentReport {
        outcomes: Vec::with_capacity(candidates.len()),
    };

    for candidate in candidates {
        let outcome = match lookup.find_poster(&candidate.title, candidate.year).await {
            Ok(Some(url)) => LookupOutcome::Found(url),
            Ok(None) => {
                tracing::debug!(film_id = %candidate.id, title = %candidate.title, "No poster match");
                LookupOutcome::NoMatch
            }
            Err(e) => {
                tracing::warn!(
                    film_id = %candidate.id,
                    title = %candidate.title,
                    error = %e,
                    "Poster lookup failed"
                );
                LookupOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((candidate.id, outcome));
    }

    tracing::info!(
        attempted = report.attempted(),
        found = report.found(),
        failed = report.failed(),
        "Poster enrichment finished"
    );

    report
}
