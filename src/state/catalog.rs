use std::collections::HashSet;

use super::data::{CatalogStats, Film, FilmId};
use super::library::DurableSlot;
use crate::error::CatalogResult;

/// Slot key the serialized film list lives under
pub const CATALOG_KEY: &str = "cine_films";

/// Catalog shipped with the application, used until the user has saved state
const BUNDLED_FILMS: &str = include_str!("../../data/films.json");

/// Parse the bundled catalog.
pub fn bundled_films() -> Vec<Film> {
    serde_json::from_str(BUNDLED_FILMS).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Bundled catalog is malformed");
        Vec::new()
    })
}

/// The single source of truth for film records.
///
/// Every mutation bumps `revision` and rewrites the whole list to the
/// durable slot. Readers compare revisions to know when to re-derive.
pub struct CatalogStore {
    films: Vec<Film>,
    slot: Box<dyn DurableSlot>,
    revision: u64,
}

impl CatalogStore {
    /// Rehydrate the catalog from `slot`, falling back to the bundled list
    pub fn open(slot: Box<dyn DurableSlot>) -> Self {
        Self::open_with_defaults(slot, bundled_films)
    }

    /// Rehydrate the catalog from `slot`, falling back to `defaults()` when the
    /// slot is empty, unreadable or malformed
    pub fn open_with_defaults(
        slot: Box<dyn DurableSlot>,
        defaults: impl FnOnce() -> Vec<Film>,
    ) -> Self {
        let films = match Self::rehydrate(slot.as_ref()) {
            Ok(Some(films)) => {
                tracing::info!(count = films.len(), "Catalog rehydrated from storage");
                films
            }
            Ok(None) => {
                tracing::info!("No saved catalog, using bundled list");
                defaults()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved catalog unreadable, using bundled list");
                defaults()
            }
        };

        Self {
            films: dedupe(films),
            slot,
            revision: 0,
        }
    }

    fn rehydrate(slot: &dyn DurableSlot) -> CatalogResult<Option<Vec<Film>>> {
        match slot.read(CATALOG_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Current film records in catalog order
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn get(&self, id: FilmId) -> Option<&Film> {
        self.films.iter().find(|f| f.id == id)
    }

    /// Change counter, bumped on every commit
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.films.len(),
            watched: self.films.iter().filter(|f| f.watched).count(),
        }
    }

    /// Flip the watched flag of `id`.
    ///
    /// Returns `false` (and persists nothing) when no film has that id.
    pub fn toggle_watched(&mut self, id: FilmId) -> bool {
        let Some(film) = self.films.iter_mut().find(|f| f.id == id) else {
            tracing::debug!(film_id = %id, "Toggle ignored, unknown film");
            return false;
        };

        film.watched = !film.watched;
        tracing::info!(film_id = %id, watched = film.watched, "Watched state toggled");
        self.commit();
        true
    }

    /// Merge enrichment results into the poster field, in a single commit.
    ///
    /// Unknown ids are skipped. Returns how many records were updated.
    pub fn apply_posters<I, S>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = (FilmId, S)>,
        S: Into<String>,
    {
        let mut applied = 0;
        for (id, poster) in updates {
            if let Some(film) = self.films.iter_mut().find(|f| f.id == id) {
                film.poster = Some(poster.into());
                applied += 1;
            }
        }

        if applied > 0 {
            self.commit();
        }
        applied
    }

    /// Bump the revision and persist the full list
    fn commit(&mut self) {
        self.revision += 1;
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, revision = self.revision, "Failed to persist catalog");
        }
    }

    fn persist(&mut self) -> CatalogResult<()> {
        let json = serde_json::to_string(&self.films)?;
        self.slot.write(CATALOG_KEY, &json)
    }
}

/// Drop records whose id was already seen, keeping the first
fn dedupe(films: Vec<Film>) -> Vec<Film> {
    let mut seen = HashSet::with_capacity(films.len());
    let before = films.len();
    let films: Vec<Film> = films.into_iter().filter(|f| seen.insert(f.id)).collect();

    if films.len() != before {
        tracing::warn!(
            dropped = before - films.len(),
            "Duplicate film ids dropped from catalog"
        );
    }
    films
}
