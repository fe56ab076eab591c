//! View model: filtering, searching and sorting of the catalog
//!
//! Everything here is a pure function of the catalog and the query.
//! `ViewModel` only memoizes the last derivation.
use std::collections::BTreeSet;
use std::fmt;

use super::catalog::CatalogStore;
use super::data::Film;

/// Watched-status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Unwatched,
    Watched,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [Self::All, Self::Unwatched, Self::Watched];

    fn accepts(self, watched: bool) -> bool {
        match self {
            Self::All => true,
            Self::Watched => watched,
            Self::Unwatched => !watched,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "Tous"),
            Self::Unwatched => write!(f, "À voir"),
            Self::Watched => write!(f, "Vus"),
        }
    }
}

/// User-entered query parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Free text matched against title and director
    pub search: String,
    pub status: StatusFilter,
    /// Selected genre, `None` for any
    pub genre: Option<String>,
}

impl Query {
    /// Whether `film` passes the search, status and genre predicates.
    ///
    /// Genre matching is a case-insensitive substring test on the raw genre
    /// string, so "Comédie" also matches "Comédie dramatique".
    pub fn matches(&self, film: &Film) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_title = film.title.to_lowercase().contains(&needle);
            let in_director = film
                .director
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_director {
                return false;
            }
        }

        if !self.status.accepts(film.watched) {
            return false;
        }

        if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
            let needle = genre.to_lowercase();
            let has_genre = film
                .genre
                .as_deref()
                .is_some_and(|g| g.to_lowercase().contains(&needle));
            if !has_genre {
                return false;
            }
        }

        true
    }
}

/// All distinct genre tokens in the catalog, sorted ascending
pub fn genre_universe(films: &[Film]) -> Vec<String> {
    films
        .iter()
        .flat_map(|film| film.genres())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Indices of the films matching `query`, newest first.
///
/// The sort is stable, so films from the same year keep catalog order.
/// Films without a year come last.
pub fn derive_view(films: &[Film], query: &Query) -> Vec<usize> {
    let mut visible: Vec<usize> = films
        .iter()
        .enumerate()
        .filter(|(_, film)| query.matches(film))
        .map(|(index, _)| index)
        .collect();

    visible.sort_by(|&a, &b| films[b].year.cmp(&films[a].year));
    visible
}

/// Memoized derivation keyed on the store revision and the query
#[derive(Debug, Default)]
pub struct ViewModel {
    key: Option<(u64, Query)>,
    visible: Vec<usize>,
    genres: Vec<String>,
}

impl ViewModel {
    /// Re-derive if the store or the query changed since the last call.
    ///
    /// Returns whether anything was recomputed.
    pub fn refresh(&mut self, store: &CatalogStore, query: &Query) -> bool {
        let revision = store.revision();
        if let Some((seen_revision, seen_query)) = &self.key {
            if *seen_revision == revision && seen_query == query {
                return false;
            }
        }

        let catalog_changed = self.key.as_ref().map_or(true, |(r, _)| *r != revision);
        if catalog_changed {
            self.genres = genre_universe(store.films());
        }
        self.visible = derive_view(store.films(), query);
        self.key = Some((revision, query.clone()));

        tracing::trace!(
            revision,
            visible = self.visible.len(),
            "View list re-derived"
        );
        true
    }

    /// Films currently shown, in display order
    pub fn visible<'a>(&'a self, store: &'a CatalogStore) -> impl Iterator<Item = &'a Film> + 'a {
        self.visible
            .iter()
            .filter_map(move |&index| store.films().get(index))
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Options for the genre selector
    pub fn genres(&self) -> &[String] {
        &self.genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::FilmId;
    use crate::state::library::MemorySlot;

    fn film(id: u64, title: &str, year: i32, director: Option<&str>, genre: Option<&str>) -> Film {
        let mut film = Film::new(id, title, year);
        film.director = director.map(str::to_string);
        film.genre = genre.map(str::to_string);
        film
    }

    fn catalog() -> Vec<Film> {
        let mut watched = film(3, "Le Samouraï", 1967, Some("Jean-Pierre Melville"), Some("Policier"));
        watched.watched = true;
        vec![
            film(1, "À bout de souffle", 1960, Some("Jean-Luc Godard"), Some("Drame, Policier")),
            film(2, "Playtime", 1967, Some("Jacques Tati"), Some("Comédie")),
            watched,
            film(4, "La Règle du jeu", 1939, Some("Jean Renoir"), Some("Comédie dramatique")),
            film(5, "Grave", 2016, None, Some("Horreur")),
            film(6, "Untitled", 1990, None, None),
        ]
    }

    fn ids(films: &[Film], indices: &[usize]) -> Vec<u64> {
        indices.iter().map(|&i| films[i].id.0).collect()
    }

    #[test]
    fn test_genre_universe_sorted_distinct() {
        let films = vec![
            film(1, "A", 2000, None, Some("Drame, Comédie")),
            film(2, "B", 2001, None, Some("Horreur")),
            film(3, "C", 2002, None, Some("Drame")),
            film(4, "D", 2003, None, None),
        ];
        assert_eq!(genre_universe(&films), vec!["Comédie", "Drame", "Horreur"]);
    }

    #[test]
    fn test_default_query_sorts_by_year_desc() {
        let films = catalog();
        let view = derive_view(&films, &Query::default());
        // 1967 tie keeps catalog order: Playtime before Le Samouraï
        assert_eq!(ids(&films, &view), vec![5, 6, 2, 3, 1, 4]);
    }

    #[test]
    fn test_undated_films_sort_last() {
        let mut films = catalog();
        let mut undated = Film::new(7, "Sans date", 2000);
        undated.year = None;
        films.insert(0, undated);

        let view = derive_view(&films, &Query::default());
        assert_eq!(ids(&films, &view), vec![5, 6, 2, 3, 1, 4, 7]);
    }

    #[test]
    fn test_view_is_filtered_subset_sorted() {
        let films = catalog();
        let queries = [
            Query::default(),
            Query { search: "jean".into(), ..Query::default() },
            Query { status: StatusFilter::Unwatched, ..Query::default() },
            Query { genre: Some("policier".into()), ..Query::default() },
            Query {
                search: "e".into(),
                status: StatusFilter::Watched,
                genre: Some("Policier".into()),
            },
        ];

        for query in &queries {
            let view = derive_view(&films, query);
            let expected = films.iter().filter(|f| query.matches(f)).count();
            assert_eq!(view.len(), expected);
            assert!(view.iter().all(|&i| query.matches(&films[i])));
            assert!(view.windows(2).all(|w| films[w[0]].year >= films[w[1]].year));
        }
    }

    #[test]
    fn test_search_matches_title_or_director_case_insensitive() {
        let films = catalog();
        let by_title = Query { search: "PLAYTIME".into(), ..Query::default() };
        assert_eq!(ids(&films, &derive_view(&films, &by_title)), vec![2]);

        let by_director = Query { search: "renoir".into(), ..Query::default() };
        assert_eq!(ids(&films, &derive_view(&films, &by_director)), vec![4]);
    }

    #[test]
    fn test_director_search_single_match() {
        let films = catalog();
        let query = Query {
            search: "Melvil".into(),
            status: StatusFilter::All,
            genre: None,
        };
        let view = derive_view(&films, &query);
        assert_eq!(view.len(), 1);
        assert_eq!(films[view[0]].id, FilmId(3));
    }

    #[test]
    fn test_status_filter() {
        let films = catalog();
        let watched = Query { status: StatusFilter::Watched, ..Query::default() };
        assert_eq!(ids(&films, &derive_view(&films, &watched)), vec![3]);

        let unwatched = Query { status: StatusFilter::Unwatched, ..Query::default() };
        assert_eq!(derive_view(&films, &unwatched).len(), 5);
    }

    #[test]
    fn test_genre_filter_is_substring_match() {
        let films = catalog();
        let query = Query { genre: Some("Comédie".into()), ..Query::default() };
        // "Comédie dramatique" matches too; films without a genre never do
        assert_eq!(ids(&films, &derive_view(&films, &query)), vec![2, 4]);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let films = catalog();
        let query = Query { search: "la".into(), ..Query::default() };
        assert_eq!(derive_view(&films, &query), derive_view(&films, &query));
    }

    #[test]
    fn test_view_model_memoizes_on_revision_and_query() {
        let films = catalog();
        let mut store = CatalogStore::open_with_defaults(Box::new(MemorySlot::new()), move || films);
        let mut model = ViewModel::default();
        let mut query = Query::default();

        assert!(model.refresh(&store, &query));
        assert!(!model.refresh(&store, &query));
        assert_eq!(model.len(), 6);
        assert_eq!(model.genres().len(), 5);

        query.status = StatusFilter::Watched;
        assert!(model.refresh(&store, &query));
        assert_eq!(model.visible(&store).map(|f| f.id.0).collect::<Vec<_>>(), vec![3]);

        store.toggle_watched(FilmId(1));
        assert!(model.refresh(&store, &query));
        assert_eq!(model.visible(&store).map(|f| f.id.0).collect::<Vec<_>>(), vec![3, 1]);
    }
}
