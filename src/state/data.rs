//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the durable slot, the view model and the UI layer.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable, unique identifier of a film within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(pub u64);

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a single film in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Release year; records without one sort last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Comma-separated genre list (e.g. "Drame, Comédie")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Comma-separated cast list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Free-form note on where the film comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Poster image URL, filled in by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watched: bool,
}

/// Treat an explicit `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Film {
    /// Create a film with a title and year, every other field empty
    #[cfg(test)]
    pub fn new(id: u64, title: impl Into<String>, year: i32) -> Self {
        Self {
            id: FilmId(id),
            title: title.into(),
            year: Some(year),
            director: None,
            genre: None,
            actors: None,
            country: None,
            source: None,
            poster: None,
            watched: false,
        }
    }

    /// Trimmed, non-empty genre tokens of this film
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Whether the poster field is missing or blank
    pub fn needs_poster(&self) -> bool {
        self.poster.as_deref().map_or(true, |p| p.trim().is_empty())
    }

    /// Release year as display text, empty when unknown
    pub fn year_label(&self) -> String {
        self.year.map(|year| year.to_string()).unwrap_or_default()
    }

    /// Detail line: "director · year · country", skipping absent parts
    pub fn meta_line(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(director) = present(&self.director) {
            parts.push(director.to_string());
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(country) = present(&self.country) {
            parts.push(country.to_string());
        }
        parts.join(" · ")
    }
}

/// An optional text field that is set and non-blank
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// Header counters: total films and how many have been watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    pub watched: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{"id": 7, "title": "Playtime", "year": 1967}"#;
        let film: Film = serde_json::from_str(json).unwrap();
        assert_eq!(film, Film::new(7, "Playtime", 1967));
        assert!(!film.watched);
        assert!(film.needs_poster());
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"id": 2, "title": null, "watched": null, "director": null}"#;
        let film: Film = serde_json::from_str(json).unwrap();
        assert_eq!(film.id, FilmId(2));
        assert_eq!(film.title, "");
        assert_eq!(film.year, None);
        assert!(!film.watched);
        assert_eq!(film.meta_line(), "");
        assert_eq!(film.year_label(), "");

        let film: Film = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(film.title, "");
        assert_eq!(film.year, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_str::<Film>(r#"{"title": "Sans id"}"#).is_err());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let film = Film::new(1, "Le Samouraï", 1967);
        let json = serde_json::to_value(&film).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(object.contains_key("watched"));
        assert!(!object.contains_key("poster"));
    }

    #[test]
    fn test_genres_are_trimmed_and_non_empty() {
        let mut film = Film::new(1, "Amélie", 2001);
        film.genre = Some(" Comédie ,Romance, ".to_string());
        assert_eq!(film.genres().collect::<Vec<_>>(), vec!["Comédie", "Romance"]);
    }

    #[test]
    fn test_meta_line_skips_missing_parts() {
        let mut film = Film::new(1, "Breathless", 1960);
        assert_eq!(film.meta_line(), "1960");

        film.director = Some("Jean-Luc Godard".to_string());
        film.country = Some("France".to_string());
        assert_eq!(film.meta_line(), "Jean-Luc Godard · 1960 · France");
    }

    #[test]
    fn test_blank_poster_needs_poster() {
        let mut film = Film::new(1, "Ran", 1985);
        film.poster = Some("  ".to_string());
        assert!(film.needs_poster());
        film.poster = Some("https://image.tmdb.org/t/p/w300/ran.jpg".to_string());
        assert!(!film.needs_poster());
    }
}
