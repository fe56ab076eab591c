//! Ephemeral browsing state for the presentation layer
//!
//! Nothing in here is persisted: the query, the layout, the card size
//! and the film opened in the detail overlay all reset on restart.
use super::data::FilmId;
use super::query::{Query, StatusFilter};

/// Smallest grid card width in pixels
pub const CARD_SIZE_MIN: u16 = 80;
/// Largest grid card width in pixels
pub const CARD_SIZE_MAX: u16 = 160;
/// Card width on startup
pub const CARD_SIZE_DEFAULT: u16 = 120;

/// How the view list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// UI state owned by the presentation surface
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub query: Query,
    view_mode: ViewMode,
    /// Grid card width in pixels (80..=160)
    card_size: u16,
    /// Film shown in the detail overlay
    selected: Option<FilmId>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            query: Query::default(),
            view_mode: ViewMode::default(),
            card_size: CARD_SIZE_DEFAULT,
            selected: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: String) {
        self.query.search = search;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
    }

    /// Select a genre, or clear the genre filter with `None` or ""
    pub fn set_genre(&mut self, genre: Option<String>) {
        self.query.genre = genre.filter(|g| !g.is_empty());
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn card_size(&self) -> u16 {
        self.card_size
    }

    /// Resize grid cards, clamped to the slider range.
    ///
    /// Ignored outside grid mode; returns whether the size was applied.
    pub fn set_card_size(&mut self, size: f32) -> bool {
        if self.view_mode != ViewMode::Grid || !size.is_finite() {
            return false;
        }
        self.card_size = size
            .round()
            .clamp(f32::from(CARD_SIZE_MIN), f32::from(CARD_SIZE_MAX)) as u16;
        true
    }

    pub fn selected(&self) -> Option<FilmId> {
        self.selected
    }

    /// Open the detail overlay on `id`
    pub fn select(&mut self, id: FilmId) {
        self.selected = Some(id);
    }

    /// Close the detail overlay
    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let session = Session::new();
        assert_eq!(session.view_mode(), ViewMode::Grid);
        assert_eq!(session.card_size(), CARD_SIZE_DEFAULT);
        assert_eq!(session.selected(), None);
        assert_eq!(session.query, Query::default());
    }

    #[test]
    fn test_card_size_is_clamped() {
        let mut session = Session::new();
        assert!(session.set_card_size(200.0));
        assert_eq!(session.card_size(), CARD_SIZE_MAX);
        assert!(session.set_card_size(10.0));
        assert_eq!(session.card_size(), CARD_SIZE_MIN);
        assert!(session.set_card_size(99.6));
        assert_eq!(session.card_size(), 100);
    }

    #[test]
    fn test_card_size_ignored_in_list_mode() {
        let mut session = Session::new();
        session.set_view_mode(ViewMode::List);
        assert!(!session.set_card_size(90.0));
        assert_eq!(session.card_size(), CARD_SIZE_DEFAULT);
    }

    #[test]
    fn test_empty_genre_clears_filter() {
        let mut session = Session::new();
        session.set_genre(Some("Drame".to_string()));
        assert_eq!(session.query.genre.as_deref(), Some("Drame"));
        session.set_genre(Some(String::new()));
        assert_eq!(session.query.genre, None);
    }

    #[test]
    fn test_select_and_close() {
        let mut session = Session::new();
        session.select(FilmId(4));
        assert_eq!(session.selected(), Some(FilmId(4)));
        session.close_detail();
        assert_eq!(session.selected(), None);
    }
}
