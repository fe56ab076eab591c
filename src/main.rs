use iced::keyboard::{self, key};
use iced::widget::{column, container, image, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod enrich;
mod error;
mod links;
mod state;
mod ui;

use config::Config;
use enrich::poster_cache::{self, PosterCache};
use enrich::tmdb::TmdbClient;
use enrich::EnrichmentReport;
use links::OutboundLink;
use state::catalog::CatalogStore;
use state::data::FilmId;
use state::library::{DurableSlot, Library, MemorySlot};
use state::query::{StatusFilter, ViewModel};
use state::session::{Session, ViewMode};
use ui::header::GenreChoice;

/// Main application state
struct Cinematheque {
    /// The film catalog, persisted on every change
    store: CatalogStore,
    /// Query, layout and selection
    session: Session,
    /// View list derived from `store` and `session.query`
    view_model: ViewModel,
    poster_cache: PosterCache,
    /// Thumbnails ready for display
    posters: HashMap<FilmId, image::Handle>,
    /// Thumbnails currently downloading
    pending_posters: HashSet<FilmId>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    StatusFilterChanged(StatusFilter),
    GenreChanged(GenreChoice),
    ViewModeChanged(ViewMode),
    CardSizeChanged(f32),
    /// Open the detail overlay
    Select(FilmId),
    ToggleWatched(FilmId),
    /// Close button, backdrop click or Escape
    CloseDetail,
    OpenLink(FilmId, OutboundLink),
    LinkOpened(Result<(), String>),
    /// Background poster lookups finished
    EnrichmentComplete(EnrichmentReport),
    PosterCached(FilmId, Result<PathBuf, String>),
}

impl Cinematheque {
    /// Create a new instance of the application
    fn new(config: Config) -> (Self, Task<Message>) {
        let slot: Box<dyn DurableSlot> = match open_library(&config) {
            Ok(library) => Box::new(library),
            Err(e) => {
                tracing::error!(error = %e, "Failed to open library, changes will not be saved");
                Box::new(MemorySlot::new())
            }
        };

        let poster_dir = config
            .poster_cache_dir
            .clone()
            .unwrap_or_else(poster_cache::default_cache_dir);

        let mut app = Self::with_store(CatalogStore::open(slot), PosterCache::new(poster_dir));

        let stats = app.store.stats();
        tracing::info!(
            total = stats.total,
            watched = stats.watched,
            "Cinémathèque initialized"
        );

        let startup = Task::batch([app.start_enrichment(&config), app.load_posters()]);
        (app, startup)
    }

    fn with_store(store: CatalogStore, poster_cache: PosterCache) -> Self {
        let mut app = Self {
            store,
            session: Session::new(),
            view_model: ViewModel::default(),
            poster_cache,
            posters: HashMap::new(),
            pending_posters: HashSet::new(),
        };
        app.refresh_view();
        app
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::SearchChanged(search) => {
                self.session.set_search(search);
                Task::none()
            }
            Message::StatusFilterChanged(status) => {
                self.session.set_status(status);
                Task::none()
            }
            Message::GenreChanged(choice) => {
                self.session.set_genre(choice.into_genre());
                Task::none()
            }
            Message::ViewModeChanged(mode) => {
                self.session.set_view_mode(mode);
                Task::none()
            }
            Message::CardSizeChanged(size) => {
                self.session.set_card_size(size);
                Task::none()
            }
            Message::Select(id) => {
                self.session.select(id);
                Task::none()
            }
            Message::ToggleWatched(id) => {
                self.store.toggle_watched(id);
                Task::none()
            }
            Message::CloseDetail => {
                self.session.close_detail();
                Task::none()
            }
            Message::OpenLink(id, link) => match self.store.get(id) {
                Some(film) => {
                    let url = link.url_for(&film.title);
                    tracing::info!(film_id = %id, url = %url, "Opening outbound link");
                    Task::perform(links::open_in_browser(url), Message::LinkOpened)
                }
                None => Task::none(),
            },
            Message::LinkOpened(result) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to open link in browser");
                }
                Task::none()
            }
            Message::EnrichmentComplete(report) => {
                let applied = self.store.apply_posters(report.posters());
                tracing::info!(applied, "Enrichment results merged into catalog");
                self.load_posters()
            }
            Message::PosterCached(id, result) => {
                self.pending_posters.remove(&id);
                match result {
                    Ok(path) => {
                        self.posters.insert(id, image::Handle::from_path(path));
                    }
                    Err(e) => {
                        tracing::debug!(film_id = %id, error = %e, "Poster download failed");
                    }
                }
                Task::none()
            }
        };

        self.refresh_view();
        task
    }

    /// Re-derive the view list if the catalog or the query changed
    fn refresh_view(&mut self) {
        self.view_model.refresh(&self.store, &self.session.query);
    }

    /// Kick off the one-shot poster lookup pass
    fn start_enrichment(&self, config: &Config) -> Task<Message> {
        let Some(client) = TmdbClient::from_config(config) else {
            tracing::warn!("No TMDB API key configured, poster enrichment disabled");
            return Task::none();
        };

        let candidates = enrich::select_candidates(self.store.films(), config.enrichment_cap);
        if candidates.is_empty() {
            return Task::none();
        }

        Task::perform(
            enrich::run(candidates, Arc::new(client)),
            Message::EnrichmentComplete,
        )
    }

    /// Load cached thumbnails and download the missing ones
    fn load_posters(&mut self) -> Task<Message> {
        let mut downloads = Vec::new();

        for film in self.store.films() {
            let Some(url) = film.poster.as_deref().filter(|_| !film.needs_poster()) else {
                continue;
            };
            if self.posters.contains_key(&film.id) || self.pending_posters.contains(&film.id) {
                continue;
            }

            if let Some(path) = self.poster_cache.cached(film.id) {
                self.posters.insert(film.id, image::Handle::from_path(path));
                continue;
            }

            let id = film.id;
            self.pending_posters.insert(id);
            downloads.push(Task::perform(
                self.poster_cache.clone().fetch(id, url.to_string()),
                move |result| Message::PosterCached(id, result.map_err(|e| e.to_string())),
            ));
        }

        if !downloads.is_empty() {
            tracing::debug!(count = downloads.len(), "Downloading poster thumbnails");
        }
        Task::batch(downloads)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = ui::header::view(&self.session, self.store.stats(), self.view_model.genres());

        let films = self.view_model.visible(&self.store);
        let body: Element<Message> = if self.view_model.is_empty() {
            container(text("Aucun film trouvé").size(16).color(ui::MUTED))
                .center_x(Length::Fill)
                .padding(40)
                .into()
        } else {
            match self.session.view_mode() {
                ViewMode::Grid => ui::grid::view(films, &self.posters, self.session.card_size()),
                ViewMode::List => ui::list::view(films, &self.posters),
            }
        };

        let content = column![
            header,
            text(format!("{} films", self.view_model.len()))
                .size(13)
                .color(ui::MUTED),
            scrollable(body).height(Length::Fill),
        ]
        .spacing(16)
        .padding(20);

        let selected = self.session.selected().and_then(|id| self.store.get(id));
        match selected {
            Some(film) => ui::detail::modal(
                content,
                ui::detail::view(film, self.posters.get(&film.id)),
                Message::CloseDetail,
            ),
            None => content.into(),
        }
    }

    /// Escape closes the detail overlay
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(key::Named::Escape) => Some(Message::CloseDetail),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn open_library(config: &Config) -> error::CatalogResult<Library> {
    match &config.database_path {
        Some(path) => Library::open(path),
        None => Library::new(),
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinematheque=info")),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Invalid configuration, using defaults");
        Config::default()
    });

    iced::application("Cinémathèque", Cinematheque::update, Cinematheque::view)
        .subscription(Cinematheque::subscription)
        .theme(Cinematheque::theme)
        .centered()
        .run_with(move || Cinematheque::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Film;

    fn app_with(films: Vec<Film>) -> Cinematheque {
        let store = CatalogStore::open_with_defaults(Box::new(MemorySlot::new()), move || films);
        let dir = std::env::temp_dir().join("cinematheque-test-posters");
        Cinematheque::with_store(store, PosterCache::new(dir))
    }

    fn catalog() -> Vec<Film> {
        let mut tati = Film::new(1, "Playtime", 1967);
        tati.director = Some("Jacques Tati".to_string());
        tati.genre = Some("Comédie".to_string());
        let mut varda = Film::new(2, "Cléo de 5 à 7", 1962);
        varda.director = Some("Agnès Varda".to_string());
        varda.genre = Some("Drame".to_string());
        let mut demy = Film::new(3, "Les Parapluies de Cherbourg", 1964);
        demy.director = Some("Jacques Demy".to_string());
        demy.genre = Some("Comédie musicale, Romance".to_string());
        vec![tati, varda, demy]
    }

    fn visible_ids(app: &Cinematheque) -> Vec<u64> {
        app.view_model.visible(&app.store).map(|f| f.id.0).collect()
    }

    #[test]
    fn test_initial_view_sorted_by_year() {
        let app = app_with(catalog());
        assert_eq!(visible_ids(&app), vec![1, 3, 2]);
        assert_eq!(app.view_model.genres(), ["Comédie", "Comédie musicale", "Drame", "Romance"]);
    }

    #[test]
    fn test_director_search_end_to_end() {
        let mut app = app_with(catalog());
        let _ = app.update(Message::SearchChanged("varda".to_string()));
        assert_eq!(visible_ids(&app), vec![2]);

        let _ = app.update(Message::SearchChanged("jacques".to_string()));
        assert_eq!(visible_ids(&app), vec![1, 3]);
    }

    #[test]
    fn test_genre_and_status_filters_rederive() {
        let mut app = app_with(catalog());
        let _ = app.update(Message::GenreChanged(GenreChoice::Named("Comédie".to_string())));
        assert_eq!(visible_ids(&app), vec![1, 3]);

        let _ = app.update(Message::ToggleWatched(FilmId(3)));
        let _ = app.update(Message::StatusFilterChanged(StatusFilter::Watched));
        assert_eq!(visible_ids(&app), vec![3]);

        let _ = app.update(Message::GenreChanged(GenreChoice::Any));
        let _ = app.update(Message::StatusFilterChanged(StatusFilter::Unwatched));
        assert_eq!(visible_ids(&app), vec![1, 2]);
    }

    #[test]
    fn test_toggle_watched_leaves_selection_unchanged() {
        let mut app = app_with(catalog());
        let _ = app.update(Message::ToggleWatched(FilmId(2)));
        assert_eq!(app.session.selected(), None);
        assert!(app.store.get(FilmId(2)).unwrap().watched);
        assert_eq!(app.store.stats().watched, 1);

        let _ = app.update(Message::Select(FilmId(1)));
        let _ = app.update(Message::ToggleWatched(FilmId(3)));
        assert_eq!(app.session.selected(), Some(FilmId(1)));
    }

    #[test]
    fn test_toggle_in_overlay_keeps_selection_in_sync() {
        let mut app = app_with(catalog());
        let _ = app.update(Message::Select(FilmId(1)));
        let _ = app.update(Message::ToggleWatched(FilmId(1)));

        let selected = app.session.selected().and_then(|id| app.store.get(id)).unwrap();
        assert!(selected.watched);

        let _ = app.update(Message::CloseDetail);
        assert_eq!(app.session.selected(), None);
    }

    #[test]
    fn test_enrichment_report_merges_once() {
        let mut app = app_with(catalog());
        let report = EnrichmentReport {
            outcomes: vec![
                (FilmId(1), enrich::LookupOutcome::Found("https://img/1.jpg".to_string())),
                (FilmId(2), enrich::LookupOutcome::NoMatch),
                (FilmId(3), enrich::LookupOutcome::Failed("timeout".to_string())),
            ],
        };

        let _ = app.update(Message::EnrichmentComplete(report));
        assert_eq!(app.store.revision(), 1);
        assert_eq!(
            app.store.get(FilmId(1)).unwrap().poster.as_deref(),
            Some("https://img/1.jpg")
        );
        assert_eq!(app.store.get(FilmId(2)).unwrap().poster, None);
        assert_eq!(app.store.get(FilmId(3)).unwrap().poster, None);
        assert!(app.pending_posters.contains(&FilmId(1)));
    }

    #[test]
    fn test_card_size_only_in_grid() {
        let mut app = app_with(catalog());
        let _ = app.update(Message::CardSizeChanged(150.0));
        assert_eq!(app.session.card_size(), 150);

        let _ = app.update(Message::ViewModeChanged(ViewMode::List));
        let _ = app.update(Message::CardSizeChanged(90.0));
        assert_eq!(app.session.card_size(), 150);
    }
}
