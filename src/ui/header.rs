use iced::widget::{button, column, horizontal_space, pick_list, row, slider, text, text_input};
use iced::{Alignment, Element, Length};
use std::fmt;

use super::{toggle_style, ACCENT, MUTED};
use crate::state::data::CatalogStats;
use crate::state::query::StatusFilter;
use crate::state::session::{Session, ViewMode, CARD_SIZE_MAX, CARD_SIZE_MIN};
use crate::Message;

/// Entry of the genre selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreChoice {
    Any,
    Named(String),
}

impl GenreChoice {
    pub fn into_genre(self) -> Option<String> {
        match self {
            Self::Any => None,
            Self::Named(genre) => Some(genre),
        }
    }
}

impl fmt::Display for GenreChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Genre"),
            Self::Named(genre) => write!(f, "{}", genre),
        }
    }
}

/// Active genre filter, `None` while unfiltered so the placeholder shows
fn selected_genre(session: &Session) -> Option<GenreChoice> {
    session.query.genre.clone().map(GenreChoice::Named)
}

/// Header: logo, catalog stats and every query/layout control
pub fn view<'a>(session: &'a Session, stats: CatalogStats, genres: &[String]) -> Element<'a, Message> {
    let title_row = row![
        text("Ciné").size(28),
        text("mathèque").size(28).color(ACCENT),
        horizontal_space(),
        text(format!("{} films · {} vus", stats.total, stats.watched))
            .size(14)
            .color(MUTED),
    ]
    .align_y(Alignment::Center);

    let mut controls = row![text_input("Rechercher...", &session.query.search)
        .on_input(Message::SearchChanged)
        .padding(8)
        .width(Length::FillPortion(3))]
    .spacing(8)
    .align_y(Alignment::Center);

    for status in StatusFilter::ALL {
        controls = controls.push(
            button(text(status.to_string()).size(14))
                .style(toggle_style(session.query.status == status))
                .on_press(Message::StatusFilterChanged(status)),
        );
    }

    let mut options = Vec::with_capacity(genres.len() + 1);
    options.push(GenreChoice::Any);
    options.extend(genres.iter().cloned().map(GenreChoice::Named));
    let selected = selected_genre(session);

    controls = controls.push(
        pick_list(options, selected, Message::GenreChanged)
            .placeholder("Genre")
            .width(Length::FillPortion(1)),
    );

    let mode = session.view_mode();
    controls = controls
        .push(
            button(text("▦"))
                .style(toggle_style(mode == ViewMode::Grid))
                .on_press(Message::ViewModeChanged(ViewMode::Grid)),
        )
        .push(
            button(text("☰"))
                .style(toggle_style(mode == ViewMode::List))
                .on_press(Message::ViewModeChanged(ViewMode::List)),
        );

    // Card size only applies to the grid
    if mode == ViewMode::Grid {
        controls = controls.push(
            slider(
                f32::from(CARD_SIZE_MIN)..=f32::from(CARD_SIZE_MAX),
                f32::from(session.card_size()),
                Message::CardSizeChanged,
            )
            .width(Length::Fixed(120.0)),
        );
    }

    column![title_row, controls].spacing(12).into()
}
