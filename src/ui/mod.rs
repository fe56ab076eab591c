//! Presentation layer
//!
//! - header.rs: title, stats, search box, filters, layout controls
//! - grid.rs / list.rs: the two layouts of the view list
//! - detail.rs: the detail overlay for the selected film
//!
//! Widgets here only read state and emit `Message`s; all mutation
//! happens in `Cinematheque::update`.
use iced::widget::{button, text};
use iced::{Color, Element};

use crate::state::data::Film;
use crate::Message;

pub mod detail;
pub mod grid;
pub mod header;
pub mod list;

/// Accent color (logo, active toggles)
pub const ACCENT: Color = Color {
    r: 0.91,
    g: 0.30,
    b: 0.24,
    a: 1.0,
};

/// Secondary text
pub const MUTED: Color = Color {
    r: 0.62,
    g: 0.62,
    b: 0.66,
    a: 1.0,
};

type ButtonStyle = fn(&iced::Theme, button::Status) -> button::Style;

/// Button style for a two-state control
pub fn toggle_style(active: bool) -> ButtonStyle {
    if active {
        button::primary
    } else {
        button::secondary
    }
}

/// Inline "✓" control flipping a film's watched state.
///
/// Always rendered above (grid) or beside (list) the select target, so a
/// press on it never reaches the select intent.
pub fn watch_toggle<'a>(film: &Film) -> Element<'a, Message> {
    let style: ButtonStyle = if film.watched {
        button::success
    } else {
        button::secondary
    };

    button(text("✓").size(14))
        .padding([2, 8])
        .style(style)
        .on_press(Message::ToggleWatched(film.id))
        .into()
}
