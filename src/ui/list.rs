use iced::widget::{button, column, container, image, row, text, Column};
use iced::{Alignment, ContentFit, Element, Length};
use std::collections::HashMap;

use super::{watch_toggle, MUTED};
use crate::state::data::{present, Film, FilmId};
use crate::Message;

const THUMB_WIDTH: f32 = 40.0;
const THUMB_HEIGHT: f32 = 60.0;

/// One row per film: thumbnail, title, director and year
pub fn view<'a>(
    films: impl Iterator<Item = &'a Film>,
    posters: &HashMap<FilmId, image::Handle>,
) -> Element<'a, Message> {
    Column::with_children(films.map(|film| item(film, posters.get(&film.id))))
        .spacing(6)
        .into()
}

fn item<'a>(film: &'a Film, poster: Option<&image::Handle>) -> Element<'a, Message> {
    let thumb: Element<'a, Message> = match poster {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(THUMB_WIDTH))
            .height(Length::Fixed(THUMB_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("🎬").size(20))
            .center_x(Length::Fixed(THUMB_WIDTH))
            .center_y(Length::Fixed(THUMB_HEIGHT))
            .style(container::rounded_box)
            .into(),
    };

    let meta = match (present(&film.director), film.year) {
        (Some(director), Some(year)) => format!("{} · {}", director, year),
        (Some(director), None) => director.to_string(),
        (None, _) => film.year_label(),
    };

    let info = button(
        row![
            thumb,
            column![text(&film.title).size(15), text(meta).size(12).color(MUTED)].spacing(2),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .style(button::text)
    .on_press(Message::Select(film.id));

    // Toggle is a sibling of the select target, never nested inside it
    row![info, watch_toggle(film)]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
}
