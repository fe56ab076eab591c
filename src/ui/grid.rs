use iced::alignment::Horizontal;
use iced::widget::{button, column, container, image, stack, text};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;
use std::collections::HashMap;

use super::{watch_toggle, MUTED};
use crate::state::data::{Film, FilmId};
use crate::Message;

/// Poster aspect ratio (height / width)
const POSTER_RATIO: f32 = 1.5;

/// Wrapping grid of poster cards
pub fn view<'a>(
    films: impl Iterator<Item = &'a Film>,
    posters: &HashMap<FilmId, image::Handle>,
    card_size: u16,
) -> Element<'a, Message> {
    let cards: Vec<Element<'a, Message>> = films
        .map(|film| card(film, posters.get(&film.id), card_size))
        .collect();

    Wrap::with_elements(cards)
        .spacing(12.0)
        .line_spacing(12.0)
        .into()
}

fn card<'a>(film: &'a Film, poster: Option<&image::Handle>, card_size: u16) -> Element<'a, Message> {
    let width = f32::from(card_size);
    let height = width * POSTER_RATIO;

    let caption = column![
        text(&film.title).size(12),
        text(film.year_label()).size(11).color(MUTED),
    ]
    .spacing(2)
    .width(Length::Fixed(width));

    let face: Element<'a, Message> = match poster {
        Some(handle) => column![
            image(handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .content_fit(ContentFit::Cover),
            caption,
        ]
        .spacing(4)
        .into(),
        None => container(caption)
            .padding(8)
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .style(container::rounded_box)
            .into(),
    };

    let select = button(face)
        .padding(0)
        .style(button::text)
        .on_press(Message::Select(film.id));

    // Toggle sits on the top layer so it captures presses before the card
    let toggle = container(watch_toggle(film))
        .width(Length::Fixed(width))
        .padding(4)
        .align_x(Horizontal::Right);

    stack![select, toggle].into()
}
