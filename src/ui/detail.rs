use iced::widget::{button, center, column, container, image, mouse_area, opaque, row, stack, text};
use iced::{Alignment, Color, Element, Length};

use super::{toggle_style, MUTED};
use crate::links::OutboundLink;
use crate::state::data::{present, Film};
use crate::Message;

/// Layer `content` over `base` with a dimmed backdrop.
///
/// A press on the backdrop emits `on_blur`; presses inside `content` are
/// swallowed by the inner `opaque` and never reach the backdrop.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.8,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

/// Detail card for the selected film
pub fn view<'a>(film: &'a Film, poster: Option<&image::Handle>) -> Element<'a, Message> {
    let head = row![
        text(&film.title).size(22).width(Length::Fill),
        button(text("×").size(18))
            .style(button::text)
            .on_press(Message::CloseDetail),
    ]
    .align_y(Alignment::Center);

    let mut body = column![text(film.meta_line()).size(14).color(MUTED)].spacing(12);

    if film.genres().next().is_some() {
        let tags = film.genres().fold(row![].spacing(6), |tags, genre| {
            tags.push(
                container(text(genre).size(12))
                    .padding([2, 8])
                    .style(container::rounded_box),
            )
        });
        body = body.push(section("Genre", tags));
    }
    if let Some(actors) = present(&film.actors) {
        body = body.push(section("Casting", text(actors).size(13)));
    }
    if let Some(source) = present(&film.source) {
        body = body.push(section("Source", text(source).size(13)));
    }

    let watched_label = if film.watched {
        "✓ Vu"
    } else {
        "Marquer comme vu"
    };
    body = body.push(
        button(text(watched_label).center().width(Length::Fill))
            .width(Length::Fill)
            .style(toggle_style(film.watched))
            .on_press(Message::ToggleWatched(film.id)),
    );

    let actions = row![
        link_button(film, OutboundLink::Identity, false),
        link_button(film, OutboundLink::WhereToWatch, true),
    ]
    .spacing(8);

    let mut layout = row![].spacing(20);
    if let Some(handle) = poster {
        layout = layout.push(image(handle.clone()).width(Length::Fixed(160.0)));
    }
    layout = layout.push(
        column![head, body, actions]
            .spacing(16)
            .width(Length::Fill),
    );

    container(layout)
        .width(Length::Fixed(620.0))
        .padding(20)
        .style(container::rounded_box)
        .into()
}

fn section<'a>(title: &'a str, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![text(title).size(12).color(MUTED), content.into()]
        .spacing(4)
        .into()
}

fn link_button<'a>(film: &Film, link: OutboundLink, primary: bool) -> Element<'a, Message> {
    button(text(link.to_string()).center().width(Length::Fill))
        .width(Length::Fill)
        .style(toggle_style(primary))
        .on_press(Message::OpenLink(film.id, link))
        .into()
}
