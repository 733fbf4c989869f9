/// Per-screen widgets
///
/// One function per `View`. Every button press maps to a named `Message`;
/// nothing here mutates state.

use std::path::Path;

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::catalog;
use crate::state::data::{HistoryItem, Transformation};
use crate::Message;

/// Landing hero with the start button
pub fn landing(authenticated: bool) -> Element<'static, Message> {
    let status = if authenticated {
        "Signed in — your results will be saved."
    } else {
        "Browsing as guest. Open a sign-in link to apply styles."
    };

    let content = column![
        text("Restyle").size(48),
        text("Capture a photo, pick a style, compare the result.").size(18),
        button("Start").on_press(Message::StartCapture).padding(10),
        text(status).size(14),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    centered(content.into())
}

/// Photo capture screen (native file picker)
pub fn capture() -> Element<'static, Message> {
    let content = column![
        text("Choose a photo").size(32),
        button("Open photo…").on_press(Message::PickPhoto).padding(10),
        text("JPEG, PNG and WebP are supported.").size(14),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    centered(content.into())
}

/// Style selection and tuning for the captured photo
pub fn studio<'a>(
    photo: &'a Path,
    selected: Option<&'a Transformation>,
    transforming: bool,
    can_apply: bool,
) -> Element<'a, Message> {
    let mut styles: Vec<Element<'a, Message>> = Vec::new();
    for category in catalog::CATEGORIES {
        for style in catalog::styles_in(category.key) {
            let is_selected = selected.map(|s| s.id == style.id).unwrap_or(false);
            let label = if is_selected {
                format!("{} {} ●", category.icon, style.name)
            } else {
                format!("{} {}", category.icon, style.name)
            };
            styles.push(
                button(text(label).size(14))
                    .on_press(Message::SelectStyle(style.id.clone()))
                    .padding(8)
                    .into(),
            );
        }
    }

    let apply_label = if transforming { "Applying…" } else { "Apply style" };
    let apply = button(apply_label)
        .on_press_maybe((can_apply && !transforming).then_some(Message::ApplyStyle))
        .padding(10);

    let detail: Element<'a, Message> = match selected {
        Some(style) => column![
            text(&style.name).size(18),
            text(&style.parameters.prompt).size(13),
            text(format!(
                "strength {:.2} · guidance {:.1}",
                style.parameters.strength, style.parameters.guidance
            ))
            .size(13),
        ]
        .spacing(4)
        .into(),
        None => text("Pick a style to see its parameters.").size(14).into(),
    };

    let content = column![
        text("Studio").size(32),
        image(image::Handle::from_path(photo)).width(Length::Fixed(420.0)),
        scrollable(Wrap::with_elements(styles).spacing(8.0).line_spacing(8.0))
            .height(Length::Fixed(180.0)),
        detail,
        apply,
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    centered(content.into())
}

/// Before/after comparison of the current result
pub fn results<'a>(
    photo: Option<&'a Path>,
    item: Option<&'a HistoryItem>,
) -> Element<'a, Message> {
    let before: Element<'a, Message> = match photo {
        Some(path) => column![
            text("Before").size(16),
            image(image::Handle::from_path(path)).width(Length::Fixed(360.0)),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into(),
        None => text("Original photo unavailable.").size(14).into(),
    };

    let after: Element<'a, Message> = match item {
        Some(item) => column![
            text(format!("After — {}", item.transformation.name)).size(16),
            // Result images live on the service CDN; show the reference
            text(&item.result_image).size(13),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into(),
        None => text("No transformation selected.").size(14).into(),
    };

    let content = column![
        text("Results").size(32),
        row![before, after].spacing(32),
        row![
            button("Back to studio").on_press(Message::BackToStudio).padding(8),
            button("History").on_press(Message::OpenHistory).padding(8),
        ]
        .spacing(12),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    centered(content.into())
}

/// Grid of past results, most recent first
pub fn history(items: &[HistoryItem]) -> Element<'_, Message> {
    if items.is_empty() {
        let content = column![
            text("History").size(32),
            text("No transformations yet.").size(14),
        ]
        .spacing(20)
        .align_x(Alignment::Center);
        return centered(content.into());
    }

    let mut cards: Vec<Element<'_, Message>> = Vec::new();
    for item in items {
        let card = column![
            text(&item.transformation.name).size(14),
            text(&item.result_image).size(11),
            row![
                button(text("View").size(12))
                    .on_press(Message::SelectHistoryItem(item.id.clone()))
                    .padding(4),
                button(text("Delete").size(12))
                    .on_press(Message::DeleteHistoryItem(item.id.clone()))
                    .padding(4),
            ]
            .spacing(6),
        ]
        .spacing(6);
        cards.push(container(card).padding(10).into());
    }

    let content = column![
        text("History").size(32),
        scrollable(Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0))
            .height(Length::Fill),
        button("Clear all").on_press(Message::ClearHistory).padding(8),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    centered(content.into())
}

fn centered(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
