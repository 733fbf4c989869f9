/// Transient notification banners
///
/// Renders the live toast set as a stack of dismissible banners in the
/// top-right corner, in creation order.

use iced::widget::{button, column, container, row, text};
use iced::{border, Alignment, Background, Color, Element, Length, Shadow};

use crate::state::data::{Toast, ToastKind};
use crate::Message;

/// Banner fill color per severity
fn fill(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::from_rgb(0.13, 0.47, 0.25),
        ToastKind::Error => Color::from_rgb(0.62, 0.16, 0.16),
        ToastKind::Info => Color::from_rgb(0.16, 0.32, 0.55),
        ToastKind::Warning => Color::from_rgb(0.62, 0.44, 0.10),
    }
}

fn banner(toast: &Toast) -> Element<'_, Message> {
    let color = fill(toast.kind);

    container(
        row![
            text(&toast.message).size(14),
            button(text("✕").size(12))
                .on_press(Message::DismissToast(toast.id))
                .padding(4),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(10)
    .style(move |_theme| container::Style {
        text_color: Some(Color::WHITE),
        background: Some(Background::Color(color)),
        border: border::rounded(6.0),
        shadow: Shadow::default(),
    })
    .into()
}

/// The whole toast overlay
pub fn overlay(toasts: &[Toast]) -> Element<'_, Message> {
    let banners = column(toasts.iter().map(banner)).spacing(8);

    container(banners)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Alignment::End)
        .align_y(Alignment::Start)
        .padding(16)
        .into()
}
