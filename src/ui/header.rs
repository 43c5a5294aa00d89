use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ViewMode};

use super::contains;

/// View mode buttons, right-aligned in the header row.
pub fn view_mode_buttons(area: Rect) -> Vec<(Rect, ViewMode)> {
    let widths: Vec<u16> = ViewMode::ALL
        .iter()
        .map(|mode| u16::try_from(mode.label().width() + 2).unwrap_or(u16::MAX))
        .collect();
    let total = widths
        .iter()
        .fold(0_u16, |acc, w| acc.saturating_add(*w).saturating_add(1));
    if total >= area.width {
        return Vec::new();
    }
    let mut x = area.x + area.width - total;
    ViewMode::ALL
        .iter()
        .zip(widths)
        .map(|(mode, width)| {
            let rect = Rect::new(x, area.y, width, area.height.min(1));
            x += width + 1;
            (rect, *mode)
        })
        .collect()
}

/// The view mode of the header button under a mouse position.
pub fn view_mode_at(area: Rect, column: u16, row: u16) -> Option<ViewMode> {
    view_mode_buttons(area)
        .into_iter()
        .find(|(rect, _)| contains(*rect, column, row))
        .map(|(_, mode)| mode)
}

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let header_style = Style::default().bg(Color::Indexed(24)).fg(Color::White);
    let title = match &model.source_name {
        Some(name) => format!(" Markpad · {name}"),
        None => " Markpad".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .style(header_style),
        area,
    );

    for (rect, mode) in view_mode_buttons(area) {
        let style = if mode == model.view_mode {
            Style::default()
                .bg(Color::White)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::Indexed(31)).fg(Color::White)
        };
        frame.render_widget(
            Paragraph::new(format!(" {} ", mode.label())).style(style),
            rect,
        );
    }
}
