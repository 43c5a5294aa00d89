use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};

/// Left part of the status bar: cursor, selection, dirty flag, highlighter.
pub fn status_left(model: &Model) -> String {
    let cursor = model.editor.cursor();
    let mut parts = vec![format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1)];
    let selected = model.editor.selection().len();
    if selected > 0 {
        parts.push(format!("{selected} selected"));
    }
    if model.editor.is_dirty() {
        parts.push("[modified]".to_string());
    }
    parts.push(model.highlight_state.label().to_string());
    parts.push("F1:help".to_string());
    format!(" {}", parts.join("  "))
}

/// Right part of the status bar: the document counts.
pub fn status_right(model: &Model) -> String {
    format!(
        "Words: {}  Characters: {} ",
        model.stats.words, model.stats.chars
    )
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let left = status_left(model);
    let right = status_right(model);
    let total = area.width as usize;
    let used = left.width() + right.width();
    // Counts win over the left side when the bar is too narrow
    let line = if used <= total {
        format!("{left}{}{right}", " ".repeat(total - used))
    } else {
        format!("{:>total$}", right)
    };
    let status_bar =
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
