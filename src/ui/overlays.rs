use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

const KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "View",
        &[
            ("F2 / F3 / F4", "Editor / Split / Preview"),
            ("Ctrl-\\", "Cycle view mode"),
            ("Click header button", "Switch view mode"),
        ],
    ),
    (
        "Formatting",
        &[
            ("Alt-1 / Alt-2 / Alt-3", "Heading 1 / 2 / 3"),
            ("Ctrl-b or Alt-b", "Bold"),
            ("Alt-i", "Italic"),
            ("Alt-c", "Inline code"),
            ("Alt-q", "Blockquote"),
            ("Ctrl-k or Alt-l", "Link"),
            ("Alt-u / Alt-o", "Unordered / ordered list"),
            ("Alt-k", "Code block"),
            ("Click toolbar button", "Apply to selection"),
        ],
    ),
    (
        "Editor",
        &[
            ("Arrows, Home/End", "Move"),
            ("Ctrl-Left/Right", "Word movement"),
            ("Ctrl-Home/End", "Buffer start / end"),
            ("Shift + movement", "Extend selection"),
            ("Ctrl-a", "Select all"),
            ("Mouse drag", "Select"),
            ("PageUp/PageDown", "Page"),
        ],
    ),
    (
        "Preview only",
        &[
            ("j/k or Up/Down", "Scroll"),
            ("Space/b", "Page down / up"),
            ("g / G", "Top / bottom"),
        ],
    ),
    (
        "Other",
        &[
            ("F1", "Toggle help"),
            ("Ctrl-q / Ctrl-c", "Quit"),
        ],
    ),
];

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (section, keys) in KEYS {
        lines.push(Line::styled(*section, section_style));
        for (key, action) in *keys {
            lines.push(Line::raw(format!("  {key:<24}{action}")));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .title_bottom(Line::styled(
            " Esc closes ",
            Style::default().fg(Color::Indexed(245)),
        ))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_popup_rect(50, 20, area), Rect::new(25, 10, 50, 20));
        assert_eq!(centered_popup_rect(200, 80, area), area);
    }
}
