//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors
//! - Pane layout for the three view modes, shared by drawing and mouse
//!   hit testing

pub mod style;
pub mod viewport;

mod header;
mod overlays;
mod render;
mod status;
mod toolbar;

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::app::ViewMode;

pub use header::{view_mode_at, view_mode_buttons};
pub use render::render;
pub use status::{status_left, status_right};
pub use toolbar::{format_action_at, toolbar_buttons};

/// Below this width Split mode stacks the panes vertically.
pub const NARROW_WIDTH: u16 = 80;
pub const PREVIEW_LEFT_PADDING: u16 = 1;

/// Screen areas for one frame.
///
/// Pane areas are `None` when the view mode hides that pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneLayout {
    pub header: Rect,
    pub status: Rect,
    pub toolbar: Option<Rect>,
    pub editor: Option<Rect>,
    pub preview_title: Option<Rect>,
    pub preview: Option<Rect>,
    pub divider: Option<Rect>,
    /// Split mode on a narrow terminal: editor above, preview below.
    pub stacked: bool,
}

/// Compute the layout for `area` in `mode`.
pub fn pane_layout(area: Rect, mode: ViewMode) -> PaneLayout {
    let header = Rect { height: area.height.min(1), ..area };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.saturating_sub(1).min(1),
        ..area
    };
    let body = Rect {
        y: area.y + header.height,
        height: area.height.saturating_sub(header.height + status.height),
        ..area
    };

    let mut layout = PaneLayout {
        header,
        status,
        ..PaneLayout::default()
    };

    let (editor_pane, preview_pane) = match mode {
        ViewMode::Editor => (Some(body), None),
        ViewMode::Preview => (None, Some(body)),
        ViewMode::Split if body.width >= NARROW_WIDTH => {
            let left = body.width / 2;
            let right = body.width.saturating_sub(left + 1);
            layout.divider = Some(Rect { x: body.x + left, width: 1, ..body });
            (
                Some(Rect { width: left, ..body }),
                Some(Rect {
                    x: body.x + left + 1,
                    width: right,
                    ..body
                }),
            )
        }
        ViewMode::Split => {
            layout.stacked = true;
            let top = body.height / 2;
            let bottom = body.height.saturating_sub(top + 1);
            layout.divider = Some(Rect {
                y: body.y + top,
                height: body.height.saturating_sub(top).min(1),
                ..body
            });
            (
                Some(Rect { height: top, ..body }),
                Some(Rect {
                    y: body.y + top + 1,
                    height: bottom,
                    ..body
                }),
            )
        }
    };

    if let Some(pane) = editor_pane {
        let (bar, rest) = split_first_row(pane);
        layout.toolbar = Some(bar);
        layout.editor = Some(rest);
    }
    if let Some(pane) = preview_pane {
        let (title, rest) = split_first_row(pane);
        layout.preview_title = Some(title);
        layout.preview = Some(rest);
    }
    layout
}

fn split_first_row(area: Rect) -> (Rect, Rect) {
    let first = Rect { height: area.height.min(1), ..area };
    let rest = Rect {
        y: area.y + first.height,
        height: area.height.saturating_sub(first.height),
        ..area
    };
    (first, rest)
}

/// Columns available to preview text inside a preview pane.
pub fn preview_text_width(pane: Rect) -> usize {
    pane.width.saturating_sub(PREVIEW_LEFT_PADDING).max(1) as usize
}

/// Digits needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Gutter width: the line number plus one space.
pub const fn gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}

/// Columns available to text in an editor pane.
pub const fn editor_text_width(pane_width: u16, total_lines: usize) -> usize {
    pane_width.saturating_sub(gutter_width(total_lines)) as usize
}

/// Terminal cells a char takes in the editor. Tabs show as one cell.
pub fn char_cells(ch: char) -> usize {
    if ch == '\t' { 1 } else { ch.width().unwrap_or(0) }
}

/// Display column of char column `col` in `line`.
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(char_cells).sum()
}

/// Char column under display column `target` in `line`, clamped to the line end.
pub fn char_col_at(line: &str, target: usize) -> usize {
    let mut cells = 0;
    for (idx, ch) in line.chars().enumerate() {
        let width = char_cells(ch);
        if target < cells + width.max(1) {
            return idx;
        }
        cells += width;
    }
    line.chars().count()
}

pub(crate) const fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests;
