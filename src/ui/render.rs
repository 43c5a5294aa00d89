use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{
    PREVIEW_LEFT_PADDING, char_cells, gutter_width, header, overlays, status, style, toolbar,
};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = model.layout();

    header::render_header(model, frame, layout.header);
    if let Some(bar) = layout.toolbar {
        toolbar::render_toolbar(frame, bar);
    }
    if let Some(editor) = layout.editor {
        render_editor(model, frame, editor);
    }
    if let Some(title) = layout.preview_title {
        render_preview_title(model, frame, title);
    }
    if let Some(preview) = layout.preview {
        render_preview(model, frame, preview);
    }
    if let Some(divider) = layout.divider {
        render_divider(frame, divider, layout.stacked);
    }

    // The toast sits on the last body row, just above the status bar
    if model.active_toast().is_some() && layout.status.y > layout.header.height {
        let toast_area = Rect {
            y: layout.status.y - 1,
            height: 1,
            ..layout.status
        };
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_divider(frame: &mut Frame, area: Rect, stacked: bool) {
    let style = Style::default().fg(Color::Indexed(240));
    let lines: Vec<Line> = if stacked {
        vec![Line::styled("─".repeat(area.width as usize), style)]
    } else {
        (0..area.height).map(|_| Line::styled("│", style)).collect()
    };
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_preview_title(model: &Model, frame: &mut Frame, area: Rect) {
    let percent = model.preview_viewport.scroll_percent();
    let title = format!(" Preview  [{percent}%]");
    let bar = Paragraph::new(title).style(
        Style::default()
            .bg(Color::Indexed(236))
            .fg(Color::Indexed(252))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(bar, area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let visible = model.preview.visible_lines(
        model.preview_viewport.offset(),
        model.preview_viewport.height() as usize,
    );

    let mut content: Vec<Line> = Vec::new();
    for line in visible {
        let line_style = style::style_for_line_type(line.line_type());
        if let Some(spans) = line.spans() {
            let styled = spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style::style_for_inline(line_style, span.style()),
                    )
                })
                .collect::<Vec<_>>();
            content.push(Line::from(styled));
        } else {
            content.push(Line::styled(line.content().to_string(), line_style));
        }
    }

    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(PREVIEW_LEFT_PADDING));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.editor;
    let total_lines = buf.line_count();
    let gutter = gutter_width(total_lines);
    let text_width = area.width.saturating_sub(gutter) as usize;
    let cursor = buf.cursor();
    let selection = buf.selection();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in model.editor_viewport.visible_range() {
        let text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = (gutter - 1) as usize);
        let mut spans = vec![Span::styled(
            line_num,
            Style::default().fg(Color::DarkGray),
        )];

        let start = buf.line_start(line_idx);
        let len = text.chars().count();
        let selected = intersect(&selection, start, start + len);
        let cursor_col = (line_idx == cursor.line).then_some(cursor.col);
        spans.extend(editor_line_spans(
            &text,
            style::style_for_source_line(&text),
            selected,
            cursor_col,
            model.editor_hscroll,
            text_width,
        ));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Char columns of `selection` that fall on a line spanning `start..end`.
fn intersect(selection: &Range<usize>, start: usize, end: usize) -> Range<usize> {
    let from = selection.start.max(start);
    let to = selection.end.min(end);
    if from < to {
        (from - start)..(to - start)
    } else {
        0..0
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Plain,
    Selected,
    Cursor,
}

/// Spans for one editor line, scrolled by `hscroll` columns and cut at
/// `width`. The cursor is drawn as a reversed cell, past the end of the
/// line when it sits there.
pub(super) fn editor_line_spans(
    text: &str,
    base: Style,
    selected: Range<usize>,
    cursor_col: Option<usize>,
    hscroll: usize,
    width: usize,
) -> Vec<Span<'static>> {
    let style_of = |cell: Cell| match cell {
        Cell::Plain => base,
        Cell::Selected => base.bg(Color::DarkGray),
        Cell::Cursor => Style::default().bg(Color::White).fg(Color::Black),
    };

    let mut runs: Vec<(Cell, String)> = Vec::new();

    let mut col = 0;
    let mut used = 0;
    let mut clipped = false;
    for (idx, ch) in text.chars().enumerate() {
        let cells = char_cells(ch);
        let visible = col >= hscroll;
        col += cells;
        if !visible {
            continue;
        }
        if used + cells > width {
            clipped = true;
            break;
        }
        used += cells;
        let cell = if cursor_col == Some(idx) {
            Cell::Cursor
        } else if selected.contains(&idx) {
            Cell::Selected
        } else {
            Cell::Plain
        };
        push_cell(&mut runs, cell, if ch == '\t' { ' ' } else { ch });
    }
    let line_len = text.chars().count();
    if cursor_col.is_some_and(|c| c >= line_len) && !clipped && used < width {
        push_cell(&mut runs, Cell::Cursor, ' ');
    }

    runs.into_iter()
        .map(|(cell, run)| Span::styled(run, style_of(cell)))
        .collect()
}

fn push_cell(runs: &mut Vec<(Cell, String)>, cell: Cell, ch: char) {
    if let Some((last, run)) = runs.last_mut()
        && *last == cell
    {
        run.push(ch);
        return;
    }
    runs.push((cell, ch.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span<'_>]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_editor_line_marks_cursor_cell() {
        let spans = editor_line_spans("hello", Style::default(), 0..0, Some(1), 0, 80);
        assert_eq!(texts(&spans), vec!["h", "e", "llo"]);
        assert_eq!(spans[1].style.bg, Some(Color::White));
    }

    #[test]
    fn test_editor_line_cursor_past_end() {
        let spans = editor_line_spans("ab", Style::default(), 0..0, Some(2), 0, 80);
        assert_eq!(texts(&spans), vec!["ab", " "]);
        assert_eq!(spans[1].style.bg, Some(Color::White));
    }

    #[test]
    fn test_editor_line_selection_run() {
        let spans = editor_line_spans("hello world", Style::default(), 6..11, Some(11), 0, 80);
        assert_eq!(texts(&spans), vec!["hello ", "world", " "]);
        assert_eq!(spans[1].style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn test_editor_line_scrolls_and_clips() {
        let spans = editor_line_spans("abcdefgh", Style::default(), 0..0, None, 2, 3);
        assert_eq!(texts(&spans), vec!["cde"]);
    }

    #[test]
    fn test_intersect_selection_with_line() {
        assert_eq!(intersect(&(2..8), 5, 10), 0..3);
        assert_eq!(intersect(&(2..4), 5, 10), 0..0);
        assert_eq!(intersect(&(6..20), 5, 10), 1..5);
    }
}
