use super::*;
use crate::app::{Message, Model, ViewMode, update};
use crate::highlight::HighlightState;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn render_to_string(model: &Model) -> String {
    let (width, height) = model.terminal_size;
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}

fn model_with(text: &str, size: (u16, u16), mode: ViewMode) -> Model {
    let mut model = Model::new(text, size);
    model.set_view_mode(mode);
    model.sync_preview();
    model
}

#[test]
fn test_split_layout_side_by_side() {
    let layout = pane_layout(Rect::new(0, 0, 100, 30), ViewMode::Split);
    assert_eq!(layout.header, Rect::new(0, 0, 100, 1));
    assert_eq!(layout.status, Rect::new(0, 29, 100, 1));
    assert_eq!(layout.toolbar, Some(Rect::new(0, 1, 50, 1)));
    assert_eq!(layout.editor, Some(Rect::new(0, 2, 50, 27)));
    assert_eq!(layout.divider, Some(Rect::new(50, 1, 1, 28)));
    assert_eq!(layout.preview_title, Some(Rect::new(51, 1, 49, 1)));
    assert_eq!(layout.preview, Some(Rect::new(51, 2, 49, 27)));
    assert!(!layout.stacked);
}

#[test]
fn test_split_layout_stacks_on_narrow_terminal() {
    let layout = pane_layout(Rect::new(0, 0, 60, 30), ViewMode::Split);
    assert!(layout.stacked);
    assert_eq!(layout.toolbar, Some(Rect::new(0, 1, 60, 1)));
    assert_eq!(layout.editor, Some(Rect::new(0, 2, 60, 13)));
    assert_eq!(layout.divider, Some(Rect::new(0, 15, 60, 1)));
    assert_eq!(layout.preview_title, Some(Rect::new(0, 16, 60, 1)));
    assert_eq!(layout.preview, Some(Rect::new(0, 17, 60, 12)));
}

#[test]
fn test_single_pane_layouts_use_full_width() {
    let editor = pane_layout(Rect::new(0, 0, 100, 30), ViewMode::Editor);
    assert_eq!(editor.editor, Some(Rect::new(0, 2, 100, 27)));
    assert!(editor.preview.is_none());
    assert!(editor.divider.is_none());

    let preview = pane_layout(Rect::new(0, 0, 100, 30), ViewMode::Preview);
    assert_eq!(preview.preview, Some(Rect::new(0, 2, 100, 27)));
    assert!(preview.toolbar.is_none());
    assert!(preview.editor.is_none());
}

#[test]
fn test_tiny_terminal_layout_does_not_underflow() {
    let layout = pane_layout(Rect::new(0, 0, 10, 1), ViewMode::Split);
    assert_eq!(layout.header.height, 1);
    assert_eq!(layout.status.height, 0);
    assert_eq!(layout.editor.map(|r| r.height), Some(0));
}

#[test]
fn test_display_columns_with_wide_chars() {
    assert_eq!(display_col("a中b", 2), 3);
    assert_eq!(char_col_at("a中b", 0), 0);
    assert_eq!(char_col_at("a中b", 2), 1);
    assert_eq!(char_col_at("a中b", 3), 2);
    assert_eq!(char_col_at("a中b", 99), 3);
}

#[test]
fn test_editor_text_width_leaves_gutter() {
    assert_eq!(editor_text_width(50, 5), 48);
    assert_eq!(editor_text_width(50, 120), 46);
    assert_eq!(editor_text_width(1, 120), 0);
}

#[test]
fn test_render_split_shows_both_panes_and_counts() {
    let model = model_with("# Title\n\nhello there", (100, 30), ViewMode::Split);
    let screen = render_to_string(&model);
    assert!(screen.contains("Markpad"));
    assert!(screen.contains(" H1 "));
    // Half-width panes get the short labels
    assert!(screen.contains(" ` ```"));
    assert!(!screen.contains("Code Block"));
    assert!(screen.contains("Preview  ["));
    assert!(screen.contains("# Title"));
    assert!(screen.contains("hello there"));
    assert!(screen.contains("Words: 3  Characters: 20"));
}

#[test]
fn test_render_editor_mode_hides_preview() {
    let model = model_with("plain words", (100, 30), ViewMode::Editor);
    let screen = render_to_string(&model);
    assert!(screen.contains(" Code   Code Block "));
    assert!(!screen.contains("Preview  ["));
}

#[test]
fn test_render_preview_mode_hides_toolbar() {
    let model = model_with("plain words", (100, 30), ViewMode::Preview);
    let screen = render_to_string(&model);
    assert!(!screen.contains("Code Block"));
    assert!(screen.contains("Preview  ["));
    assert!(screen.contains("plain words"));
}

#[test]
fn test_render_help_overlay() {
    let model = update(
        model_with("text", (100, 40), ViewMode::Split),
        Message::ToggleHelp,
    );
    let screen = render_to_string(&model);
    assert!(screen.contains("Help"));
    assert!(screen.contains("Formatting"));
    assert!(screen.contains("Esc closes"));
}

#[test]
fn test_status_bar_text() {
    let mut model = Model::new("Hello, World! 123", (100, 30));
    assert_eq!(status_right(&model), "Words: 3  Characters: 17 ");
    assert!(status_left(&model).starts_with(" Ln 1, Col 1"));
    assert!(status_left(&model).contains("plain"));
    assert!(!status_left(&model).contains("[modified]"));

    model.editor.select(0..5);
    model.editor.insert_char('X');
    model.highlight_state = HighlightState::Failed;
    let left = status_left(&model);
    assert!(left.contains("Ln 1, Col 2"));
    assert!(left.contains("[modified]"));
    assert!(left.contains("highlight unavailable"));
}

#[test]
fn test_status_bar_reports_selection_length() {
    let mut model = Model::new("Hello, World!", (100, 30));
    model.editor.select(0..5);
    assert!(status_left(&model).contains("5 selected"));
}

#[test]
fn test_render_narrow_status_keeps_counts() {
    let model = model_with("one two", (30, 10), ViewMode::Editor);
    let screen = render_to_string(&model);
    assert!(screen.contains("Words: 2  Characters: 7"));
}
