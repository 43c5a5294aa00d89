use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::document::{LineType, WELCOME_TEXT};
use crate::editor::{Direction, Motion};
use crate::format::FormatAction;
use crate::highlight::{HighlightState, Highlighter, SharedHighlighter};

use super::event_loop::{ResizeDebouncer, poll_highlighter};
use super::{App, Message, Model, TAB_SPACES, ToastLevel, ViewMode, update};

fn create_test_model(text: &str) -> Model {
    Model::new(text, (100, 30))
}

fn create_long_test_model() -> Model {
    let text = (0..100)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    Model::new(&text, (80, 24))
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn has_colored_code(model: &Model) -> bool {
    model
        .preview
        .lines()
        .iter()
        .filter(|line| *line.line_type() == LineType::CodeBlock)
        .filter_map(|line| line.spans())
        .flatten()
        .any(|span| span.style().fg.is_some())
}

// --- View modes ---

#[test]
fn test_view_mode_names_round_trip() {
    for mode in ViewMode::ALL {
        assert_eq!(ViewMode::parse(mode.as_str()), Some(mode));
    }
    assert_eq!(ViewMode::parse(" Preview "), Some(ViewMode::Preview));
    assert_eq!(ViewMode::parse("sideways"), None);
    assert_eq!(ViewMode::default(), ViewMode::Split);
}

#[test]
fn test_cycle_view_mode_visits_every_mode() {
    let model = create_test_model("text");
    let model = update(model, Message::CycleViewMode);
    assert_eq!(model.view_mode, ViewMode::Preview);
    let model = update(model, Message::CycleViewMode);
    assert_eq!(model.view_mode, ViewMode::Editor);
    let model = update(model, Message::CycleViewMode);
    assert_eq!(model.view_mode, ViewMode::Split);
}

#[test]
fn test_switching_modes_keeps_text_and_selection() {
    let mut model = create_test_model("hello world");
    model.editor.select(0..5);
    let before_text = model.editor.text();

    let model = update(model, Message::SetViewMode(ViewMode::Preview));
    let model = update(model, Message::SetViewMode(ViewMode::Split));

    assert_eq!(model.editor.text(), before_text);
    assert_eq!(model.editor.selection(), 0..5);
    assert_eq!(model.view_mode, ViewMode::Split);
}

#[test]
fn test_mode_panes() {
    assert!(ViewMode::Editor.shows_editor());
    assert!(!ViewMode::Editor.shows_preview());
    assert!(ViewMode::Split.shows_editor() && ViewMode::Split.shows_preview());
    assert!(!ViewMode::Preview.shows_editor());
}

// --- Formatting ---

#[test]
fn test_apply_bold_wraps_selection_and_moves_cursor() {
    let mut model = create_test_model("hello world");
    model.editor.select(6..11);
    let model = update(model, Message::ApplyFormat(FormatAction::Bold));
    assert_eq!(model.editor.text(), "hello **world**");
    assert_eq!(model.editor.cursor_offset(), 15);
    assert!(!model.editor.has_selection());
    assert!(model.editor.is_dirty());
}

#[test]
fn test_apply_format_with_empty_selection_inserts_markers() {
    let mut model = create_test_model("ab");
    model.editor.move_to_end();
    let model = update(model, Message::ApplyFormat(FormatAction::Bold));
    assert_eq!(model.editor.text(), "ab****");
    assert_eq!(model.editor.cursor_offset(), 6);
}

#[test]
fn test_apply_heading_and_ordered_list() {
    let model = update(create_test_model("Title"), Message::SelectAll);
    let model = update(model, Message::ApplyFormat(FormatAction::Heading(2)));
    assert_eq!(model.editor.text(), "## Title");

    let model = update(create_test_model("a\nb\nc"), Message::SelectAll);
    let model = update(model, Message::ApplyFormat(FormatAction::OrderedList));
    assert_eq!(model.editor.text(), "1. a\n2. b\n3. c");
}

#[test]
fn test_apply_format_updates_counts() {
    let model = update(create_test_model("one two"), Message::SelectAll);
    assert_eq!(model.stats.chars, 7);
    let model = update(model, Message::ApplyFormat(FormatAction::InlineCode));
    assert_eq!(model.stats.words, 2);
    assert_eq!(model.stats.chars, 9);
}

// --- Editing ---

#[test]
fn test_typing_updates_stats_and_marks_preview_stale() {
    let model = create_test_model("");
    assert!(!model.is_preview_stale());
    let model = update(model, Message::InsertChar('h'));
    let model = update(model, Message::InsertChar('i'));
    assert_eq!(model.editor.text(), "hi");
    assert_eq!(model.stats.words, 1);
    assert_eq!(model.stats.chars, 2);
    assert!(model.is_preview_stale());

    let mut model = model;
    model.sync_preview();
    assert!(!model.is_preview_stale());
    assert_eq!(model.preview.lines()[0].content(), "hi");
}

#[test]
fn test_hidden_preview_is_not_laid_out() {
    let model = update(
        create_test_model("x"),
        Message::SetViewMode(ViewMode::Editor),
    );
    let mut model = update(model, Message::InsertChar('y'));
    model.sync_preview();
    assert!(model.is_preview_stale());

    let mut model = update(model, Message::SetViewMode(ViewMode::Preview));
    model.sync_preview();
    assert!(!model.is_preview_stale());
    assert_eq!(model.preview.lines()[0].content(), "yx");
}

#[test]
fn test_tab_newline_and_deletes() {
    let model = create_test_model("");
    let model = update(model, Message::InsertTab);
    assert_eq!(model.editor.text(), TAB_SPACES);
    let model = update(model, Message::InsertNewline);
    let model = update(model, Message::InsertChar('z'));
    assert_eq!(model.editor.text(), format!("{TAB_SPACES}\nz"));
    let model = update(model, Message::DeleteBack);
    let model = update(model, Message::DeleteBack);
    assert_eq!(model.editor.text(), TAB_SPACES);
    let model = update(model, Message::Move {
        motion: Motion::LineStart,
        extend: false,
    });
    let model = update(model, Message::DeleteForward);
    assert_eq!(model.editor.text(), "   ");
    assert_eq!(model.stats.chars, 3);
}

#[test]
fn test_paste_replaces_selection() {
    let mut model = create_test_model("hello world");
    model.editor.select(0..5);
    let model = update(model, Message::InsertText("bye\nnow".to_string()));
    assert_eq!(model.editor.text(), "bye\nnow world");
    assert_eq!(model.stats.words, 3);
}

#[test]
fn test_shift_motion_extends_selection() {
    let model = create_test_model("hello");
    let model = update(model, Message::Move {
        motion: Motion::Step(Direction::Right),
        extend: true,
    });
    let model = update(model, Message::Move {
        motion: Motion::WordRight,
        extend: true,
    });
    assert_eq!(model.editor.selection(), 0..5);
    let model = update(model, Message::ClearSelection);
    assert!(!model.editor.has_selection());
}

#[test]
fn test_click_and_drag_select() {
    let model = create_test_model("hello\nworld");
    let model = update(model, Message::ClickEditor { line: 0, col: 2 });
    let model = update(model, Message::DragEditor { line: 1, col: 3 });
    assert_eq!(model.editor.selection(), 2..9);
    let model = update(model, Message::ClickEditor { line: 1, col: 0 });
    assert!(!model.editor.has_selection());
    assert_eq!(model.editor.cursor_offset(), 6);
}

#[test]
fn test_cursor_stays_visible_when_moving_to_end() {
    let model = update(create_long_test_model(), Message::Move {
        motion: Motion::BufferEnd,
        extend: false,
    });
    assert_eq!(model.editor.cursor().line, 99);
    assert!(model.editor_viewport.visible_range().contains(&99));
}

#[test]
fn test_page_down_moves_cursor_by_pane_height() {
    let model = update(
        create_long_test_model(),
        Message::SetViewMode(ViewMode::Editor),
    );
    let height = model.editor_viewport.height() as usize;
    assert_eq!(height, 21);
    let model = update(model, Message::PageDown);
    assert_eq!(model.editor.cursor().line, height);
    let model = update(model, Message::PageUp);
    assert_eq!(model.editor.cursor().line, 0);
}

#[test]
fn test_page_down_scrolls_preview_in_preview_mode() {
    let model = update(
        create_long_test_model(),
        Message::SetViewMode(ViewMode::Preview),
    );
    let mut model = model;
    model.sync_preview();
    let model = update(model, Message::PageDown);
    assert!(model.preview_viewport.offset() > 0);
    assert_eq!(model.editor.cursor().line, 0);
    let model = update(model, Message::PreviewToTop);
    assert_eq!(model.preview_viewport.offset(), 0);
}

#[test]
fn test_long_line_scrolls_editor_horizontally() {
    let text = "x".repeat(200);
    let model = update(Model::new(&text, (80, 24)), Message::Move {
        motion: Motion::LineEnd,
        extend: false,
    });
    let width = model.editor_text_width();
    assert!(model.editor_hscroll > 0);
    assert_eq!(model.editor_hscroll, 200 + 1 - width);
    let model = update(model, Message::Move {
        motion: Motion::LineStart,
        extend: false,
    });
    assert_eq!(model.editor_hscroll, 0);
}

// --- Highlighter ---

#[test]
fn test_highlighter_ready_colors_preview_code() {
    let model = create_test_model("```rust\nfn main() {}\n```");
    assert!(!model.preview.is_highlighted());
    assert!(!has_colored_code(&model));

    let ready = SharedHighlighter::new(Highlighter::load());
    let mut model = update(model, Message::HighlighterReady(ready));
    assert_eq!(model.highlight_state, HighlightState::Ready);
    assert!(model.highlighter.is_some());
    assert!(model.is_preview_stale());
    let (msg, level) = model.active_toast().expect("ready toast should be set");
    assert_eq!(msg, "Syntax highlighting ready");
    assert_eq!(level, ToastLevel::Info);

    model.sync_preview();
    assert!(model.preview.is_highlighted());
    assert!(has_colored_code(&model));
}

#[test]
fn test_highlighter_failed_shows_warning() {
    let model = update(create_test_model("text"), Message::HighlighterFailed);
    assert_eq!(model.highlight_state, HighlightState::Failed);
    assert!(model.highlighter.is_none());
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);
}

#[test]
fn test_poll_without_loader_is_quiet() {
    let mut loader = None;
    assert!(poll_highlighter(&mut loader).is_none());
}

// --- Application ---

#[test]
fn test_resize_relays_out_preview() {
    let mut model = create_test_model("some words here");
    let wide = model.preview.width();
    let mut model = update(model, Message::Resize(60, 20));
    model.sync_preview();
    assert_eq!(model.preview.width(), 59);
    assert_ne!(model.preview.width(), wide);
    assert!(model.layout().stacked);
}

#[test]
fn test_toggle_help_and_quit() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_toast_lifecycle() {
    let mut model = create_test_model("");
    model.show_toast(ToastLevel::Info, "saved defaults");
    let (msg, level) = model.active_toast().expect("toast should be set");
    assert_eq!(msg, "saved defaults");
    assert_eq!(level, ToastLevel::Info);
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_resize_debouncer_waits_for_quiet_period() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 0);
    assert!(debouncer.is_pending());
    assert!(debouncer.take_ready(50).is_none());
    assert_eq!(debouncer.take_ready(100), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_debouncer_keeps_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 0);
    debouncer.queue(140, 50, 20);
    assert!(debouncer.take_ready(80).is_none());
    assert_eq!(debouncer.take_ready(120), Some((140, 50)));
}

#[test]
fn test_app_builder_configures_model() {
    let app = App::new()
        .with_initial_text("notes")
        .with_view_mode(ViewMode::Preview)
        .with_highlighting(false)
        .with_source_name(Some("notes.md".to_string()));
    let model = app.build_model((100, 30));
    assert_eq!(model.editor.text(), "notes");
    assert_eq!(model.view_mode, ViewMode::Preview);
    assert_eq!(model.highlight_state, HighlightState::Disabled);
    assert_eq!(model.source_name.as_deref(), Some("notes.md"));

    let model = App::new().build_model((100, 30));
    assert_eq!(model.editor.text(), WELCOME_TEXT);
    assert_eq!(model.highlight_state, HighlightState::Loading);
}

// --- Input mapping ---

#[test]
fn test_global_keys() {
    let model = create_test_model("");
    let ctrl = KeyModifiers::CONTROL;
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q'), ctrl), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::F(3), KeyModifiers::NONE), &model),
        Some(Message::SetViewMode(ViewMode::Split))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('\\'), ctrl), &model),
        Some(Message::CycleViewMode)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::F(1), KeyModifiers::NONE), &model),
        Some(Message::ToggleHelp)
    );
}

#[test]
fn test_editor_keys() {
    let model = create_test_model("");
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::InsertChar('x'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('X'), KeyModifiers::SHIFT), &model),
        Some(Message::InsertChar('X'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Right, KeyModifiers::SHIFT), &model),
        Some(Message::Move {
            motion: Motion::Step(Direction::Right),
            extend: true,
        })
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Left, KeyModifiers::CONTROL), &model),
        Some(Message::Move {
            motion: Motion::WordLeft,
            extend: false,
        })
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('a'), KeyModifiers::CONTROL), &model),
        Some(Message::SelectAll)
    );
}

#[test]
fn test_format_shortcuts() {
    let model = create_test_model("");
    assert_eq!(
        App::handle_key(key(KeyCode::Char('b'), KeyModifiers::CONTROL), &model),
        Some(Message::ApplyFormat(FormatAction::Bold))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('2'), KeyModifiers::ALT), &model),
        Some(Message::ApplyFormat(FormatAction::Heading(2)))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('k'), KeyModifiers::ALT), &model),
        Some(Message::ApplyFormat(FormatAction::CodeBlock))
    );
}

#[test]
fn test_preview_mode_keys_scroll_instead_of_typing() {
    let model = update(
        create_test_model(""),
        Message::SetViewMode(ViewMode::Preview),
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j'), KeyModifiers::NONE), &model),
        Some(Message::PreviewScrollDown(1))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('G'), KeyModifiers::SHIFT), &model),
        Some(Message::PreviewToBottom)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        None
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE), &model),
        Some(Message::Quit)
    );
}

#[test]
fn test_help_swallows_keys() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        None
    );
}

#[test]
fn test_mouse_clicks_hit_header_toolbar_and_editor() {
    // 100x30 Split: header buttons end at the right edge, toolbar on row 1,
    // editor text from row 2 after a two-column gutter
    let model = create_test_model("hello\nworld");
    assert_eq!(
        App::handle_mouse(click(92, 0), &model),
        Some(Message::SetViewMode(ViewMode::Preview))
    );
    assert_eq!(
        App::handle_mouse(click(2, 1), &model),
        Some(Message::ApplyFormat(FormatAction::Heading(1)))
    );
    assert_eq!(
        App::handle_mouse(click(5, 3), &model),
        Some(Message::ClickEditor { line: 1, col: 3 })
    );
    assert_eq!(
        App::handle_mouse(click(40, 20), &model),
        Some(Message::ClickEditor { line: 1, col: 5 })
    );
}

#[test]
fn test_mouse_wheel_scrolls_pane_under_pointer() {
    let model = create_test_model("text");
    let wheel = |column, row| MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(wheel(70, 10), &model),
        Some(Message::PreviewScrollDown(3))
    );
    assert_eq!(
        App::handle_mouse(wheel(10, 10), &model),
        Some(Message::EditorScrollDown(3))
    );
}
