use crate::app::{Model, ToastLevel, ViewMode};
use crate::editor::{Direction, Motion};
use crate::format::FormatAction;
use crate::highlight::{HighlightState, SharedHighlighter};

/// Spaces inserted by the Tab key.
pub const TAB_SPACES: &str = "    ";

/// Lines moved per mouse-wheel notch.
pub const WHEEL_LINES: usize = 3;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character, replacing the selection
    InsertChar(char),
    /// Insert pasted text, replacing the selection
    InsertText(String),
    /// Split the line at the cursor (Enter)
    InsertNewline,
    /// Insert `TAB_SPACES` (Tab)
    InsertTab,
    /// Delete the selection or the character before the cursor (Backspace)
    DeleteBack,
    /// Delete the selection or the character at the cursor (Delete)
    DeleteForward,
    /// Move the cursor; `extend` grows the selection instead of dropping it
    Move { motion: Motion, extend: bool },
    SelectAll,
    ClearSelection,
    /// Place the cursor at a (line, char column) from a mouse click
    ClickEditor { line: usize, col: usize },
    /// Extend the selection to a (line, char column) from a mouse drag
    DragEditor { line: usize, col: usize },

    // Formatting
    /// Run a toolbar action on the selection
    ApplyFormat(FormatAction),

    // View
    SetViewMode(ViewMode),
    /// Editor → Split → Preview → Editor
    CycleViewMode,

    // Scrolling
    /// Page up in the focused pane (editor when visible, else preview)
    PageUp,
    /// Page down in the focused pane (editor when visible, else preview)
    PageDown,
    EditorScrollUp(usize),
    EditorScrollDown(usize),
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewToTop,
    PreviewToBottom,

    // Highlighter
    /// The background load finished
    HighlighterReady(SharedHighlighter),
    /// The background load ended without a highlighter
    HighlighterFailed,

    // Application
    /// Terminal resized
    Resize(u16, u16),
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
}

/// Pure update function - transforms model based on message.
///
/// This is the core of TEA - all state changes happen here.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.editor.insert_char(ch);
            model.text_changed();
        }
        Message::InsertText(text) => {
            model.editor.insert_str(&text);
            model.text_changed();
        }
        Message::InsertNewline => {
            model.editor.split_line();
            model.text_changed();
        }
        Message::InsertTab => {
            model.editor.insert_str(TAB_SPACES);
            model.text_changed();
        }
        Message::DeleteBack => {
            if model.editor.delete_back() {
                model.text_changed();
            }
        }
        Message::DeleteForward => {
            if model.editor.delete_forward() {
                model.text_changed();
            }
        }
        Message::Move { motion, extend } => {
            model.editor.apply_motion(motion, extend);
            model.ensure_cursor_visible();
        }
        Message::SelectAll => {
            model.editor.select_all();
            model.ensure_cursor_visible();
        }
        Message::ClearSelection => model.editor.clear_selection(),
        Message::ClickEditor { line, col } => {
            model.editor.clear_selection();
            model.editor.move_to(line, col);
            model.ensure_cursor_visible();
        }
        Message::DragEditor { line, col } => {
            model.editor.extend_to(line, col);
            model.ensure_cursor_visible();
        }

        // Formatting
        Message::ApplyFormat(action) => apply_format(&mut model, action),

        // View
        Message::SetViewMode(mode) => model.set_view_mode(mode),
        Message::CycleViewMode => {
            let next = model.view_mode.next();
            model.set_view_mode(next);
        }

        // Scrolling
        Message::PageUp => {
            if model.view_mode.shows_editor() {
                page_editor(&mut model, Direction::Up);
            } else {
                model.preview_viewport.page_up();
            }
        }
        Message::PageDown => {
            if model.view_mode.shows_editor() {
                page_editor(&mut model, Direction::Down);
            } else {
                model.preview_viewport.page_down();
            }
        }
        Message::EditorScrollUp(n) => model.editor_viewport.scroll_up(n),
        Message::EditorScrollDown(n) => model.editor_viewport.scroll_down(n),
        Message::PreviewScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PreviewToTop => model.preview_viewport.go_to_top(),
        Message::PreviewToBottom => model.preview_viewport.go_to_bottom(),

        // Highlighter
        Message::HighlighterReady(highlighter) => {
            model.highlighter = Some(highlighter);
            model.highlight_state = HighlightState::Ready;
            model.invalidate_preview();
            model.show_toast(ToastLevel::Info, "Syntax highlighting ready");
        }
        Message::HighlighterFailed => {
            model.highlighter = None;
            model.highlight_state = HighlightState::Failed;
            model.show_toast(
                ToastLevel::Warning,
                "Syntax highlighting unavailable; code blocks stay plain",
            );
        }

        // Application
        Message::Resize(width, height) => model.resize(width, height),
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Quit => model.should_quit = true,
    }
    model
}

fn apply_format(model: &mut Model, action: FormatAction) {
    let text = model.editor.text();
    let selection = model.editor.selection();
    let edit = crate::format::edit(&text, selection.clone(), action);
    crate::perf::log_event(
        "format.apply",
        format!(
            "{} {}..{} -> cursor {}",
            action.name(),
            selection.start,
            selection.end,
            edit.cursor
        ),
    );
    model.editor.apply_edit(&edit);
    model.text_changed();
}

/// Move the cursor a page, dropping any selection.
fn page_editor(model: &mut Model, direction: Direction) {
    let rows = (model.editor_viewport.height() as usize).max(1);
    for _ in 0..rows {
        model.editor.apply_motion(Motion::Step(direction), false);
    }
    model.ensure_cursor_visible();
}
