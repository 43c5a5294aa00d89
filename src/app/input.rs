use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::update::WHEEL_LINES;
use crate::app::{App, Message, Model, ViewMode};
use crate::editor::{Direction, Motion};
use crate::format::FormatAction;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.view_mode.shows_editor() && !model.help_visible => Some(
                Message::InsertText(text.replace("\r\n", "\n").replace('\r', "\n")),
            ),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if model.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q' | '?') => {
                    Some(Message::HideHelp)
                }
                KeyCode::Char('c') if ctrl => Some(Message::Quit),
                _ => None,
            };
        }

        // Global keys
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('\\' | '4') if ctrl => return Some(Message::CycleViewMode),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::SetViewMode(ViewMode::Editor)),
            KeyCode::F(3) => return Some(Message::SetViewMode(ViewMode::Split)),
            KeyCode::F(4) => return Some(Message::SetViewMode(ViewMode::Preview)),
            _ => {}
        }

        if !model.view_mode.shows_editor() {
            return Self::handle_preview_key(key);
        }

        if let Some(action) = format_shortcut(key) {
            return Some(Message::ApplyFormat(action));
        }

        let motion = |motion: Motion| {
            Some(Message::Move {
                motion,
                extend: shift,
            })
        };
        match key.code {
            KeyCode::Char('a') if ctrl => Some(Message::SelectAll),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InsertChar(c)),
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Tab => Some(Message::InsertTab),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Esc => Some(Message::ClearSelection),
            KeyCode::Left if ctrl => motion(Motion::WordLeft),
            KeyCode::Right if ctrl => motion(Motion::WordRight),
            KeyCode::Left => motion(Motion::Step(Direction::Left)),
            KeyCode::Right => motion(Motion::Step(Direction::Right)),
            KeyCode::Up => motion(Motion::Step(Direction::Up)),
            KeyCode::Down => motion(Motion::Step(Direction::Down)),
            KeyCode::Home if ctrl => motion(Motion::BufferStart),
            KeyCode::End if ctrl => motion(Motion::BufferEnd),
            KeyCode::Home => motion(Motion::LineStart),
            KeyCode::End => motion(Motion::LineEnd),
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown => Some(Message::PageDown),
            _ => None,
        }
    }

    /// Keys while only the preview is on screen: a pager.
    fn handle_preview_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::PreviewScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::PreviewScrollUp(1)),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::PreviewToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::PreviewToBottom),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        let layout = model.layout();
        let in_editor = layout
            .editor
            .is_some_and(|area| crate::ui::contains(area, mouse.column, mouse.row));
        let in_preview = [layout.preview_title, layout.preview]
            .into_iter()
            .flatten()
            .any(|area| crate::ui::contains(area, mouse.column, mouse.row));

        match mouse.kind {
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_editor => {
                Some(Message::EditorScrollDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::PreviewScrollDown(WHEEL_LINES))
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(mode) = crate::ui::view_mode_at(layout.header, mouse.column, mouse.row)
                {
                    return Some(Message::SetViewMode(mode));
                }
                if let Some(toolbar) = layout.toolbar
                    && let Some(action) =
                        crate::ui::format_action_at(toolbar, mouse.column, mouse.row)
                {
                    return Some(Message::ApplyFormat(action));
                }
                let area = layout.editor.filter(|_| in_editor)?;
                let (line, col) = editor_position(model, area, mouse.column, mouse.row);
                Some(Message::ClickEditor { line, col })
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !in_editor && model.editor.anchor().is_none() {
                    return None;
                }
                let area = layout.editor?;
                let (line, col) = editor_position(model, area, mouse.column, mouse.row);
                Some(Message::DragEditor { line, col })
            }
            _ => None,
        }
    }
}

/// Formatting shortcuts. Ctrl+I is Tab in terminals, so most use Alt.
fn format_shortcut(key: KeyEvent) -> Option<FormatAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('b') if ctrl => Some(FormatAction::Bold),
        KeyCode::Char('k') if ctrl => Some(FormatAction::Link),
        KeyCode::Char(c @ '1'..='3') if alt => {
            c.to_digit(10).and_then(|d| u8::try_from(d).ok()).map(FormatAction::Heading)
        }
        KeyCode::Char('b') if alt => Some(FormatAction::Bold),
        KeyCode::Char('i') if alt => Some(FormatAction::Italic),
        KeyCode::Char('c') if alt => Some(FormatAction::InlineCode),
        KeyCode::Char('q') if alt => Some(FormatAction::Quote),
        KeyCode::Char('l') if alt => Some(FormatAction::Link),
        KeyCode::Char('u') if alt => Some(FormatAction::UnorderedList),
        KeyCode::Char('o') if alt => Some(FormatAction::OrderedList),
        KeyCode::Char('k') if alt => Some(FormatAction::CodeBlock),
        _ => None,
    }
}

/// Buffer (line, char column) under a screen cell of the editor pane.
///
/// Rows past the last line land on the last line; cells in the gutter land
/// on column 0.
fn editor_position(model: &Model, area: Rect, column: u16, row: u16) -> (usize, usize) {
    let total = model.editor.line_count();
    let rel_row = row.saturating_sub(area.y) as usize;
    let line = (model.editor_viewport.offset() + rel_row).min(total.saturating_sub(1));
    let gutter = crate::ui::gutter_width(total);
    let rel_col = column.saturating_sub(area.x + gutter) as usize;
    let text = model.editor.line_at(line).unwrap_or_default();
    let col = crate::ui::char_col_at(&text, model.editor_hscroll + rel_col);
    (line, col)
}

