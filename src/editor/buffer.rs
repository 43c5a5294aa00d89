use std::ops::Range;

use ropey::Rope;

use crate::format::Edit;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in chars within the line.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self::at(0, 0)
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor motion, optionally extending the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Step(Direction),
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    BufferStart,
    BufferEnd,
}

/// Rope-backed text with a cursor and an optional selection anchor.
///
/// The selection is the char range between the anchor and the cursor.
/// Without an anchor the selection is empty and sits at the cursor.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<usize>,
    dirty: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the text changed since the buffer was created.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in chars, line ending excluded.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char offset where a line begins. Past the end yields the text length.
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line_idx)
    }

    // --- Offsets ---

    /// Cursor position as a char offset into the whole text.
    pub fn cursor_offset(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col
    }

    /// Place the cursor at a char offset, clamped to the text.
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let col = (offset - self.rope.line_to_char(line)).min(self.line_len(line));
        self.cursor.line = line;
        self.cursor.set_col(col);
    }

    // --- Selection ---

    /// The selection anchor, if a selection is active.
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// The selected char range, normalized so `start <= end`.
    pub fn selection(&self) -> Range<usize> {
        let head = self.cursor_offset();
        let anchor = self
            .anchor
            .map_or(head, |a| a.min(self.rope.len_chars()));
        anchor.min(head)..anchor.max(head)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection().is_empty()
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.set_cursor_offset(self.rope.len_chars());
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Move to a position while keeping (or starting) a selection, as a
    /// mouse drag does.
    pub fn extend_to(&mut self, line: usize, col: usize) {
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor_offset());
        }
        self.move_to(line, col);
    }

    /// Select an explicit char range, leaving the cursor at `range.end`.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.rope.len_chars();
        self.anchor = Some(range.start.min(len));
        self.set_cursor_offset(range.end);
    }

    /// Remove the selected text. Returns `true` if anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let range = self.selection();
        self.anchor = None;
        if range.is_empty() {
            return false;
        }
        self.rope.remove(range.clone());
        self.set_cursor_offset(range.start);
        self.dirty = true;
        true
    }

    // --- Editing ---

    /// Insert a character, replacing the selection if any.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let idx = self.cursor_offset();
        self.rope.insert_char(idx, ch);
        self.set_cursor_offset(idx + 1);
        self.dirty = true;
    }

    /// Insert a string, replacing the selection if any.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.delete_selection();
        let idx = self.cursor_offset();
        self.rope.insert(idx, s);
        self.set_cursor_offset(idx + s.chars().count());
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the cursor.
    ///
    /// Returns `true` if text was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let idx = self.cursor_offset();
        if idx == 0 {
            return false;
        }
        // A CRLF pair is removed as one line break.
        let start = if self.cursor.col == 0 && idx >= 2 && self.rope.char(idx - 2) == '\r' {
            idx - 2
        } else {
            idx - 1
        };
        self.rope.remove(start..idx);
        self.set_cursor_offset(start);
        self.dirty = true;
        true
    }

    /// Delete the selection, or the character at the cursor.
    ///
    /// Returns `true` if text was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let idx = self.cursor_offset();
        let len = self.rope.len_chars();
        if idx >= len {
            return false;
        }
        let end = if self.rope.char(idx) == '\r' && idx + 1 < len && self.rope.char(idx + 1) == '\n'
        {
            idx + 2
        } else {
            idx + 1
        };
        self.rope.remove(idx..end);
        self.dirty = true;
        true
    }

    /// Replace `edit.range` with `edit.replacement` and move the cursor.
    pub fn apply_edit(&mut self, edit: &Edit) {
        let len = self.rope.len_chars();
        let start = edit.range.start.min(len);
        let end = edit.range.end.clamp(start, len);
        self.rope.remove(start..end);
        self.rope.insert(start, &edit.replacement);
        self.anchor = None;
        self.set_cursor_offset(edit.cursor);
        self.dirty = true;
    }

    // --- Movement ---

    /// Move the cursor. With `extend`, the selection grows from its anchor;
    /// otherwise any selection is dropped.
    pub fn apply_motion(&mut self, motion: Motion, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor_offset());
            }
        } else if self.has_selection() {
            let range = self.selection();
            self.anchor = None;
            match motion {
                Motion::Step(Direction::Left) => {
                    self.set_cursor_offset(range.start);
                    return;
                }
                Motion::Step(Direction::Right) => {
                    self.set_cursor_offset(range.end);
                    return;
                }
                _ => {}
            }
        } else {
            self.anchor = None;
        }

        match motion {
            Motion::Step(direction) => self.move_cursor(direction),
            Motion::LineStart => self.move_home(),
            Motion::LineEnd => self.move_end(),
            Motion::WordLeft => self.move_word_left(),
            Motion::WordRight => self.move_word_right(),
            Motion::BufferStart => self.move_to_start(),
            Motion::BufferEnd => self.move_to_end(),
        }
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Jump to the start of the previous word, or the end of the previous line.
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.move_end();
            }
            return;
        }
        let chars: Vec<char> = self.line_chars(self.cursor.line);
        let mut col = self.cursor.col.min(chars.len());
        while col > 0 && !is_word_char(chars[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(chars[col - 1]) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Jump past the current word and the gap after it, or to the next line.
    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.line_chars(self.cursor.line);
        if self.cursor.col >= chars.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }
        let mut col = self.cursor.col;
        while col < chars.len() && is_word_char(chars[col]) {
            col += 1;
        }
        while col < chars.len() && !is_word_char(chars[col]) {
            col += 1;
        }
        self.cursor.set_col(col);
    }

    /// Move to a line and char column, both clamped.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor.line = last;
        self.cursor.set_col(self.line_len(last));
    }

    // --- Private helpers ---

    fn line_chars(&self, line_idx: usize) -> Vec<char> {
        self.rope
            .line(line_idx)
            .chars()
            .take(self.line_len(line_idx))
            .collect()
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.move_end();
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(line) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if line >= self.line_count() {
            return;
        }
        self.cursor.line = line;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(line));
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}
