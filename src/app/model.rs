use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::document::{DocumentStats, PreviewDocument};
use crate::editor::EditorBuffer;
use crate::highlight::{HighlightState, SharedHighlighter};
use crate::ui::viewport::Viewport;
use crate::ui::{PaneLayout, pane_layout};

/// Which panes are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    /// Editor pane only
    Editor,
    /// Editor and preview side by side (stacked on narrow terminals)
    #[default]
    Split,
    /// Preview pane only
    Preview,
}

impl ViewMode {
    pub const ALL: [Self; 3] = [Self::Editor, Self::Split, Self::Preview];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::Split => "Split",
            Self::Preview => "Preview",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Split => "split",
            Self::Preview => "preview",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Editor → Split → Preview → Editor.
    pub const fn next(self) -> Self {
        match self {
            Self::Editor => Self::Split,
            Self::Split => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }

    pub const fn shows_editor(self) -> bool {
        matches!(self, Self::Editor | Self::Split)
    }

    pub const fn shows_preview(self) -> bool {
        matches!(self, Self::Split | Self::Preview)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The preview and the
/// counts are derived from the editor text; `text_changed` keeps them honest.
pub struct Model {
    /// The document text, cursor and selection
    pub editor: EditorBuffer,
    /// Which panes are visible
    pub view_mode: ViewMode,
    /// Word and character counts of the current text
    pub stats: DocumentStats,
    /// Laid-out preview of the text
    pub preview: PreviewDocument,
    /// Set when the text or highlighter changed since the last layout
    preview_stale: bool,
    /// Scroll position of the preview pane
    pub preview_viewport: Viewport,
    /// Scroll position of the editor pane (follows the cursor)
    pub editor_viewport: Viewport,
    /// Horizontal scroll of the editor pane in display columns
    pub editor_hscroll: usize,
    /// Terminal size (width, height)
    pub terminal_size: (u16, u16),
    /// Code highlighter, once it has loaded
    pub highlighter: Option<SharedHighlighter>,
    pub highlight_state: HighlightState,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// File name shown in the header, if the text came from a file
    pub source_name: Option<String>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("view_mode", &self.view_mode)
            .field("cursor", &self.editor.cursor())
            .field("stats", &self.stats)
            .field("highlight_state", &self.highlight_state)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model holding `text` for a terminal of `terminal_size`.
    pub fn new(text: &str, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            editor: EditorBuffer::from_text(text),
            view_mode: ViewMode::default(),
            stats: DocumentStats::compute(text),
            preview: PreviewDocument::default(),
            preview_stale: true,
            preview_viewport: Viewport::default(),
            editor_viewport: Viewport::default(),
            editor_hscroll: 0,
            terminal_size,
            highlighter: None,
            highlight_state: HighlightState::Disabled,
            help_visible: false,
            source_name: None,
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
        };
        model.relayout();
        model.sync_preview();
        model
    }

    /// Pane areas for the current terminal size and view mode.
    pub fn layout(&self) -> PaneLayout {
        let (width, height) = self.terminal_size;
        pane_layout(Rect::new(0, 0, width, height), self.view_mode)
    }

    /// Width the preview should be laid out for, if the preview is visible.
    pub fn preview_text_width(&self) -> Option<usize> {
        self.layout().preview.map(crate::ui::preview_text_width)
    }

    /// Columns available for text in the editor pane.
    pub fn editor_text_width(&self) -> usize {
        self.layout().editor.map_or(0, |pane| {
            crate::ui::editor_text_width(pane.width, self.editor.line_count())
        })
    }

    pub const fn is_preview_stale(&self) -> bool {
        self.preview_stale
    }

    /// Recompute derived state after the text changed.
    pub fn text_changed(&mut self) {
        self.stats = DocumentStats::compute(&self.editor.text());
        self.preview_stale = true;
        self.editor_viewport.set_total_lines(self.editor.line_count());
        self.ensure_cursor_visible();
    }

    /// Force the next `sync_preview` to lay the preview out again.
    pub const fn invalidate_preview(&mut self) {
        self.preview_stale = true;
    }

    /// Lay out the preview again if it is visible and out of date.
    ///
    /// The event loop calls this once per frame, so a burst of keystrokes
    /// costs a single layout.
    pub fn sync_preview(&mut self) {
        let Some(width) = self.preview_text_width() else {
            return;
        };
        if !self.preview_stale && self.preview.width() == width {
            return;
        }
        self.preview = PreviewDocument::layout(
            &self.editor.text(),
            width,
            self.highlighter.as_deref(),
        );
        self.preview_viewport
            .set_total_lines(self.preview.line_count());
        self.preview_stale = false;
        crate::perf::log_event(
            "preview.sync",
            format!(
                "width={width} lines={} highlighted={}",
                self.preview.line_count(),
                self.preview.is_highlighted()
            ),
        );
    }

    /// Switch panes. Text, cursor and selection are left alone.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        self.view_mode = mode;
        self.relayout();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.relayout();
    }

    /// Size both viewports to their panes.
    pub(super) fn relayout(&mut self) {
        let layout = self.layout();
        let editor = layout.editor.unwrap_or_default();
        self.editor_viewport.resize(editor.width, editor.height);
        self.editor_viewport
            .set_total_lines(self.editor.line_count());
        let preview = layout.preview.unwrap_or_default();
        self.preview_viewport.resize(preview.width, preview.height);
        self.ensure_cursor_visible();
    }

    /// Scroll the editor pane so the cursor is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let cursor = self.editor.cursor();
        self.editor_viewport.ensure_visible(cursor.line);

        let width = self.editor_text_width();
        if width == 0 {
            return;
        }
        let line = self.editor.line_at(cursor.line).unwrap_or_default();
        let col = crate::ui::display_col(&line, cursor.col);
        if col < self.editor_hscroll {
            self.editor_hscroll = col;
        } else if col >= self.editor_hscroll + width {
            self.editor_hscroll = col + 1 - width;
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}
