//! Markdown formatting actions.
//!
//! Each toolbar button maps to a [`FormatAction`]. Applying an action to a
//! selection replaces the selected text with a marked-up version and
//! reports where the cursor should land afterwards.
//!
//! All offsets in this module are `char` offsets, matching the
//! [`EditorBuffer`](crate::editor::EditorBuffer) selection model.

use std::ops::Range;

/// Language label attached to inserted fenced code blocks.
pub const CODE_BLOCK_LANGUAGE: &str = "javascript";

/// Placeholder target appended to inserted links.
pub const LINK_PLACEHOLDER: &str = "url";

/// Marker prefixed to each line of an unordered list.
pub const BULLET_MARKER: &str = "- ";

/// Marker prefixed to a blockquote.
pub const QUOTE_MARKER: &str = "> ";

/// A formatting action offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatAction {
    /// ATX heading with the given level
    Heading(u8),
    Bold,
    Italic,
    InlineCode,
    /// Blockquote prefix
    Quote,
    /// Inline link with a placeholder target
    Link,
    /// Fenced code block
    CodeBlock,
    /// Bullet list, one item per selected line
    UnorderedList,
    /// Numbered list, one item per selected line
    OrderedList,
}

impl FormatAction {
    /// Look up an action by its toolbar style name.
    ///
    /// Heading levels outside `1..=6` do not name an action.
    pub fn parse(name: &str, level: u8) -> Option<Self> {
        match name {
            "heading" if (1..=6).contains(&level) => Some(Self::Heading(level)),
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "code" => Some(Self::InlineCode),
            "quote" => Some(Self::Quote),
            "link" => Some(Self::Link),
            "codeBlock" => Some(Self::CodeBlock),
            "ul" => Some(Self::UnorderedList),
            "ol" => Some(Self::OrderedList),
            _ => None,
        }
    }

    /// The style name accepted by [`FormatAction::parse`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Heading(_) => "heading",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::InlineCode => "code",
            Self::Quote => "quote",
            Self::Link => "link",
            Self::CodeBlock => "codeBlock",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
        }
    }

    /// Human-readable description, used for tooltips and help.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Heading(1) => "Heading 1",
            Self::Heading(2) => "Heading 2",
            Self::Heading(3) => "Heading 3",
            Self::Heading(_) => "Heading",
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::InlineCode => "Inline Code",
            Self::Quote => "Blockquote",
            Self::Link => "Link",
            Self::CodeBlock => "Code Block",
            Self::UnorderedList => "Unordered List",
            Self::OrderedList => "Ordered List",
        }
    }

    /// Marker pair for actions that surround the selection.
    pub const fn wrap_markers(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Bold => Some(("**", "**")),
            Self::Italic => Some(("*", "*")),
            Self::InlineCode => Some(("`", "`")),
            _ => None,
        }
    }

    /// Build the text that replaces `selected`.
    pub fn replacement(self, selected: &str) -> String {
        if let Some((open, close)) = self.wrap_markers() {
            return format!("{open}{selected}{close}");
        }
        match self {
            Self::Heading(level) => {
                format!("{} {selected}", "#".repeat(usize::from(level)))
            }
            Self::Quote => format!("{QUOTE_MARKER}{selected}"),
            Self::Link => format!("[{selected}]({LINK_PLACEHOLDER})"),
            Self::CodeBlock => format!("```{CODE_BLOCK_LANGUAGE}\n{selected}\n```"),
            Self::UnorderedList => selected
                .split('\n')
                .map(|line| format!("{BULLET_MARKER}{line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::OrderedList => selected
                .split('\n')
                .enumerate()
                .map(|(i, line)| format!("{}. {line}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Bold | Self::Italic | Self::InlineCode => selected.to_string(),
        }
    }
}

/// A single replacement computed by a formatting action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Char range that is replaced (already clamped and normalized)
    pub range: Range<usize>,
    /// Text inserted in place of `range`
    pub replacement: String,
    /// Char offset for the cursor after the replacement
    pub cursor: usize,
}

/// The whole document after a formatting action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub cursor: usize,
}

/// Compute the edit for `action` over `selection` in `text`.
///
/// An empty selection still produces markers, leaving the cursor after them.
pub fn edit(text: &str, selection: Range<usize>, action: FormatAction) -> Edit {
    let range = clamp_range(text, selection);
    let selected = char_slice(text, range.clone());
    let replacement = action.replacement(selected);
    let cursor = range.start + replacement.chars().count();
    Edit {
        range,
        replacement,
        cursor,
    }
}

/// Apply `action` to `selection`, returning the new text and cursor offset.
pub fn apply(text: &str, selection: Range<usize>, action: FormatAction) -> Transformed {
    let _scope = crate::perf::scope("format.apply");
    let edit = edit(text, selection, action);
    Transformed {
        text: splice(text, &edit),
        cursor: edit.cursor,
    }
}

/// Apply an action looked up by style name.
///
/// Unknown names leave the text untouched and put the cursor at the end of
/// the selection.
pub fn apply_named(text: &str, selection: Range<usize>, name: &str, level: u8) -> Transformed {
    let Some(action) = FormatAction::parse(name, level) else {
        tracing::debug!(style = name, level, "unknown format action, text unchanged");
        let range = clamp_range(text, selection);
        return Transformed {
            text: text.to_string(),
            cursor: range.end,
        };
    };
    apply(text, selection, action)
}

/// Replace `edit.range` in `text` with `edit.replacement`.
pub fn splice(text: &str, edit: &Edit) -> String {
    let start = byte_offset(text, edit.range.start);
    let end = byte_offset(text, edit.range.end);
    let mut out = String::with_capacity(text.len() + edit.replacement.len());
    out.push_str(&text[..start]);
    out.push_str(&edit.replacement);
    out.push_str(&text[end..]);
    out
}

fn clamp_range(text: &str, range: Range<usize>) -> Range<usize> {
    let len = text.chars().count();
    let start = range.start.min(range.end).min(len);
    let end = range.start.max(range.end).min(len);
    start..end
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}

fn char_slice(text: &str, range: Range<usize>) -> &str {
    &text[byte_offset(text, range.start)..byte_offset(text, range.end)]
}
