//! Word and character counts derived from the document text.

use std::sync::LazyLock;

use regex::Regex;

static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Counts shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Maximal runs of letters, digits and underscores
    pub words: usize,
    /// UTF-16 code units, no normalization
    pub chars: usize,
}

impl DocumentStats {
    /// Compute both counts for `text`.
    pub fn compute(text: &str) -> Self {
        Self {
            words: word_count(text),
            chars: char_count(text),
        }
    }
}

/// Number of maximal word-character runs in `text`.
pub fn word_count(text: &str) -> usize {
    WORD_RUN.find_iter(text).count()
}

/// Number of characters in `text`, counted in UTF-16 code units.
///
/// Characters outside the Basic Multilingual Plane count twice.
pub fn char_count(text: &str) -> usize {
    text.encode_utf16().count()
}
