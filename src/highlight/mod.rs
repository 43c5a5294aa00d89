//! Syntax highlighting for code blocks.
//!
//! Loading syntect's syntax and theme sets takes long enough to be noticed
//! at startup, so the [`Highlighter`] is built on a background thread by
//! [`HighlighterLoader`] and handed to the app once ready. Until then code
//! blocks render as plain escaped text.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::document::{InlineColor, InlineSpan, InlineStyle};

/// Errors from the background highlighter load.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("highlighter loader thread exited without a result")]
    Disconnected,
}

/// Loaded syntax definitions plus the theme used to color them.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the bundled syntaxes and pick a theme for the terminal background.
    pub fn load() -> Self {
        let _scope = crate::perf::scope("highlight.load");
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let theme = pick_theme(&ThemeSet::load_defaults(), background_mode());
        Self { syntaxes, theme }
    }

    /// Whether a fence language names a known syntax.
    pub fn supports_language(&self, lang: &str) -> bool {
        self.find_syntax(lang).is_some()
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.trim();
        if lang.is_empty() {
            return None;
        }
        self.syntaxes
            .find_syntax_by_token(lang)
            .or_else(|| self.syntaxes.find_syntax_by_name(lang))
    }

    /// Highlight `code` as HTML `<span>` markup.
    ///
    /// Unknown or missing languages yield the escaped code unchanged.
    pub fn highlight_html(&self, code: &str, lang: Option<&str>) -> String {
        // Same plain text the renderer writes for fences without a highlighter
        let Some(syntax) = lang.and_then(|l| self.find_syntax(l)) else {
            return escape_html(code);
        };
        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let html = lines
                .highlight_line(line, &self.syntaxes)
                .ok()
                .and_then(|regions| {
                    styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()
                });
            match html {
                Some(html) => out.push_str(&html),
                None => out.push_str(&escape_html(line)),
            }
        }
        out
    }

    /// Highlight `code` into styled spans, one `Vec` per source line.
    pub fn highlight_spans(&self, code: &str, lang: Option<&str>) -> Vec<Vec<InlineSpan>> {
        let code_style = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        let Some(syntax) = lang.and_then(|l| self.find_syntax(l)) else {
            return plain_lines(code, code_style);
        };

        let mode = background_mode();
        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut out = Vec::new();
        for line in LinesWithEndings::from(code) {
            let Ok(regions) = lines.highlight_line(line, &self.syntaxes) else {
                out.push(vec![InlineSpan::new(strip_eol(line).to_string(), code_style)]);
                continue;
            };
            let spans = regions
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = strip_eol(text);
                    if text.is_empty() {
                        return None;
                    }
                    let fg = InlineColor {
                        r: style.foreground.r,
                        g: style.foreground.g,
                        b: style.foreground.b,
                    };
                    Some(InlineSpan::new(
                        text.to_string(),
                        InlineStyle {
                            fg: Some(adjust_fg_for_background(fg, mode)),
                            ..code_style
                        },
                    ))
                })
                .collect();
            out.push(spans);
        }
        out
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .field("theme", &self.theme.name)
            .finish()
    }
}

fn plain_lines(code: &str, style: InlineStyle) -> Vec<Vec<InlineSpan>> {
    code.lines()
        .map(|line| vec![InlineSpan::new(line.to_string(), style)])
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = Vec::with_capacity(text.len());
    // Writing into a Vec never fails
    let _ = comrak::html::escape(&mut out, text.as_bytes());
    String::from_utf8_lossy(&out).into_owned()
}

fn strip_eol(s: &str) -> &str {
    s.trim_end_matches('\n').trim_end_matches('\r')
}

fn pick_theme(theme_set: &ThemeSet, mode: BackgroundMode) -> Theme {
    let preferred = match mode {
        BackgroundMode::Dark => [
            "Monokai Extended",
            "Monokai Extended Bright",
            "Dracula",
            "Solarized (dark)",
            "base16-ocean.dark",
        ]
        .as_slice(),
        BackgroundMode::Light => [
            "InspiredGitHub",
            "Solarized (light)",
            "base16-ocean.light",
        ]
        .as_slice(),
    };

    for name in preferred {
        if let Some(theme) = theme_set.themes.get(*name) {
            return theme.clone();
        }
    }

    theme_set
        .themes
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

/// A loaded highlighter shared between the model and its messages.
///
/// Equality is identity, so messages carrying it stay comparable.
#[derive(Debug, Clone)]
pub struct SharedHighlighter(Arc<Highlighter>);

impl SharedHighlighter {
    pub fn new(highlighter: Highlighter) -> Self {
        Self(Arc::new(highlighter))
    }
}

impl std::ops::Deref for SharedHighlighter {
    type Target = Highlighter;

    fn deref(&self) -> &Highlighter {
        &self.0
    }
}

impl PartialEq for SharedHighlighter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SharedHighlighter {}

/// Where the highlighter capability stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    /// Highlighting turned off on the command line
    Disabled,
    Loading,
    Ready,
    /// The loader ended without producing a highlighter
    Failed,
}

impl HighlightState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "plain",
            Self::Loading => "loading highlighter",
            Self::Ready => "highlight",
            Self::Failed => "highlight unavailable",
        }
    }
}

/// Builds a [`Highlighter`] on a background thread.
///
/// The event loop polls [`HighlighterLoader::try_take`] between frames.
#[derive(Debug)]
pub struct HighlighterLoader {
    rx: Receiver<Highlighter>,
    done: bool,
}

impl HighlighterLoader {
    /// Start loading. Fails only if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("markpad-highlight".to_string())
            .spawn(move || {
                let highlighter = Highlighter::load();
                if tx.send(highlighter).is_err() {
                    tracing::debug!("highlighter finished after the app exited");
                }
            })?;
        Ok(Self { rx, done: false })
    }

    /// Take the highlighter if it has finished loading.
    ///
    /// Returns `Ok(None)` while loading and after the result was taken.
    pub fn try_take(&mut self) -> Result<Option<Highlighter>, HighlightError> {
        if self.done {
            return Ok(None);
        }
        match self.rx.try_recv() {
            Ok(highlighter) => {
                self.done = true;
                Ok(Some(highlighter))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Err(HighlightError::Disconnected)
            }
        }
    }

    pub const fn is_pending(&self) -> bool {
        !self.done
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Terminal background override from the command line or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// Whether styling should assume a light terminal background.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    match bg_str.parse::<u8>() {
        Ok(bg) if bg >= 7 => BackgroundMode::Light,
        _ => BackgroundMode::Dark,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
fn adjust_fg_for_background(color: InlineColor, mode: BackgroundMode) -> InlineColor {
    if mode == BackgroundMode::Dark {
        return color;
    }
    let luma =
        (0.2126 * color.r as f32) + (0.7152 * color.g as f32) + (0.0722 * color.b as f32);
    if luma < 155.0 {
        return color;
    }
    let darken = |c: u8| ((c as f32) * 0.42).round() as u8;
    InlineColor {
        r: darken(color.r),
        g: darken(color.g),
        b: darken(color.b),
    }
}
