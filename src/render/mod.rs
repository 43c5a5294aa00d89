//! Markdown to HTML through comrak.
//!
//! Used by `--html` and as the reference for what the preview pane shows.
//! Fenced code goes through the [`Highlighter`] when one is loaded.

use std::collections::HashMap;
use std::io::{self, Write};

use comrak::adapters::SyntaxHighlighterAdapter;
use comrak::{
    Arena, Options, Plugins, format_html_with_plugins, markdown_to_html_with_plugins,
    parse_document,
};

use crate::highlight::Highlighter;

/// Class prepended to code tags emitted while highlighting.
const HIGHLIGHT_CLASS: &str = "hljs";

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Omit raw HTML and drop dangerous link targets
    pub sanitize: bool,
    /// GitHub flavored extensions (tables, strikethrough, autolinks, task lists)
    pub gfm: bool,
    /// Treat single newlines as hard line breaks
    pub breaks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            gfm: true,
            breaks: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write rendered HTML")]
    Io(#[from] io::Error),
}

/// Build the comrak options shared by the HTML renderer and the preview.
pub(crate) fn comrak_options(opts: &RenderOptions) -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = opts.gfm;
    options.extension.table = opts.gfm;
    options.extension.autolink = opts.gfm;
    options.extension.tasklist = opts.gfm;
    options.extension.tagfilter = opts.gfm;
    options.render.hardbreaks = opts.breaks;
    options.render.unsafe_ = !opts.sanitize;
    options
}

/// Render `text` to an HTML string.
pub fn render_html(text: &str, opts: &RenderOptions, highlighter: Option<&Highlighter>) -> String {
    let _scope = crate::perf::scope("render.html");
    let options = comrak_options(opts);
    let adapter = highlighter.map(|highlighter| CodeAdapter { highlighter });
    let mut plugins = Plugins::default();
    if let Some(adapter) = &adapter {
        plugins.render.codefence_syntax_highlighter = Some(adapter);
    }
    markdown_to_html_with_plugins(text, &options, &plugins)
}

/// Render `text` as HTML straight into `out`.
pub fn write_html(
    text: &str,
    opts: &RenderOptions,
    highlighter: Option<&Highlighter>,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    let options = comrak_options(opts);
    let arena = Arena::new();
    let root = parse_document(&arena, text, &options);
    let adapter = highlighter.map(|highlighter| CodeAdapter { highlighter });
    let mut plugins = Plugins::default();
    if let Some(adapter) = &adapter {
        plugins.render.codefence_syntax_highlighter = Some(adapter);
    }
    format_html_with_plugins(root, &options, out, &plugins)?;
    Ok(())
}

struct CodeAdapter<'h> {
    highlighter: &'h Highlighter,
}

impl SyntaxHighlighterAdapter for CodeAdapter<'_> {
    fn write_highlighted(
        &self,
        output: &mut dyn Write,
        lang: Option<&str>,
        code: &str,
    ) -> io::Result<()> {
        output.write_all(self.highlighter.highlight_html(code, lang).as_bytes())
    }

    fn write_pre_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_tag(output, "pre", attributes, None)
    }

    fn write_code_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_tag(output, "code", attributes, Some(HIGHLIGHT_CLASS))
    }
}

fn write_tag(
    output: &mut dyn Write,
    tag: &str,
    mut attributes: HashMap<String, String>,
    class_prefix: Option<&str>,
) -> io::Result<()> {
    if let Some(prefix) = class_prefix {
        let class = attributes
            .remove("class")
            .map_or_else(|| prefix.to_string(), |c| format!("{prefix} {c}"));
        attributes.insert("class".to_string(), class);
    }
    let mut attributes: Vec<_> = attributes.into_iter().collect();
    attributes.sort();

    write!(output, "<{tag}")?;
    for (name, value) in attributes {
        write!(output, " {name}=\"")?;
        comrak::html::escape(output, value.as_bytes())?;
        write!(output, "\"")?;
    }
    write!(output, ">")
}
