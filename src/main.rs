//! Markpad - A terminal markdown editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! markpad NOTES.md
//! markpad --view preview README.md
//! markpad --html README.md > README.html
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use markpad::app::{App, ViewMode};
use markpad::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use markpad::document::DocumentStats;
use markpad::highlight::{HighlightBackground, Highlighter, set_background_mode};
use markpad::perf;
use markpad::render::{RenderOptions, write_html};

/// A terminal markdown editor with live preview
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open (the welcome text is shown without one)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start in this view mode
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Do not load the syntax highlighter
    #[arg(long)]
    no_highlight: bool,

    /// Print the rendered HTML and exit
    #[arg(long, conflicts_with = "stats")]
    html: bool,

    /// Print word and character counts and exit
    #[arg(long)]
    stats: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write log and render debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(debug_log: Option<&Path>) {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let file = debug_log.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| eprintln!("[warn] Failed to open log {}: {err}", path.display()))
            .ok()
    });
    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

fn read_source(file: Option<&Path>) -> Result<Option<(String, String)>> {
    let Some(path) = file else {
        return Ok(None);
    };
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(Some((text, name)))
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let debug_log = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("MARKPAD_RENDER_DEBUG_LOG").map(PathBuf::from));
    perf::set_enabled(effective.perf);
    let debug_log_result = perf::set_debug_log_path(debug_log.as_deref());
    init_logging(debug_log.as_deref());
    if let Err(err) = debug_log_result {
        tracing::warn!(%err, "failed to initialize render debug log");
    }

    match effective.theme.unwrap_or(cli.theme) {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let source = read_source(cli.file.as_deref())?;

    if cli.stats {
        let text = source.as_ref().map_or("", |(text, _)| text.as_str());
        let stats = DocumentStats::compute(text);
        println!("Words: {}\nCharacters: {}", stats.words, stats.chars);
        return Ok(());
    }

    if cli.html {
        let text = source.as_ref().map_or("", |(text, _)| text.as_str());
        let highlighter = (!effective.no_highlight).then(Highlighter::load);
        let mut out = io::stdout().lock();
        write_html(text, &RenderOptions::default(), highlighter.as_ref(), &mut out)
            .context("Failed to write HTML")?;
        out.flush()?;
        return Ok(());
    }

    let mut app = App::new()
        .with_view_mode(effective.view.unwrap_or_default())
        .with_highlighting(!effective.no_highlight)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );
    if let Some((text, name)) = source {
        app = app.with_initial_text(text).with_source_name(Some(name));
    }

    tracing::debug!(view = ?effective.view, "starting editor");
    app.run().context("Application error")
}
