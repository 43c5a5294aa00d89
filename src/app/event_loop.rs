use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::highlight::{HighlightState, HighlighterLoader, SharedHighlighter};

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: markpad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = self.build_model((size.width, size.height));
        let loader = self.start_highlighter(&mut model);

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model, loader));

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Initial model for a terminal of `size`.
    pub(super) fn build_model(&self, size: (u16, u16)) -> Model {
        let mut model = Model::new(&self.initial_text, size);
        model.set_view_mode(self.view_mode);
        model.source_name.clone_from(&self.source_name);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.highlight_state = if self.highlighting {
            HighlightState::Loading
        } else {
            HighlightState::Disabled
        };
        model
    }

    fn start_highlighter(&self, model: &mut Model) -> Option<HighlighterLoader> {
        if !self.highlighting {
            return None;
        }
        match HighlighterLoader::spawn() {
            Ok(loader) => Some(loader),
            Err(err) => {
                tracing::warn!(%err, "could not start the highlighter thread");
                *model = update(std::mem::take(model), Message::HighlighterFailed);
                None
            }
        }
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        mut loader: Option<HighlighterLoader>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if let Some(msg) = poll_highlighter(&mut loader) {
                crate::perf::log_event("highlight.loader", format!("frame={frame_idx} msg={msg:?}"));
                *model = update(std::mem::take(model), msg);
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else if loader.is_some() {
                50
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so the debouncer uses accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    crate::perf::log_event("event.message", format!("frame={frame_idx} msg={msg:?}"));
                    *model = update(std::mem::take(model), msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        drained += 1;
                        *model = update(std::mem::take(model), msg);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                frame_idx += 1;
                model.sync_preview();

                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }
        }
        Ok(())
    }
}

/// Turn a finished highlighter load into a message, dropping the loader.
pub(super) fn poll_highlighter(loader: &mut Option<HighlighterLoader>) -> Option<Message> {
    let pending = loader.as_mut()?;
    let msg = match pending.try_take() {
        Ok(None) => return None,
        Ok(Some(highlighter)) => {
            tracing::debug!("syntax highlighter loaded");
            Message::HighlighterReady(SharedHighlighter::new(highlighter))
        }
        Err(err) => {
            tracing::warn!(%err, "syntax highlighter failed to load");
            Message::HighlighterFailed
        }
    };
    *loader = None;
    Some(msg)
}
