//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel, ViewMode};
pub use update::{Message, TAB_SPACES, WHEEL_LINES, update};

use std::path::PathBuf;

use crate::document::WELCOME_TEXT;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    initial_text: String,
    source_name: Option<String>,
    view_mode: ViewMode,
    highlighting: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application showing the welcome text in Split mode.
    pub fn new() -> Self {
        Self {
            initial_text: WELCOME_TEXT.to_string(),
            source_name: None,
            view_mode: ViewMode::default(),
            highlighting: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Start with `text` instead of the welcome text.
    pub fn with_initial_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }

    /// Name shown in the header, usually the file the text came from.
    pub fn with_source_name(mut self, name: Option<String>) -> Self {
        self.source_name = name;
        self
    }

    pub const fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Enable or disable loading the syntax highlighter.
    pub const fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlighting = enabled;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
