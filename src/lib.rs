// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. format::FormatAction)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A terminal markdown editor with a live preview.
//!
//! Markpad shows:
//! - An editor pane with a formatting toolbar
//! - A preview pane rendered from the same text
//! - A word and character counter
//!
//! ## Architecture
//!
//! Markpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Preview layout and derived counts
//! - [`editor`]: Rope-backed text buffer with selection
//! - [`format`]: Toolbar text transforms
//! - [`render`]: Markdown to sanitized HTML
//! - [`highlight`]: Lazily loaded syntax highlighting
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod format;
pub mod highlight;
pub mod perf;
pub mod render;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, ViewMode};
    pub use crate::document::{DocumentStats, PreviewDocument};
    pub use crate::editor::EditorBuffer;
    pub use crate::format::FormatAction;
    pub use crate::ui::viewport::Viewport;
}
