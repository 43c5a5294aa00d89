//! Text buffer behind the editor pane.
//!
//! A rope-backed buffer with a cursor and a selection anchor. Formatting
//! actions are applied through [`EditorBuffer::apply_edit`].

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer, Motion};
