//! Everything derived from the document text.
//!
//! This module handles:
//! - Laying out the preview pane from the comrak AST
//! - Word and character counts
//! - The text a new session starts with

mod preview;
mod stats;
mod types;

pub use preview::PreviewDocument;
pub use stats::{DocumentStats, char_count, word_count};
pub use types::{InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine};

/// Text shown when no file is given.
pub const WELCOME_TEXT: &str = r"# Welcome to Markpad!

This editor comes with a formatting toolbar and a live preview.

## Key Features:
- **Syntax Highlighting**: Code blocks are colored once the highlighter loads.
- **View Modes**: Switch between Editor, Split, and Preview modes.
- **Toolbar**: Headings, emphasis, quotes, links, lists and code.
- **Status Bar**: Keep track of your word and character count.

### Check out this highlighted code:
```javascript
// Your code will look this good!
function greet(name) {
  console.log(`Hello, ${name}!`);
}

greet('Developer');
```

> Use the toolbar to add blockquotes, lists, and more!";
