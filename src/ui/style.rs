//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette, with darker
//! indexed colors when the background is light.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineColor, InlineStyle, LineType};

const fn pick(light_bg: bool, light: Color, dark: Color) -> Color {
    if light_bg { light } else { dark }
}

/// Get the style for a preview line type.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = crate::highlight::is_light_background();
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(pick(light_bg, Color::Indexed(22), Color::Green))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(pick(light_bg, Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(5) => Style::default()
            .fg(pick(light_bg, Color::Indexed(54), Color::Magenta))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD),

        // Unhighlighted code is dim; highlighted spans drop the DIM again
        LineType::CodeBlock => Style::default()
            .fg(pick(light_bg, Color::Indexed(238), Color::Indexed(245)))
            .add_modifier(Modifier::DIM),

        LineType::BlockQuote => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(pick(light_bg, Color::Indexed(241), Color::Indexed(240)))
            .add_modifier(Modifier::DIM),

        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    let light_bg = crate::highlight::is_light_background();

    if let Some(fg) = inline.fg {
        style = style
            .fg(fg_color_for_terminal(fg))
            .remove_modifier(Modifier::DIM);
    }
    if let Some(bg) = inline.bg {
        style = style.bg(Color::Rgb(bg.r, bg.g, bg.b));
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
        if inline.fg.is_none() {
            style = style.fg(pick(light_bg, Color::Blue, Color::LightBlue));
        }
    }
    if inline.code && inline.fg.is_none() {
        style = style
            .fg(pick(light_bg, Color::Indexed(88), Color::Red))
            .add_modifier(Modifier::BOLD);
    }
    style
}

/// Style for a line of markdown source in the editor pane.
///
/// Only block-level markers are recognized; the editor does not parse.
pub fn style_for_source_line(line: &str) -> Style {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        let level = u8::try_from(hashes).unwrap_or(6);
        return Style::default()
            .fg(style_for_line_type(&LineType::Heading(level)).fg.unwrap_or(Color::Reset))
            .add_modifier(Modifier::BOLD);
    }
    if trimmed.starts_with("```") {
        return style_for_line_type(&LineType::CodeBlock).remove_modifier(Modifier::DIM);
    }
    if trimmed.starts_with('>') {
        return style_for_line_type(&LineType::BlockQuote);
    }
    Style::default()
}

fn fg_color_for_terminal(fg: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("MARKPAD_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}
