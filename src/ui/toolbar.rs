use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::FormatAction;

use super::contains;

#[derive(Debug, Clone, Copy)]
enum Item {
    /// Full label, short label, action
    Button(&'static str, &'static str, FormatAction),
    Separator,
}

const ITEMS: &[Item] = &[
    Item::Button("H1", "H1", FormatAction::Heading(1)),
    Item::Button("H2", "H2", FormatAction::Heading(2)),
    Item::Button("H3", "H3", FormatAction::Heading(3)),
    Item::Separator,
    Item::Button("B", "B", FormatAction::Bold),
    Item::Button("I", "I", FormatAction::Italic),
    Item::Separator,
    Item::Button("Quote", ">", FormatAction::Quote),
    Item::Button("Link", "Lk", FormatAction::Link),
    Item::Button("UL", "•", FormatAction::UnorderedList),
    Item::Button("OL", "1.", FormatAction::OrderedList),
    Item::Separator,
    Item::Button("Code", "`", FormatAction::InlineCode),
    Item::Button("Code Block", "```", FormatAction::CodeBlock),
];

const SEPARATOR: &str = "│";

/// How much room each button takes, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Density {
    /// Full labels with a space either side
    Full,
    /// Short labels with a space either side
    Compact,
    /// Short labels only
    Tight,
}

impl Density {
    const ALL: [Self; 3] = [Self::Full, Self::Compact, Self::Tight];

    fn text(self, item: Item) -> String {
        match (item, self) {
            (Item::Separator, _) => SEPARATOR.to_string(),
            (Item::Button(label, _, _), Self::Full) => format!(" {label} "),
            (Item::Button(_, short, _), Self::Compact) => format!(" {short} "),
            (Item::Button(_, short, _), Self::Tight) => short.to_string(),
        }
    }
}

/// Lay the items out left to right at `density`, stopping at the first one
/// that does not fit.
fn place_at(area: Rect, density: Density) -> Vec<(Rect, Item, String)> {
    let mut out = Vec::new();
    let mut x = area.x.saturating_add(1);
    let right = area.x.saturating_add(area.width);
    for item in ITEMS {
        let text = density.text(*item);
        let Ok(width) = u16::try_from(text.width()) else {
            break;
        };
        if x.saturating_add(width) > right {
            break;
        }
        out.push((Rect::new(x, area.y, width, area.height.min(1)), *item, text));
        x = x.saturating_add(width + 1);
    }
    out
}

/// The widest layout that fits every item. When even short labels overflow,
/// trailing items are dropped.
fn placed(area: Rect) -> Vec<(Rect, Item, String)> {
    let mut tight = Vec::new();
    for density in Density::ALL {
        let items = place_at(area, density);
        if items.len() == ITEMS.len() {
            return items;
        }
        tight = items;
    }
    tight
}

/// Clickable buttons and their actions, left to right.
pub fn toolbar_buttons(area: Rect) -> Vec<(Rect, FormatAction)> {
    placed(area)
        .into_iter()
        .filter_map(|(rect, item, _)| match item {
            Item::Button(_, _, action) => Some((rect, action)),
            Item::Separator => None,
        })
        .collect()
}

/// The action of the button under a mouse position.
pub fn format_action_at(area: Rect, column: u16, row: u16) -> Option<FormatAction> {
    toolbar_buttons(area)
        .into_iter()
        .find(|(rect, _)| contains(*rect, column, row))
        .map(|(_, action)| action)
}

pub fn render_toolbar(frame: &mut Frame, area: Rect) {
    let bar_style = Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(252));
    let button_style = Style::default()
        .bg(Color::Indexed(239))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let separator_style = Style::default().fg(Color::Indexed(244));

    frame.render_widget(Paragraph::new("").style(bar_style), area);
    for (rect, item, text) in placed(area) {
        let style = match item {
            Item::Button(..) => button_style,
            Item::Separator => bar_style.patch(separator_style),
        };
        frame.render_widget(Paragraph::new(text).style(style), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ViewMode;
    use crate::ui::pane_layout;

    const ALL_ACTIONS: [FormatAction; 11] = [
        FormatAction::Heading(1),
        FormatAction::Heading(2),
        FormatAction::Heading(3),
        FormatAction::Bold,
        FormatAction::Italic,
        FormatAction::Quote,
        FormatAction::Link,
        FormatAction::UnorderedList,
        FormatAction::OrderedList,
        FormatAction::InlineCode,
        FormatAction::CodeBlock,
    ];

    fn actions(area: Rect) -> Vec<FormatAction> {
        toolbar_buttons(area).into_iter().map(|(_, a)| a).collect()
    }

    #[test]
    fn test_buttons_are_laid_out_left_to_right() {
        let buttons = toolbar_buttons(Rect::new(0, 1, 120, 1));
        assert_eq!(actions(Rect::new(0, 1, 120, 1)), ALL_ACTIONS.to_vec());
        // " H1 " starts after the one-column margin
        assert_eq!(buttons[0].0, Rect::new(1, 1, 4, 1));
        assert_eq!(buttons[1].0, Rect::new(6, 1, 4, 1));
        // " Code Block " is the last button
        assert_eq!(buttons[10].0, Rect::new(62, 1, 12, 1));
    }

    #[test]
    fn test_every_action_reachable_in_split_panes() {
        for width in [60, 80, 100, 120] {
            let layout = pane_layout(Rect::new(0, 0, width, 30), ViewMode::Split);
            let toolbar = layout.toolbar.unwrap();
            assert_eq!(actions(toolbar), ALL_ACTIONS.to_vec(), "width {width}");
        }
    }

    #[test]
    fn test_labels_shrink_before_buttons_drop() {
        let compact = placed(Rect::new(0, 0, 60, 1));
        assert_eq!(compact.len(), ITEMS.len());
        assert_eq!(compact[0].2, " H1 ");
        assert_eq!(compact[13].2, " ``` ");

        let tight = placed(Rect::new(0, 0, 40, 1));
        assert_eq!(tight.len(), ITEMS.len());
        assert_eq!(tight[0].0, Rect::new(1, 0, 2, 1));
        assert_eq!(tight[13].2, "```");
    }

    #[test]
    fn test_narrow_toolbar_drops_trailing_buttons() {
        let buttons = toolbar_buttons(Rect::new(0, 0, 16, 1));
        assert_eq!(buttons.len(), 5);
        assert_eq!(buttons[4].1, FormatAction::Italic);
    }

    #[test]
    fn test_hit_test_finds_button() {
        let area = Rect::new(0, 1, 120, 1);
        assert_eq!(format_action_at(area, 2, 1), Some(FormatAction::Heading(1)));
        assert_eq!(format_action_at(area, 0, 1), None);
        assert_eq!(format_action_at(area, 2, 0), None);
    }

    #[test]
    fn test_hit_test_in_tight_layout() {
        let area = Rect::new(0, 1, 40, 1);
        let (rect, _) = toolbar_buttons(area)[9];
        assert_eq!(
            format_action_at(area, rect.x, 1),
            Some(FormatAction::InlineCode)
        );
    }
}
