//! Scroll state for a pane.
//!
//! Both panes keep a [`Viewport`]: the editor scrolls to follow the cursor,
//! the preview scrolls on its own.

use std::ops::Range;

/// The visible window over a list of lines.
///
/// # Example
///
/// ```
/// use markpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(40, 10, 100);
/// assert_eq!(vp.visible_range(), 0..10);
///
/// vp.ensure_visible(25);
/// assert_eq!(vp.visible_range(), 16..26);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    /// Index of the first visible line.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// How far down the content the viewport is, 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the least amount that brings `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the content length, e.g. after an edit or a new layout.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_visible_range_with_short_content() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        assert_eq!(vp.visible_range(), 76..100);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(5);
        vp.scroll_up(10);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_page_down_and_up() {
        let mut vp = Viewport::new(80, 20, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 20);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_go_to_bottom_and_top() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.go_to_bottom();
        assert_eq!(vp.offset(), 76);
        vp.go_to_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(5);
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(10);
        assert_eq!(vp.offset(), 1);
        // Already on screen: no scroll
        vp.ensure_visible(3);
        assert_eq!(vp.offset(), 1);
        vp.ensure_visible(0);
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(99);
        assert_eq!(vp.offset(), 90);
        vp.ensure_visible(85);
        assert_eq!(vp.offset(), 85);
    }

    #[test]
    fn test_ensure_visible_with_zero_height() {
        let mut vp = Viewport::new(80, 0, 5);
        vp.ensure_visible(2);
        assert_eq!(vp.offset(), 2);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = Viewport::new(80, 10, 20);
        assert_eq!(vp.scroll_percent(), 0);
        vp.go_to_bottom();
        assert_eq!(vp.scroll_percent(), 100);
        assert_eq!(Viewport::new(80, 10, 3).scroll_percent(), 100);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 10, 30);
        vp.go_to_bottom();
        vp.resize(80, 25);
        assert_eq!(vp.offset(), 5);
    }

    #[test]
    fn test_set_total_lines_adjusts_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.go_to_bottom();
        vp.set_total_lines(15);
        assert_eq!(vp.offset(), 5);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scroll_never_exceeds_bounds(
                total_lines in 1..10000usize,
                height in 1..100u16,
                scroll_amount in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(scroll_amount);
                prop_assert!(vp.offset() <= total_lines.saturating_sub(height as usize));
            }

            #[test]
            fn ensure_visible_shows_the_line(
                total_lines in 1..5000usize,
                height in 1..100u16,
                start in 0..5000usize,
                line in 0..5000usize,
            ) {
                let line = line % total_lines;
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(start);
                vp.ensure_visible(line);
                prop_assert!(vp.visible_range().contains(&line));
            }
        }
    }
}
