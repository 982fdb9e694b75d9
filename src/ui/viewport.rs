//! Scroll state for the preview pane.

use std::ops::Range;

/// The visible window over the rendered preview lines.
///
/// # Example
///
/// ```
/// use markpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(20, 100);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(height: u16, total_lines: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Scroll position as a percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
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

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the line count after the preview was re-rendered.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    pub const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.scroll_percent(), 0);
    }

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = Viewport::new(24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(5);
        vp.scroll_up(10);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_paging() {
        let mut vp = Viewport::new(10, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 10);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
        vp.go_to_bottom();
        assert_eq!(vp.offset(), 90);
        vp.go_to_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_set_total_lines_adjusts_offset() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(80);
        vp.set_total_lines(50);
        assert_eq!(vp.offset(), 26);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(10, 30);
        vp.go_to_bottom();
        vp.resize(25);
        assert_eq!(vp.offset(), 5);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scroll_never_exceeds_bounds(
                total_lines in 0..10000usize,
                height in 1..100u16,
                scroll_amount in 0..10000usize,
            ) {
                let mut vp = Viewport::new(height, total_lines);
                vp.scroll_down(scroll_amount);

                let max = total_lines.saturating_sub(height as usize);
                prop_assert!(vp.offset() <= max);
                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
                prop_assert!(vp.scroll_percent() <= 100);
            }
        }
    }
}
