use crate::elements::PositionedElement;
use crate::nodes::Slice;
use quire_types::Rect;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

// Use a small epsilon to handle floating point inaccuracies
const EPSILON: f32 = 0.01;

/// Centralized logic to check if a child fits in the remaining space.
///
/// * `cursor_y`: The current Y position relative to the top of the container bounds.
/// * `child_height`: The required height for the child.
/// * `bounds`: The bounds of the current container.
pub fn check_child_fit(cursor_y: f32, child_height: f32, bounds: Rect) -> BreakAnalysis {
    let available = (bounds.height - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}

/// Stacks slices into the content area of successive pages.
pub struct Paginator {
    bounds: Rect,
    pages: Vec<Vec<PositionedElement>>,
    current: Vec<PositionedElement>,
    cursor_y: f32,
}

impl Paginator {
    /// `bounds` is the content area of every page, in page coordinates.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            pages: Vec::new(),
            current: Vec::new(),
            cursor_y: 0.0,
        }
    }

    pub fn at_page_top(&self) -> bool {
        self.cursor_y <= EPSILON
    }

    pub fn fits(&self, height: f32) -> bool {
        !check_child_fit(self.cursor_y, height, self.bounds).should_break
    }

    pub fn remaining(&self) -> f32 {
        check_child_fit(self.cursor_y, 0.0, self.bounds).remaining_height
    }

    pub fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_y = 0.0;
    }

    /// Moves the cursor down. Vertical space is discarded at the top of a page.
    pub fn advance(&mut self, dy: f32) {
        if !self.at_page_top() {
            self.cursor_y += dy;
        }
    }

    /// Places `slice` at the cursor, breaking to a new page first when it
    /// does not fit. Returns false when the slice is taller than a whole page
    /// and will overflow the bottom margin.
    pub fn place(&mut self, slice: Slice, x: f32) -> bool {
        if !self.at_page_top() && !self.fits(slice.height) {
            self.new_page();
        }
        let fits = self.fits(slice.height);
        let dx = self.bounds.x + x;
        let dy = self.bounds.y + self.cursor_y;
        self.current
            .extend(slice.elements.into_iter().map(|e| e.translated(dx, dy)));
        self.cursor_y += slice.height;
        fits
    }

    /// Returns at least one page.
    pub fn finish(mut self) -> Vec<Vec<PositionedElement>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(height: f32) -> Slice {
        Slice::new(height, Vec::new())
    }

    #[test]
    fn fit_uses_remaining_height() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!check_child_fit(50.0, 50.0, bounds).should_break);
        assert!(check_child_fit(50.0, 50.1, bounds).should_break);
        assert_eq!(check_child_fit(150.0, 1.0, bounds).remaining_height, 0.0);
    }

    #[test]
    fn breaks_when_slice_overflows() {
        let mut pager = Paginator::new(Rect::new(10.0, 10.0, 100.0, 100.0));
        pager.place(slice(60.0), 0.0);
        pager.place(slice(60.0), 0.0);
        assert_eq!(pager.finish().len(), 2);
    }

    #[test]
    fn space_is_dropped_at_page_top() {
        let mut pager = Paginator::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        pager.advance(30.0);
        assert!(pager.at_page_top());
        pager.place(slice(10.0), 0.0);
        pager.advance(30.0);
        assert!((pager.remaining() - 60.0).abs() < 0.001);
    }

    #[test]
    fn oversized_slice_is_reported() {
        let mut pager = Paginator::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!pager.place(slice(150.0), 0.0));
        assert_eq!(pager.finish().len(), 1);
    }

    #[test]
    fn empty_flow_still_has_a_page() {
        let pager = Paginator::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(pager.finish().len(), 1);
    }
}
