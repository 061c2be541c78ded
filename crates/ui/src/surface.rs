use std::ops::Range;

use scrubber::{Rect, ScrollNode, TimelineSurface};

/// Height of the drawn handle, in logical pixels.
pub const HANDLE_HEIGHT: f64 = 16.0;

/// Timeline surface backed by the canvas widget.
///
/// The canvas scrolls its own content, so the scroll offset lives here and the
/// widget draws from it. Programmatic scrolls raise a pending scroll event the
/// app feeds back as `UserScroll`, the way a browser fires `scroll` after
/// `scrollTop` is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasSurface {
    pub top: f64,
    pub client_height: f64,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub handle_top: f64,
    pub label: String,
    laid_out: bool,
    scroll_event: bool,
}

impl CanvasSurface {
    /// Applies the canvas bounds reported by the last widget event.
    pub fn set_layout(&mut self, top: f64, client_height: f64) {
        self.top = top;
        self.client_height = client_height;
        self.laid_out = true;
        self.clamp_scroll();
    }

    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Returns and clears the scroll event raised by the last offset change.
    pub fn take_scroll_event(&mut self) -> bool {
        std::mem::take(&mut self.scroll_event)
    }

    /// True when `client_y` hits the drawn handle.
    pub fn handle_contains(&self, client_y: f64) -> bool {
        self.handle_rect()
            .is_some_and(|rect| (rect.top..rect.bottom()).contains(&client_y))
    }

    /// Row indices intersecting the viewport, capped at `rows`.
    pub fn visible_rows(&self, segment_height: f64, rows: usize) -> Range<usize> {
        if segment_height <= 0.0 {
            return 0..0;
        }
        let first = (self.scroll_top / segment_height).floor() as usize;
        let last = ((self.scroll_top + self.client_height) / segment_height).ceil() as usize;
        first.min(rows)..last.min(rows)
    }

    fn move_to(&mut self, scroll_top: f64) {
        let previous = self.scroll_top;
        self.scroll_top = scroll_top;
        self.clamp_scroll();
        if self.scroll_top != previous {
            self.scroll_event = true;
        }
    }

    fn clamp_scroll(&mut self) {
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll_top());
    }
}

impl ScrollNode for CanvasSurface {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }
}

impl TimelineSurface for CanvasSurface {
    fn timeline(&self) -> Option<&dyn ScrollNode> {
        self.laid_out.then_some(self as &dyn ScrollNode)
    }

    fn timeline_rect(&self) -> Option<Rect> {
        self.laid_out.then_some(Rect {
            top: self.top,
            height: self.client_height,
        })
    }

    fn handle_rect(&self) -> Option<Rect> {
        self.laid_out.then(|| Rect {
            top: self.top + self.handle_top - self.scroll_top,
            height: HANDLE_HEIGHT,
        })
    }

    fn set_handle_top(&mut self, top_px: f64) {
        self.handle_top = top_px;
    }

    fn set_label(&mut self, text: &str) {
        text.clone_into(&mut self.label);
    }

    fn scroll_by(&mut self, delta_px: f64) {
        self.move_to(self.scroll_top + delta_px);
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.move_to(scroll_top);
    }

    fn set_content_height(&mut self, height_px: f64) {
        self.scroll_height = height_px;
        self.clamp_scroll();
    }
}
