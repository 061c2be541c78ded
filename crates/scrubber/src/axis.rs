use serde::{Deserialize, Serialize};

use crate::surface::ScrollNode;

/// One entry of the zoom table.
///
/// `timestamp_spread` is the spacing, in seconds, between printed time labels
/// at this level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLevel {
    pub segment_duration: f64,
    pub timestamp_spread: f64,
}

/// Bounded historical window shown by the timeline, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Conversions between timestamps and vertical timeline pixels.
///
/// The timeline is laid out latest-first: `reference_time` sits at pixel 0 of
/// the unscrolled content and time decreases downward, one `segment_height`
/// row per `segment_duration`.
///
/// # Example
/// ```
/// use scrubber::axis::TimeAxis;
///
/// let axis = TimeAxis::new(30.0, 8.0, 3_600.0);
/// assert_eq!(axis.align_start_to_segment(3_545.0), 3_540.0);
/// assert_eq!(axis.timestamp_to_pixels(3_540.0), 16.0);
/// assert_eq!(axis.pixels_to_timestamp(16.0), 3_540.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    pub segment_duration: f64,
    pub segment_height: f64,
    pub reference_time: f64,
}

impl TimeAxis {
    pub fn new(segment_duration: f64, segment_height: f64, reference_time: f64) -> Self {
        debug_assert!(segment_duration > 0.0);
        Self {
            segment_duration,
            segment_height,
            reference_time,
        }
    }

    /// Axis for `range` at `level`, anchored on the range end rounded up to the grid.
    pub fn for_range(level: &ZoomLevel, segment_height: f64, range: TimeRange) -> Self {
        let mut axis = Self::new(level.segment_duration, segment_height, range.end);
        axis.reference_time = axis.align_end_to_segment(range.end);
        axis
    }

    /// Latest segment boundary at or before `time`.
    pub fn align_start_to_segment(&self, time: f64) -> f64 {
        time - time.rem_euclid(self.segment_duration)
    }

    /// Earliest segment boundary at or after `time`.
    pub fn align_end_to_segment(&self, time: f64) -> f64 {
        let remainder = time.rem_euclid(self.segment_duration);
        if remainder == 0.0 {
            time
        } else {
            time + (self.segment_duration - remainder)
        }
    }

    pub fn timestamp_to_pixels(&self, time: f64) -> f64 {
        ((self.reference_time - time) / self.segment_duration) * self.segment_height
    }

    pub fn pixels_to_timestamp(&self, pixels: f64) -> f64 {
        self.reference_time - (pixels / self.segment_height) * self.segment_duration
    }

    /// Seconds of timeline visible in a viewport `viewport_height` pixels tall.
    pub fn visible_duration(&self, viewport_height: f64) -> f64 {
        (viewport_height / self.segment_height) * self.segment_duration
    }

    /// Row index under a content pixel offset.
    pub fn segment_index_at(&self, pixels: f64) -> Option<usize> {
        if !pixels.is_finite() || pixels < 0.0 {
            return None;
        }
        Some((pixels / self.segment_height).floor() as usize)
    }

    /// Content height covering `range` on this grid.
    pub fn timeline_height(&self, range: TimeRange) -> f64 {
        self.timestamp_to_pixels(self.align_start_to_segment(range.start))
            .max(0.0)
    }

    /// Every row of `range`, latest first: `starts[i]` is the time at the top
    /// of row `i`.
    pub fn segment_starts(&self, range: TimeRange) -> Vec<f64> {
        let rows = (self.timeline_height(range) / self.segment_height).round() as usize;
        (0..rows)
            .map(|row| self.reference_time - row as f64 * self.segment_duration)
            .collect()
    }
}

/// Sums `scroll_top` over `node` and all of its scrollable ancestors.
///
/// The timeline may sit inside several independently scrolled containers, so a
/// pointer position only maps to content pixels once every offset is applied.
pub fn cumulative_scroll_top(node: &dyn ScrollNode) -> f64 {
    let mut total = 0.0;
    let mut current = Some(node);
    while let Some(node) = current {
        total += node.scroll_top();
        current = node.parent();
    }
    total
}
