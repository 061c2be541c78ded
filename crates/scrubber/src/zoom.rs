use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::axis::{TimeAxis, TimeRange, ZoomLevel};
use crate::surface::TimelineViewport;
use crate::time::Deadline;

/// Direction of one discrete zoom step.
///
/// `In` moves to a finer level (lower index), `Out` to a coarser one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

/// One finger position of a touch gesture, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    fn distance(&self, other: &TouchPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Thresholds and timer periods for zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub wheel_delta_threshold: f64,
    pub wheel_cooldown: Duration,
    pub transition: Duration,
    pub pinch_threshold_percent: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            wheel_delta_threshold: 200.0,
            wheel_cooldown: Duration::from_millis(200),
            transition: Duration::from_millis(500),
            pinch_threshold_percent: 20.0,
        }
    }
}

/// Folds ctrl+wheel deltas into discrete zoom steps.
///
/// Once a step fires, wheel input is swallowed until the cooldown runs out;
/// every swallowed event restarts the cooldown, so one continuous flick of the
/// wheel yields one step.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
///
/// use scrubber::zoom::{WheelAggregator, ZoomDirection};
///
/// let now = Instant::now();
/// let mut wheel = WheelAggregator::new(200.0, Duration::from_millis(200));
/// assert_eq!(wheel.accumulate(120.0, now), None);
/// assert_eq!(wheel.accumulate(120.0, now), Some(ZoomDirection::Out));
/// assert_eq!(wheel.accumulate(400.0, now), None);
/// ```
#[derive(Debug, Clone)]
pub struct WheelAggregator {
    threshold: f64,
    cooldown_period: Duration,
    accumulated: f64,
    cooldown: Deadline,
}

impl WheelAggregator {
    pub fn new(threshold: f64, cooldown_period: Duration) -> Self {
        Self {
            threshold,
            cooldown_period,
            accumulated: 0.0,
            cooldown: Deadline::default(),
        }
    }

    pub fn accumulate(&mut self, delta: f64, now: Instant) -> Option<ZoomDirection> {
        if self.cooldown.is_pending(now) {
            self.cooldown.arm(now, self.cooldown_period);
            return None;
        }
        self.cooldown.cancel();

        self.accumulated += delta;
        if self.accumulated.abs() < self.threshold {
            return None;
        }

        let direction = if self.accumulated > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        };
        self.accumulated = 0.0;
        self.cooldown.arm(now, self.cooldown_period);
        Some(direction)
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }
}

/// Turns two-finger distance changes into zoom steps.
#[derive(Debug, Clone)]
pub struct PinchTracker {
    threshold_percent: f64,
    reference_distance: Option<f64>,
}

impl PinchTracker {
    pub fn new(threshold_percent: f64) -> Self {
        Self {
            threshold_percent,
            reference_distance: None,
        }
    }

    pub fn start(&mut self, touches: &[TouchPoint]) {
        self.reference_distance = match touches {
            [first, second, ..] => Some(first.distance(second)),
            _ => None,
        };
    }

    /// Fires a step once the distance moved past the threshold, then rebases
    /// on the current distance so the same gesture can keep stepping.
    pub fn update(
        &mut self,
        touches: &[TouchPoint],
        viewport_height: f64,
    ) -> Option<ZoomDirection> {
        let [first, second, ..] = touches else {
            return None;
        };
        let reference = self.reference_distance?;
        let distance = first.distance(second);
        let delta = distance - reference;
        let threshold = viewport_height * self.threshold_percent / 100.0;
        if delta.abs() <= threshold {
            return None;
        }

        self.reference_distance = Some(distance);
        Some(if delta > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        })
    }

    pub fn end(&mut self) {
        self.reference_distance = None;
    }

    pub fn is_active(&self) -> bool {
        self.reference_distance.is_some()
    }
}

/// Result of a zoom step that changed the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomOutcome {
    pub index: usize,
    pub content_height: f64,
    /// Offset that re-centres the previously centred timestamp. `None` when the
    /// timeline geometry was not available.
    pub scroll_top: Option<f64>,
}

/// Owns the active zoom level and the gestures that change it.
#[derive(Debug, Clone)]
pub struct ZoomController {
    levels: Vec<ZoomLevel>,
    index: usize,
    direction: Option<ZoomDirection>,
    transition: Deadline,
    transition_period: Duration,
    wheel: WheelAggregator,
    pinch: PinchTracker,
    deferred_scroll: Option<f64>,
}

impl ZoomController {
    /// Creates a controller over a validated, non-empty level table.
    pub fn new(levels: Vec<ZoomLevel>, initial_index: usize, settings: ZoomSettings) -> Self {
        debug_assert!(!levels.is_empty());
        let index = initial_index.min(levels.len().saturating_sub(1));
        Self {
            levels,
            index,
            direction: None,
            transition: Deadline::default(),
            transition_period: settings.transition,
            wheel: WheelAggregator::new(
                settings.wheel_delta_threshold,
                settings.wheel_cooldown,
            ),
            pinch: PinchTracker::new(settings.pinch_threshold_percent),
            deferred_scroll: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn level(&self) -> &ZoomLevel {
        &self.levels[self.index]
    }

    pub fn levels(&self) -> &[ZoomLevel] {
        &self.levels
    }

    pub fn is_zooming(&self) -> bool {
        self.transition.is_armed()
    }

    pub fn direction(&self) -> Option<ZoomDirection> {
        self.direction
    }

    /// Feeds one wheel event. Without ctrl held the wheel scrolls, not zooms.
    pub fn on_wheel(&mut self, delta_y: f64, ctrl: bool, now: Instant) -> Option<ZoomDirection> {
        if !ctrl {
            return None;
        }
        let step = self.wheel.accumulate(delta_y, now);
        if step.is_none() {
            debug!(accumulated = self.wheel.accumulated(), "wheel delta accumulated");
        }
        step
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) {
        if touches.len() >= 2 {
            self.pinch.start(touches);
        }
    }

    pub fn on_touch_move(
        &mut self,
        touches: &[TouchPoint],
        viewport_height: f64,
    ) -> Option<ZoomDirection> {
        if !self.pinch.is_active() {
            return None;
        }
        self.pinch.update(touches, viewport_height)
    }

    pub fn on_touch_end(&mut self) {
        self.pinch.end();
    }

    /// Moves one level in `direction`, keeping the centred timestamp centred.
    ///
    /// Returns `None` when already at the end of the table; nothing changes in
    /// that case.
    pub fn step(
        &mut self,
        direction: ZoomDirection,
        viewport: Option<TimelineViewport>,
        segment_height: f64,
        range: TimeRange,
        now: Instant,
    ) -> Option<ZoomOutcome> {
        let last = self.levels.len() - 1;
        let next = match direction {
            ZoomDirection::In => self.index.checked_sub(1)?,
            ZoomDirection::Out if self.index < last => self.index + 1,
            ZoomDirection::Out => return None,
        };

        let old_axis = TimeAxis::for_range(&self.levels[self.index], segment_height, range);
        let new_axis = TimeAxis::for_range(&self.levels[next], segment_height, range);
        let content_height = new_axis.timeline_height(range);

        let scroll_top = viewport.map(|viewport| {
            let half = viewport.client_height / 2.0;
            let centre_time = old_axis.pixels_to_timestamp(viewport.scroll_top + half);
            let max = (content_height - viewport.client_height).max(0.0);
            (new_axis.timestamp_to_pixels(centre_time) - half).clamp(0.0, max)
        });

        info!(
            from = self.index,
            to = next,
            ?direction,
            segment_duration = new_axis.segment_duration,
            ?scroll_top,
            "zoom level changed"
        );

        self.index = next;
        self.direction = Some(direction);
        self.transition.arm(now, self.transition_period);
        self.deferred_scroll = scroll_top;

        Some(ZoomOutcome {
            index: next,
            content_height,
            scroll_top,
        })
    }

    /// Scroll correction to apply on the tick after a level change.
    pub fn take_deferred_scroll(&mut self) -> Option<f64> {
        self.deferred_scroll.take()
    }

    pub fn has_deferred_scroll(&self) -> bool {
        self.deferred_scroll.is_some()
    }

    /// Ends the transition window. Returns true when it just ended.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.transition.fire(now) {
            return false;
        }
        self.direction = None;
        true
    }
}
