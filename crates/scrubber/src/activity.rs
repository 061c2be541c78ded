use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time::Deadline;

/// Raw input observed on the timeline container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Scroll,
    MouseDown,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// Tracks whether the user is actively scrolling or dragging the timeline.
///
/// Any observed input flips the flag on and restarts the quiet-period timer;
/// the flag only drops once the timer runs out with no further input.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
///
/// use scrubber::activity::{ActivityKind, ActivityTracker};
///
/// let start = Instant::now();
/// let mut tracker = ActivityTracker::new(Duration::from_millis(3_000));
/// assert_eq!(tracker.observe(ActivityKind::Scroll, start), Some(true));
/// assert_eq!(tracker.poll(start + Duration::from_millis(3_000)), Some(false));
/// ```
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    quiet_period: Duration,
    interacting: bool,
    programmatic_pending: bool,
    expiry: Deadline,
}

impl ActivityTracker {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            interacting: false,
            programmatic_pending: false,
            expiry: Deadline::default(),
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Marks the next observed event as caller-initiated.
    ///
    /// Must be called right before the programmatic scroll: the very next
    /// observed event consumes the mark, whichever event that is.
    pub fn set_programmatic_scroll(&mut self) {
        self.programmatic_pending = true;
    }

    /// Records one input event. Returns the new flag value when it changed.
    pub fn observe(&mut self, kind: ActivityKind, now: Instant) -> Option<bool> {
        if self.programmatic_pending {
            self.programmatic_pending = false;
            debug!(?kind, "input attributed to programmatic scroll");
            return None;
        }

        self.expiry.arm(now, self.quiet_period);
        if self.interacting {
            return None;
        }
        self.interacting = true;
        debug!(?kind, "user interaction started");
        Some(true)
    }

    /// Expires the flag once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        if !self.expiry.fire(now) || !self.interacting {
            return None;
        }
        self.interacting = false;
        debug!("user interaction settled");
        Some(false)
    }

    pub fn needs_poll(&self) -> bool {
        self.expiry.is_armed()
    }
}
