use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time for gesture timers.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test (or a script replayer) can keep one
/// handle and advance the clock owned by a [`crate::Scrubber`].
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use scrubber::time::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Restartable one-shot timer.
///
/// Arming an already armed deadline replaces it, which is what gives the
/// activity and cooldown timers their trailing-edge behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn arm(&mut self, now: Instant, period: Duration) {
        self.at = Some(now + period);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Returns true while armed and not yet reached.
    pub fn is_pending(&self, now: Instant) -> bool {
        self.at.is_some_and(|at| now < at)
    }

    /// Disarms and returns true once `now` has reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}
