use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activity::{ActivityKind, ActivityTracker};
use crate::axis::{TimeAxis, TimeRange, ZoomLevel};
use crate::config::{ScrubberConfig, validate_range};
use crate::drag::{AxisContext, DragController};
use crate::error::Result;
use crate::format::{TimestampFormat, UtcClockFormat};
use crate::surface::{TimelineSurface, TimelineViewport};
use crate::time::{Clock, SystemClock};
use crate::zoom::{TouchPoint, ZoomController, ZoomDirection};

/// Commands accepted by the scrubber.
///
/// Input commands carry raw host events; `Set*` commands carry owner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Press on the handle, in client pixels.
    PointerDown {
        client_y: f64,
    },
    PointerMove {
        client_y: f64,
    },
    PointerUp,
    /// Display refresh for a previously requested frame.
    AnimationFrame,
    Wheel {
        delta_y: f64,
        #[serde(default)]
        ctrl: bool,
    },
    TouchStart {
        touches: Vec<TouchPoint>,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    TouchEnd,
    /// The timeline container scrolled.
    UserScroll,
    /// Timer poll. Hosts send it while [`Scrubber::needs_tick`] is true.
    Tick,
    SetHandlebarTime {
        time: f64,
    },
    /// Replaces the segment sequence, latest first.
    SetSegments {
        segments: Vec<f64>,
    },
    /// Replaces the visible window. Fails when `start > end`.
    SetTimeRange {
        start: f64,
        end: f64,
    },
    /// Segment rows were hidden or shown; `segments` is the new sequence.
    SetCollapsed {
        collapsed: bool,
        segments: Vec<f64>,
    },
    ZoomIn,
    ZoomOut,
    /// Marks the next observed input as caused by the host, not the user.
    SetProgrammaticScroll,
}

/// Events emitted by the scrubber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimeChanged {
        time: f64,
    },
    PositionChanged {
        position: f64,
    },
    ZoomLevelChanged {
        index: usize,
        segment_duration: f64,
    },
    ZoomTransition {
        zooming: bool,
        direction: Option<ZoomDirection>,
    },
    InteractionChanged {
        interacting: bool,
    },
    /// The host should send [`Command::AnimationFrame`] on its next refresh.
    FrameRequested,
}

/// Time-axis scrubber bound to one timeline surface.
///
/// Routes host input to the zoom, drag and activity controllers and reports
/// what changed as [`Event`]s.
///
/// # Example
/// ```
/// use scrubber::surface::HeadlessSurface;
/// use scrubber::{Command, Event, Scrubber, ScrubberConfig};
///
/// let config = ScrubberConfig::default();
/// let mut scrubber =
///     Scrubber::new(HeadlessSurface::new(400.0, 0.0), &config).expect("valid config");
///
/// let events = scrubber
///     .handle_command(Command::ZoomOut)
///     .expect("zoom never fails");
/// assert!(matches!(events[0], Event::ZoomLevelChanged { index: 3, .. }));
/// ```
pub struct Scrubber<S, C = SystemClock> {
    surface: S,
    clock: C,
    formatter: Box<dyn TimestampFormat>,
    segment_height: f64,
    range: TimeRange,
    segments: Vec<f64>,
    grid_segments: bool,
    zoom: ZoomController,
    drag: DragController,
    activity: ActivityTracker,
}

impl<S> Scrubber<S, SystemClock>
where
    S: TimelineSurface,
{
    /// Creates a scrubber on the wall clock.
    pub fn new(surface: S, config: &ScrubberConfig) -> Result<Self> {
        Self::with_clock(surface, config, SystemClock)
    }
}

impl<S, C> Scrubber<S, C>
where
    S: TimelineSurface,
    C: Clock,
{
    /// Creates a scrubber whose timers read `clock`.
    ///
    /// Until the owner supplies segments, every row of the time range is a
    /// segment.
    pub fn with_clock(surface: S, config: &ScrubberConfig, clock: C) -> Result<Self> {
        config.validate()?;

        let mut scrubber = Self {
            surface,
            clock,
            formatter: Box::new(UtcClockFormat),
            segment_height: config.segment_height,
            range: config.time_range,
            segments: Vec::new(),
            grid_segments: true,
            zoom: ZoomController::new(
                config.zoom_levels.clone(),
                config.initial_zoom_index,
                config.gestures.zoom_settings(),
            ),
            drag: DragController::new(config.drag),
            activity: ActivityTracker::new(config.gestures.interaction_quiet_period()),
        };
        scrubber.refresh_layout();
        info!(
            zoom_index = scrubber.zoom.index(),
            start = scrubber.range.start,
            end = scrubber.range.end,
            "scrubber ready"
        );
        Ok(scrubber)
    }

    /// Replaces the label formatter.
    pub fn with_formatter(mut self, formatter: impl TimestampFormat + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let mut events = Vec::new();

        match command {
            Command::PointerDown { client_y } => {
                self.observe(ActivityKind::MouseDown, &mut events);
                self.drag.press(client_y, &self.surface, &mut events);
            }
            Command::PointerMove { client_y } => self.drag.pointer_move(client_y, &mut events),
            Command::PointerUp => {
                self.observe(ActivityKind::MouseUp, &mut events);
                self.drag.release(&mut events);
            }
            Command::AnimationFrame => self.run_frame(&mut events),
            Command::Wheel { delta_y, ctrl } => {
                if self.drag.is_dragging() {
                    debug!("wheel ignored while dragging");
                } else if let Some(direction) = self.zoom.on_wheel(delta_y, ctrl, now) {
                    self.zoom_step(direction, &mut events);
                }
            }
            Command::TouchStart { touches } => {
                self.observe(ActivityKind::TouchStart, &mut events);
                if !self.drag.is_dragging() {
                    self.zoom.on_touch_start(&touches);
                }
            }
            Command::TouchMove { touches } => {
                self.observe(ActivityKind::TouchMove, &mut events);
                self.touch_move(&touches, &mut events);
            }
            Command::TouchEnd => {
                self.observe(ActivityKind::TouchEnd, &mut events);
                self.zoom.on_touch_end();
            }
            Command::UserScroll => self.observe(ActivityKind::Scroll, &mut events),
            Command::Tick => self.tick(&mut events),
            Command::SetHandlebarTime { time } => self.sync_handlebar(time),
            Command::SetSegments { segments } => {
                debug!(count = segments.len(), "segments replaced");
                self.replace_segments(segments);
                self.reposition();
            }
            Command::SetTimeRange { start, end } => {
                let range = TimeRange { start, end };
                validate_range(range)?;
                self.range = range;
                self.refresh_layout();
                if let Some(time) = self.drag.time() {
                    self.sync_handlebar(time);
                }
            }
            Command::SetCollapsed {
                collapsed,
                segments,
            } => {
                debug!(collapsed, count = segments.len(), "segments collapsed");
                self.replace_segments(segments);
                self.recover_after_collapse(&mut events);
            }
            Command::ZoomIn => self.zoom_step(ZoomDirection::In, &mut events),
            Command::ZoomOut => self.zoom_step(ZoomDirection::Out, &mut events),
            Command::SetProgrammaticScroll => self.activity.set_programmatic_scroll(),
        }

        Ok(events)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Axis for the active zoom level and time range.
    pub fn axis(&self) -> TimeAxis {
        TimeAxis::for_range(self.zoom.level(), self.segment_height, self.range)
    }

    pub fn segments(&self) -> &[f64] {
        &self.segments
    }

    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    pub fn zoom_level_index(&self) -> usize {
        self.zoom.index()
    }

    pub fn zoom_level(&self) -> &ZoomLevel {
        self.zoom.level()
    }

    pub fn is_zooming(&self) -> bool {
        self.zoom.is_zooming()
    }

    pub fn zoom_direction(&self) -> Option<ZoomDirection> {
        self.zoom.direction()
    }

    pub fn handlebar_time(&self) -> Option<f64> {
        self.drag.time()
    }

    pub fn handle_position(&self) -> Option<f64> {
        self.drag.position()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_user_interacting(&self) -> bool {
        self.activity.is_interacting()
    }

    /// True while a frame is pending and [`Command::AnimationFrame`] is due.
    pub fn wants_frame(&self) -> bool {
        self.drag.frame_pending()
    }

    /// True while a timer is armed and [`Command::Tick`] must keep coming.
    pub fn needs_tick(&self) -> bool {
        self.activity.needs_poll() || self.zoom.is_zooming() || self.zoom.has_deferred_scroll()
    }

    /// Cancels the frame loop and any pending scroll correction.
    pub fn shutdown(&mut self) {
        self.drag.teardown();
        let _ = self.zoom.take_deferred_scroll();
        debug!("scrubber shut down");
    }

    fn observe(&mut self, kind: ActivityKind, events: &mut Vec<Event>) {
        if let Some(interacting) = self.activity.observe(kind, self.clock.now()) {
            events.push(Event::InteractionChanged { interacting });
        }
    }

    fn run_frame(&mut self, events: &mut Vec<Event>) {
        let ctx = AxisContext {
            axis: self.axis(),
            segments: &self.segments,
            range: self.range,
        };
        self.drag
            .run_frame(&ctx, &mut self.surface, self.formatter.as_ref(), events);
    }

    fn touch_move(&mut self, touches: &[TouchPoint], events: &mut Vec<Event>) {
        if self.drag.is_dragging() {
            return;
        }
        let Some(node) = self.surface.timeline() else {
            return;
        };
        let viewport_height = node.client_height();
        if let Some(direction) = self.zoom.on_touch_move(touches, viewport_height) {
            self.zoom_step(direction, events);
        }
    }

    fn zoom_step(&mut self, direction: ZoomDirection, events: &mut Vec<Event>) {
        if self.drag.is_dragging() {
            debug!(?direction, "zoom ignored while dragging");
            return;
        }

        let viewport = self.surface.timeline().map(TimelineViewport::read);
        let now = self.clock.now();
        let Some(outcome) =
            self.zoom
                .step(direction, viewport, self.segment_height, self.range, now)
        else {
            debug!(?direction, index = self.zoom.index(), "zoom at table end");
            return;
        };

        self.surface.set_content_height(outcome.content_height);
        if self.grid_segments {
            self.segments = self.axis().segment_starts(self.range);
        }
        events.push(Event::ZoomLevelChanged {
            index: outcome.index,
            segment_duration: self.zoom.level().segment_duration,
        });
        events.push(Event::ZoomTransition {
            zooming: true,
            direction: Some(direction),
        });

        self.reposition();
    }

    fn reposition(&mut self) {
        let ctx = AxisContext {
            axis: self.axis(),
            segments: &self.segments,
            range: self.range,
        };
        self.drag
            .reposition(&ctx, &mut self.surface, self.formatter.as_ref());
    }

    /// Owner-supplied rows replace the generated grid for good.
    fn replace_segments(&mut self, segments: Vec<f64>) {
        self.segments = segments;
        self.grid_segments = false;
        self.surface.set_content_height(self.segments.len() as f64 * self.segment_height);
    }

    fn tick(&mut self, events: &mut Vec<Event>) {
        let now = self.clock.now();
        if let Some(interacting) = self.activity.poll(now) {
            events.push(Event::InteractionChanged { interacting });
        }
        if let Some(scroll_top) = self.zoom.take_deferred_scroll() {
            debug!(scroll_top, "applying zoom scroll correction");
            self.activity.set_programmatic_scroll();
            self.surface.set_scroll_top(scroll_top);
        }
        if self.zoom.poll(now) {
            events.push(Event::ZoomTransition {
                zooming: false,
                direction: None,
            });
        }
    }

    fn sync_handlebar(&mut self, time: f64) {
        let ctx = AxisContext {
            axis: self.axis(),
            segments: &self.segments,
            range: self.range,
        };
        let scroll = self.drag.sync_external(
            time,
            &ctx,
            &mut self.surface,
            self.formatter.as_ref(),
            self.activity.is_interacting(),
        );
        if let Some(scroll_top) = scroll {
            self.activity.set_programmatic_scroll();
            self.surface.set_scroll_top(scroll_top);
        }
    }

    fn recover_after_collapse(&mut self, events: &mut Vec<Event>) {
        let ctx = AxisContext {
            axis: self.axis(),
            segments: &self.segments,
            range: self.range,
        };
        let _ = self.drag.recover_after_collapse(
            &ctx,
            &mut self.surface,
            self.formatter.as_ref(),
            events,
        );
    }

    fn refresh_layout(&mut self) {
        let axis = self.axis();
        if self.grid_segments {
            self.segments = axis.segment_starts(self.range);
            self.surface.set_content_height(axis.timeline_height(self.range));
        } else {
            self.surface.set_content_height(self.segments.len() as f64 * self.segment_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::{Command, Event, Scrubber};
    use crate::axis::{TimeRange, ZoomLevel};
    use crate::config::ScrubberConfig;
    use crate::error::ScrubberError;
    use crate::surface::{HeadlessSurface, Rect, ScrollNode, TimelineSurface};
    use crate::time::ManualClock;
    use crate::zoom::ZoomDirection;

    #[test]
    fn new_rejects_invalid_config() {
        let config = ScrubberConfig {
            zoom_levels: Vec::new(),
            ..ScrubberConfig::default()
        };
        let result = Scrubber::new(HeadlessSurface::new(400.0, 0.0), &config);

        assert!(matches!(result, Err(ScrubberError::EmptyZoomLevels)));
    }

    #[test]
    fn new_sizes_the_timeline_for_the_range() {
        let (scrubber, _clock, calls) = scrubber(config());

        assert_eq!(scrubber.surface().inner.node.scroll_height, 9_600.0);
        assert_eq!(scrubber.segments().len(), 1_200);
        assert_eq!(
            calls.lock().expect("lock surface calls").as_slice(),
            &[SurfaceCall::ContentHeight(9_600.0)]
        );
    }

    #[test]
    fn drag_session_reports_position_then_commits_on_release() {
        let (mut scrubber, _clock, _calls) = scrubber(config());
        scrubber
            .handle_command(Command::SetHandlebarTime { time: 35_250.0 })
            .expect("sync");

        let events = scrubber
            .handle_command(Command::PointerDown { client_y: 204.0 })
            .expect("press");
        assert_eq!(
            events,
            vec![
                Event::InteractionChanged { interacting: true },
                Event::FrameRequested
            ]
        );

        let events = scrubber
            .handle_command(Command::PointerMove { client_y: 244.0 })
            .expect("move");
        assert!(events.is_empty());

        let events = scrubber
            .handle_command(Command::AnimationFrame)
            .expect("frame");
        assert_eq!(events, vec![Event::PositionChanged { position: 240.0 }]);
        assert_eq!(scrubber.surface().inner.label, "09:45:00");

        let events = scrubber.handle_command(Command::PointerUp).expect("release");
        assert_eq!(events, vec![Event::TimeChanged { time: 35_100.0 }]);
        assert!(!scrubber.wants_frame());
        assert!(!scrubber.is_dragging());
    }

    #[test]
    fn owner_time_is_ignored_during_a_drag() {
        let (mut scrubber, _clock, _calls) = scrubber(config());
        scrubber
            .handle_command(Command::SetHandlebarTime { time: 35_250.0 })
            .expect("sync");
        scrubber
            .handle_command(Command::PointerDown { client_y: 204.0 })
            .expect("press");

        scrubber
            .handle_command(Command::SetHandlebarTime { time: 1_000.0 })
            .expect("sync");

        assert_eq!(scrubber.handlebar_time(), Some(35_250.0));
    }

    #[test]
    fn ctrl_wheel_zooms_and_defers_the_scroll_correction() {
        let (mut scrubber, clock, calls) = scrubber(config());
        scrubber.surface_mut().set_scroll_top(4_000.0);
        calls.lock().expect("lock surface calls").clear();

        let events = scrubber
            .handle_command(Command::Wheel {
                delta_y: 250.0,
                ctrl: true,
            })
            .expect("wheel");
        assert_eq!(
            events,
            vec![
                Event::ZoomLevelChanged {
                    index: 1,
                    segment_duration: 60.0
                },
                Event::ZoomTransition {
                    zooming: true,
                    direction: Some(ZoomDirection::Out)
                }
            ]
        );
        assert_eq!(
            calls.lock().expect("lock surface calls").as_slice(),
            &[SurfaceCall::ContentHeight(4_800.0)]
        );
        assert!(scrubber.needs_tick());

        let events = scrubber.handle_command(Command::Tick).expect("tick");
        assert!(events.is_empty());
        assert_eq!(scrubber.surface().inner.node.scroll_top, 1_900.0);

        let events = scrubber
            .handle_command(Command::UserScroll)
            .expect("scroll caused by correction");
        assert!(events.is_empty());
        assert!(!scrubber.is_user_interacting());

        clock.advance(Duration::from_millis(500));
        let events = scrubber.handle_command(Command::Tick).expect("tick");
        assert_eq!(
            events,
            vec![Event::ZoomTransition {
                zooming: false,
                direction: None
            }]
        );
        assert!(!scrubber.needs_tick());
    }

    #[test]
    fn zoom_is_ignored_while_dragging() {
        let (mut scrubber, _clock, _calls) = scrubber(config());
        scrubber
            .handle_command(Command::PointerDown { client_y: 150.0 })
            .expect("press");

        for command in [
            Command::ZoomOut,
            Command::Wheel {
                delta_y: 1_000.0,
                ctrl: true,
            },
        ] {
            let events = scrubber.handle_command(command).expect("zoom");
            assert!(events.is_empty());
        }
        assert_eq!(scrubber.zoom_level_index(), 0);
    }

    #[test]
    fn zoom_in_at_the_finest_level_emits_nothing() {
        let (mut scrubber, _clock, calls) = scrubber(config());
        calls.lock().expect("lock surface calls").clear();

        let events = scrubber.handle_command(Command::ZoomIn).expect("zoom");

        assert!(events.is_empty());
        assert!(calls.lock().expect("lock surface calls").is_empty());
    }

    #[test]
    fn owner_time_centres_the_handle_unless_the_user_is_scrolling() {
        let (mut scrubber, _clock, calls) = scrubber(config());

        scrubber
            .handle_command(Command::SetHandlebarTime { time: 30_000.0 })
            .expect("sync");
        assert_eq!(scrubber.surface().inner.node.scroll_top, 1_400.0);
        assert_eq!(scrubber.surface().inner.label, "08:20:00");

        let events = scrubber.handle_command(Command::UserScroll).expect("scroll");
        assert!(events.is_empty());
        let events = scrubber.handle_command(Command::UserScroll).expect("scroll");
        assert_eq!(events, vec![Event::InteractionChanged { interacting: true }]);

        calls.lock().expect("lock surface calls").clear();
        scrubber
            .handle_command(Command::SetHandlebarTime { time: 21_000.0 })
            .expect("sync");

        let calls = calls.lock().expect("lock surface calls");
        assert!(
            !calls
                .iter()
                .any(|call| matches!(call, SurfaceCall::ScrollTop(_)))
        );
        assert!(calls.contains(&SurfaceCall::HandleTop(4_000.0)));
    }

    #[test]
    fn interaction_settles_on_the_tick_after_the_quiet_period() {
        let (mut scrubber, clock, _calls) = scrubber(config());
        scrubber
            .handle_command(Command::TouchStart {
                touches: Vec::new(),
            })
            .expect("touch");

        clock.advance(Duration::from_millis(2_999));
        assert!(
            scrubber
                .handle_command(Command::Tick)
                .expect("tick")
                .is_empty()
        );
        clock.advance(Duration::from_millis(1));
        assert_eq!(
            scrubber.handle_command(Command::Tick).expect("tick"),
            vec![Event::InteractionChanged { interacting: false }]
        );
    }

    #[test]
    fn collapse_re_anchors_on_the_next_later_segment_once() {
        let config = ScrubberConfig {
            zoom_levels: vec![level(30.0), level(60.0)],
            initial_zoom_index: 0,
            time_range: TimeRange {
                start: 0.0,
                end: 200.0,
            },
            ..ScrubberConfig::default()
        };
        let (mut scrubber, _clock, _calls) = scrubber(config);
        scrubber
            .handle_command(Command::SetHandlebarTime { time: 145.0 })
            .expect("sync");

        let events = scrubber
            .handle_command(Command::SetCollapsed {
                collapsed: true,
                segments: vec![160.0, 130.0, 100.0],
            })
            .expect("collapse");

        assert_eq!(events, vec![Event::TimeChanged { time: 160.0 }]);
        assert_eq!(scrubber.handlebar_time(), Some(160.0));
    }

    #[test]
    fn inverted_time_range_is_rejected() {
        let (mut scrubber, _clock, _calls) = scrubber(config());

        let error = scrubber
            .handle_command(Command::SetTimeRange {
                start: 10.0,
                end: 5.0,
            })
            .expect_err("range must be rejected");

        assert!(matches!(error, ScrubberError::InvalidTimeRange { .. }));
        assert_eq!(scrubber.time_range().end, 36_000.0);
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: Command =
            serde_json::from_str(r#"{ "type": "wheel", "delta_y": -120 }"#).expect("json");

        assert_eq!(
            command,
            Command::Wheel {
                delta_y: -120.0,
                ctrl: false
            }
        );
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SurfaceCall {
        HandleTop(f64),
        Label(String),
        ScrollBy(f64),
        ScrollTop(f64),
        ContentHeight(f64),
    }

    struct RecordingSurface {
        inner: HeadlessSurface,
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                inner: HeadlessSurface::new(400.0, 0.0),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Arc<Mutex<Vec<SurfaceCall>>> {
            Arc::clone(&self.calls)
        }

        fn record(&self, call: SurfaceCall) {
            self.calls.lock().expect("lock surface calls").push(call);
        }
    }

    impl TimelineSurface for RecordingSurface {
        fn timeline(&self) -> Option<&dyn ScrollNode> {
            self.inner.timeline()
        }

        fn timeline_rect(&self) -> Option<Rect> {
            self.inner.timeline_rect()
        }

        fn handle_rect(&self) -> Option<Rect> {
            self.inner.handle_rect()
        }

        fn set_handle_top(&mut self, top_px: f64) {
            self.record(SurfaceCall::HandleTop(top_px));
            self.inner.set_handle_top(top_px);
        }

        fn set_label(&mut self, text: &str) {
            self.record(SurfaceCall::Label(text.to_string()));
            self.inner.set_label(text);
        }

        fn scroll_by(&mut self, delta_px: f64) {
            self.record(SurfaceCall::ScrollBy(delta_px));
            self.inner.scroll_by(delta_px);
        }

        fn set_scroll_top(&mut self, scroll_top: f64) {
            self.record(SurfaceCall::ScrollTop(scroll_top));
            self.inner.set_scroll_top(scroll_top);
        }

        fn set_content_height(&mut self, height_px: f64) {
            self.record(SurfaceCall::ContentHeight(height_px));
            self.inner.set_content_height(height_px);
        }
    }

    fn level(segment_duration: f64) -> ZoomLevel {
        ZoomLevel {
            segment_duration,
            timestamp_spread: segment_duration * 10.0,
        }
    }

    fn config() -> ScrubberConfig {
        ScrubberConfig {
            zoom_levels: vec![level(30.0), level(60.0), level(300.0)],
            initial_zoom_index: 0,
            time_range: TimeRange {
                start: 0.0,
                end: 36_000.0,
            },
            ..ScrubberConfig::default()
        }
    }

    fn scrubber(
        config: ScrubberConfig,
    ) -> (
        Scrubber<RecordingSurface, ManualClock>,
        ManualClock,
        Arc<Mutex<Vec<SurfaceCall>>>,
    ) {
        let surface = RecordingSurface::new();
        let calls = surface.calls();
        let clock = ManualClock::new();
        let scrubber =
            Scrubber::with_clock(surface, &config, clock.clone()).expect("valid config");
        (scrubber, clock, calls)
    }
}
