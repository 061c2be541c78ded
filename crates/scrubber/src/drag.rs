use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::Event;
use crate::axis::{TimeAxis, TimeRange, cumulative_scroll_top};
use crate::format::TimestampFormat;
use crate::frame::FrameLoop;
use crate::surface::{Rect, TimelineSurface, TimelineViewport};

/// Behavior switches for the draggable handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragOptions {
    /// Snap to segment starts instead of interpolating inside a segment.
    pub align_to_segment: bool,
    /// Oldest time the handle may be dragged to. Defaults to 1.5 rows above
    /// the bottom of the timeline.
    pub earliest_time: Option<f64>,
    /// Newest time the handle may be dragged to. Defaults to 1.5 rows below
    /// the top of the timeline.
    pub latest_time: Option<f64>,
    pub show_handle: bool,
    /// Height of each auto-scroll zone, as a percentage of the viewport.
    pub scroll_edge_percent: f64,
    /// Report `TimeChanged` on every frame instead of only on release.
    pub update_handle: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            align_to_segment: true,
            earliest_time: None,
            latest_time: None,
            show_handle: true,
            scroll_edge_percent: 3.0,
            update_handle: false,
        }
    }
}

/// Which party may write the selected timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    External,
    Drag,
}

/// State of one press-drag-release gesture on the handle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    pub is_dragging: bool,
    pub client_y: Option<f64>,
    /// Pointer distance from the handle's top edge at press time.
    pub initial_click_adjustment: f64,
    /// Time computed by the latest frame of this session.
    pub time: Option<f64>,
}

/// Axis, segment rows and window the handle moves over.
///
/// `segments` is time-descending: `segments[i]` is the start of the segment
/// drawn in row `i`, counted from the top of the timeline.
#[derive(Debug, Clone, Copy)]
pub struct AxisContext<'a> {
    pub axis: TimeAxis,
    pub segments: &'a [f64],
    pub range: TimeRange,
}

impl AxisContext<'_> {
    /// Content pixel offset of `time` on the segment rows.
    ///
    /// Row `i` spans `(segments[i] - segment_duration, segments[i]]`, the
    /// inverse of the per-frame recompute. A time hidden between rows sits on
    /// the boundary above the first earlier row.
    pub fn position_of(&self, time: f64) -> f64 {
        let height = self.axis.segment_height;
        let duration = self.axis.segment_duration;
        let covering = self
            .segments
            .iter()
            .position(|&start| start - duration < time && time <= start);
        match covering {
            Some(row) => {
                let offset = (self.segments[row] - time) / duration * height;
                row as f64 * height + offset
            }
            None => self.segments.partition_point(|&start| start >= time) as f64 * height,
        }
    }
}

/// Result of one drag recompute, before any surface mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub position: f64,
    pub segment_index: usize,
    pub time: f64,
    pub scroll_delta: f64,
}

/// Drag state machine for the scrubber handle.
///
/// While a drag session is active the controller is the only writer of the
/// selected time; otherwise the owner writes it through
/// [`DragController::sync_external`] and the handle follows.
#[derive(Debug)]
pub struct DragController {
    options: DragOptions,
    session: DragSession,
    authority: Authority,
    time: Option<f64>,
    position: Option<f64>,
    frames: FrameLoop,
}

impl DragController {
    pub fn new(options: DragOptions) -> Self {
        Self {
            options,
            session: DragSession::default(),
            authority: Authority::External,
            time: None,
            position: None,
            frames: FrameLoop::default(),
        }
    }

    pub fn options(&self) -> &DragOptions {
        &self.options
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging
    }

    pub fn time(&self) -> Option<f64> {
        self.time
    }

    pub fn position(&self) -> Option<f64> {
        self.position
    }

    pub fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    /// Pixel bounds `(latest, earliest)` the handle is clamped to.
    pub fn bounds(&self, ctx: &AxisContext<'_>) -> (f64, f64) {
        let height = ctx.axis.segment_height;
        let latest = self
            .options
            .latest_time
            .map(|time| ctx.position_of(time))
            .unwrap_or(height * 1.5);
        let earliest = self
            .options
            .earliest_time
            .map(|time| ctx.position_of(time))
            .unwrap_or(ctx.segments.len() as f64 * height - height * 1.5);
        (latest, earliest)
    }

    /// Starts a session. Returns false when the handle is hidden.
    pub fn press(
        &mut self,
        client_y: f64,
        surface: &dyn TimelineSurface,
        events: &mut Vec<Event>,
    ) -> bool {
        if !self.options.show_handle {
            return false;
        }

        let adjustment = surface
            .handle_rect()
            .map(|rect| client_y - rect.top)
            .unwrap_or(0.0);
        self.session = DragSession {
            is_dragging: true,
            client_y: Some(client_y),
            initial_click_adjustment: adjustment,
            time: None,
        };
        self.authority = Authority::Drag;
        debug!(client_y, adjustment, "drag started");
        self.schedule(events);
        true
    }

    /// Records the pointer position; the recompute happens on the next frame.
    pub fn pointer_move(&mut self, client_y: f64, events: &mut Vec<Event>) {
        if !self.session.is_dragging {
            return;
        }
        self.session.client_y = Some(client_y);
        self.schedule(events);
    }

    /// Ends the session and commits the time its frames computed, if any.
    pub fn release(&mut self, events: &mut Vec<Event>) {
        if !self.session.is_dragging {
            return;
        }
        let computed = self.session.time;
        self.session = DragSession::default();
        self.authority = Authority::External;
        self.frames.cancel();

        if let Some(time) = computed {
            info!(time, position = ?self.position, "drag committed");
            events.push(Event::TimeChanged { time });
        }
    }

    /// Drops any session and pending frame without committing.
    pub fn teardown(&mut self) {
        self.frames.cancel();
        self.session = DragSession::default();
        self.authority = Authority::External;
    }

    /// Runs the per-frame recompute if a frame is pending.
    pub fn run_frame(
        &mut self,
        ctx: &AxisContext<'_>,
        surface: &mut dyn TimelineSurface,
        format: &dyn TimestampFormat,
        events: &mut Vec<Event>,
    ) {
        if !self.frames.begin() || !self.session.is_dragging {
            return;
        }

        let Some(frame) = self.compute_frame(ctx, &*surface) else {
            debug!(client_y = ?self.session.client_y, "drag frame skipped");
            return;
        };

        if frame.scroll_delta != 0.0 {
            surface.scroll_by(frame.scroll_delta);
        }
        surface.set_handle_top(frame.position);
        surface.set_label(&format.format_timestamp(frame.time));

        self.position = Some(frame.position);
        self.time = Some(frame.time);
        self.session.time = Some(frame.time);
        events.push(Event::PositionChanged {
            position: frame.position,
        });
        if self.options.update_handle {
            events.push(Event::TimeChanged { time: frame.time });
        }

        if frame.scroll_delta != 0.0 {
            self.schedule(events);
        }
    }

    /// Reads geometry and derives the handle position for the current pointer.
    ///
    /// Returns `None` when geometry is unavailable or the position maps outside
    /// the segment sequence.
    pub fn compute_frame(
        &self,
        ctx: &AxisContext<'_>,
        surface: &dyn TimelineSurface,
    ) -> Option<DragFrame> {
        let client_y = self.session.client_y?;
        let node = surface.timeline()?;
        let rect = surface.timeline_rect()?;
        let viewport = TimelineViewport::read(node);
        let scrolled = cumulative_scroll_top(node);

        let (latest, earliest) = self.bounds(ctx);
        let raw = client_y - rect.top + scrolled - self.session.initial_click_adjustment;
        let position = raw.max(latest).min(earliest);

        let segment_index = ctx.axis.segment_index_at(position)?;
        let segment_start = *ctx.segments.get(segment_index)?;
        let time = if self.options.align_to_segment {
            segment_start
        } else {
            let offset = position - segment_index as f64 * ctx.axis.segment_height;
            segment_start - ctx.axis.segment_duration * offset / ctx.axis.segment_height
        };

        Some(DragFrame {
            position,
            segment_index,
            time,
            scroll_delta: self.edge_scroll_delta(
                client_y,
                rect,
                viewport.client_height,
                ctx.axis.segment_height,
            ),
        })
    }

    /// Auto-scroll step for a pointer near the top or bottom edge.
    ///
    /// Intensity is 0 at the zone threshold, 1 at the timeline boundary, and
    /// keeps growing past the boundary.
    fn edge_scroll_delta(
        &self,
        client_y: f64,
        rect: Rect,
        client_height: f64,
        segment_height: f64,
    ) -> f64 {
        let edge = client_height * self.options.scroll_edge_percent / 100.0;
        if edge <= 0.0 {
            return 0.0;
        }

        let from_top = client_y - rect.top;
        let from_bottom = rect.bottom() - client_y;
        if from_top < edge {
            -segment_height * (edge - from_top) / edge
        } else if from_bottom < edge {
            segment_height * (edge - from_bottom) / edge
        } else {
            0.0
        }
    }

    /// Applies an owner-supplied time while no drag is active.
    ///
    /// Returns the `scroll_top` that centres the handle, unless the user is
    /// interacting with the timeline or the timeline is already there.
    pub fn sync_external(
        &mut self,
        time: f64,
        ctx: &AxisContext<'_>,
        surface: &mut dyn TimelineSurface,
        format: &dyn TimestampFormat,
        user_interacting: bool,
    ) -> Option<f64> {
        if self.authority == Authority::Drag {
            warn!(time, "external time ignored during drag");
            return None;
        }
        if !time.is_finite() {
            warn!(time, "external time rejected");
            return None;
        }

        let time = time.clamp(ctx.range.start, ctx.axis.reference_time);
        self.time = Some(time);
        let position = self.place_handle(time, ctx, surface, format)?;
        if user_interacting {
            debug!(time, "skipping scroll into view while user interacts");
            return None;
        }

        let viewport = TimelineViewport::read(surface.timeline()?);
        let target = (position - viewport.client_height / 2.0).clamp(0.0, viewport.max_scroll_top());
        if (target - viewport.scroll_top).abs() < f64::EPSILON {
            return None;
        }
        debug!(time, position, target, "centring handle");
        Some(target)
    }

    /// Re-derives the handle pixel position, e.g. after the zoom level changed.
    pub fn reposition(
        &mut self,
        ctx: &AxisContext<'_>,
        surface: &mut dyn TimelineSurface,
        format: &dyn TimestampFormat,
    ) {
        if self.session.is_dragging {
            return;
        }
        if let Some(time) = self.time {
            let _ = self.place_handle(time, ctx, surface, format);
        }
    }

    /// Re-anchors the handle after segments were collapsed or expanded.
    ///
    /// When the current time no longer lands on a segment, the handle moves to
    /// the next later segment, else to the first segment of the sequence, else
    /// to the top of the timeline. Returns the new time when it moved; a kept
    /// time is only re-placed on its new row.
    pub fn recover_after_collapse(
        &mut self,
        ctx: &AxisContext<'_>,
        surface: &mut dyn TimelineSurface,
        format: &dyn TimestampFormat,
        events: &mut Vec<Event>,
    ) -> Option<f64> {
        if self.session.is_dragging {
            return None;
        }
        let time = self.time?;
        let aligned = ctx.axis.align_start_to_segment(time);
        if ctx
            .segments
            .iter()
            .any(|&segment| segment == time || segment == aligned)
        {
            let _ = self.place_handle(time, ctx, surface, format);
            return None;
        }

        let reference = ctx.axis.reference_time;
        let next = ctx
            .segments
            .iter()
            .copied()
            .filter(|&segment| segment > time && segment <= reference)
            .min_by(f64::total_cmp);
        let recovered = next
            .or_else(|| ctx.segments.first().copied())
            .unwrap_or(reference);

        info!(
            from = time,
            to = recovered,
            found_later = next.is_some(),
            "handle re-anchored after collapse"
        );
        self.time = Some(recovered);
        let _ = self.place_handle(recovered, ctx, surface, format);
        events.push(Event::TimeChanged { time: recovered });
        Some(recovered)
    }

    fn place_handle(
        &mut self,
        time: f64,
        ctx: &AxisContext<'_>,
        surface: &mut dyn TimelineSurface,
        format: &dyn TimestampFormat,
    ) -> Option<f64> {
        if !self.options.show_handle {
            return None;
        }
        let position = ctx.position_of(time);
        surface.set_handle_top(position);
        surface.set_label(&format.format_timestamp(time));
        self.position = Some(position);
        Some(position)
    }

    fn schedule(&mut self, events: &mut Vec<Event>) {
        if self.frames.request().is_some() {
            events.push(Event::FrameRequested);
        }
    }
}
