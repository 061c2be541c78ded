use std::time::Duration;

use iced::widget::{button, column, row, text};
use iced::{Element, Subscription, Task, time, window};
use scrubber::{
    Command, Event, Scrubber, ScrubberConfig, TimelineSurface, TimestampFormat, UtcClockFormat,
};
use tracing::{debug, warn};

use crate::surface::CanvasSurface;
use crate::widgets::timeline::{self, TimelineInput, TimelineLayout, TouchPhase};

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const HOUR: f64 = 3_600.0;

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    Timeline(TimelineLayout, TimelineInput),
    Frame,
    Tick,
    ZoomIn,
    ZoomOut,
    ToggleCollapsed,
    JumpToLatest,
}

/// Root UI state. Owns the scrubber and plays the handlebar-time owner.
pub struct AppState {
    scrubber: Scrubber<CanvasSurface>,
    show_handle: bool,
    selected_time: Option<f64>,
    collapsed: bool,
    interacting: bool,
    zooming: bool,
    status: String,
}

impl AppState {
    pub fn new(config: &ScrubberConfig) -> scrubber::Result<Self> {
        let scrubber = Scrubber::new(CanvasSurface::default(), config)?;
        let mut state = Self {
            scrubber,
            show_handle: config.drag.show_handle,
            selected_time: None,
            collapsed: false,
            interacting: false,
            zooming: false,
            status: String::from("ready"),
        };
        state.jump_to_latest();
        Ok(state)
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Timeline(layout, input) => {
                self.scrubber
                    .surface_mut()
                    .set_layout(f64::from(layout.top), f64::from(layout.height));
                self.timeline_input(input);
            }
            Message::Frame => self.dispatch(Command::AnimationFrame),
            Message::Tick => self.dispatch(Command::Tick),
            Message::ZoomIn => self.dispatch(Command::ZoomIn),
            Message::ZoomOut => self.dispatch(Command::ZoomOut),
            Message::ToggleCollapsed => {
                self.collapsed = !self.collapsed;
                let segments = self.segments_for_view();
                self.dispatch(Command::SetCollapsed {
                    collapsed: self.collapsed,
                    segments,
                });
            }
            Message::JumpToLatest => self.jump_to_latest(),
        }

        Task::none()
    }

    fn timeline_input(&mut self, input: TimelineInput) {
        let command = match input {
            TimelineInput::Pressed {
                client_y,
                on_handle: true,
            } => Command::PointerDown {
                client_y: f64::from(client_y),
            },
            // a press outside the handle only counts as activity
            TimelineInput::Pressed { .. } => Command::UserScroll,
            TimelineInput::Moved { client_y } => Command::PointerMove {
                client_y: f64::from(client_y),
            },
            TimelineInput::Released => Command::PointerUp,
            TimelineInput::Wheel {
                delta_y,
                ctrl: true,
            } => Command::Wheel {
                delta_y: f64::from(delta_y),
                ctrl: true,
            },
            TimelineInput::Wheel {
                delta_y,
                ctrl: false,
            } => {
                self.scrubber.surface_mut().scroll_by(f64::from(delta_y));
                self.flush_scroll_event();
                return;
            }
            TimelineInput::Touch { phase, touches } => match phase {
                TouchPhase::Start => Command::TouchStart { touches },
                TouchPhase::Move => Command::TouchMove { touches },
                TouchPhase::End => Command::TouchEnd,
            },
        };
        self.dispatch(command);
    }

    fn dispatch(&mut self, command: Command) {
        match self.scrubber.handle_command(command) {
            Ok(events) => {
                for event in events {
                    self.apply_event(event);
                }
            }
            Err(error) => {
                warn!(%error, "scrubber rejected command");
                self.status = format!("error: {error}");
            }
        }
        self.flush_scroll_event();
    }

    fn flush_scroll_event(&mut self) {
        if self.scrubber.surface_mut().take_scroll_event() {
            self.dispatch(Command::UserScroll);
        }
    }

    fn apply_event(&mut self, event: Event) {
        match event {
            Event::TimeChanged { time } => {
                self.selected_time = Some(time);
                self.status = format!("selected {}", UtcClockFormat.format_timestamp(time));
            }
            Event::ZoomLevelChanged {
                index,
                segment_duration,
            } => {
                self.status = format!("zoom level {index}: {segment_duration}s per row");
                let segments = self.segments_for_view();
                self.dispatch(Command::SetSegments { segments });
            }
            Event::ZoomTransition { zooming, .. } => self.zooming = zooming,
            Event::InteractionChanged { interacting } => self.interacting = interacting,
            Event::PositionChanged { .. } | Event::FrameRequested => {}
        }
    }

    fn jump_to_latest(&mut self) {
        let time = self.scrubber.time_range().end;
        debug!(time, "jumping to latest");
        self.selected_time = Some(time);
        self.dispatch(Command::SetHandlebarTime { time });
    }

    fn segments_for_view(&self) -> Vec<f64> {
        let grid = self
            .scrubber
            .axis()
            .segment_starts(self.scrubber.time_range());
        if self.collapsed {
            collapse_odd_hours(grid)
        } else {
            grid
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let toolbar = row![
            button("Zoom in").on_press(Message::ZoomIn),
            button("Zoom out").on_press(Message::ZoomOut),
            button(if self.collapsed { "Expand" } else { "Collapse" })
                .on_press(Message::ToggleCollapsed),
            button("Latest").on_press(Message::JumpToLatest),
        ]
        .spacing(12);

        let selected = self
            .selected_time
            .map(|time| UtcClockFormat.format_timestamp(time))
            .unwrap_or_else(|| String::from("none"));
        let level = self.scrubber.zoom_level();

        column![
            toolbar,
            text(format!(
                "Selected: {selected} | {}s rows{}{}",
                level.segment_duration,
                if self.zooming { " | zooming" } else { "" },
                if self.interacting { " | interacting" } else { "" },
            )),
            text(format!("Status: {}", self.status)),
            timeline::view(
                self.scrubber.surface(),
                self.scrubber.segments(),
                self.scrubber.axis(),
                level.timestamp_spread,
                self.show_handle,
                Message::Timeline,
            ),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Display refreshes while a drag frame is pending, timer polls while a
    /// timer is armed.
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();
        if self.scrubber.wants_frame() {
            subscriptions.push(window::frames().map(|_| Message::Frame));
        }
        if self.scrubber.needs_tick() {
            subscriptions.push(time::every(TICK_INTERVAL).map(|_| Message::Tick));
        }
        Subscription::batch(subscriptions)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.scrubber.shutdown();
    }
}

/// Hides every row that starts in an odd UTC hour.
fn collapse_odd_hours(segments: Vec<f64>) -> Vec<f64> {
    segments
        .into_iter()
        .filter(|start| (start / HOUR).floor().rem_euclid(2.0) == 0.0)
        .collect()
}
