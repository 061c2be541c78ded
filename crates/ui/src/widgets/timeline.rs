use iced::widget::canvas::{self, Path, Stroke, Text};
use iced::widget::container;
use iced::{Color, Element, Length, Pixels, Point, Rectangle, Size, Theme, keyboard, mouse, touch};
use scrubber::{TimeAxis, TimestampFormat, TouchPoint, UtcClockFormat};

use crate::surface::{CanvasSurface, HANDLE_HEIGHT};

/// Pixels scrolled per wheel line.
const WHEEL_LINE_HEIGHT: f32 = 40.0;

/// Canvas bounds in window coordinates at the time of an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    pub top: f32,
    pub height: f32,
}

impl From<Rectangle> for TimelineLayout {
    fn from(bounds: Rectangle) -> Self {
        Self {
            top: bounds.y,
            height: bounds.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Raw input captured on the timeline canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineInput {
    Pressed { client_y: f32, on_handle: bool },
    Moved { client_y: f32 },
    Released,
    /// Browser-style delta: positive scrolls toward older times.
    Wheel { delta_y: f32, ctrl: bool },
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
    },
}

/// Converts an iced wheel delta into browser `deltaY` pixels.
///
/// iced reports positive `y` when the wheel moves up, browsers when it moves
/// down.
pub fn wheel_delta_pixels(delta: mouse::ScrollDelta) -> f32 {
    match delta {
        mouse::ScrollDelta::Lines { y, .. } => -y * WHEEL_LINE_HEIGHT,
        mouse::ScrollDelta::Pixels { y, .. } => -y,
    }
}

#[derive(Debug, Default)]
struct TimelineState {
    dragging: bool,
    modifiers: keyboard::Modifiers,
    fingers: Vec<(touch::Finger, Point)>,
}

impl TimelineState {
    fn touches(&self) -> Vec<TouchPoint> {
        self.fingers
            .iter()
            .map(|(_, point)| TouchPoint {
                x: f64::from(point.x),
                y: f64::from(point.y),
            })
            .collect()
    }

    fn upsert_finger(&mut self, id: touch::Finger, position: Point) {
        match self.fingers.iter_mut().find(|(finger, _)| *finger == id) {
            Some((_, point)) => *point = position,
            None => self.fingers.push((id, position)),
        }
    }
}

struct TimelineProgram<'a, Message> {
    surface: &'a CanvasSurface,
    segments: &'a [f64],
    axis: TimeAxis,
    timestamp_spread: f64,
    show_handle: bool,
    on_input: fn(TimelineLayout, TimelineInput) -> Message,
}

impl<Message> TimelineProgram<'_, Message> {
    fn emit(
        &self,
        bounds: Rectangle,
        input: TimelineInput,
    ) -> (canvas::event::Status, Option<Message>) {
        (
            canvas::event::Status::Captured,
            Some((self.on_input)(bounds.into(), input)),
        )
    }

    fn touch(
        &self,
        state: &TimelineState,
        bounds: Rectangle,
        phase: TouchPhase,
    ) -> (canvas::event::Status, Option<Message>) {
        self.emit(
            bounds,
            TimelineInput::Touch {
                phase,
                touches: state.touches(),
            },
        )
    }
}

impl<Message> canvas::Program<Message> for TimelineProgram<'_, Message> {
    type State = TimelineState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = modifiers;
                (canvas::event::Status::Ignored, None)
            }
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_over(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let on_handle =
                    self.show_handle && self.surface.handle_contains(f64::from(position.y));
                state.dragging = on_handle;
                self.emit(
                    bounds,
                    TimelineInput::Pressed {
                        client_y: position.y,
                        on_handle,
                    },
                )
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) if state.dragging => {
                self.emit(
                    bounds,
                    TimelineInput::Moved {
                        client_y: position.y,
                    },
                )
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if state.dragging =>
            {
                state.dragging = false;
                self.emit(bounds, TimelineInput::Released)
            }
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if !cursor.is_over(bounds) {
                    return (canvas::event::Status::Ignored, None);
                }
                self.emit(
                    bounds,
                    TimelineInput::Wheel {
                        delta_y: wheel_delta_pixels(delta),
                        ctrl: state.modifiers.control(),
                    },
                )
            }
            canvas::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                if !bounds.contains(position) {
                    return (canvas::event::Status::Ignored, None);
                }
                state.upsert_finger(id, position);
                self.touch(state, bounds, TouchPhase::Start)
            }
            canvas::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                if !state.fingers.iter().any(|(finger, _)| *finger == id) {
                    return (canvas::event::Status::Ignored, None);
                }
                state.upsert_finger(id, position);
                self.touch(state, bounds, TouchPhase::Move)
            }
            canvas::Event::Touch(
                touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. },
            ) => {
                let before = state.fingers.len();
                state.fingers.retain(|(finger, _)| *finger != id);
                if state.fingers.len() == before {
                    return (canvas::event::Status::Ignored, None);
                }
                self.touch(state, bounds, TouchPhase::End)
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let background = Path::rectangle(Point::ORIGIN, frame.size());
        frame.fill(&background, Color::from_rgb8(22, 24, 29));

        let row_height = self.axis.segment_height;
        let scroll_top = self.surface.scroll_top;
        for row in self
            .surface
            .visible_rows(row_height, self.segments.len())
        {
            let start = self.segments[row];
            let y = (row as f64 * row_height - scroll_top) as f32;
            let shade = if row % 2 == 0 { 38 } else { 44 };
            frame.fill(
                &Path::rectangle(
                    Point::new(48.0, y),
                    Size::new((bounds.width - 56.0).max(1.0), (row_height as f32 - 1.0).max(1.0)),
                ),
                Color::from_rgb8(shade, shade + 8, shade + 20),
            );

            if self.timestamp_spread > 0.0 && start.rem_euclid(self.timestamp_spread) == 0.0 {
                frame.stroke(
                    &Path::line(Point::new(36.0, y), Point::new(48.0, y)),
                    Stroke::default()
                        .with_width(1.0)
                        .with_color(Color::from_rgb8(140, 146, 160)),
                );
                frame.fill_text(Text {
                    content: UtcClockFormat.format_timestamp(start),
                    position: Point::new(2.0, y - 6.0),
                    color: Color::from_rgb8(140, 146, 160),
                    size: Pixels(9.0),
                    ..Text::default()
                });
            }
        }

        if self.show_handle {
            let top = (self.surface.handle_top - scroll_top) as f32;
            let handle = Path::rectangle(
                Point::new(40.0, top),
                Size::new((bounds.width - 40.0).max(1.0), HANDLE_HEIGHT as f32),
            );
            frame.fill(&handle, Color::from_rgba8(255, 94, 77, 0.25));
            let middle = top + HANDLE_HEIGHT as f32 / 2.0;
            frame.stroke(
                &Path::line(Point::new(40.0, middle), Point::new(bounds.width, middle)),
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb8(255, 94, 77)),
            );
            frame.fill_text(Text {
                content: self.surface.label.clone(),
                position: Point::new(bounds.width - 64.0, top + 2.0),
                color: Color::WHITE,
                size: Pixels(11.0),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_over(bounds) {
            Some(position)
                if self.show_handle && self.surface.handle_contains(f64::from(position.y)) =>
            {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::None,
        }
    }
}

/// Renders the scrollable vertical timeline with its handle.
pub fn view<'a, Message>(
    surface: &'a CanvasSurface,
    segments: &'a [f64],
    axis: TimeAxis,
    timestamp_spread: f64,
    show_handle: bool,
    on_input: fn(TimelineLayout, TimelineInput) -> Message,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(
        canvas::Canvas::new(TimelineProgram {
            surface,
            segments,
            axis,
            timestamp_spread,
            show_handle,
            on_input,
        })
        .width(Length::Fill)
        .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
