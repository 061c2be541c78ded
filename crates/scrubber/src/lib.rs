//! UI-agnostic core of a vertically scrolling, zoomable time-axis scrubber.

pub mod activity;
pub mod api;
pub mod axis;
pub mod config;
pub mod drag;
pub mod error;
pub mod format;
pub mod frame;
pub mod surface;
pub mod time;
pub mod zoom;

pub use activity::{ActivityKind, ActivityTracker};
pub use api::{Command, Event, Scrubber};
pub use axis::{TimeAxis, TimeRange, ZoomLevel, cumulative_scroll_top};
pub use config::{DEFAULT_SEGMENT_HEIGHT, GestureSettings, ScrubberConfig};
pub use drag::{Authority, DragController, DragOptions, DragSession};
pub use error::{Result, ScrubberError};
pub use format::{TimestampFormat, UtcClockFormat};
pub use surface::{HeadlessSurface, Rect, ScrollNode, TimelineSurface, TimelineViewport};
pub use time::{Clock, ManualClock, SystemClock};
pub use zoom::{TouchPoint, ZoomController, ZoomDirection};
