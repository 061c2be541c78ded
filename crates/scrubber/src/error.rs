use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the scrubber crate.
pub type Result<T> = std::result::Result<T, ScrubberError>;

/// Errors produced while configuring the scrubber.
///
/// Gesture and geometry handling never fail: missing layout, unknown segments
/// and zoom bounds are absorbed as no-ops. Only configuration input can be
/// rejected.
#[derive(Debug)]
pub enum ScrubberError {
    EmptyZoomLevels,
    InvalidZoomLevel {
        index: usize,
        segment_duration: f64,
    },
    UnorderedZoomLevels {
        index: usize,
    },
    InitialZoomOutOfRange {
        index: usize,
        len: usize,
    },
    InvalidSegmentHeight(f64),
    InvalidTimeRange {
        start: f64,
        end: f64,
    },
    InvalidPercentage {
        field: &'static str,
        value: f64,
    },
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ScrubberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyZoomLevels => write!(f, "zoom level table is empty"),
            Self::InvalidZoomLevel {
                index,
                segment_duration,
            } => write!(
                f,
                "zoom level {index} has non-positive segment duration {segment_duration}"
            ),
            Self::UnorderedZoomLevels { index } => write!(
                f,
                "zoom level {index} is not coarser than the level before it"
            ),
            Self::InitialZoomOutOfRange { index, len } => {
                write!(f, "initial zoom index {index} is outside 0..{len}")
            }
            Self::InvalidSegmentHeight(height) => {
                write!(f, "segment height must be positive: {height}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "invalid time range {start}..{end}")
            }
            Self::InvalidPercentage { field, value } => {
                write!(f, "{field} must be within 0..=100: {value}")
            }
            Self::ConfigIo { path, source } => {
                write!(f, "failed to read config {} ({source})", path.display())
            }
            Self::ConfigParse { path, source } => {
                write!(f, "failed to parse config {} ({source})", path.display())
            }
        }
    }
}

impl std::error::Error for ScrubberError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
