use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axis::{TimeRange, ZoomLevel};
use crate::drag::DragOptions;
use crate::error::{Result, ScrubberError};
use crate::zoom::ZoomSettings;

/// Pixels per segment row. Constant across zoom levels.
pub const DEFAULT_SEGMENT_HEIGHT: f64 = 8.0;

/// Timer periods and thresholds for raw input handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub interaction_quiet_ms: u64,
    pub wheel_delta_threshold: f64,
    pub wheel_cooldown_ms: u64,
    pub zoom_transition_ms: u64,
    pub pinch_threshold_percent: f64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            interaction_quiet_ms: 3_000,
            wheel_delta_threshold: 200.0,
            wheel_cooldown_ms: 200,
            zoom_transition_ms: 500,
            pinch_threshold_percent: 20.0,
        }
    }
}

impl GestureSettings {
    pub fn interaction_quiet_period(&self) -> Duration {
        Duration::from_millis(self.interaction_quiet_ms)
    }

    pub fn zoom_settings(&self) -> ZoomSettings {
        ZoomSettings {
            wheel_delta_threshold: self.wheel_delta_threshold,
            wheel_cooldown: Duration::from_millis(self.wheel_cooldown_ms),
            transition: Duration::from_millis(self.zoom_transition_ms),
            pinch_threshold_percent: self.pinch_threshold_percent,
        }
    }
}

/// Scrubber configuration, loadable from JSON.
///
/// Every field has a default, so a config file only lists what it changes.
///
/// # Example
/// ```
/// use scrubber::ScrubberConfig;
///
/// let config: ScrubberConfig =
///     serde_json::from_str(r#"{ "initial_zoom_index": 0 }"#).expect("valid json");
/// config.validate().expect("defaults are valid");
/// assert_eq!(config.segment_height, 8.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubberConfig {
    pub segment_height: f64,
    pub zoom_levels: Vec<ZoomLevel>,
    pub initial_zoom_index: usize,
    pub time_range: TimeRange,
    pub drag: DragOptions,
    pub gestures: GestureSettings,
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            segment_height: DEFAULT_SEGMENT_HEIGHT,
            zoom_levels: default_zoom_levels(),
            initial_zoom_index: 2,
            time_range: TimeRange {
                start: 0.0,
                end: 86_400.0,
            },
            drag: DragOptions::default(),
            gestures: GestureSettings::default(),
        }
    }
}

fn default_zoom_levels() -> Vec<ZoomLevel> {
    [(5.0, 60.0), (10.0, 120.0), (30.0, 300.0), (60.0, 900.0)]
        .into_iter()
        .map(|(segment_duration, timestamp_spread)| ZoomLevel {
            segment_duration,
            timestamp_spread,
        })
        .collect()
}

impl ScrubberConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScrubberError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| ScrubberError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        debug!(
            path = %path.display(),
            zoom_levels = config.zoom_levels.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Checks the invariants the controllers rely on.
    pub fn validate(&self) -> Result<()> {
        if !(self.segment_height > 0.0) {
            return Err(ScrubberError::InvalidSegmentHeight(self.segment_height));
        }
        if self.zoom_levels.is_empty() {
            return Err(ScrubberError::EmptyZoomLevels);
        }
        for (index, level) in self.zoom_levels.iter().enumerate() {
            if !(level.segment_duration > 0.0) {
                return Err(ScrubberError::InvalidZoomLevel {
                    index,
                    segment_duration: level.segment_duration,
                });
            }
        }
        if let Some(index) = self
            .zoom_levels
            .windows(2)
            .position(|pair| pair[1].segment_duration <= pair[0].segment_duration)
        {
            return Err(ScrubberError::UnorderedZoomLevels { index: index + 1 });
        }
        if self.initial_zoom_index >= self.zoom_levels.len() {
            return Err(ScrubberError::InitialZoomOutOfRange {
                index: self.initial_zoom_index,
                len: self.zoom_levels.len(),
            });
        }
        validate_range(self.time_range)?;
        validate_percentage("drag.scroll_edge_percent", self.drag.scroll_edge_percent)?;
        validate_percentage(
            "gestures.pinch_threshold_percent",
            self.gestures.pinch_threshold_percent,
        )?;
        Ok(())
    }
}

pub(crate) fn validate_range(range: TimeRange) -> Result<()> {
    if range.start.is_finite() && range.end.is_finite() && range.start <= range.end {
        Ok(())
    } else {
        Err(ScrubberError::InvalidTimeRange {
            start: range.start,
            end: range.end,
        })
    }
}

fn validate_percentage(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ScrubberError::InvalidPercentage { field, value })
    }
}
