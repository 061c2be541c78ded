use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use scrubber::{Command, Event, HeadlessSurface, ManualClock, Scrubber, ScrubberConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One scripted command, optionally preceded by a clock advance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub advance_ms: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// Headless surface geometry and pumping behavior for a replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    pub viewport_height: f64,
    pub rect_top: f64,
    /// Run a pending frame after every step.
    pub auto_frame: bool,
    /// Poll timers after every step while any is armed.
    pub auto_tick: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            viewport_height: 400.0,
            rect_top: 0.0,
            auto_frame: false,
            auto_tick: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub events: usize,
    pub time: Option<f64>,
    pub zoom_index: usize,
    pub scroll_top: f64,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    step: usize,
    #[serde(flatten)]
    event: &'a Event,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse script {}", path.display()))
}

/// Replays `steps` against a headless surface, writing one JSON line per event.
pub fn replay<W>(
    config: &ScrubberConfig,
    steps: Vec<ScriptStep>,
    options: ReplayOptions,
    out: &mut W,
) -> Result<ReplaySummary>
where
    W: Write,
{
    let mut surface = HeadlessSurface::new(options.viewport_height, 0.0);
    surface.rect_top = options.rect_top;
    let clock = ManualClock::new();
    let mut scrubber = Scrubber::with_clock(surface, config, clock.clone())?;

    let step_count = steps.len();
    let mut emitted = 0;
    for (index, step) in steps.into_iter().enumerate() {
        if step.advance_ms > 0 {
            clock.advance(Duration::from_millis(step.advance_ms));
        }
        debug!(step = index, command = ?step.command, "replaying step");

        let mut events = scrubber
            .handle_command(step.command)
            .with_context(|| format!("script step {index} failed"))?;
        if options.auto_frame && scrubber.wants_frame() {
            events.extend(scrubber.handle_command(Command::AnimationFrame)?);
        }
        if options.auto_tick && scrubber.needs_tick() {
            events.extend(scrubber.handle_command(Command::Tick)?);
        }

        for event in &events {
            serde_json::to_writer(&mut *out, &EventRecord { step: index, event })?;
            writeln!(out)?;
        }
        emitted += events.len();
    }
    scrubber.shutdown();

    let summary = ReplaySummary {
        steps: step_count,
        events: emitted,
        time: scrubber.handlebar_time(),
        zoom_index: scrubber.zoom_level_index(),
        scroll_top: scrubber.surface().node.scroll_top,
    };
    info!(
        steps = summary.steps,
        events = summary.events,
        time = ?summary.time,
        zoom_index = summary.zoom_index,
        "replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use scrubber::ScrubberConfig;
    use serde_json::Value;

    use super::{ReplayOptions, ScriptStep, replay};

    fn steps(json: &str) -> Vec<ScriptStep> {
        serde_json::from_str(json).expect("valid script")
    }

    fn lines(out: &[u8]) -> Vec<Value> {
        String::from_utf8(out.to_vec())
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }

    #[test]
    fn replays_a_drag_and_prints_tagged_events() {
        let script = steps(
            r#"[
                { "type": "pointer_down", "client_y": 100 },
                { "type": "pointer_move", "client_y": 140 },
                { "type": "pointer_up" }
            ]"#,
        );
        let options = ReplayOptions {
            auto_frame: true,
            ..ReplayOptions::default()
        };
        let mut out = Vec::new();

        let summary =
            replay(&ScrubberConfig::default(), script, options, &mut out).expect("replay");

        let records = lines(&out);
        let kinds: Vec<&str> = records
            .iter()
            .map(|record| record["type"].as_str().expect("tagged"))
            .collect();
        assert_eq!(
            kinds,
            vec![
                "interaction_changed",
                "frame_requested",
                "position_changed",
                "frame_requested",
                "position_changed",
                "time_changed"
            ]
        );
        assert_eq!(records[5]["step"], 2);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.events, 6);
        assert_eq!(summary.time, Some(86_400.0 - 5.0 * 30.0));
    }

    #[test]
    fn advancing_the_clock_settles_interaction() {
        let script = steps(
            r#"[
                { "type": "user_scroll" },
                { "type": "tick", "advance_ms": 3000 }
            ]"#,
        );
        let mut out = Vec::new();

        replay(
            &ScrubberConfig::default(),
            script,
            ReplayOptions::default(),
            &mut out,
        )
        .expect("replay");

        let records = lines(&out);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["type"], "interaction_changed");
        assert_eq!(records[1]["interacting"], false);
    }

    #[test]
    fn failing_step_is_reported_with_its_index() {
        let script = steps(
            r#"[
                { "type": "zoom_out" },
                { "type": "set_time_range", "start": 10, "end": 0 }
            ]"#,
        );
        let mut out = Vec::new();

        let error = replay(
            &ScrubberConfig::default(),
            script,
            ReplayOptions::default(),
            &mut out,
        )
        .expect_err("inverted range");

        assert!(error.to_string().contains("script step 1"));
    }
}
