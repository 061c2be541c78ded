mod app;
mod surface;
mod widgets;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::AppState;
use iced::Task;
use scrubber::{ScrubberConfig, TimeRange};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    let state = AppState::new(&config)?;

    iced::application("Scrubber", AppState::update, AppState::view)
        .subscription(AppState::subscription)
        .run_with(move || (state, Task::none()))?;
    Ok(())
}

/// Loads the config named on the command line, or covers the last day.
fn load_config(path: Option<PathBuf>) -> Result<ScrubberConfig> {
    if let Some(path) = path {
        return ScrubberConfig::load(&path)
            .with_context(|| format!("invalid scrubber config {}", path.display()));
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?
        .as_secs_f64();
    Ok(ScrubberConfig {
        time_range: TimeRange {
            start: now - 86_400.0,
            end: now,
        },
        ..ScrubberConfig::default()
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
