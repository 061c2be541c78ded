mod replay;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scrubber::ScrubberConfig;
use tracing_subscriber::EnvFilter;

use replay::{ReplayOptions, load_script, replay};

#[derive(Parser)]
#[command(name = "scrubber-cli")]
#[command(about = "Replays gesture scripts against a headless time-axis scrubber")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON command script and print emitted events as JSON lines
    Replay {
        #[arg(long, short)]
        config: Option<PathBuf>,

        #[arg(long, short)]
        script: PathBuf,

        #[arg(long, default_value_t = 400.0)]
        viewport_height: f64,

        #[arg(long, default_value_t = 0.0)]
        rect_top: f64,

        /// Run a pending animation frame after every step
        #[arg(long)]
        auto_frame: bool,

        /// Poll timers after every step while any is armed
        #[arg(long)]
        auto_tick: bool,
    },
    /// Print the effective configuration as JSON
    Config {
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            config,
            script,
            viewport_height,
            rect_top,
            auto_frame,
            auto_tick,
        } => {
            let config = load_config(config.as_deref())?;
            let steps = load_script(&script)?;
            let options = ReplayOptions {
                viewport_height,
                rect_top,
                auto_frame,
                auto_tick,
            };
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            replay(&config, steps, options, &mut out)?;
            out.flush()?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ScrubberConfig> {
    match path {
        Some(path) => ScrubberConfig::load(path)
            .with_context(|| format!("invalid scrubber config {}", path.display())),
        None => Ok(ScrubberConfig::default()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
