mod apps;
mod config;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kinetica_engine::logging::{init_logging, LoggingConfig};
use kinetica_engine::runtime::{Runtime, RuntimeConfig};

use crate::apps::{MonitorApp, PlayApp};
use crate::config::{ModeName, StudioConfig};

#[derive(Parser)]
#[command(name = "kinetica-studio", version, about = "Frame-rate monitor and keyframe player")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an empty frame loop and report the measured frame rate.
    Monitor {
        /// Stop after this many seconds.
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        /// Target frame rate of the loop.
        #[arg(long)]
        fps: Option<u32>,
        #[arg(long, value_enum)]
        mode: Option<ModeName>,
        /// Simulated work per frame, in milliseconds.
        #[arg(long, default_value_t = 0)]
        load: u64,
    },
    /// Build a demo timeline and play it back.
    Play {
        /// Stop after this many seconds even if playback repeats.
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
        #[arg(long)]
        fps: Option<u32>,
        /// Number of keyframe steps.
        #[arg(long, default_value_t = 4)]
        steps: usize,
        /// linear, ease-in, ease-out or ease-in-out.
        #[arg(long)]
        easing: Option<String>,
        /// Play one cycle and exit.
        #[arg(long)]
        no_repeat: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if cli.verbose {
        logging = logging.with_filter("debug");
    }
    init_logging(logging);

    let mut studio = StudioConfig::load_or_default(cli.config.as_deref())?;

    let summary = match cli.command {
        Command::Monitor { seconds, fps, mode, load } => {
            if let Some(fps) = fps {
                studio.runtime.target_fps = fps;
            }
            if let Some(mode) = mode {
                studio.sampler.mode = mode;
            }
            let runtime = runtime_config(&studio, seconds)?;
            let mut app = MonitorApp::new(
                studio.sampler_config()?,
                studio.runtime.target_fps,
                Duration::from_millis(load),
            );
            Runtime::run(runtime, &mut app)?
        }
        Command::Play { seconds, fps, steps, easing, no_repeat } => {
            if let Some(fps) = fps {
                studio.runtime.target_fps = fps;
            }
            if let Some(easing) = easing {
                studio.playback.easing = easing;
            }
            if no_repeat {
                studio.playback.repeat = false;
            }
            anyhow::ensure!(steps > 0, "--steps must be at least 1");
            let runtime = runtime_config(&studio, seconds)?;
            let mut app = PlayApp::new(
                steps,
                studio.playback_config()?,
                studio.sampler_config()?,
                studio.runtime.target_fps,
            );
            Runtime::run(runtime, &mut app)?
        }
    };

    log::info!("ran {} frames in {:.2?}", summary.frames, summary.elapsed);
    Ok(())
}

fn runtime_config(studio: &StudioConfig, seconds: f64) -> Result<RuntimeConfig> {
    anyhow::ensure!(
        seconds.is_finite() && seconds > 0.0,
        "--seconds must be a positive number"
    );
    let limit = Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("--seconds {seconds} is out of range"))?;
    Ok(RuntimeConfig::default()
        .target_fps(studio.runtime.target_fps)
        .max_duration(limit))
}
