//! Studio configuration file (`kinetica.toml`).
//!
//! Every table and key is optional; command-line flags override file values.
//!
//! ```toml
//! [runtime]
//! target_fps = 60
//!
//! [sampler]
//! mode = "windowed"        # or "per-frame"
//! window_ms = 1000.0
//! history_capacity = 60
//!
//! [playback]
//! seconds_per_step = 1.0
//! repeat = true
//! easing = "ease-in-out"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use kinetica_engine::fps::{SamplerConfig, SamplingMode};
use kinetica_engine::player::PlaybackConfig;
use kinetica_timeline::Easing;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub sampler: SamplerSection,
    #[serde(default)]
    pub playback: PlaybackSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self { target_fps: default_target_fps() }
    }
}

fn default_target_fps() -> u32 {
    60
}

/// Sampling mode as spelled in the config file and on the command line.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModeName {
    #[default]
    Windowed,
    PerFrame,
}

impl From<ModeName> for SamplingMode {
    fn from(mode: ModeName) -> Self {
        match mode {
            ModeName::Windowed => SamplingMode::Windowed,
            ModeName::PerFrame => SamplingMode::PerFrame,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    #[serde(default)]
    pub mode: ModeName,
    #[serde(default = "default_window_ms")]
    pub window_ms: f64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            mode: ModeName::default(),
            window_ms: default_window_ms(),
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_window_ms() -> f64 {
    1000.0
}

fn default_history_capacity() -> usize {
    60
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaybackSection {
    #[serde(default = "default_seconds_per_step")]
    pub seconds_per_step: f64,
    #[serde(default = "default_repeat")]
    pub repeat: bool,
    #[serde(default = "default_easing")]
    pub easing: String,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            seconds_per_step: default_seconds_per_step(),
            repeat: default_repeat(),
            easing: default_easing(),
        }
    }
}

fn default_seconds_per_step() -> f64 {
    1.0
}

fn default_repeat() -> bool {
    true
}

fn default_easing() -> String {
    "linear".to_string()
}

impl StudioConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn sampler_config(&self) -> Result<SamplerConfig> {
        let window_ms = self.sampler.window_ms;
        anyhow::ensure!(
            window_ms.is_finite() && window_ms > 0.0,
            "sampler.window_ms must be a positive number, got {window_ms}"
        );
        Ok(SamplerConfig::default()
            .mode(self.sampler.mode.into())
            .window_ms(window_ms)
            .history_capacity(self.sampler.history_capacity))
    }

    pub fn playback_config(&self) -> Result<PlaybackConfig> {
        let easing: Easing = self.playback.easing.parse()?;
        anyhow::ensure!(
            self.playback.seconds_per_step > 0.0,
            "playback.seconds_per_step must be positive"
        );
        Ok(PlaybackConfig::default()
            .seconds_per_step(self.playback.seconds_per_step)
            .repeat(self.playback.repeat)
            .easing(easing))
    }
}
