use super::history::{FpsHistory, FrameSample};

/// How frames are turned into FPS samples.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SamplingMode {
    /// Count frames until a window of `window_ms` has elapsed, then emit
    /// `round(frames * 1000 / elapsed)`.
    #[default]
    Windowed,
    /// Emit `round(1000 / delta)` for every frame after the first.
    PerFrame,
}

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub mode: SamplingMode,
    /// Window length for [`SamplingMode::Windowed`]. Closed with `>=`.
    pub window_ms: f64,
    pub history_capacity: usize,
}

impl SamplerConfig {
    pub fn mode(mut self, mode: SamplingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn window_ms(mut self, window_ms: f64) -> Self {
        self.window_ms = window_ms;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mode: SamplingMode::Windowed,
            window_ms: 1000.0,
            history_capacity: FpsHistory::DEFAULT_CAPACITY,
        }
    }
}

/// Traffic-light rating used when displaying an FPS value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FpsHealth {
    Poor,
    Fair,
    Good,
}

impl FpsHealth {
    /// Below 50 is poor, below 55 fair, anything else good.
    pub fn classify(fps: u32) -> Self {
        match fps {
            0..50 => FpsHealth::Poor,
            50..55 => FpsHealth::Fair,
            _ => FpsHealth::Good,
        }
    }
}

/// Read-only view of the sampler statistics, handed to listeners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerSnapshot {
    pub current_fps: u32,
    pub average_fps: u32,
    /// `None` until the first sample (displayed as `--`).
    pub min_fps: Option<u32>,
    pub max_fps: Option<u32>,
    pub samples: usize,
}

impl SamplerSnapshot {
    pub fn health(&self) -> FpsHealth {
        FpsHealth::classify(self.current_fps)
    }
}

/// Frame-rate measurement state machine.
///
/// Feed it one timestamp per frame through [`FpsSampler::on_frame`]. It does
/// not schedule anything itself; see `FpsMonitor` for the frame-loop binding.
///
/// `min_fps` only ever decreases and `max_fps` only ever increases until
/// [`FpsSampler::restart`] or [`FpsSampler::reset`].
#[derive(Debug, Clone)]
pub struct FpsSampler {
    config: SamplerConfig,

    frame_count: u32,
    window_start_ms: Option<f64>,
    last_frame_ms: Option<f64>,

    current_fps: u32,
    average_fps: u32,
    min_fps: Option<u32>,
    max_fps: Option<u32>,
    history: FpsHistory,
}

impl FpsSampler {
    pub fn new(config: SamplerConfig) -> Self {
        let history = FpsHistory::new(config.history_capacity);
        Self {
            config,
            frame_count: 0,
            window_start_ms: None,
            last_frame_ms: None,
            current_fps: 0,
            average_fps: 0,
            min_fps: None,
            max_fps: None,
            history,
        }
    }

    /// Seeds the window baseline. Without it the first frame becomes the
    /// baseline and is not counted.
    pub fn begin(&mut self, timestamp_ms: f64) {
        self.frame_count = 0;
        self.window_start_ms = Some(timestamp_ms);
        self.last_frame_ms = Some(timestamp_ms);
    }

    /// Prepares a new session: window counters and min/max start over, the
    /// history and the average derived from it are kept.
    pub fn restart(&mut self) {
        self.frame_count = 0;
        self.window_start_ms = None;
        self.last_frame_ms = None;
        self.min_fps = None;
        self.max_fps = None;
    }

    /// Clears everything, history included.
    pub fn reset(&mut self) {
        self.restart();
        self.current_fps = 0;
        self.average_fps = 0;
        self.history.clear();
    }

    /// Accounts for one frame. Returns the new sample when one was produced.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> Option<FrameSample> {
        match self.config.mode {
            SamplingMode::Windowed => self.on_frame_windowed(timestamp_ms),
            SamplingMode::PerFrame => self.on_frame_per_frame(timestamp_ms),
        }
    }

    fn on_frame_windowed(&mut self, timestamp_ms: f64) -> Option<FrameSample> {
        let Some(start) = self.window_start_ms else {
            self.begin(timestamp_ms);
            return None;
        };

        self.frame_count += 1;
        let elapsed = timestamp_ms - start;
        if elapsed < self.config.window_ms || elapsed <= 0.0 {
            return None;
        }

        let fps = round_fps(self.frame_count as f64 * 1000.0 / elapsed);
        self.frame_count = 0;
        self.window_start_ms = Some(timestamp_ms);
        Some(self.record(timestamp_ms, fps))
    }

    fn on_frame_per_frame(&mut self, timestamp_ms: f64) -> Option<FrameSample> {
        let last = self.last_frame_ms.replace(timestamp_ms)?;
        let delta = timestamp_ms - last;
        if delta <= 0.0 {
            return None;
        }
        Some(self.record(timestamp_ms, round_fps(1000.0 / delta)))
    }

    fn record(&mut self, timestamp_ms: f64, fps: u32) -> FrameSample {
        let sample = FrameSample { timestamp_ms, fps };
        self.history.push(sample);

        self.current_fps = fps;
        self.average_fps = self.history.mean().unwrap_or(fps);
        self.min_fps = Some(self.min_fps.map_or(fps, |m| m.min(fps)));
        self.max_fps = Some(self.max_fps.map_or(fps, |m| m.max(fps)));

        log::trace!("fps sample at {timestamp_ms:.1}ms: {fps} (avg {})", self.average_fps);
        sample
    }

    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    pub fn average_fps(&self) -> u32 {
        self.average_fps
    }

    pub fn min_fps(&self) -> Option<u32> {
        self.min_fps
    }

    pub fn max_fps(&self) -> Option<u32> {
        self.max_fps
    }

    pub fn history(&self) -> &FpsHistory {
        &self.history
    }

    /// Frames counted in the currently open window.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn window_start_ms(&self) -> Option<f64> {
        self.window_start_ms
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SamplerSnapshot {
        SamplerSnapshot {
            current_fps: self.current_fps,
            average_fps: self.average_fps,
            min_fps: self.min_fps,
            max_fps: self.max_fps,
            samples: self.history.len(),
        }
    }
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

fn round_fps(fps: f64) -> u32 {
    // Saturating cast; infinities cannot occur because elapsed > 0.
    fps.round() as u32
}
