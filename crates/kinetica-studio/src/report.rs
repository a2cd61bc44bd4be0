//! Terminal rendering of sampler statistics.

use kinetica_engine::fps::{FpsHealth, FpsHistory, SamplerSnapshot};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line sparkline of the history, each sample scaled against `target_fps`.
pub fn sparkline(history: &FpsHistory, target_fps: u32) -> String {
    history
        .bar_heights(target_fps)
        .map(|h| {
            let level = (h * (BARS.len() - 1) as f32).round() as usize;
            BARS[level.min(BARS.len() - 1)]
        })
        .collect()
}

fn fmt_opt(v: Option<u32>) -> String {
    v.map_or_else(|| "--".to_string(), |v| v.to_string())
}

fn health_label(health: FpsHealth) -> &'static str {
    match health {
        FpsHealth::Good => "good",
        FpsHealth::Fair => "fair",
        FpsHealth::Poor => "poor",
    }
}

/// `current 60 FPS (good) | avg 59 | min 57 | max 61`
pub fn status_line(s: &SamplerSnapshot) -> String {
    format!(
        "current {} FPS ({}) | avg {} | min {} | max {}",
        s.current_fps,
        health_label(s.health()),
        s.average_fps,
        fmt_opt(s.min_fps),
        fmt_opt(s.max_fps),
    )
}
