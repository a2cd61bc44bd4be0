//! Studio sessions driven by the engine runtime.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use kinetica_engine::core::{App, AppControl, FrameCtx};
use kinetica_engine::editor::{TimelineEditor, TimelineEvent};
use kinetica_engine::fps::{FpsMonitor, SamplerConfig};
use kinetica_engine::player::{PlaybackConfig, TimelinePlayer};
use kinetica_timeline::{Property, PropertySet};

use crate::report;

/// Measures the loop's frame rate, optionally burning time each frame.
pub struct MonitorApp {
    monitor: FpsMonitor,
    target_fps: u32,
    /// Simulated per-frame work.
    load: Duration,
}

impl MonitorApp {
    pub fn new(config: SamplerConfig, target_fps: u32, load: Duration) -> Self {
        Self {
            monitor: FpsMonitor::new(config),
            target_fps,
            load,
        }
    }
}

impl App for MonitorApp {
    fn on_start(&mut self, ctx: &mut FrameCtx<'_>) -> Result<()> {
        self.monitor.subscribe(|snapshot| log::info!("{}", report::status_line(snapshot)));
        self.monitor.start(ctx.host);
        log::info!(
            "monitoring at target {} fps, {:?} simulated load per frame",
            self.target_fps,
            self.load
        );
        Ok(())
    }

    fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
        if !self.load.is_zero() {
            std::thread::sleep(self.load);
        }
        AppControl::Continue
    }

    fn on_exit(&mut self, _ctx: &mut FrameCtx<'_>) {
        self.monitor.stop();
        print_summary(&self.monitor, self.target_fps);
    }
}

/// Builds a demo timeline, plays it, and reports sampled values.
pub struct PlayApp {
    editor: TimelineEditor,
    player: TimelinePlayer,
    monitor: FpsMonitor,
    target_fps: u32,
    steps: usize,
    latest: Rc<Cell<Option<(f32, PropertySet)>>>,
    report_every_ms: f64,
    last_report_ms: Option<f64>,
}

impl PlayApp {
    pub fn new(
        steps: usize,
        playback: PlaybackConfig,
        sampler: SamplerConfig,
        target_fps: u32,
    ) -> Self {
        let editor = TimelineEditor::new();
        let player = TimelinePlayer::new(editor.handle(), playback);
        Self {
            editor,
            player,
            monitor: FpsMonitor::new(sampler),
            target_fps,
            steps: steps.max(1),
            latest: Rc::new(Cell::new(None)),
            report_every_ms: 250.0,
            last_report_ms: None,
        }
    }

    /// Lays the steps out around a square, spinning and pulsing as they go.
    fn build_timeline(&mut self) -> Result<()> {
        self.editor.subscribe(|event| match event {
            TimelineEvent::PropertyChanged { step, property, value } => {
                log::debug!("step {step}: {property} = {value}")
            }
            other => log::debug!("timeline: {other:?}"),
        });

        const CORNERS: [(f32, f32); 4] = [(0.0, 0.0), (150.0, 0.0), (150.0, 150.0), (0.0, 150.0)];

        for i in 1..self.steps {
            let id = self.editor.add_step();
            let (x, y) = CORNERS[i % CORNERS.len()];
            let values = [
                (Property::X, x),
                (Property::Y, y),
                (Property::Rotate, 90.0 * i as f32),
                (Property::Scale, if i % 2 == 0 { 1.0 } else { 1.5 }),
                (Property::Opacity, if i % 2 == 0 { 1.0 } else { 0.6 }),
            ];
            for (property, value) in values {
                self.editor.update_property(&id, property, property.clamp(value))?;
            }
        }

        for step in self.editor.timeline().steps() {
            log::info!("step {} (t={}): {}", step.id, step.time, step.properties);
        }
        Ok(())
    }
}

impl App for PlayApp {
    fn on_start(&mut self, ctx: &mut FrameCtx<'_>) -> Result<()> {
        self.build_timeline()?;

        let latest = Rc::clone(&self.latest);
        self.player.on_render(move |fraction, props| latest.set(Some((fraction, *props))));

        let config = self.player.config();
        log::info!(
            "playing {} steps, {}s per step, easing {}, repeat {}",
            self.editor.timeline().len(),
            config.seconds_per_step,
            config.easing,
            config.repeat
        );

        self.monitor.start(ctx.host);
        self.player.play(ctx.host);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let now = ctx.timestamp_ms();
        let due = self
            .last_report_ms
            .is_none_or(|last| now - last >= self.report_every_ms);

        if due {
            if let Some((fraction, props)) = self.latest.get() {
                log::info!("t={fraction:.3} {props}");
            }
            self.last_report_ms = Some(now);
        }

        if self.player.is_playing() {
            AppControl::Continue
        } else {
            log::info!("playback complete");
            AppControl::Exit
        }
    }

    fn on_exit(&mut self, _ctx: &mut FrameCtx<'_>) {
        self.player.pause();
        self.monitor.stop();
        print_summary(&self.monitor, self.target_fps);
    }
}

fn print_summary(monitor: &FpsMonitor, target_fps: u32) {
    let history = monitor.history();
    println!();
    println!("  {}", report::status_line(&monitor.snapshot()));
    println!("  samples: {}/{}", history.len(), history.capacity());
    if !history.is_empty() {
        println!("  {}", report::sparkline(&history, target_fps));
    }
    println!();
}
