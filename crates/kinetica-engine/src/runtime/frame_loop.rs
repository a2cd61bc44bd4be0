use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};

use crate::core::{App, AppControl, FrameCtx};
use crate::time::{FrameClock, FrameHost, FrameTime};

/// Frame loop configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub target_fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    /// Stop once this much time has passed since the first frame.
    pub max_duration: Option<Duration>,
}

impl RuntimeConfig {
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: None,
            max_duration: None,
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Copy, Clone)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed: Duration,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Drives `app` until it returns [`AppControl::Exit`] or a configured limit is hit.
    ///
    /// Each iteration ticks the clock, runs the host's frame callbacks with the
    /// frame timestamp, then calls `App::on_frame`. When a frame overruns its
    /// budget the schedule resynchronizes instead of bursting to catch up.
    pub fn run<A: App>(config: RuntimeConfig, app: &mut A) -> Result<RunSummary> {
        ensure!(config.target_fps > 0, "target_fps must be at least 1");

        let host = FrameHost::new();
        let mut clock = FrameClock::new();
        let budget = Duration::from_secs_f64(1.0 / config.target_fps as f64);

        let first = clock.tick();
        app.on_start(&mut FrameCtx { host: &host, time: first })
            .context("application failed to start")?;

        log::debug!(
            "runtime started: target {} fps, limit {:?} frames / {:?}",
            config.target_fps,
            config.max_frames,
            config.max_duration
        );

        let mut frames: u64 = 0;
        let mut time: FrameTime = first;
        let mut deadline: Instant = first.now;

        loop {
            host.run_frame(time.timestamp_ms);

            let control = app.on_frame(&mut FrameCtx { host: &host, time });
            frames += 1;

            if control == AppControl::Exit {
                break;
            }
            if config.max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            if config
                .max_duration
                .is_some_and(|max| time.now.saturating_duration_since(first.now) >= max)
            {
                break;
            }

            deadline += budget;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
            time = clock.tick();
        }

        app.on_exit(&mut FrameCtx { host: &host, time });

        let summary = RunSummary {
            frames,
            elapsed: time.now.saturating_duration_since(first.now),
        };
        log::debug!("runtime finished: {} frames in {:?}", summary.frames, summary.elapsed);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        frames: u64,
        callbacks: Rc<Cell<u32>>,
        exit_after: Option<u64>,
        exited: bool,
    }

    impl App for Counter {
        fn on_start(&mut self, ctx: &mut FrameCtx<'_>) -> Result<()> {
            let c = Rc::clone(&self.callbacks);
            ctx.host.request_frame(move |_| c.set(c.get() + 1));
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
            self.frames += 1;
            match self.exit_after {
                Some(n) if self.frames >= n => AppControl::Exit,
                _ => AppControl::Continue,
            }
        }

        fn on_exit(&mut self, _ctx: &mut FrameCtx<'_>) {
            self.exited = true;
        }
    }

    #[test]
    fn stops_at_frame_limit() {
        let mut app = Counter::default();
        let config = RuntimeConfig::default().target_fps(1000).max_frames(5);
        let summary = Runtime::run(config, &mut app).unwrap();

        assert_eq!(summary.frames, 5);
        assert_eq!(app.frames, 5);
        assert!(app.exited);
        // Registered once in on_start, fired on the first frame only.
        assert_eq!(app.callbacks.get(), 1);
    }

    #[test]
    fn app_can_exit_early() {
        let mut app = Counter { exit_after: Some(2), ..Counter::default() };
        let config = RuntimeConfig::default().target_fps(1000).max_frames(100);
        let summary = Runtime::run(config, &mut app).unwrap();
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn zero_target_fps_is_rejected() {
        let mut app = Counter::default();
        let err = Runtime::run(RuntimeConfig::default().target_fps(0), &mut app).unwrap_err();
        assert!(err.to_string().contains("target_fps"));
        assert!(!app.exited);
    }

    #[test]
    fn failing_start_aborts_run() {
        struct Broken;
        impl App for Broken {
            fn on_start(&mut self, _ctx: &mut FrameCtx<'_>) -> Result<()> {
                anyhow::bail!("no timeline")
            }
            fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
                panic!("must not run")
            }
        }

        let err = Runtime::run(RuntimeConfig::default().max_frames(1), &mut Broken).unwrap_err();
        assert_eq!(err.to_string(), "application failed to start");
    }
}
