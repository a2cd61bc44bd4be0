//! Timeline playback on a frame host.
//!
//! The timeline model has no notion of playing or paused; the player is the
//! external driver that advances a fraction every frame, samples the
//! timeline and hands the result to a render sink.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetica_timeline::{Easing, KeyframeTimeline, PropertySet};

use crate::time::{FrameHost, FrameRequestId};

/// Playback configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Seconds allotted to each step; one cycle lasts `seconds_per_step * steps`.
    pub seconds_per_step: f64,
    /// Loop forever instead of stopping at the last step.
    pub repeat: bool,
    pub easing: Easing,
}

impl PlaybackConfig {
    pub fn seconds_per_step(mut self, seconds: f64) -> Self {
        self.seconds_per_step = seconds;
        self
    }

    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            seconds_per_step: 1.0,
            repeat: true,
            easing: Easing::Linear,
        }
    }
}

type RenderSink = Box<dyn FnMut(f32, &PropertySet)>;

struct Shared {
    timeline: Rc<RefCell<KeyframeTimeline>>,
    config: Cell<PlaybackConfig>,
    sink: RefCell<Option<RenderSink>>,
    session: Cell<u64>,
    pending: Cell<Option<FrameRequestId>>,
    playing: Cell<bool>,
    fraction: Cell<f32>,
    /// Frame timestamp corresponding to fraction 0 of the current cycle.
    origin_ms: Cell<Option<f64>>,
}

/// Plays a shared timeline, one sample per frame.
pub struct TimelinePlayer {
    shared: Rc<Shared>,
    host: Option<FrameHost>,
}

impl TimelinePlayer {
    pub fn new(timeline: Rc<RefCell<KeyframeTimeline>>, config: PlaybackConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                timeline,
                config: Cell::new(config),
                sink: RefCell::new(None),
                session: Cell::new(0),
                pending: Cell::new(None),
                playing: Cell::new(false),
                fraction: Cell::new(0.0),
                origin_ms: Cell::new(None),
            }),
            host: None,
        }
    }

    /// Sets the callback receiving `(fraction, properties)` every played frame.
    pub fn on_render(&mut self, f: impl FnMut(f32, &PropertySet) + 'static) {
        *self.shared.sink.borrow_mut() = Some(Box::new(f));
    }

    pub fn config(&self) -> PlaybackConfig {
        self.shared.config.get()
    }

    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.shared.config.set(config);
        // Re-anchor so the current fraction is kept under the new duration.
        self.shared.origin_ms.set(None);
    }

    /// Starts or resumes playback from the current fraction.
    pub fn play(&mut self, host: &FrameHost) {
        if self.is_playing() {
            return;
        }
        if !self.shared.config.get().repeat && self.shared.fraction.get() >= 1.0 {
            self.shared.fraction.set(0.0);
        }

        let session = self.shared.session.get() + 1;
        self.shared.session.set(session);
        self.shared.origin_ms.set(None);
        self.shared.playing.set(true);
        self.host = Some(host.clone());

        log::debug!("playback started at {:.3}", self.shared.fraction.get());
        schedule(host, &self.shared, session);
    }

    /// Pauses playback; the fraction is kept for the next [`TimelinePlayer::play`].
    pub fn pause(&mut self) {
        self.shared.session.set(self.shared.session.get() + 1);
        self.shared.playing.set(false);
        if let (Some(host), Some(id)) = (self.host.take(), self.shared.pending.take()) {
            host.cancel_frame(id);
        }
    }

    /// Jumps to `fraction` (clamped to `[0, 1]`).
    pub fn seek(&mut self, fraction: f32) {
        self.shared.fraction.set(fraction.clamp(0.0, 1.0));
        self.shared.origin_ms.set(None);
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.get()
    }

    pub fn fraction(&self) -> f32 {
        self.shared.fraction.get()
    }

    /// Properties at the current fraction with the configured easing.
    pub fn current(&self) -> PropertySet {
        let easing = self.shared.config.get().easing;
        self.shared
            .timeline
            .borrow()
            .sample_eased(self.shared.fraction.get(), easing)
    }
}

impl Drop for TimelinePlayer {
    fn drop(&mut self) {
        self.pause();
    }
}

fn schedule(host: &FrameHost, shared: &Rc<Shared>, session: u64) {
    let next_host = host.clone();
    let shared_cb = Rc::clone(shared);

    let id = host.request_frame(move |timestamp_ms| {
        let shared = shared_cb;
        if shared.session.get() != session {
            return;
        }
        shared.pending.set(None);

        let finished = advance(&shared, timestamp_ms);

        if finished {
            shared.playing.set(false);
            log::debug!("playback finished");
        } else if shared.session.get() == session {
            schedule(&next_host, &shared, session);
        }
    });

    shared.pending.set(Some(id));
}

/// Moves the fraction to `timestamp_ms`, renders, and reports whether a
/// non-repeating cycle has ended.
fn advance(shared: &Shared, timestamp_ms: f64) -> bool {
    let config = shared.config.get();
    let steps = shared.timeline.borrow().len();
    let duration_ms = config.seconds_per_step * 1000.0 * steps as f64;

    let (fraction, finished) = if duration_ms <= 0.0 {
        (1.0, !config.repeat)
    } else {
        let origin = match shared.origin_ms.get() {
            Some(origin) => origin,
            None => {
                let origin = timestamp_ms - shared.fraction.get() as f64 * duration_ms;
                shared.origin_ms.set(Some(origin));
                origin
            }
        };

        let raw = (timestamp_ms - origin) / duration_ms;
        if config.repeat {
            (raw.rem_euclid(1.0) as f32, false)
        } else if raw >= 1.0 {
            (1.0, true)
        } else {
            (raw.max(0.0) as f32, false)
        }
    };

    shared.fraction.set(fraction);
    let properties = shared.timeline.borrow().sample_eased(fraction, config.easing);

    if let Some(sink) = shared.sink.borrow_mut().as_mut() {
        sink(fraction, &properties);
    }
    finished
}
