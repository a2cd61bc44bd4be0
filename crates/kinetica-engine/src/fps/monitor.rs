use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::signal::{ListenerId, SharedListeners};
use crate::time::{FrameHost, FrameRequestId};

use super::history::FpsHistory;
use super::sampler::{FpsSampler, SamplerConfig, SamplerSnapshot};

struct Shared {
    sampler: RefCell<FpsSampler>,
    listeners: SharedListeners<SamplerSnapshot>,
    /// Bumped on every start/stop; a callback from an older session is inert.
    session: Cell<u64>,
    pending: Cell<Option<FrameRequestId>>,
}

/// Binds an [`FpsSampler`] to a [`FrameHost`].
///
/// While running, the monitor keeps exactly one callback queued on the host
/// and re-queues it from inside each frame. After [`FpsMonitor::stop`]
/// returns no further frame is accounted, and the last statistics stay
/// readable.
pub struct FpsMonitor {
    shared: Rc<Shared>,
    host: Option<FrameHost>,
}

impl FpsMonitor {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                sampler: RefCell::new(FpsSampler::new(config)),
                listeners: SharedListeners::new(),
                session: Cell::new(0),
                pending: Cell::new(None),
            }),
            host: None,
        }
    }

    /// Starts a monitoring session on `host`.
    ///
    /// Min and max start over; the history and its average carry across
    /// sessions.
    ///
    /// Calling this while already running is ignored.
    pub fn start(&mut self, host: &FrameHost) {
        if self.is_running() {
            log::warn!("fps monitor already running; start ignored");
            return;
        }

        let session = self.shared.session.get() + 1;
        self.shared.session.set(session);
        self.shared.sampler.borrow_mut().restart();
        self.host = Some(host.clone());

        log::debug!("fps monitor started (session {session})");
        schedule(host, &self.shared, session);
    }

    /// Stops sampling. Statistics and history are kept.
    pub fn stop(&mut self) {
        let Some(host) = self.host.take() else {
            return;
        };

        self.shared.session.set(self.shared.session.get() + 1);
        if let Some(id) = self.shared.pending.take() {
            host.cancel_frame(id);
        }
        log::debug!("fps monitor stopped");
    }

    pub fn is_running(&self) -> bool {
        self.host.is_some()
    }

    /// Registers a callback invoked after every new sample.
    ///
    /// Callbacks may subscribe or unsubscribe from inside a notification.
    pub fn subscribe(&self, f: impl FnMut(&SamplerSnapshot) + 'static) -> ListenerId {
        self.shared.listeners.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.listeners.unsubscribe(id)
    }

    pub fn snapshot(&self) -> SamplerSnapshot {
        self.shared.sampler.borrow().snapshot()
    }

    pub fn current_fps(&self) -> u32 {
        self.shared.sampler.borrow().current_fps()
    }

    pub fn average_fps(&self) -> u32 {
        self.shared.sampler.borrow().average_fps()
    }

    pub fn min_fps(&self) -> Option<u32> {
        self.shared.sampler.borrow().min_fps()
    }

    pub fn max_fps(&self) -> Option<u32> {
        self.shared.sampler.borrow().max_fps()
    }

    /// Borrow of the raw history, for charting.
    pub fn history(&self) -> Ref<'_, FpsHistory> {
        Ref::map(self.shared.sampler.borrow(), |s| s.history())
    }
}

impl Default for FpsMonitor {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl Drop for FpsMonitor {
    fn drop(&mut self) {
        self.stop();
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

        let produced = shared.sampler.borrow_mut().on_frame(timestamp_ms).is_some();
        if produced {
            let snapshot = shared.sampler.borrow().snapshot();
            shared.listeners.emit(&snapshot);
        }

        if shared.session.get() == session {
            schedule(&next_host, &shared, session);
        }
    });

    shared.pending.set(Some(id));
}
