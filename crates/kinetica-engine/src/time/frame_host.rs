use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Handle to a pending frame callback, used to cancel it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameRequestId(u64);

type FrameCallback = Box<dyn FnOnce(f64)>;

#[derive(Default)]
struct HostState {
    next_id: u64,
    queue: Vec<(FrameRequestId, FrameCallback)>,
    /// Ids of the batch currently being run that have not fired yet.
    in_flight: HashSet<FrameRequestId>,
    in_frame: bool,
    frames_run: u64,
}

/// Single-threaded "run this on the next frame" scheduler.
///
/// Semantics follow `requestAnimationFrame`:
/// - a callback fires at most once, on the first `run_frame` after it was requested
/// - callbacks requested while a frame is running wait for the next frame
/// - a callback cancelled before it fires never fires, even if it was
///   cancelled by an earlier callback of the same frame
///
/// `FrameHost` is a cheap handle; clones share one queue.
#[derive(Clone, Default)]
pub struct FrameHost {
    state: Rc<RefCell<HostState>>,
}

impl FrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `callback` for the next frame. It receives the frame timestamp in ms.
    pub fn request_frame<F>(&self, callback: F) -> FrameRequestId
    where
        F: FnOnce(f64) + 'static,
    {
        let mut s = self.state.borrow_mut();
        let id = FrameRequestId(s.next_id);
        s.next_id += 1;
        s.queue.push((id, Box::new(callback)));
        id
    }

    /// Cancels a pending callback. Returns `false` if it already fired or was cancelled.
    pub fn cancel_frame(&self, id: FrameRequestId) -> bool {
        let mut s = self.state.borrow_mut();
        if let Some(pos) = s.queue.iter().position(|(qid, _)| *qid == id) {
            s.queue.remove(pos);
            return true;
        }
        s.in_flight.remove(&id)
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Number of completed `run_frame` calls.
    pub fn frames_run(&self) -> u64 {
        self.state.borrow().frames_run
    }

    /// Runs every callback queued before this call, in request order.
    ///
    /// Returns how many callbacks fired. Calling this from inside a frame
    /// callback is ignored. If a callback panics, the rest of its batch is
    /// dropped and the host accepts the next frame.
    pub fn run_frame(&self, timestamp_ms: f64) -> usize {
        let batch = {
            let mut s = self.state.borrow_mut();
            if s.in_frame {
                log::warn!("run_frame called re-entrantly; ignored");
                return 0;
            }
            s.in_frame = true;
            let batch = std::mem::take(&mut s.queue);
            s.in_flight = batch.iter().map(|(id, _)| *id).collect();
            batch
        };

        // Ends the frame even if a callback unwinds.
        let _end = EndFrame(&self.state);

        let mut fired = 0;
        for (id, callback) in batch {
            // Borrow released before the callback runs so it can re-request.
            let live = self.state.borrow_mut().in_flight.remove(&id);
            if live {
                callback(timestamp_ms);
                fired += 1;
            }
        }

        self.state.borrow_mut().frames_run += 1;
        fired
    }
}

struct EndFrame<'a>(&'a RefCell<HostState>);

impl Drop for EndFrame<'_> {
    fn drop(&mut self) {
        if let Ok(mut s) = self.0.try_borrow_mut() {
            s.in_flight.clear();
            s.in_frame = false;
        }
    }
}

impl fmt::Debug for FrameHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("FrameHost")
            .field("pending", &s.queue.len())
            .field("frames_run", &s.frames_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn callbacks_fire_once_in_request_order() {
        let host = FrameHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            host.request_frame(move |ts| log.borrow_mut().push((tag, ts)));
        }

        assert_eq!(host.run_frame(16.0), 3);
        assert_eq!(host.run_frame(32.0), 0);
        assert_eq!(*log.borrow(), vec![("a", 16.0), ("b", 16.0), ("c", 16.0)]);
    }

    #[test]
    fn requests_made_during_a_frame_wait_for_the_next() {
        let host = FrameHost::new();
        let count = Rc::new(Cell::new(0));

        let h = host.clone();
        let c = Rc::clone(&count);
        host.request_frame(move |_| {
            c.set(c.get() + 1);
            let c2 = Rc::clone(&c);
            h.request_frame(move |_| c2.set(c2.get() + 10));
        });

        host.run_frame(0.0);
        assert_eq!(count.get(), 1);
        assert_eq!(host.pending(), 1);

        host.run_frame(16.0);
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn cancelled_request_never_fires() {
        let host = FrameHost::new();
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let id = host.request_frame(move |_| f.set(true));

        assert!(host.cancel_frame(id));
        assert!(!host.cancel_frame(id));
        host.run_frame(0.0);
        assert!(!fired.get());
    }

    #[test]
    fn cancel_from_earlier_callback_in_same_frame() {
        let host = FrameHost::new();
        let fired = Rc::new(Cell::new(false));

        let victim = Rc::new(Cell::new(None));
        let h = host.clone();
        let v = Rc::clone(&victim);
        host.request_frame(move |_| {
            if let Some(id) = v.get() {
                assert!(h.cancel_frame(id));
            }
        });

        let f = Rc::clone(&fired);
        victim.set(Some(host.request_frame(move |_| f.set(true))));

        assert_eq!(host.run_frame(0.0), 1);
        assert!(!fired.get());
    }

    #[test]
    fn frames_run_counts_every_call() {
        let host = FrameHost::new();
        host.run_frame(0.0);
        host.run_frame(1.0);
        assert_eq!(host.frames_run(), 2);
    }

    #[test]
    fn panicking_callback_does_not_wedge_the_host() {
        let host = FrameHost::new();
        host.request_frame(|_| panic!("callback failed"));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| host.run_frame(0.0)));
        assert!(result.is_err());

        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        host.request_frame(move |_| f.set(true));
        assert_eq!(host.run_frame(16.0), 1);
        assert!(fired.get());
    }
}
