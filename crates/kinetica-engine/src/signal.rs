//! Explicit change notification.
//!
//! Models and monitors own a `Listeners<E>` and call `emit` after every
//! state change; the presentation layer subscribes and redraws.
//! [`SharedListeners`] is the variant for lists reachable from inside their
//! own callbacks.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

/// An ordered list of change callbacks for events of type `E`.
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }

    pub fn subscribe(&mut self, f: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    /// Calls every listener in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.entries.len()).finish()
    }
}

/// Listener list behind a shared reference.
///
/// A callback may subscribe or unsubscribe (itself included) while an event
/// is being emitted. Listeners added during an emit first hear the next
/// event; listeners removed during an emit are skipped for the rest of it.
pub struct SharedListeners<E> {
    inner: RefCell<Listeners<E>>,
    /// Ids of the batch currently being emitted.
    emitting: RefCell<Vec<ListenerId>>,
    removed: RefCell<Vec<ListenerId>>,
    in_emit: Cell<bool>,
}

impl<E> SharedListeners<E> {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Listeners::new()),
            emitting: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
            in_emit: Cell::new(false),
        }
    }

    pub fn subscribe(&self, f: impl FnMut(&E) + 'static) -> ListenerId {
        self.inner.borrow_mut().subscribe(f)
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        if self.inner.borrow_mut().unsubscribe(id) {
            return true;
        }
        let mut removed = self.removed.borrow_mut();
        if self.emitting.borrow().contains(&id) && !removed.contains(&id) {
            removed.push(id);
            return true;
        }
        false
    }

    /// Calls every listener in subscription order.
    ///
    /// An emit from inside a callback is dropped.
    pub fn emit(&self, event: &E) {
        if self.in_emit.replace(true) {
            log::warn!("nested emit ignored");
            return;
        }

        let mut batch = std::mem::take(&mut self.inner.borrow_mut().entries);
        *self.emitting.borrow_mut() = batch.iter().map(|(id, _)| *id).collect();

        for (id, f) in &mut batch {
            if !self.removed.borrow().contains(id) {
                f(event);
            }
        }

        let removed = std::mem::take(&mut *self.removed.borrow_mut());
        self.emitting.borrow_mut().clear();
        batch.retain(|(id, _)| !removed.contains(id));

        let mut inner = self.inner.borrow_mut();
        batch.append(&mut inner.entries);
        inner.entries = batch;
        self.in_emit.set(false);
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len() + self.emitting.borrow().len() - self.removed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for SharedListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SharedListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedListeners").field("len", &self.len()).finish()
    }
}
