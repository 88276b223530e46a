//! Cancellable listener registrations.
//!
//! DESIGN
//! ======
//! Subscribing hands back a [`Subscription`] disposer instead of expecting the
//! caller to remember a matching "remove listener" call. Dropping the disposer
//! releases the listener, so a scope that owns it cannot leak the registration
//! on any exit path.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Releases a listener registration exactly once, on `unsubscribe` or drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Single-threaded fan-out of events to registered listeners.
///
/// Clones share one registry. Listeners may subscribe or unsubscribe from
/// inside a callback; a listener released mid-emit is not called afterwards.
pub struct Subscribers<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self { inner: Rc::new(RefCell::new(Registry { next_id: 0, listeners: Vec::new() })) }
    }
}

impl<T: 'static> Subscribers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Deliver `event` to every listener registered at call time, in
    /// registration order.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<(u64, Listener<T>)> = self.inner.borrow().listeners.clone();
        for (id, listener) in snapshot {
            if self.contains(id) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: u64) -> bool {
        self.inner.borrow().listeners.iter().any(|(existing, _)| *existing == id)
    }
}
