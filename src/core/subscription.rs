//! Composite, idempotent subscription handles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

enum Teardown {
    Callback(Box<dyn FnOnce()>),
    Child(Subscription),
}

#[derive(Default)]
struct Inner {
    closed: Cell<bool>,
    teardowns: RefCell<Vec<Teardown>>,
}

/// Handle to a live subscription.
///
/// Subscriptions form a tree: every child added with [`Subscription::add`]
/// is torn down when its parent is. Unsubscribing is idempotent, and adding
/// to an already closed subscription tears the child down immediately.
///
/// # Example
///
/// ```rust
/// use rivulet::core::Subscription;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let torn_down = Rc::new(Cell::new(false));
/// let parent = Subscription::new();
/// let flag = Rc::clone(&torn_down);
/// parent.add(Subscription::from_fn(move || flag.set(true)));
///
/// parent.unsubscribe();
/// assert!(torn_down.get());
/// assert!(parent.is_closed());
/// ```
#[derive(Clone, Default)]
pub struct Subscription {
    inner: Rc<Inner>,
}

impl Subscription {
    /// Create an open subscription with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an already closed subscription.
    pub fn empty() -> Self {
        let subscription = Self::new();
        subscription.inner.closed.set(true);
        subscription
    }

    /// Create an open subscription that runs `teardown` when closed.
    pub fn from_fn<F>(teardown: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let subscription = Self::new();
        subscription.add_teardown(teardown);
        subscription
    }

    /// Attach a child subscription.
    pub fn add(&self, child: Subscription) {
        if Rc::ptr_eq(&self.inner, &child.inner) {
            return;
        }
        if self.is_closed() {
            child.unsubscribe();
        } else {
            self.inner.teardowns.borrow_mut().push(Teardown::Child(child));
        }
    }

    /// Attach a teardown callback.
    pub fn add_teardown<F>(&self, teardown: F)
    where
        F: FnOnce() + 'static,
    {
        if self.is_closed() {
            teardown();
        } else {
            self.inner
                .teardowns
                .borrow_mut()
                .push(Teardown::Callback(Box::new(teardown)));
        }
    }

    /// Close this subscription and everything attached to it.
    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        // Taken out first: teardowns may re-enter this subscription.
        let teardowns = std::mem::take(&mut *self.inner.teardowns.borrow_mut());
        for teardown in teardowns {
            match teardown {
                Teardown::Callback(callback) => callback(),
                Teardown::Child(child) => child.unsubscribe(),
            }
        }
    }

    /// Whether this subscription has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .field("attached", &self.inner.teardowns.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribe_runs_teardowns_once() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let subscription = Subscription::from_fn(move || counter.set(counter.get() + 1));

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn children_are_torn_down_recursively() {
        let count = Rc::new(Cell::new(0));
        let root = Subscription::new();
        let middle = Subscription::new();
        for _ in 0..3 {
            let counter = Rc::clone(&count);
            middle.add_teardown(move || counter.set(counter.get() + 1));
        }
        root.add(middle.clone());

        root.unsubscribe();

        assert!(middle.is_closed());
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn adding_to_closed_subscription_tears_down_child() {
        let closed = Subscription::empty();
        let child = Subscription::new();

        closed.add(child.clone());

        assert!(child.is_closed());
    }

    #[test]
    fn adding_self_is_ignored() {
        let subscription = Subscription::new();
        subscription.add(subscription.clone());
        subscription.unsubscribe();
        assert!(subscription.is_closed());
    }
}
