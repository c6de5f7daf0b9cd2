//! Push-based streams, subscribers and notifications.

use super::error::StreamError;
use super::subscription::Subscription;
use std::rc::Rc;

/// A single event delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<T> {
    /// A value.
    Next(T),

    /// Terminal failure.
    Error(StreamError),

    /// Terminal success.
    Complete,
}

impl<T> Notification<T> {
    /// Whether this notification ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

/// Sink handed to a stream producer.
///
/// A subscriber stops delivering once it has seen a terminal notification
/// or once its subscription has been closed, so producers never need to
/// track that themselves.
pub struct Subscriber<T> {
    sink: Rc<dyn Fn(Notification<T>)>,
    subscription: Subscription,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Rc::clone(&self.sink),
            subscription: self.subscription.clone(),
        }
    }
}

impl<T> Subscriber<T> {
    /// Deliver a value.
    pub fn next(&self, value: T) {
        if !self.subscription.is_closed() {
            (self.sink)(Notification::Next(value));
        }
    }

    /// Deliver a terminal error and close the subscription.
    pub fn error(&self, error: StreamError) {
        self.terminate(Notification::Error(error));
    }

    /// Deliver completion and close the subscription.
    pub fn complete(&self) {
        self.terminate(Notification::Complete);
    }

    /// Deliver any notification.
    pub fn notify(&self, notification: Notification<T>) {
        match notification {
            Notification::Next(value) => self.next(value),
            terminal => self.terminate(terminal),
        }
    }

    /// Whether this subscriber still accepts notifications.
    pub fn is_closed(&self) -> bool {
        self.subscription.is_closed()
    }

    fn terminate(&self, notification: Notification<T>) {
        if self.subscription.is_closed() {
            return;
        }
        let sink = Rc::clone(&self.sink);
        // Upstream is released before the terminal notification runs.
        self.subscription.unsubscribe();
        sink(notification);
    }
}

type OnSubscribe<T> = dyn Fn(Subscriber<T>) -> Subscription;

/// A cold, cloneable description of a push-based stream.
///
/// Nothing happens until [`Stream::subscribe`] is called; every
/// subscription runs the producer again. Hot sources are built with
/// [`crate::core::Subject`] and shared pipelines with [`Stream::share`] and
/// [`Stream::share_replay`].
///
/// # Example
///
/// ```rust
/// use rivulet::core::Stream;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
///
/// Stream::of(vec![1, 2, 3])
///     .map(|n| n * 10)
///     .filter(|n| *n > 10)
///     .subscribe(move |n| sink.borrow_mut().push(n));
///
/// assert_eq!(*seen.borrow(), vec![20, 30]);
/// ```
pub struct Stream<T> {
    on_subscribe: Rc<OnSubscribe<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            on_subscribe: Rc::clone(&self.on_subscribe),
        }
    }
}

impl<T: 'static> Stream<T> {
    /// Create a stream from a producer.
    ///
    /// The producer runs once per subscription and returns the subscription
    /// that tears down whatever it set up.
    pub fn new<F>(on_subscribe: F) -> Self
    where
        F: Fn(Subscriber<T>) -> Subscription + 'static,
    {
        Self {
            on_subscribe: Rc::new(on_subscribe),
        }
    }

    /// A stream that completes immediately.
    pub fn empty() -> Self {
        Self::new(|subscriber| {
            subscriber.complete();
            Subscription::empty()
        })
    }

    /// A stream that never emits.
    pub fn never() -> Self {
        Self::new(|_| Subscription::new())
    }

    /// Subscribe with a handler for every notification.
    pub fn subscribe_with<F>(&self, sink: F) -> Subscription
    where
        F: Fn(Notification<T>) + 'static,
    {
        let subscription = Subscription::new();
        let subscriber = Subscriber {
            sink: Rc::new(sink),
            subscription: subscription.clone(),
        };
        let teardown = (self.on_subscribe)(subscriber);
        subscription.add(teardown);
        subscription
    }

    /// Subscribe to values only.
    ///
    /// Errors reaching this subscriber are logged, completion is ignored.
    pub fn subscribe<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(T) + 'static,
    {
        self.subscribe_with(move |notification| match notification {
            Notification::Next(value) => on_next(value),
            Notification::Error(error) => {
                tracing::error!(error = %error, "Stream terminated with an unhandled error")
            }
            Notification::Complete => {}
        })
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// A stream that emits every value in order, then completes.
    pub fn of(values: Vec<T>) -> Self {
        Self::new(move |subscriber| {
            for value in &values {
                if subscriber.is_closed() {
                    break;
                }
                subscriber.next(value.clone());
            }
            subscriber.complete();
            Subscription::empty()
        })
    }
}
