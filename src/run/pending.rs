//! Deferred connection points.

use super::error::RunError;
use crate::core::{Notification, Stream, Subject, Subscription};
use std::cell::RefCell;

/// A stream handed out before its source exists.
///
/// The run loop gives drivers a stream of actions that the application has
/// not produced yet. Once the application's output is built it is attached
/// with [`PendingConnection::connect`], closing the cycle. A connection
/// point is connected at most once.
///
/// # Example
///
/// ```rust
/// use rivulet::core::Stream;
/// use rivulet::run::PendingConnection;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let pending = PendingConnection::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// pending.stream().subscribe(move |n| sink.borrow_mut().push(n));
///
/// pending.connect(&Stream::of(vec![1, 2])).unwrap();
///
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// assert!(pending.connect(&Stream::of(vec![3])).is_err());
/// ```
pub struct PendingConnection<T> {
    endpoint: Subject<T>,
    connection: RefCell<Option<Subscription>>,
}

impl<T: Clone + 'static> PendingConnection<T> {
    /// Create an unconnected point.
    pub fn new() -> Self {
        Self {
            endpoint: Subject::new(),
            connection: RefCell::new(None),
        }
    }

    /// The stream that will carry the source's values once connected.
    pub fn stream(&self) -> Stream<T> {
        self.endpoint.stream()
    }

    /// Attach the source.
    ///
    /// Values, errors and completion of `source` are forwarded to every
    /// subscriber of [`PendingConnection::stream`].
    pub fn connect(&self, source: &Stream<T>) -> Result<Subscription, RunError> {
        if self.connection.borrow().is_some() {
            return Err(RunError::AlreadyConnected);
        }
        let subscription = Subscription::new();
        *self.connection.borrow_mut() = Some(subscription.clone());

        let endpoint = self.endpoint.clone();
        subscription.add(source.subscribe_with(move |notification| match notification {
            Notification::Next(value) => endpoint.next(value),
            Notification::Error(error) => {
                tracing::error!(error = %error, "Connected source failed");
                endpoint.error(error);
            }
            Notification::Complete => endpoint.complete(),
        }));
        Ok(subscription)
    }

    /// Whether a source has been attached.
    pub fn is_connected(&self) -> bool {
        self.connection.borrow().is_some()
    }

    /// Whether the attached source has terminated.
    pub fn is_terminated(&self) -> bool {
        self.endpoint.is_stopped()
    }
}

impl<T: Clone + 'static> Default for PendingConnection<T> {
    fn default() -> Self {
        Self::new()
    }
}
