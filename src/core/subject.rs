//! Hot multicast endpoints.

use super::error::StreamError;
use super::stream::{Notification, Stream, Subscriber};
use super::subscription::Subscription;
use std::cell::RefCell;
use std::rc::Rc;

struct SubjectState<T> {
    observers: Vec<(u64, Subscriber<T>)>,
    next_id: u64,
    terminal: Option<Notification<T>>,
}

/// Hot endpoint that forwards everything pushed into it to its current
/// subscribers.
///
/// Values pushed while nobody listens are dropped. Once terminated, late
/// subscribers receive the terminal notification immediately.
pub struct Subject<T> {
    state: Rc<RefCell<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Create a subject with no subscribers.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SubjectState {
                observers: Vec::new(),
                next_id: 0,
                terminal: None,
            })),
        }
    }

    /// Push a value to every current subscriber.
    pub fn next(&self, value: T) {
        let observers = {
            let state = self.state.borrow();
            if state.terminal.is_some() {
                return;
            }
            Self::snapshot(&state)
        };
        for observer in observers {
            observer.next(value.clone());
        }
    }

    /// Terminate every subscriber with an error.
    pub fn error(&self, error: StreamError) {
        self.terminate(Notification::Error(error));
    }

    /// Complete every subscriber.
    pub fn complete(&self) {
        self.terminate(Notification::Complete);
    }

    /// Whether a terminal notification has been pushed.
    pub fn is_stopped(&self) -> bool {
        self.state.borrow().terminal.is_some()
    }

    /// Number of live subscribers.
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Stream view of this subject.
    pub fn stream(&self) -> Stream<T> {
        let state = Rc::clone(&self.state);
        Stream::new(move |subscriber| {
            let id = {
                let mut current = state.borrow_mut();
                let terminal = current.terminal.clone();
                if let Some(terminal) = terminal {
                    drop(current);
                    subscriber.notify(terminal);
                    return Subscription::empty();
                }
                let id = current.next_id;
                current.next_id += 1;
                current.observers.push((id, subscriber));
                id
            };
            let state = Rc::clone(&state);
            Subscription::from_fn(move || {
                state.borrow_mut().observers.retain(|(other, _)| *other != id);
            })
        })
    }

    fn terminate(&self, notification: Notification<T>) {
        let observers = {
            let mut state = self.state.borrow_mut();
            if state.terminal.is_some() {
                return;
            }
            state.terminal = Some(notification.clone());
            std::mem::take(&mut state.observers)
        };
        for (_, observer) in observers {
            observer.notify(notification.clone());
        }
    }

    fn snapshot(state: &SubjectState<T>) -> Vec<Subscriber<T>> {
        state
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }
}
