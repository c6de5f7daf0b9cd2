//! Ref-counted multicasting.

use super::stream::{Notification, Stream, Subscriber};
use super::subscription::Subscription;
use std::cell::RefCell;
use std::rc::Rc;

struct Shared<T> {
    observers: Vec<(u64, Subscriber<T>)>,
    next_id: u64,
    latest: Option<T>,
    connection: Option<Subscription>,
}

impl<T> Shared<T> {
    fn reset(&mut self) -> Vec<Subscriber<T>> {
        self.latest = None;
        self.connection = None;
        std::mem::take(&mut self.observers)
            .into_iter()
            .map(|(_, observer)| observer)
            .collect()
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Share one upstream subscription among all subscribers.
    ///
    /// Upstream is subscribed when the first subscriber arrives and released
    /// when the last one leaves.
    pub fn share(&self) -> Stream<T> {
        shared(self.clone(), false)
    }

    /// Like [`Stream::share`], and a new subscriber immediately receives the
    /// most recent value.
    ///
    /// The cached value lives only while upstream is connected: once the
    /// subscriber count drops to zero the cache is cleared and the next
    /// subscriber rebuilds everything from scratch.
    pub fn share_replay(&self) -> Stream<T> {
        shared(self.clone(), true)
    }
}

fn shared<T: Clone + 'static>(source: Stream<T>, replay: bool) -> Stream<T> {
    let state = Rc::new(RefCell::new(Shared {
        observers: Vec::new(),
        next_id: 0,
        latest: None,
        connection: None,
    }));

    Stream::new(move |subscriber: Subscriber<T>| {
        let (id, replayed, connect) = {
            let mut shared = state.borrow_mut();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.observers.push((id, subscriber.clone()));
            let replayed = if replay { shared.latest.clone() } else { None };
            (id, replayed, shared.connection.is_none())
        };

        if let Some(value) = replayed {
            subscriber.next(value);
        }

        if connect {
            let connection = Subscription::new();
            state.borrow_mut().connection = Some(connection.clone());
            let upstream_state = Rc::clone(&state);
            connection.add(source.subscribe_with(move |notification| {
                let observers = {
                    let mut shared = upstream_state.borrow_mut();
                    match &notification {
                        Notification::Next(value) => {
                            if replay {
                                shared.latest = Some(value.clone());
                            }
                            shared
                                .observers
                                .iter()
                                .map(|(_, observer)| observer.clone())
                                .collect::<Vec<_>>()
                        }
                        _ => shared.reset(),
                    }
                };
                for observer in observers {
                    observer.notify(notification.clone());
                }
            }));
        }

        let state = Rc::clone(&state);
        Subscription::from_fn(move || {
            let released = {
                let mut shared = state.borrow_mut();
                shared.observers.retain(|(other, _)| *other != id);
                if shared.observers.is_empty() {
                    shared.latest = None;
                    shared.connection.take()
                } else {
                    None
                }
            };
            if let Some(connection) = released {
                connection.unsubscribe();
            }
        })
    })
}
