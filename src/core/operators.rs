//! Stream operators.
//!
//! Every operator is synchronous: a value entering an operator leaves it
//! (or is dropped) before the upstream call returns. No operator holds an
//! internal borrow while it calls downstream, so emissions may nest.

use super::error::StreamError;
use super::stream::{Notification, Stream, Subscriber};
use super::subscription::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

impl<T: 'static> Stream<T> {
    /// Transform every value.
    pub fn map<U, F>(&self, f: F) -> Stream<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let f = Rc::new(f);
        self.filter_map(move |value| Some(f(value)))
    }

    /// Transform every value, dropping those mapped to `None`.
    pub fn filter_map<U, F>(&self, f: F) -> Stream<U>
    where
        U: 'static,
        F: Fn(T) -> Option<U> + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |subscriber: Subscriber<U>| {
            let f = Rc::clone(&f);
            source.subscribe_with(move |notification| match notification {
                Notification::Next(value) => {
                    if let Some(mapped) = f(value) {
                        subscriber.next(mapped);
                    }
                }
                Notification::Error(error) => subscriber.error(error),
                Notification::Complete => subscriber.complete(),
            })
        })
    }

    /// Keep only values matching `predicate`.
    pub fn filter<F>(&self, predicate: F) -> Stream<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter_map(move |value| predicate(&value).then_some(value))
    }

    /// Observe every value without altering the stream.
    pub fn inspect<F>(&self, f: F) -> Stream<T>
    where
        F: Fn(&T) + 'static,
    {
        self.filter_map(move |value| {
            f(&value);
            Some(value)
        })
    }

    /// Seeded fold that may fail.
    ///
    /// Every subscription starts again from `seed`. The accumulated value is
    /// emitted after each step; a failing step terminates the stream.
    pub fn try_scan<A, F>(&self, seed: A, f: F) -> Stream<A>
    where
        A: Clone + 'static,
        F: Fn(&A, T) -> Result<A, StreamError> + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |subscriber: Subscriber<A>| {
            let f = Rc::clone(&f);
            let acc = Rc::new(RefCell::new(seed.clone()));
            source.subscribe_with(move |notification| match notification {
                Notification::Next(value) => {
                    let stepped = {
                        let current = acc.borrow();
                        f(&current, value)
                    };
                    match stepped {
                        Ok(next) => {
                            *acc.borrow_mut() = next.clone();
                            subscriber.next(next);
                        }
                        Err(error) => subscriber.error(error),
                    }
                }
                Notification::Error(error) => subscriber.error(error),
                Notification::Complete => subscriber.complete(),
            })
        })
    }

    /// Seeded fold.
    pub fn scan<A, F>(&self, seed: A, f: F) -> Stream<A>
    where
        A: Clone + 'static,
        F: Fn(&A, T) -> A + 'static,
    {
        self.try_scan(seed, move |acc, value| Ok(f(acc, value)))
    }

    /// Pair every value with the latest value of `other`.
    ///
    /// `other` is sampled only when this stream emits; values arriving
    /// before `other` has emitted anything are dropped. `other` is
    /// subscribed first, so anything it derives from the same source is
    /// already up to date when the sample is taken.
    pub fn with_latest_from<U>(&self, other: &Stream<U>) -> Stream<(T, U)>
    where
        U: Clone + 'static,
    {
        let source = self.clone();
        let other = other.clone();
        Stream::new(move |subscriber: Subscriber<(T, U)>| {
            let latest: Rc<RefCell<Option<U>>> = Rc::new(RefCell::new(None));
            let subscription = Subscription::new();

            let cache = Rc::clone(&latest);
            let sampled = subscriber.clone();
            subscription.add(other.subscribe_with(move |notification| match notification {
                Notification::Next(value) => *cache.borrow_mut() = Some(value),
                Notification::Error(error) => sampled.error(error),
                Notification::Complete => {}
            }));

            subscription.add(source.subscribe_with(move |notification| match notification {
                Notification::Next(value) => {
                    let current = latest.borrow().clone();
                    if let Some(current) = current {
                        subscriber.next((value, current));
                    }
                }
                Notification::Error(error) => subscriber.error(error),
                Notification::Complete => subscriber.complete(),
            }));
            subscription
        })
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Emit `value` on subscription, before anything from upstream.
    pub fn start_with(&self, value: T) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |subscriber: Subscriber<T>| {
            subscriber.next(value.clone());
            if subscriber.is_closed() {
                return Subscription::empty();
            }
            source.subscribe_with(move |notification| subscriber.notify(notification))
        })
    }
}

/// Interleave several streams.
///
/// Values are forwarded as soon as any source produces them. Completes once
/// every source has completed; the first error terminates the result.
pub fn merge<T: 'static>(sources: Vec<Stream<T>>) -> Stream<T> {
    Stream::new(move |subscriber: Subscriber<T>| {
        let remaining = Rc::new(Cell::new(sources.len()));
        if sources.is_empty() {
            subscriber.complete();
            return Subscription::empty();
        }
        let subscription = Subscription::new();
        for source in &sources {
            let remaining = Rc::clone(&remaining);
            let sink = subscriber.clone();
            subscription.add(source.subscribe_with(move |notification| match notification {
                Notification::Next(value) => sink.next(value),
                Notification::Error(error) => sink.error(error),
                Notification::Complete => {
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        sink.complete();
                    }
                }
            }));
            if subscriber.is_closed() {
                break;
            }
        }
        subscription
    })
}

/// Positional combine-latest.
///
/// Emits the latest value of every source each time any source emits, but
/// only once every source has emitted at least once. A source completing
/// without ever emitting completes the result.
///
/// # Example
///
/// ```rust
/// use rivulet::core::{combine_latest, Subject};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let left = Subject::new();
/// let right = Subject::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
///
/// combine_latest(vec![left.stream(), right.stream()])
///     .subscribe(move |values| sink.borrow_mut().push(values));
///
/// left.next(1);
/// assert!(seen.borrow().is_empty());
///
/// right.next(2);
/// left.next(3);
/// assert_eq!(*seen.borrow(), vec![vec![1, 2], vec![3, 2]]);
/// ```
pub fn combine_latest<T: Clone + 'static>(sources: Vec<Stream<T>>) -> Stream<Vec<T>> {
    Stream::new(move |subscriber: Subscriber<Vec<T>>| {
        let count = sources.len();
        if count == 0 {
            subscriber.complete();
            return Subscription::empty();
        }
        let latest: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; count]));
        let remaining = Rc::new(Cell::new(count));
        let subscription = Subscription::new();

        for (index, source) in sources.iter().enumerate() {
            let latest = Rc::clone(&latest);
            let remaining = Rc::clone(&remaining);
            let sink = subscriber.clone();
            subscription.add(source.subscribe_with(move |notification| match notification {
                Notification::Next(value) => {
                    let combined = {
                        let mut values = latest.borrow_mut();
                        values[index] = Some(value);
                        values.iter().cloned().collect::<Option<Vec<T>>>()
                    };
                    if let Some(values) = combined {
                        sink.next(values);
                    }
                }
                Notification::Error(error) => sink.error(error),
                Notification::Complete => {
                    remaining.set(remaining.get() - 1);
                    let never_emitted = latest.borrow()[index].is_none();
                    if never_emitted || remaining.get() == 0 {
                        sink.complete();
                    }
                }
            }));
            if subscriber.is_closed() {
                break;
            }
        }
        subscription
    })
}
