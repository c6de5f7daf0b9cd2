//! Synchronous push-based streams.
//!
//! This module contains the reactive core everything else is built on:
//! - Cold, cloneable [`Stream`]s and the [`Subscriber`] sink producers push into
//! - Composite [`Subscription`]s that tear down recursively
//! - Hot [`Subject`]s for sources that exist independently of subscribers
//! - Operators, including ref-counted [`Stream::share`] and [`Stream::share_replay`]
//!
//! Everything here is single-threaded. A value pushed into a stream travels
//! through every operator and subscriber before the push returns.

mod error;
mod operators;
mod share;
mod stream;
mod subject;
mod subscription;

pub use error::StreamError;
pub use operators::{combine_latest, merge};
pub use stream::{Notification, Stream, Subscriber};
pub use subject::Subject;
pub use subscription::Subscription;
