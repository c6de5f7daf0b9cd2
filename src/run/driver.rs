//! The contract between the run loop and its effectful boundaries.

use super::error::{DriverError, RunError};
use super::run_loop::RunOptions;
use crate::action::Action;
use crate::core::Stream;

/// An effectful boundary of the loop, such as a render target or a router.
///
/// A driver receives every action the loop produces and returns the actions
/// it emits in turn. It may emit any number of actions per inbound action,
/// and may emit on its own (a user click, a history change).
///
/// `handle` is called once, while the loop is being wired. It must only
/// describe work: subscriptions happen when the returned stream is
/// subscribed, so everything a driver sets up is torn down with the loop.
pub trait Driver {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Build the driver's outbound actions from the loop's inbound actions.
    fn handle(
        &mut self,
        inbound: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, DriverError>;

    /// Called once the loop is closed and running.
    ///
    /// Drivers announcing an initial condition, such as the current
    /// location, do so here so the announcement reaches the application.
    fn start(&mut self) {}
}

/// The pure core of the loop.
///
/// Receives every action entering the loop and returns the actions to hand
/// to the drivers. Closures with the matching signature are applications.
pub trait Application {
    fn handle(
        &mut self,
        actions: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, RunError>;

    /// Called once the loop has been stopped and its subscriptions released.
    fn stopped(&mut self) {}
}

impl<F> Application for F
where
    F: FnMut(Stream<Action>, &RunOptions) -> Result<Stream<Action>, RunError>,
{
    fn handle(
        &mut self,
        actions: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, RunError> {
        self(actions, options)
    }
}
