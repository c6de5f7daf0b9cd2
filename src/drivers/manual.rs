//! A driver controlled by the caller.

use crate::action::{Action, ActionDescriptor, Payload};
use crate::core::{merge, Stream, Subject};
use crate::run::{Driver, DriverError, RunOptions};
use std::cell::RefCell;
use std::rc::Rc;

/// Pushes arbitrary actions into the loop and records what reaches it.
///
/// Useful for tests and scripted sessions. Obtain a [`ManualHandle`] with
/// [`ManualDriver::controller`] before handing the driver to the loop.
#[derive(Default)]
pub struct ManualDriver {
    inbox: Subject<Action>,
    received: Rc<RefCell<Vec<Action>>>,
}

impl ManualDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for dispatching into and inspecting this driver.
    pub fn controller(&self) -> ManualHandle {
        ManualHandle {
            inbox: self.inbox.clone(),
            received: Rc::clone(&self.received),
        }
    }
}

impl Driver for ManualDriver {
    fn name(&self) -> &str {
        "manual"
    }

    fn handle(
        &mut self,
        inbound: Stream<Action>,
        _options: &RunOptions,
    ) -> Result<Stream<Action>, DriverError> {
        let received = Rc::clone(&self.received);
        let recorder = inbound.filter_map(move |action: Action| {
            received.borrow_mut().push(action);
            None
        });
        Ok(merge(vec![recorder, self.inbox.stream()]))
    }
}

/// Caller side of a [`ManualDriver`].
#[derive(Clone)]
pub struct ManualHandle {
    inbox: Subject<Action>,
    received: Rc<RefCell<Vec<Action>>>,
}

impl ManualHandle {
    /// Push an action into the loop.
    ///
    /// Dropped if the loop is not running.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(kind = action.kind(), "Manual dispatch");
        self.inbox.next(action);
    }

    /// Every action received so far.
    pub fn received(&self) -> Vec<Action> {
        self.received.borrow().clone()
    }

    /// Payloads of the received actions of one kind.
    pub fn received_of<P: Payload>(&self, descriptor: &ActionDescriptor<P>) -> Vec<P> {
        self.received
            .borrow()
            .iter()
            .filter_map(|action| descriptor.extract(action))
            .collect()
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.received.borrow_mut().clear();
    }
}
