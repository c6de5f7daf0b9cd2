//! Closing the cycle between drivers and the application.

use super::driver::{Application, Driver};
use super::error::RunError;
use super::pending::PendingConnection;
use crate::action::{Action, ActionRegistry};
use crate::config::RunConfig;
use crate::core::{merge, Notification, Stream, Subscriber, Subscription};
use std::rc::Rc;

/// Target of the action logging tap.
pub const ACTION_LOG_TARGET: &str = "rivulet::actions";

/// Options shared with every driver and the application.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub registry: ActionRegistry,
    pub config: RunConfig,
}

impl RunOptions {
    pub fn new(registry: ActionRegistry, config: RunConfig) -> Self {
        Self { registry, config }
    }
}

type Tap = Rc<dyn Fn(&Action)>;

/// Wires drivers and an application into one closed loop.
///
/// Wiring happens in two phases. First every driver is handed a stream of
/// actions that does not have a source yet, and returns its own outbound
/// actions. Drivers chain: the outbound actions of earlier drivers are part
/// of the inbound stream of later ones. Then the application is built over
/// the combined stream, and its output is connected back as the source of
/// the first phase's stream.
///
/// # Example
///
/// ```rust
/// use rivulet::action::{Action, ActionRegistry};
/// use rivulet::core::Stream;
/// use rivulet::drivers::manual::ManualDriver;
/// use rivulet::run::{RunError, RunLoop, RunOptions};
///
/// let registry = ActionRegistry::new();
/// let ping = registry.describe::<u32>("demo", "ping").unwrap();
/// let pong = registry.describe::<u32>("demo", "pong").unwrap();
///
/// let manual = ManualDriver::new();
/// let remote = manual.controller();
///
/// let request = ping.clone();
/// let reply = pong.clone();
/// let running = RunLoop::new(RunOptions::new(registry, Default::default()))
///     .driver(manual)
///     .run(move |actions: Stream<Action>, _: &RunOptions| -> Result<Stream<Action>, RunError> {
///         let reply = reply.clone();
///         Ok(request.matches(&actions).map(move |n| reply.create(n + 1)))
///     })
///     .unwrap();
///
/// remote.dispatch(ping.create(1));
/// assert_eq!(remote.received_of(&pong), vec![2]);
/// assert!(running.is_running());
/// ```
pub struct RunLoop {
    options: RunOptions,
    drivers: Vec<Box<dyn Driver>>,
    taps: Vec<Tap>,
}

impl RunLoop {
    /// Create a loop with no drivers.
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            drivers: Vec::new(),
            taps: Vec::new(),
        }
    }

    /// Add a driver. Drivers are wired in the order they are added.
    pub fn driver<D: Driver + 'static>(mut self, driver: D) -> Self {
        self.drivers.push(Box::new(driver));
        self
    }

    /// Observe every action entering the application.
    ///
    /// Taps see actions before the application does and cannot alter them.
    pub fn tap<F>(mut self, tap: F) -> Self
    where
        F: Fn(&Action) + 'static,
    {
        self.taps.push(Rc::new(tap));
        self
    }

    /// Wire everything and start the loop.
    ///
    /// Fails if a driver or the application cannot be built; nothing keeps
    /// running in that case.
    pub fn run<A: Application>(mut self, mut app: A) -> Result<Running<A>, RunError> {
        let pending = PendingConnection::new();
        let mut inbound = pending.stream();

        for driver in self.drivers.iter_mut() {
            let name = driver.name().to_string();
            tracing::debug!(driver = %name, "Wiring driver");
            let outbound = driver
                .handle(inbound.clone(), &self.options)
                .map_err(|source| RunError::Driver {
                    driver: name.clone(),
                    source,
                })?;
            inbound = merge(vec![inbound, contain(name, outbound)]).share();
        }

        if self.options.config.log_actions {
            inbound = inbound.inspect(log_action);
        }
        for tap in &self.taps {
            let tap = Rc::clone(tap);
            inbound = inbound.inspect(move |action| tap(action));
        }
        let actions = inbound.share();

        let outbound = app.handle(actions.clone(), &self.options)?;

        let keepalive = actions.subscribe_with(|_| {});
        let connection = match pending.connect(&outbound) {
            Ok(connection) => connection,
            Err(error) => {
                keepalive.unsubscribe();
                return Err(error);
            }
        };

        for driver in self.drivers.iter_mut() {
            driver.start();
        }
        tracing::info!(drivers = self.drivers.len(), "Run loop started");

        Ok(Running {
            app,
            drivers: self.drivers,
            pending,
            keepalive,
            connection,
        })
    }
}

/// Keep a driver's failure out of the shared action stream.
///
/// An error from the driver is logged and ends that driver's outbound
/// actions only; every other source keeps flowing.
fn contain(driver: String, outbound: Stream<Action>) -> Stream<Action> {
    Stream::new(move |subscriber: Subscriber<Action>| {
        let driver = driver.clone();
        outbound.subscribe_with(move |notification| match notification {
            Notification::Error(error) => {
                tracing::error!(driver = %driver, error = %error, "Driver failed, detaching its actions");
                subscriber.complete();
            }
            other => subscriber.notify(other),
        })
    })
}

fn log_action(action: &Action) {
    tracing::debug!(target: ACTION_LOG_TARGET, kind = action.kind(), action = ?action, "Action");
}

/// A started loop.
///
/// The loop runs until [`Running::stop`] is called or the application's
/// output fails. Stopping tears down every subscription made while wiring.
pub struct Running<A> {
    app: A,
    drivers: Vec<Box<dyn Driver>>,
    pending: PendingConnection<Action>,
    keepalive: Subscription,
    connection: Subscription,
}

impl<A> Running<A> {
    /// The application driving this loop.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Names of the wired drivers, in wiring order.
    pub fn driver_names(&self) -> Vec<&str> {
        self.drivers.iter().map(|driver| driver.name()).collect()
    }

    /// Whether actions still flow through the loop.
    pub fn is_running(&self) -> bool {
        !self.connection.is_closed() && !self.pending.is_terminated()
    }

}

impl<A: Application> Running<A> {
    /// Stop the loop and hand back the application.
    pub fn stop(self) -> A {
        self.connection.unsubscribe();
        self.keepalive.unsubscribe();
        let mut app = self.app;
        app.stopped();
        tracing::info!("Run loop stopped");
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Subject;
    use crate::drivers::manual::ManualDriver;
    use crate::run::DriverError;
    use std::cell::{Cell, RefCell};

    struct Broken;

    impl Driver for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn handle(
            &mut self,
            _: Stream<Action>,
            _: &RunOptions,
        ) -> Result<Stream<Action>, DriverError> {
            Err(DriverError::InvalidConfig("missing root".to_string()))
        }
    }

    fn echo(
        actions: Stream<Action>,
        _: &RunOptions,
    ) -> Result<Stream<Action>, RunError> {
        Ok(actions.filter(|_| false))
    }

    #[test]
    fn driver_failure_aborts_wiring() {
        let result = RunLoop::new(RunOptions::default())
            .driver(Broken)
            .run(echo);

        match result {
            Err(RunError::Driver { driver, source }) => {
                assert_eq!(driver, "broken");
                assert_eq!(source, DriverError::InvalidConfig("missing root".to_string()));
            }
            _ => panic!("Expected driver failure"),
        }
    }

    #[test]
    fn taps_observe_every_action() {
        let registry = ActionRegistry::new();
        let ping = registry.describe::<u8>("test", "ping").unwrap();
        let manual = ManualDriver::new();
        let remote = manual.controller();
        let tapped = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&tapped);

        let running = RunLoop::new(RunOptions::new(registry, RunConfig { log_actions: true }))
            .driver(manual)
            .tap(move |action| sink.borrow_mut().push(action.kind().to_string()))
            .run(echo)
            .unwrap();

        remote.dispatch(ping.create(1));
        remote.dispatch(ping.create(2));

        assert_eq!(*tapped.borrow(), vec!["test/ping", "test/ping"]);
        assert!(running.is_running());
    }

    #[test]
    fn stop_tears_down_every_subscription() {
        let source = Subject::new();
        let subscribed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&subscribed);
        let upstream = source.stream();

        let running = RunLoop::new(RunOptions::default())
            .driver(ManualDriver::new())
            .run(move |actions: Stream<Action>, _: &RunOptions| -> Result<Stream<Action>, RunError> {
                counter.set(counter.get() + 1);
                Ok(merge(vec![actions.filter(|_| false), upstream.clone()]))
            })
            .unwrap();

        assert_eq!(source.observer_count(), 1);
        assert_eq!(running.driver_names(), vec!["manual"]);
        running.stop();

        assert_eq!(source.observer_count(), 0);
        assert_eq!(subscribed.get(), 1);
    }
}
