//! Integration tests for state sharing and the closed run loop.

use rivulet::action::{Action, ActionDescriptor, ActionRegistry};
use rivulet::config::RunConfig;
use rivulet::core::{combine_latest, Stream, StreamError, Subject};
use rivulet::drivers::manual::{ManualDriver, ManualHandle};
use rivulet::maps::{ActionTransformer, MappingError};
use rivulet::run::{Driver, DriverError, RunError, RunLoop, RunOptions, Running};
use rivulet::store::{FieldReducer, ReductionError, StateStore};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, PartialEq)]
struct Counter {
    count: i64,
}

#[derive(Clone)]
struct Kinds {
    add: ActionDescriptor<i64>,
    render: ActionDescriptor<Rc<Counter>>,
    report: ActionDescriptor<i64>,
    echo: ActionDescriptor<i64>,
}

impl Kinds {
    fn describe(registry: &ActionRegistry) -> Self {
        let counter = registry.namespace("counter");
        Self {
            add: counter.describe("add").unwrap(),
            render: counter.describe("render").unwrap(),
            report: counter.describe("report").unwrap(),
            echo: counter.describe("echo").unwrap(),
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("rivulet=trace"))
        .with_test_writer()
        .try_init();
}

fn store(add: &ActionDescriptor<i64>, limit: i64, actions: &Stream<Action>) -> StateStore<Counter> {
    StateStore::builder()
        .field(
            FieldReducer::new("count", 0i64, |s: &mut Counter, v| s.count = v).try_on(add, move |count, n| {
                let next = count + n;
                if next > limit {
                    Err(ReductionError::Rejected(format!("{next} exceeds {limit}")))
                } else {
                    Ok(next)
                }
            }),
        )
        .build(actions)
        .unwrap()
}

fn start(limit: i64, config: RunConfig) -> (Running<impl rivulet::run::Application>, ManualHandle, Kinds) {
    init_logging();
    let registry = ActionRegistry::new();
    let kinds = Kinds::describe(&registry);
    let manual = ManualDriver::new();
    let remote = manual.controller();

    let k = kinds.clone();
    let app = move |actions: Stream<Action>, _: &RunOptions| -> Result<Stream<Action>, RunError> {
        let state = store(&k.add, limit, &actions).state();
        let (render, report, echo) = (k.render.clone(), k.report.clone(), k.echo.clone());
        let transformer = ActionTransformer::<Counter>::builder()
            .on_state("render", move |s| render.create(s))
            .sample("report", &k.add, move |_, s: &Counter| Some(report.create(s.count)))
            .try_map("echo-positive", &k.add, move |n| {
                if n < 0 {
                    Err(MappingError::Rejected(format!("negative amount {n}")))
                } else {
                    Ok(echo.create(n))
                }
            })
            .build()?;
        Ok(transformer.apply(&actions, &state))
    };

    let running = RunLoop::new(RunOptions::new(registry, config))
        .driver(manual)
        .run(app)
        .unwrap();
    (running, remote, kinds)
}

fn counts(remote: &ManualHandle, kinds: &Kinds) -> Vec<i64> {
    remote
        .received_of(&kinds.render)
        .iter()
        .map(|s| s.count)
        .collect()
}

#[test]
fn combine_latest_waits_for_every_input() {
    let (a, b) = (Subject::new(), Subject::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    combine_latest(vec![a.stream(), b.stream()]).subscribe(move |v| sink.borrow_mut().push(v));

    a.next(1);
    a.next(2);
    assert!(seen.borrow().is_empty());

    b.next(10);
    a.next(3);
    assert_eq!(*seen.borrow(), vec![vec![2, 10], vec![3, 10]]);
}

#[test]
fn seeded_inputs_combine_immediately() {
    let (a, b) = (Subject::<i32>::new(), Subject::<i32>::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    combine_latest(vec![a.stream().start_with(0), b.stream().start_with(0)])
        .subscribe(move |v| sink.borrow_mut().push(v));

    assert_eq!(*seen.borrow(), vec![vec![0, 0]]);
}

#[test]
fn late_subscribers_receive_the_latest_state() {
    let registry = ActionRegistry::new();
    let kinds = Kinds::describe(&registry);
    let actions = Subject::new();
    let store = store(&kinds.add, 100, &actions.stream());
    let _first = store.state().subscribe(|_| {});

    actions.next(kinds.add.create(4));
    let late = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&late);
    store.state().subscribe(move |s| sink.borrow_mut().push(s.count));

    assert_eq!(*late.borrow(), vec![4]);
}

#[test]
fn last_detach_tears_down_and_next_subscription_restarts() {
    let registry = ActionRegistry::new();
    let kinds = Kinds::describe(&registry);
    let actions = Subject::new();
    let store = store(&kinds.add, 100, &actions.stream());

    let first = store.state().subscribe(|_| {});
    actions.next(kinds.add.create(7));
    assert!(actions.observer_count() > 0);

    first.unsubscribe();
    assert_eq!(actions.observer_count(), 0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.state().subscribe(move |s| sink.borrow_mut().push(s.count));
    actions.next(kinds.add.create(1));

    assert_eq!(*seen.borrow(), vec![0, 1]);
}

#[test]
fn state_updates_before_samples_and_renders_see_it() {
    let (_running, remote, kinds) = start(100, RunConfig::default());

    remote.dispatch(kinds.add.create(2));
    remote.dispatch(kinds.add.create(3));

    let received: Vec<Action> = remote
        .received()
        .into_iter()
        .filter(|a| !a.is(kinds.echo.kind()))
        .collect();
    assert_eq!(
        received,
        vec![
            kinds.render.create(Rc::new(Counter { count: 0 })),
            kinds.render.create(Rc::new(Counter { count: 2 })),
            kinds.report.create(2),
            kinds.render.create(Rc::new(Counter { count: 5 })),
            kinds.report.create(5),
        ]
    );
}

#[test]
fn failing_rule_is_disabled_alone() {
    let (running, remote, kinds) = start(100, RunConfig::default());

    remote.dispatch(kinds.add.create(1));
    remote.dispatch(kinds.add.create(-1));
    remote.dispatch(kinds.add.create(4));

    assert_eq!(remote.received_of(&kinds.echo), vec![1]);
    assert_eq!(remote.received_of(&kinds.report), vec![1, 0, 4]);
    assert_eq!(counts(&remote, &kinds), vec![0, 1, 0, 4]);
    assert!(running.is_running());
}

#[test]
fn failing_reduction_stops_the_loop() {
    let (running, remote, kinds) = start(10, RunConfig::default());

    remote.dispatch(kinds.add.create(6));
    remote.dispatch(kinds.add.create(6));
    remote.dispatch(kinds.add.create(1));

    assert_eq!(counts(&remote, &kinds), vec![0, 6]);
    assert!(!running.is_running());
}

#[test]
fn action_logging_does_not_alter_actions() {
    let (running, remote, kinds) = start(100, RunConfig { log_actions: true });

    remote.dispatch(kinds.add.create(3));

    assert_eq!(counts(&remote, &kinds), vec![0, 3]);
    assert_eq!(running.driver_names(), vec!["manual"]);
}

#[test]
fn stopping_releases_every_subscription() {
    let (running, remote, kinds) = start(100, RunConfig::default());
    remote.dispatch(kinds.add.create(1));

    running.stop();
    remote.clear();
    remote.dispatch(kinds.add.create(1));

    assert!(remote.received().is_empty());
}

/// Records the `add` amounts reaching it and emits nothing.
struct Witness {
    add: ActionDescriptor<i64>,
    seen: Rc<RefCell<Vec<i64>>>,
}

impl Driver for Witness {
    fn name(&self) -> &str {
        "witness"
    }

    fn handle(&mut self, inbound: Stream<Action>, _: &RunOptions) -> Result<Stream<Action>, DriverError> {
        let (add, seen) = (self.add.clone(), Rc::clone(&self.seen));
        Ok(inbound.filter_map(move |action: Action| {
            if let Some(amount) = add.extract(&action) {
                seen.borrow_mut().push(amount);
            }
            None
        }))
    }
}

/// Emits whatever is pushed into its outlet, including failures.
struct Outlet {
    actions: Subject<Action>,
}

impl Driver for Outlet {
    fn name(&self) -> &str {
        "outlet"
    }

    fn handle(&mut self, _: Stream<Action>, _: &RunOptions) -> Result<Stream<Action>, DriverError> {
        Ok(self.actions.stream())
    }
}

fn recording_app(
    add: &ActionDescriptor<i64>,
) -> (
    impl FnMut(Stream<Action>, &RunOptions) -> Result<Stream<Action>, RunError>,
    Rc<RefCell<Vec<i64>>>,
) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (sink, add) = (Rc::clone(&seen), add.clone());
    let app = move |actions: Stream<Action>, _: &RunOptions| -> Result<Stream<Action>, RunError> {
        let sink = Rc::clone(&sink);
        Ok(add
            .matches(&actions)
            .filter_map(move |amount| {
                sink.borrow_mut().push(amount);
                None
            }))
    };
    (app, seen)
}

#[test]
fn later_drivers_see_earlier_drivers_actions_in_the_same_tick() {
    init_logging();
    let registry = ActionRegistry::new();
    let kinds = Kinds::describe(&registry);
    let manual = ManualDriver::new();
    let remote = manual.controller();
    let witnessed = Rc::new(RefCell::new(Vec::new()));
    let (app, applied) = recording_app(&kinds.add);

    let _running = RunLoop::new(RunOptions::new(registry, RunConfig::default()))
        .driver(manual)
        .driver(Witness {
            add: kinds.add.clone(),
            seen: Rc::clone(&witnessed),
        })
        .run(app)
        .unwrap();

    remote.dispatch(kinds.add.create(5));

    assert_eq!(*witnessed.borrow(), vec![5]);
    assert_eq!(*applied.borrow(), vec![5]);
}

#[test]
fn failing_driver_is_detached_and_the_loop_keeps_running() {
    init_logging();
    let registry = ActionRegistry::new();
    let kinds = Kinds::describe(&registry);
    let manual = ManualDriver::new();
    let remote = manual.controller();
    let outlet = Subject::new();
    let (app, applied) = recording_app(&kinds.add);

    let running = RunLoop::new(RunOptions::new(registry, RunConfig::default()))
        .driver(manual)
        .driver(Outlet {
            actions: outlet.clone(),
        })
        .run(app)
        .unwrap();

    remote.dispatch(kinds.add.create(1));
    outlet.next(kinds.add.create(10));
    outlet.error(StreamError::Upstream {
        source_name: "outlet".to_string(),
        message: "device lost".to_string(),
    });
    remote.dispatch(kinds.add.create(2));
    outlet.next(kinds.add.create(20));

    assert_eq!(*applied.borrow(), vec![1, 10, 2]);
    assert!(running.is_running());
}
