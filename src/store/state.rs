//! Combined application state.

use super::field::{Field, FieldWrite};
use crate::action::Action;
use crate::builder::StoreBuilder;
use crate::core::{combine_latest, Stream};
use std::rc::Rc;

/// Positional product of independent field reducers.
///
/// The state stream withholds output until every field has produced its
/// initial value, then emits a fresh snapshot each time any field changes.
/// It is shared with replay of the latest snapshot: a new subscriber
/// receives the current state synchronously, and once the last subscriber
/// leaves the reducers and the cached snapshot are dropped. The next
/// subscriber starts again from the initial values.
///
/// A failing field update terminates the state stream.
pub struct StateStore<S> {
    state: Stream<Rc<S>>,
    fields: Vec<String>,
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<S: Default + 'static> StateStore<S> {
    /// Start building a store.
    pub fn builder() -> StoreBuilder<S> {
        StoreBuilder::new()
    }

    pub(crate) fn assemble(fields: Vec<Box<dyn Field<S>>>, actions: &Stream<Action>) -> Self {
        let names = fields.iter().map(|field| field.name().to_string()).collect();
        let writes = fields.iter().map(|field| field.writes(actions)).collect();
        let state = combine_latest(writes)
            .map(|writes: Vec<FieldWrite<S>>| {
                let mut state = S::default();
                for write in &writes {
                    write(&mut state);
                }
                Rc::new(state)
            })
            .share_replay();

        Self { state, fields: names }
    }

    /// The shared state stream.
    pub fn state(&self) -> Stream<Rc<S>> {
        self.state.clone()
    }

    /// Field names, in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }
}

impl<S> std::fmt::Debug for StateStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDescriptor, ActionRegistry};
    use crate::core::{Notification, Subject};
    use crate::store::{FieldReducer, ReductionError};
    use std::cell::RefCell;

    #[derive(Default, Debug, Clone, PartialEq)]
    struct Counter {
        count: i32,
        label: String,
    }

    struct Fixture {
        actions: Subject<Action>,
        add: ActionDescriptor<i32>,
        rename: ActionDescriptor<String>,
        store: StateStore<Counter>,
    }

    fn fixture() -> Fixture {
        let registry = ActionRegistry::new();
        let add = registry.describe::<i32>("counter", "add").unwrap();
        let rename = registry.describe::<String>("counter", "rename").unwrap();
        let actions = Subject::new();
        let store = StateStore::builder()
            .field(
                FieldReducer::new("count", 0, |s: &mut Counter, v| s.count = v).try_on(&add, |n, by| {
                    n.checked_add(by)
                        .ok_or_else(|| ReductionError::Rejected("overflow".to_string()))
                }),
            )
            .field(
                FieldReducer::new("label", "new".to_string(), |s: &mut Counter, v| s.label = v)
                    .on(&rename, |_, name| name),
            )
            .build(&actions.stream())
            .unwrap();
        Fixture { actions, add, rename, store }
    }

    fn record(store: &StateStore<Counter>) -> Rc<RefCell<Vec<Counter>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.state().subscribe(move |s| sink.borrow_mut().push((*s).clone()));
        seen
    }

    #[test]
    fn initial_state_is_emitted_once_all_fields_are_seeded() {
        let fx = fixture();
        let seen = record(&fx.store);

        assert_eq!(
            *seen.borrow(),
            vec![Counter {
                count: 0,
                label: "new".to_string()
            }]
        );
        assert_eq!(fx.store.field_names(), ["count", "label"]);
    }

    #[test]
    fn each_field_change_emits_a_snapshot() {
        let fx = fixture();
        let seen = record(&fx.store);

        fx.actions.next(fx.add.create(2));
        fx.actions.next(fx.rename.create("clicks".to_string()));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].count, 2);
        assert_eq!(seen[2].label, "clicks");
        assert_eq!(seen[2].count, 2);
    }

    #[test]
    fn failing_update_terminates_the_state() {
        let fx = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        fx.store.state().subscribe_with(move |n| sink.borrow_mut().push(n.is_terminal()));

        fx.actions.next(fx.add.create(i32::MAX));
        fx.actions.next(fx.add.create(1));
        fx.actions.next(fx.rename.create("after".to_string()));

        assert_eq!(*seen.borrow(), vec![false, false, true]);
        assert_eq!(fx.actions.observer_count(), 0);
    }

    #[test]
    fn reduction_error_carries_the_field_name() {
        let fx = fixture();
        let error = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&error);
        fx.store.state().subscribe_with(move |n| {
            if let Notification::Error(e) = n {
                *sink.borrow_mut() = Some(e);
            }
        });

        fx.actions.next(fx.add.create(i32::MAX));
        fx.actions.next(fx.add.create(1));

        let error = error.borrow().clone().unwrap();
        assert!(error.to_string().contains("count"));
    }
}
