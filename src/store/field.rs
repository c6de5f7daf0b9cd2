//! Per-field reducers.

use super::error::ReductionError;
use crate::action::{Action, ActionDescriptor, Payload};
use crate::core::{merge, Stream, StreamError};
use std::rc::Rc;

/// A pending update of one field's value.
pub type Update<V> = Rc<dyn Fn(&V) -> Result<V, ReductionError>>;

/// Writes one field's current value into a state under construction.
pub(crate) type FieldWrite<S> = Rc<dyn Fn(&mut S)>;

type UpdateRule<V> = Box<dyn Fn(&Stream<Action>) -> Stream<Update<V>>>;

/// Pure fold over one slice of the state.
///
/// A field starts from its initial value and applies one update per
/// matching action. Fields never see each other: how they line up is
/// decided only by the order actions arrive in.
///
/// # Example
///
/// ```rust
/// use rivulet::action::ActionRegistry;
/// use rivulet::core::Subject;
/// use rivulet::store::FieldReducer;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Counter {
///     count: u32,
/// }
///
/// let registry = ActionRegistry::new();
/// let add = registry.describe::<u32>("counter", "add").unwrap();
///
/// let count = FieldReducer::new("count", 0, |state: &mut Counter, value| state.count = value)
///     .on(&add, |count, amount| count + amount);
///
/// let actions = Subject::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// count.values(&actions.stream()).subscribe(move |n| sink.borrow_mut().push(n));
///
/// actions.next(add.create(2));
/// actions.next(add.create(3));
/// assert_eq!(*seen.borrow(), vec![0, 2, 5]);
/// ```
pub struct FieldReducer<S, V> {
    name: String,
    initial: V,
    assign: Rc<dyn Fn(&mut S, V)>,
    rules: Vec<UpdateRule<V>>,
}

impl<S: 'static, V: Clone + 'static> FieldReducer<S, V> {
    /// Create a field with its initial value and the setter placing its
    /// value into the combined state.
    pub fn new<F>(name: impl Into<String>, initial: V, assign: F) -> Self
    where
        F: Fn(&mut S, V) + 'static,
    {
        Self {
            name: name.into(),
            initial,
            assign: Rc::new(assign),
            rules: Vec::new(),
        }
    }

    /// Apply `update` to the value for every action of kind `action`.
    pub fn on<P, F>(self, action: &ActionDescriptor<P>, update: F) -> Self
    where
        P: Payload,
        F: Fn(&V, P) -> V + 'static,
    {
        self.try_on(action, move |value, payload| Ok(update(value, payload)))
    }

    /// Like [`FieldReducer::on`] for updates that can fail.
    ///
    /// A failing update terminates every stream built from this field.
    pub fn try_on<P, F>(mut self, action: &ActionDescriptor<P>, update: F) -> Self
    where
        P: Payload,
        F: Fn(&V, P) -> Result<V, ReductionError> + 'static,
    {
        let action = action.clone();
        let update = Rc::new(update);
        self.rules.push(Box::new(move |actions: &Stream<Action>| {
            let update = Rc::clone(&update);
            action.matches(actions).map(move |payload| {
                let update = Rc::clone(&update);
                Rc::new(move |value: &V| update(value, payload.clone())) as Update<V>
            })
        }));
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value the field starts from.
    pub fn initial(&self) -> &V {
        &self.initial
    }

    /// Number of update rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Stream of this field's values.
    ///
    /// Emits the initial value on subscription, then the new value after
    /// every update. Each subscription starts over from the initial value.
    pub fn values(&self, actions: &Stream<Action>) -> Stream<V> {
        let field = self.name.clone();
        let updates = merge(self.rules.iter().map(|rule| rule(actions)).collect());
        updates
            .try_scan(self.initial.clone(), move |value, update: Update<V>| {
                update(value).map_err(|error| {
                    tracing::error!(field = %field, error = %error, "Field update failed");
                    StreamError::Reduction {
                        field: field.clone(),
                        message: error.to_string(),
                    }
                })
            })
            .start_with(self.initial.clone())
    }
}

/// Type-erased view of a field, as the store combines them.
pub(crate) trait Field<S> {
    fn name(&self) -> &str;

    fn writes(&self, actions: &Stream<Action>) -> Stream<FieldWrite<S>>;
}

impl<S: 'static, V: Clone + 'static> Field<S> for FieldReducer<S, V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn writes(&self, actions: &Stream<Action>) -> Stream<FieldWrite<S>> {
        let assign = Rc::clone(&self.assign);
        self.values(actions).map(move |value| {
            let assign = Rc::clone(&assign);
            Rc::new(move |state: &mut S| assign(state, value.clone())) as FieldWrite<S>
        })
    }
}
