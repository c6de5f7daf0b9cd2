//! Typed handles for one action kind.

use super::record::{Action, Payload};
use crate::core::Stream;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Constructor and matcher for one action kind.
///
/// Descriptors are obtained from an [`crate::action::ActionRegistry`], which
/// guarantees that a kind is bound to exactly one payload type. They are
/// stateless: [`ActionDescriptor::matches`] can be applied to any number of
/// streams, any number of times.
///
/// # Example
///
/// ```rust
/// use rivulet::action::ActionRegistry;
/// use rivulet::core::Subject;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let registry = ActionRegistry::new();
/// let rename = registry.namespace("demo").describe::<String>("rename").unwrap();
///
/// let actions = Subject::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// rename
///     .matches(&actions.stream())
///     .subscribe(move |name| sink.borrow_mut().push(name));
///
/// actions.next(rename.create("first".to_string()));
/// assert_eq!(*seen.borrow(), vec!["first".to_string()]);
/// ```
pub struct ActionDescriptor<P> {
    kind: Rc<str>,
    _payload: PhantomData<fn() -> P>,
}

impl<P> Clone for ActionDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            kind: Rc::clone(&self.kind),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for ActionDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionDescriptor").field(&&*self.kind).finish()
    }
}

impl<P> PartialEq for ActionDescriptor<P> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl<P: Payload> ActionDescriptor<P> {
    pub(crate) fn new(kind: Rc<str>) -> Self {
        Self {
            kind,
            _payload: PhantomData,
        }
    }

    /// The kind this descriptor creates and matches.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Build an action of this kind.
    pub fn create(&self, payload: P) -> Action {
        Action::new(Rc::clone(&self.kind), payload)
    }

    /// Extract the payload if `action` is of this kind.
    pub fn extract(&self, action: &Action) -> Option<P> {
        if action.is(&self.kind) {
            action.payload::<P>().cloned()
        } else {
            None
        }
    }

    /// Payloads of every action of this kind in `actions`.
    pub fn matches(&self, actions: &Stream<Action>) -> Stream<P> {
        let descriptor = self.clone();
        actions.filter_map(move |action| descriptor.extract(&action))
    }
}
