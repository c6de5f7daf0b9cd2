//! The type-erased action record.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Bound every action payload satisfies.
///
/// Payloads are immutable values: they are cloned out of actions, compared
/// in tests and printed by the action logger.
pub trait Payload: Clone + fmt::Debug + PartialEq + 'static {}

impl<T: Clone + fmt::Debug + PartialEq + 'static> Payload for T {}

/// Immutable, discriminated event record.
///
/// The `kind` is the discriminant; the payload is only reachable through
/// the matching [`crate::action::ActionDescriptor`] or
/// [`Action::payload`]. Actions are cheap to clone and never mutated.
#[derive(Clone)]
pub struct Action {
    kind: Rc<str>,
    data: Rc<dyn Any>,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

impl Action {
    pub(crate) fn new<P: Payload>(kind: Rc<str>, payload: P) -> Self {
        Self {
            kind,
            data: Rc::new(payload),
            debug: debug_payload::<P>,
            eq: eq_payload::<P>,
        }
    }

    /// The action kind, `namespace/name`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether this action is of the given kind.
    pub fn is(&self, kind: &str) -> bool {
        &*self.kind == kind
    }

    /// Borrow the payload if it has type `P`.
    pub fn payload<P: 'static>(&self) -> Option<&P> {
        self.data.downcast_ref::<P>()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Data<'a>(&'a Action);

        impl fmt::Debug for Data<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                (self.0.debug)(&*self.0.data, f)
            }
        }

        f.debug_struct("Action")
            .field("type", &&*self.kind)
            .field("data", &Data(self))
            .finish()
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && (self.eq)(&*self.data, &*other.data)
    }
}

fn debug_payload<P: Payload>(data: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match data.downcast_ref::<P>() {
        Some(payload) => fmt::Debug::fmt(payload, f),
        None => f.write_str("<foreign payload>"),
    }
}

fn eq_payload<P: Payload>(left: &dyn Any, right: &dyn Any) -> bool {
    match (left.downcast_ref::<P>(), right.downcast_ref::<P>()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
