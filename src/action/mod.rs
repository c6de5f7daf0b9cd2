//! Typed, named action kinds.
//!
//! An [`Action`] is an immutable `{type, data}` record flowing through the
//! run loop. Each kind is described once through an [`ActionRegistry`],
//! yielding an [`ActionDescriptor`] that builds actions of that kind and
//! picks their payloads back out of any action stream.
//!
//! Related kinds are usually declared together with the
//! [`actions!`](crate::actions) macro.

mod descriptor;
mod record;
mod registry;

pub use descriptor::ActionDescriptor;
pub use record::{Action, Payload};
pub use registry::{ActionRegistry, Namespace};
