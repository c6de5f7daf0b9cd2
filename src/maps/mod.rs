//! Action transformation.
//!
//! The transformer is the stateless stage between the state store and the
//! drivers: it turns incoming actions, sampled against the latest state,
//! into follow-on actions, and turns every state snapshot into a render
//! action.

mod error;
mod guard;
mod transformer;

pub use error::MappingError;
pub use guard::Guard;
pub use transformer::{ActionTransformer, RuleShape};

pub(crate) use transformer::{Rule, RuleOutput};
