//! State reduction.
//!
//! Application state is split into independent fields. Each
//! [`FieldReducer`] folds the actions it cares about into one value; the
//! [`StateStore`] combines the latest value of every field into a single
//! snapshot and shares it among all observers.

mod error;
mod field;
mod state;

pub use error::ReductionError;
pub use field::{FieldReducer, Update};
pub use state::StateStore;

pub(crate) use field::Field;
