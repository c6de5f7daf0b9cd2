//! Builder API for run loop components.
//!
//! This module provides fluent builders for state stores and action
//! transformers, and the [`actions!`](crate::actions) macro for declaring
//! action kinds with minimal boilerplate. Builders validate at `build()` and
//! report every violation at once.

pub mod error;
pub mod macros;
pub mod store;
pub mod transformer;

pub use error::BuildError;
pub use store::StoreBuilder;
pub use transformer::TransformerBuilder;

use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check a list of component names: at least one, none repeated.
///
/// Each repeated name is reported once, in order of first repetition.
pub(crate) fn validate_names(
    names: &[&str],
    empty: BuildError,
    duplicate: fn(String) -> BuildError,
) -> Result<(), BuildError> {
    let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

    checks.push(if names.is_empty() {
        Validation::fail(empty)
    } else {
        Validation::success(())
    });

    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for name in names {
        let check = if !seen.insert(*name) && reported.insert(*name) {
            Validation::fail(duplicate(name.to_string()))
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(BuildError::from_violations(errors)),
    }
}
