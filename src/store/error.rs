//! Reduction errors.

use thiserror::Error;

/// Failure of a field update.
///
/// Update functions are expected to be total: a lookup that misses returns
/// an unchanged copy instead. A reduction error therefore signals a defect,
/// and it terminates the state stream.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReductionError {
    #[error("Update rejected: {0}")]
    Rejected(String),
}
