//! Mapping errors.

use thiserror::Error;

/// Failure of a transformer rule.
///
/// A failing rule is logged and disabled; the remaining rules keep running.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("Mapping rejected: {0}")]
    Rejected(String),
}
