//! Construction errors for action kinds, stores and transformers.

use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors that can occur while constructing the parts of a run loop.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Invalid action name `{0}`. Names must be non-empty and must not contain `/`")]
    InvalidActionName(String),

    #[error("Action `{kind}` is already registered with payload `{existing}`, requested `{requested}`")]
    ConflictingAction {
        kind: String,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("State store has no fields. Add at least one field reducer")]
    NoFields,

    #[error("Field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error("Transformer has no rules. Add at least one rule")]
    NoRules,

    #[error("Rule `{0}` is declared more than once")]
    DuplicateRule(String),

    #[error("{}", describe_all(.0))]
    Multiple(Vec<BuildError>),
}

impl BuildError {
    /// Collapse accumulated violations into a single error.
    pub(crate) fn from_violations(violations: NonEmptyVec<BuildError>) -> Self {
        let mut errors: Vec<BuildError> = violations.iter().cloned().collect();
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            BuildError::Multiple(errors)
        }
    }
}

fn describe_all(errors: &[BuildError]) -> String {
    let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("{} construction errors: {}", errors.len(), listed.join("; "))
}
