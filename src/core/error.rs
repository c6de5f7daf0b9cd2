//! Errors carried inside streams.

use thiserror::Error;

/// Terminal error delivered through a stream.
///
/// A stream that delivers an error is finished: no further values follow.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreamError {
    #[error("Reducer for field `{field}` failed: {message}")]
    Reduction { field: String, message: String },

    #[error("Stream `{source_name}` failed: {message}")]
    Upstream {
        source_name: String,
        message: String,
    },
}
