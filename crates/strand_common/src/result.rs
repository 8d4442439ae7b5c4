//! Result and error types for internal compiler failures.

/// The result type for operations that can only fail because of a bug.
///
/// User-facing problems (a missing definition, a port mismatch) are reported
/// as diagnostics; `Err` here means the toolchain itself is broken.
pub type StrandResult<T> = Result<T, InternalError>;

/// An internal compiler error: an invariant of the toolchain did not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of the broken invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for InternalError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
