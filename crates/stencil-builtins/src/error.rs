//! Evaluation errors.

use thiserror::Error;

/// Failure of a built-in at render time.
///
/// Unlike analysis diagnostics these are not collected; they propagate to
/// whoever asked for the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The target evaluated to a value of the wrong type.
    #[error("Expected {expected}, but {target} evaluated to {actual}")]
    TypeMismatch {
        /// Source text of the target expression
        target: String,
        /// Description of the accepted type(s)
        expected: &'static str,
        /// Type name of the value found
        actual: &'static str,
    },

    /// The target evaluated to nothing.
    #[error("{what}: {target} is undefined")]
    UndefinedReference { target: String, what: &'static str },

    /// Host-level failure (unsupported built-in, numeric overflow, ...).
    #[error("{0}")]
    Evaluation(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
