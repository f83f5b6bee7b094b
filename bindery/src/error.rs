//! Errors raised by model collaborators.
//!
//! Parse failures and validation failures are never errors: they are data
//! (an undefined parse result, a raised error key). The variants here come
//! from the accessor and scope side and are propagated to the caller as-is.

use thiserror::Error;

/// Errors that can occur while reading, writing or watching a bound model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The model path expression could not be parsed.
    #[error(
        "Syntax Error: {message} at column {column} of the expression [{path}]"
    )]
    Syntax {
        /// The full path expression.
        path: String,
        /// One-based column of the offending character.
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// A path segment resolved to a value that cannot hold children.
    #[error("Cannot assign to '{path}': '{segment}' is a {found}")]
    NotAssignable {
        /// The full path expression.
        path: String,
        /// The segment that could not be descended into.
        segment: String,
        /// Type name of the value found there.
        found: &'static str,
    },

    /// A list index lies too far past the end of the list to grow into.
    #[error("Cannot assign to '{path}': index {index} is beyond list length {len}")]
    IndexOutOfRange {
        /// The full path expression.
        path: String,
        /// The requested index.
        index: usize,
        /// Length of the list at that point.
        len: usize,
    },

    /// The scope backing an accessor has been dropped.
    #[error("Scope for '{0}' no longer exists")]
    ScopeDropped(String),

    /// Change detection did not settle.
    #[error("{ttl} digest iterations reached without the model settling")]
    DigestLimit {
        /// Configured iteration limit.
        ttl: usize,
    },

    /// A custom accessor failed.
    #[error("Model accessor failed: {0}")]
    Accessor(String),
}
