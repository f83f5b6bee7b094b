use bindery::BindError;
use thiserror::Error;

/// Errors that can occur when attaching an input binding.
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// A literal validation pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Why it failed to compile.
        source: regex::Error,
    },

    /// A model or option path could not be bound.
    #[error(transparent)]
    Bind(#[from] BindError),
}
