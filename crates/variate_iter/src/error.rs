//! Error types for iterator construction.
//!
//! Engine failures are wrapped unchanged so that their [`ErrorKind`] survives
//! propagation through the factory.

use thiserror::Error;
use variate_engine::{EngineError, ErrorKind};

/// Iterator construction errors.
///
/// # Examples
/// ```
/// use variate_iter::{ErrorKind, IterError};
///
/// let err = IterError::InvalidOption {
///     name: "iter",
///     reason: "must be a nonnegative integer. Option: `-5`".to_string(),
/// };
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// assert!(err.to_string().contains("`iter`"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IterError {
    /// Options argument is not a plain object.
    #[error("invalid argument. Options argument must be an object. Value: `{value}`")]
    InvalidOptions {
        /// Rendering of the rejected value
        value: String,
    },

    /// Option field has the wrong type or shape.
    #[error("invalid option. `{name}` option {reason}")]
    InvalidOption {
        /// Option name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Failure raised by the engine layer.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IterError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOptions { .. } | Self::InvalidOption { .. } => ErrorKind::InvalidArgument,
            Self::Engine(err) => err.kind(),
        }
    }
}
