//! Error types for engine construction and state management.
//!
//! This module provides:
//! - `ErrorKind`: The two failure categories shared by every crate in the workspace
//! - `EngineError`: Errors raised while validating seeds, state buffers and shape parameters

use thiserror::Error;

/// Category of a validation failure.
///
/// Every error in the workspace maps onto exactly one of these kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong type or wrong shape for an argument or option.
    InvalidArgument,
    /// Numeric value outside the accepted domain.
    OutOfRange,
}

/// Engine errors.
///
/// # Examples
/// ```
/// use variate_engine::{EngineError, ErrorKind};
///
/// let err = EngineError::SeedOutOfRange { index: 0, value: 1 << 32 };
/// assert_eq!(err.kind(), ErrorKind::OutOfRange);
/// assert!(err.to_string().contains("4294967296"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Shape parameter is not a finite positive number.
    #[error("invalid argument. {position} argument `{name}` must be a positive number. Value: `{value}`")]
    InvalidShape {
        /// "First" or "Second"
        position: &'static str,
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Seed is zero or an empty word list.
    #[error("invalid option. `seed` option must be either a positive integer or a non-empty collection of integers. {reason}")]
    InvalidSeed {
        /// What was wrong with the seed
        reason: String,
    },

    /// Seed word does not fit in 32 bits.
    #[error("invalid option. `seed` words must be less than or equal to 4294967295. Word {index}: `{value}`")]
    SeedOutOfRange {
        /// Position of the offending word
        index: usize,
        /// The offending word
        value: u64,
    },

    /// State buffer has the wrong number of words.
    #[error("invalid option. `state` has an incompatible length. Expected: {expected}. Actual: {actual}")]
    StateLength {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// State buffer was produced by an incompatible layout.
    #[error("invalid option. `state` has an incompatible schema version. Expected: {expected}. Actual: {actual}")]
    StateVersion {
        /// Supported version
        expected: u32,
        /// Supplied version
        actual: u32,
    },

    /// State access on a generator backed by an external uniform source.
    #[error("invalid operation. `state` is read-only when using an externally supplied PRNG")]
    StateUnavailable,
}

impl EngineError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShape { .. } | Self::InvalidSeed { .. } | Self::StateUnavailable => {
                ErrorKind::InvalidArgument
            }
            Self::SeedOutOfRange { .. } | Self::StateLength { .. } | Self::StateVersion { .. } => {
                ErrorKind::OutOfRange
            }
        }
    }
}

/// Checks that a shape parameter is finite and strictly positive.
///
/// `position` and `name` only feed the error message.
pub fn check_shape(position: &'static str, name: &'static str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::InvalidShape {
            position,
            name,
            value,
        })
    }
}
