//! Beta-variate sequence objects.
//!
//! A [`BetaIterator`] wraps a [`BetaGenerator`] with an iteration cap and a
//! permanent close flag. It exposes an explicit pull/stop protocol
//! ([`BetaIterator::pull`], [`BetaIterator::close`]) and also implements
//! [`Iterator`] so it can drive `for` loops and adapter chains.

use std::iter::FusedIterator;

use serde_json::Value;
use variate_engine::{check_shape, BetaGenerator, Prng, StateBuffer};

use crate::config::IterConfig;
use crate::error::IterError;
use crate::options::parse_options;

/// Result of one pull or stop.
///
/// `done == true` marks the permanent end of the sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step<T = f64> {
    /// Emitted value; `None` once the sequence has finished, unless echoed by `close`.
    pub value: Option<T>,
    /// Whether the sequence has finished.
    pub done: bool,
}

impl<T> Step<T> {
    /// A step carrying a value.
    #[inline]
    pub fn yielded(value: T) -> Self {
        Self {
            value: Some(value),
            done: false,
        }
    }

    /// The terminal marker.
    #[inline]
    pub fn finished() -> Self {
        Self {
            value: None,
            done: true,
        }
    }
}

/// Creates a beta-variate iterator.
///
/// `config` is cloned before use; the caller's configuration is never
/// modified.
///
/// # Errors
///
/// - `InvalidShape` if `alpha` or `beta` is not a finite positive number
/// - Seed and state validation errors from the engine
///
/// # Examples
///
/// ```rust
/// use variate_iter::{iterator, IterConfig};
///
/// let config = IterConfig::builder().seed(12345_u32).iter(3).build().unwrap();
/// let values: Vec<f64> = iterator(2.0, 5.0, Some(&config)).unwrap().collect();
///
/// assert_eq!(values.len(), 3);
/// assert!(values.iter().all(|x| (0.0..=1.0).contains(x)));
/// ```
pub fn iterator(alpha: f64, beta: f64, config: Option<&IterConfig>) -> Result<BetaIterator, IterError> {
    let alpha = check_shape("First", "alpha", alpha)?;
    let beta = check_shape("Second", "beta", beta)?;

    let mut config = config.cloned().unwrap_or_default();
    let generator = BetaGenerator::new(alpha, beta, &config.engine_options())?;

    // Freeze the starting point so duplicates replay this run.
    if config.prng.is_none() && config.copy {
        config.state = generator.state().map(StateBuffer::from);
    }

    tracing::debug!(
        alpha,
        beta,
        iter = config.iter,
        external = config.prng.is_some(),
        shared = !config.copy && config.state.is_some(),
        "created beta iterator"
    );

    Ok(BetaIterator {
        alpha,
        beta,
        generator,
        config,
        count: 0,
        closed: false,
    })
}

/// Creates a beta-variate iterator from a dynamic options object.
///
/// # Errors
///
/// Shape errors first, then the errors of
/// [`parse_options`](crate::options::parse_options), then engine errors.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use variate_iter::{iterator_from_options, ErrorKind};
///
/// let mut it = iterator_from_options(2.0, 5.0, &json!({ "seed": 12345, "iter": 1 })).unwrap();
/// assert!(it.pull().value.is_some());
/// assert!(it.pull().done);
///
/// let err = iterator_from_options(2.0, 5.0, &json!("abc")).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// ```
pub fn iterator_from_options(alpha: f64, beta: f64, options: &Value) -> Result<BetaIterator, IterError> {
    check_shape("First", "alpha", alpha)?;
    check_shape("Second", "beta", beta)?;
    let config = parse_options(options)?;
    iterator(alpha, beta, Some(&config))
}

/// Bounded, closable sequence of beta variates.
///
/// # Examples
///
/// ```rust
/// use variate_iter::{iterator, IterConfig};
///
/// let config = IterConfig::builder().seed(7_u32).build().unwrap();
/// let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();
///
/// // Capture, advance, rewind
/// let saved = it.state().unwrap();
/// let first = it.pull().value;
/// it.set_state(&saved).unwrap();
/// assert_eq!(it.pull().value, first);
///
/// // Close permanently
/// let step = it.close(Some(1.5));
/// assert_eq!(step.value, Some(1.5));
/// assert!(step.done);
/// assert_eq!(it.next(), None);
/// ```
#[derive(Debug)]
pub struct BetaIterator {
    alpha: f64,
    beta: f64,
    generator: BetaGenerator,
    /// Configuration frozen at construction (including any back-filled state).
    config: IterConfig,
    count: u64,
    closed: bool,
}

impl BetaIterator {
    /// Pulls the next value.
    ///
    /// Returns the terminal marker once closed or after `iter` values.
    pub fn pull(&mut self) -> Step {
        if self.closed {
            return Step::finished();
        }
        if self.count >= self.config.iter {
            self.closed = true;
            tracing::trace!(count = self.count, "beta iterator exhausted");
            return Step::finished();
        }
        let value = self.generator.sample();
        self.count += 1;
        Step::yielded(value)
    }

    /// Closes the sequence, echoing `value`.
    ///
    /// Subsequent pulls return the terminal marker. Calling `close` again is
    /// harmless.
    pub fn close<T>(&mut self, value: Option<T>) -> Step<T> {
        if !self.closed {
            tracing::trace!(count = self.count, "beta iterator closed");
        }
        self.closed = true;
        Step { value, done: true }
    }

    /// Creates a fresh iterator from the frozen configuration.
    ///
    /// The new iterator starts where this one started, regardless of how far
    /// this one has advanced. With `copy(false)` it draws through the same
    /// shared buffer instead.
    ///
    /// # Errors
    ///
    /// Propagates engine construction errors.
    pub fn duplicate(&self) -> Result<BetaIterator, IterError> {
        tracing::debug!(alpha = self.alpha, beta = self.beta, "duplicating beta iterator");
        iterator(self.alpha, self.beta, Some(&self.config))
    }

    /// First shape parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Second shape parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of values emitted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the sequence has finished.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Frozen configuration.
    pub fn config(&self) -> &IterConfig {
        &self.config
    }

    /// Underlying uniform source.
    pub fn prng(&self) -> &Prng {
        self.generator.prng()
    }

    /// Seed words; `None` with an external source.
    pub fn seed(&self) -> Option<Vec<u32>> {
        self.generator.seed()
    }

    /// Number of seed words; `None` with an external source.
    pub fn seed_length(&self) -> Option<usize> {
        self.generator.seed_length()
    }

    /// Copy of the current state words; `None` with an external source.
    pub fn state(&self) -> Option<Vec<u32>> {
        self.generator.state()
    }

    /// Handle to the working state buffer; `None` with an external source.
    ///
    /// With `copy(false)` this is the caller's buffer.
    pub fn state_buffer(&self) -> Option<StateBuffer> {
        self.generator.state_buffer()
    }

    /// Overwrites the generator state.
    ///
    /// A shared buffer is updated in place, so every iterator drawing through
    /// it jumps to the new position.
    ///
    /// # Errors
    ///
    /// - `StateUnavailable` with an external source
    /// - `StateLength` / `StateVersion` for an invalid buffer
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), IterError> {
        Ok(self.generator.set_state(words)?)
    }

    /// Number of state words; `None` with an external source.
    pub fn state_length(&self) -> Option<usize> {
        self.generator.state_length()
    }

    /// State size in bytes; `None` with an external source.
    pub fn byte_length(&self) -> Option<usize> {
        self.generator.byte_length()
    }

    /// Returns the iterator itself, for use in `for` loops without moving it.
    pub fn iter_mut(&mut self) -> &mut Self {
        self
    }
}

impl Iterator for BetaIterator {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.pull().value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.closed {
            return (0, Some(0));
        }
        let remaining = self.config.iter - self.count;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for BetaIterator {}
