//! Iteration configuration.
//!
//! This module provides the immutable configuration captured by a beta
//! iterator and a builder for constructing it.

use variate_engine::{check_words, EngineOptions, ExternalPrng, Seed, StateBuffer};

use crate::error::IterError;

/// Default iteration cap (effectively unbounded).
pub const DEFAULT_ITER: u64 = u64::MAX;

/// Beta iterator configuration.
///
/// | field   | default        | effect                                          |
/// |---------|----------------|-------------------------------------------------|
/// | `iter`  | [`DEFAULT_ITER`] | caps the number of emitted values             |
/// | `prng`  | `None`         | external uniform source replacing the engine    |
/// | `copy`  | `true`         | duplicate `state` instead of sharing it         |
/// | `seed`  | `None`         | deterministic engine initialisation             |
/// | `state` | `None`         | exact engine resume point                       |
///
/// # Examples
///
/// ```rust
/// use variate_iter::IterConfig;
///
/// let config = IterConfig::builder()
///     .iter(10)
///     .seed(12345_u32)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.iter(), 10);
/// assert!(config.copy());
/// ```
#[derive(Clone, Debug)]
pub struct IterConfig {
    pub(crate) iter: u64,
    pub(crate) prng: Option<ExternalPrng>,
    pub(crate) copy: bool,
    pub(crate) seed: Option<Seed>,
    pub(crate) state: Option<StateBuffer>,
}

impl Default for IterConfig {
    fn default() -> Self {
        Self {
            iter: DEFAULT_ITER,
            prng: None,
            copy: true,
            seed: None,
            state: None,
        }
    }
}

impl IterConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> IterConfigBuilder {
        IterConfigBuilder::default()
    }

    /// Returns the iteration cap.
    #[inline]
    pub fn iter(&self) -> u64 {
        self.iter
    }

    /// Returns the external uniform source, if any.
    #[inline]
    pub fn prng(&self) -> Option<&ExternalPrng> {
        self.prng.as_ref()
    }

    /// Returns whether a supplied state buffer is duplicated.
    #[inline]
    pub fn copy(&self) -> bool {
        self.copy
    }

    /// Returns the seed, if any.
    #[inline]
    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    /// Returns the state buffer, if any.
    #[inline]
    pub fn state(&self) -> Option<&StateBuffer> {
        self.state.as_ref()
    }

    /// Validates the seed and state fields.
    ///
    /// Fields the engine ignores (seed and state alongside a `prng`) are not
    /// checked.
    ///
    /// # Errors
    ///
    /// - `InvalidSeed` / `SeedOutOfRange` for a malformed seed
    /// - `StateLength` / `StateVersion` for a malformed state buffer
    pub fn validate(&self) -> Result<(), IterError> {
        if self.prng.is_some() {
            return Ok(());
        }
        if let Some(seed) = &self.seed {
            seed.words()?;
        }
        if let Some(state) = &self.state {
            check_words(&state.to_vec())?;
        }
        Ok(())
    }

    pub(crate) fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            prng: self.prng.clone(),
            seed: self.seed.clone(),
            state: self.state.clone(),
            copy: self.copy,
        }
    }
}

/// Builder for [`IterConfig`].
///
/// # Examples
///
/// ```rust
/// use variate_iter::IterConfig;
/// use variate_engine::StateBuffer;
///
/// let shared = StateBuffer::from(vec![0_u32; 17]);
/// let config = IterConfig::builder()
///     .state(shared.clone())
///     .copy(false)
///     .build();
///
/// // Word 0 must carry the state version.
/// assert!(config.is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct IterConfigBuilder {
    iter: Option<u64>,
    prng: Option<ExternalPrng>,
    copy: Option<bool>,
    seed: Option<Seed>,
    state: Option<StateBuffer>,
}

impl IterConfigBuilder {
    /// Sets the iteration cap.
    #[inline]
    pub fn iter(mut self, iter: u64) -> Self {
        self.iter = Some(iter);
        self
    }

    /// Sets an external uniform source.
    ///
    /// # Arguments
    ///
    /// * `source` - Zero-argument closure returning values in (0, 1)
    #[inline]
    pub fn prng(mut self, source: impl FnMut() -> f64 + 'static) -> Self {
        self.prng = Some(ExternalPrng::new(source));
        self
    }

    /// Sets an already wrapped external uniform source.
    #[inline]
    pub fn external_prng(mut self, source: ExternalPrng) -> Self {
        self.prng = Some(source);
        self
    }

    /// Sets whether a supplied state buffer is duplicated.
    #[inline]
    pub fn copy(mut self, copy: bool) -> Self {
        self.copy = Some(copy);
        self
    }

    /// Sets the engine seed.
    #[inline]
    pub fn seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Sets the engine state to resume from.
    ///
    /// Pass a clone of a shared handle together with `copy(false)` to draw
    /// through the caller's buffer.
    #[inline]
    pub fn state(mut self, state: impl Into<StateBuffer>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first seed or state validation error (see
    /// [`IterConfig::validate`]).
    pub fn build(self) -> Result<IterConfig, IterError> {
        let config = IterConfig {
            iter: self.iter.unwrap_or(DEFAULT_ITER),
            prng: self.prng,
            copy: self.copy.unwrap_or(true),
            seed: self.seed,
            state: self.state,
        };

        config.validate()?;
        Ok(config)
    }
}
