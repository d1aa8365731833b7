//! Beta-variate generator.
//!
//! Binds a shape pair `(alpha, beta)` to a uniform source and draws variates
//! with `rand_distr::Beta`.

use std::cell::Ref;

use rand_distr::{Beta, BetaError};

use crate::error::{check_shape, EngineError};
use crate::prng::{ExternalPrng, Prng};
use crate::seed::Seed;
use crate::state::StateBuffer;
use crate::uniform::UniformEngine;

/// Construction options for [`BetaGenerator`].
///
/// | field   | default | effect                                          |
/// |---------|---------|-------------------------------------------------|
/// | `prng`  | `None`  | replaces the engine; seed and state are ignored |
/// | `seed`  | `None`  | deterministic initialisation                    |
/// | `state` | `None`  | resume point; takes precedence over `seed`      |
///
/// A `seed` given alongside `state` is still validated, but the engine
/// reports the seed recorded in the state.
/// | `copy`  | `true`  | duplicate `state` instead of sharing it         |
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// External uniform source.
    pub prng: Option<ExternalPrng>,
    /// Engine seed.
    pub seed: Option<Seed>,
    /// Engine state to resume from.
    pub state: Option<StateBuffer>,
    /// Whether to duplicate `state`.
    pub copy: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            prng: None,
            seed: None,
            state: None,
            copy: true,
        }
    }
}

/// Pseudorandom beta-variate generator.
///
/// # Examples
///
/// ```rust
/// use variate_engine::{BetaGenerator, EngineOptions, Seed};
///
/// let options = EngineOptions {
///     seed: Some(Seed::from(12345_u32)),
///     ..EngineOptions::default()
/// };
/// let mut a = BetaGenerator::new(2.0, 5.0, &options).unwrap();
/// let mut b = BetaGenerator::new(2.0, 5.0, &options).unwrap();
///
/// let x = a.sample();
/// assert_eq!(x, b.sample());
/// assert!((0.0..=1.0).contains(&x));
/// ```
#[derive(Debug)]
pub struct BetaGenerator {
    alpha: f64,
    beta: f64,
    dist: Beta<f64>,
    prng: Prng,
}

impl BetaGenerator {
    /// Creates a generator for the shape pair `(alpha, beta)`.
    ///
    /// Without `options.prng` a [`UniformEngine`] is built from
    /// `options.state` if present, else from `options.seed`, else from
    /// entropy.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if either shape parameter is not finite and positive
    /// - Seed and state validation errors from the engine
    pub fn new(alpha: f64, beta: f64, options: &EngineOptions) -> Result<Self, EngineError> {
        let alpha = check_shape("First", "alpha", alpha)?;
        let beta = check_shape("Second", "beta", beta)?;
        let dist = Beta::new(alpha, beta).map_err(|err| match err {
            BetaError::AlphaTooSmall => EngineError::InvalidShape {
                position: "First",
                name: "alpha",
                value: alpha,
            },
            BetaError::BetaTooSmall => EngineError::InvalidShape {
                position: "Second",
                name: "beta",
                value: beta,
            },
        })?;

        let prng = match (&options.prng, &options.state, &options.seed) {
            (Some(source), _, _) => Prng::External(source.clone()),
            (None, Some(state), seed) => {
                if let Some(seed) = seed {
                    seed.words()?;
                }
                UniformEngine::from_state(state, options.copy)?.into()
            }
            (None, None, Some(seed)) => UniformEngine::from_seed(seed)?.into(),
            (None, None, None) => UniformEngine::from_entropy().into(),
        };

        Ok(Self {
            alpha,
            beta,
            dist,
            prng,
        })
    }

    /// First shape parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Second shape parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Draws one beta variate.
    pub fn sample(&mut self) -> f64 {
        self.prng.sample(&self.dist)
    }

    /// Underlying uniform source.
    pub fn prng(&self) -> &Prng {
        &self.prng
    }

    fn engine(&self) -> Option<Ref<'_, UniformEngine>> {
        match &self.prng {
            Prng::Engine(engine) => Some(engine.borrow()),
            Prng::External(_) => None,
        }
    }

    /// Seed words, `None` for an external source.
    pub fn seed(&self) -> Option<Vec<u32>> {
        self.engine().map(|engine| engine.seed())
    }

    /// Number of seed words, `None` for an external source.
    pub fn seed_length(&self) -> Option<usize> {
        self.engine().map(|engine| engine.seed_length())
    }

    /// Copy of the current state words, `None` for an external source.
    pub fn state(&self) -> Option<Vec<u32>> {
        self.engine().map(|engine| engine.state())
    }

    /// Handle to the engine's working buffer, `None` for an external source.
    pub fn state_buffer(&self) -> Option<StateBuffer> {
        self.engine().map(|engine| engine.state_buffer().clone())
    }

    /// Overwrites the engine state.
    ///
    /// # Errors
    ///
    /// - `StateUnavailable` for an external source
    /// - `StateLength` / `StateVersion` for an invalid buffer
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), EngineError> {
        match &self.prng {
            Prng::Engine(engine) => engine.borrow_mut().set_state(words),
            Prng::External(_) => Err(EngineError::StateUnavailable),
        }
    }

    /// Number of state words, `None` for an external source.
    pub fn state_length(&self) -> Option<usize> {
        self.engine().map(|engine| engine.state_length())
    }

    /// State size in bytes, `None` for an external source.
    pub fn byte_length(&self) -> Option<usize> {
        self.engine().map(|engine| engine.byte_length())
    }
}
