//! Seeded uniform engine backed by an exportable state buffer.
//!
//! The engine treats its [`StateBuffer`] as the source of truth. A decoded
//! ChaCha core is cached between draws and rebuilt whenever the buffer no
//! longer matches what the engine last wrote, which happens when another
//! engine sharing the buffer has drawn or when the state was overwritten.

use std::fmt;

use rand::distributions::{Distribution, Open01};
use rand::Rng;
use rand_chacha::ChaCha12Rng;

use crate::error::EngineError;
use crate::seed::{derive_key, Seed};
use crate::state::{self, StateBuffer};

/// Uniform pseudorandom engine with seed and state introspection.
///
/// # Examples
///
/// ```rust
/// use variate_engine::{Seed, UniformEngine};
///
/// let mut a = UniformEngine::from_seed(&Seed::from(42_u32)).unwrap();
/// let mut b = UniformEngine::from_seed(&Seed::from(42_u32)).unwrap();
/// assert_eq!(a.next_uniform(), b.next_uniform());
///
/// let u = a.next_uniform();
/// assert!(u > 0.0 && u < 1.0);
/// ```
pub struct UniformEngine {
    state: StateBuffer,
    rng: ChaCha12Rng,
    synced: Vec<u32>,
}

impl UniformEngine {
    /// Creates an engine from a seed.
    ///
    /// # Errors
    ///
    /// Returns the seed validation error (see [`Seed::words`]).
    pub fn from_seed(seed: &Seed) -> Result<Self, EngineError> {
        let words = seed.words()?;
        Ok(Self::seeded(&words))
    }

    /// Creates an engine seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        let word: u32 = rand::thread_rng().gen_range(1..=u32::MAX);
        Self::seeded(&[word])
    }

    fn seeded(seed: &[u32]) -> Self {
        Self::attach(StateBuffer::new(state::initial_words(&derive_key(seed), seed)))
    }

    /// Creates an engine resuming from `buffer`.
    ///
    /// With `copy == false` the engine draws directly through the caller's
    /// buffer, so every holder of that buffer observes each draw. Otherwise
    /// the engine works on a private duplicate.
    ///
    /// The seed reported by the engine is the one recorded in the buffer.
    ///
    /// # Errors
    ///
    /// `StateLength` / `StateVersion` when the buffer is not a valid state.
    pub fn from_state(buffer: &StateBuffer, copy: bool) -> Result<Self, EngineError> {
        state::check_words(&buffer.borrow())?;
        let buffer = if copy {
            buffer.detached()
        } else {
            buffer.clone()
        };
        tracing::debug!(shared = !copy, words = buffer.len(), "restoring uniform engine from state buffer");
        Ok(Self::attach(buffer))
    }

    fn attach(buffer: StateBuffer) -> Self {
        let synced = buffer.to_vec();
        let rng = state::decode(&synced);
        Self {
            state: buffer,
            rng,
            synced,
        }
    }

    /// Seed words recorded in the current state.
    pub fn seed(&self) -> Vec<u32> {
        state::seed_words(&self.state.borrow()).to_vec()
    }

    /// Number of seed words.
    pub fn seed_length(&self) -> usize {
        self.state.len() - state::STATE_HEADER_LENGTH
    }

    /// Copy of the current state words.
    pub fn state(&self) -> Vec<u32> {
        self.state.to_vec()
    }

    /// Handle to the working buffer.
    pub fn state_buffer(&self) -> &StateBuffer {
        &self.state
    }

    /// Overwrites the working state in place.
    ///
    /// A shared buffer is mutated rather than replaced, so every engine
    /// drawing through it jumps to the new position.
    ///
    /// # Errors
    ///
    /// `StateLength` / `StateVersion` when `words` is not a valid state.
    pub fn set_state(&mut self, words: &[u32]) -> Result<(), EngineError> {
        self.state.set(words)
    }

    /// Number of words in the state buffer.
    pub fn state_length(&self) -> usize {
        self.state.len()
    }

    /// Size of the state buffer in bytes.
    pub fn byte_length(&self) -> usize {
        state::byte_length(self.state.len())
    }

    /// Draws a uniform value in the open interval (0, 1).
    pub fn next_uniform(&mut self) -> f64 {
        self.sample(&Open01)
    }

    /// Draws one value from `dist`, consuming as many words as it needs.
    pub fn sample<D: Distribution<f64>>(&mut self, dist: &D) -> f64 {
        self.with_rng(|rng| dist.sample(rng))
    }

    fn with_rng<T>(&mut self, draw: impl FnOnce(&mut ChaCha12Rng) -> T) -> T {
        {
            let words = self.state.borrow();
            if *words != self.synced {
                self.rng = state::decode(&words);
                self.synced.clone_from(&words);
            }
        }

        let out = draw(&mut self.rng);

        let mut words = self.state.borrow_mut();
        state::encode_position(&self.rng, &mut words);
        self.synced.clone_from(&words);
        out
    }
}

impl fmt::Debug for UniformEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
