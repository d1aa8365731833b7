//! Exportable engine state.
//!
//! The full position of the uniform engine, together with the seed that
//! produced it, is captured in a buffer of `u32` words:
//!
//! | words    | content                         |
//! |----------|---------------------------------|
//! | `0`      | schema version                  |
//! | `1..9`   | ChaCha key                      |
//! | `9..11`  | stream id (low word first)      |
//! | `11..15` | word position (low word first)  |
//! | `15`     | seed length `n`                 |
//! | `16..`   | `n` seed words                  |
//!
//! A [`StateBuffer`] is a shared handle to such a buffer. Cloning the handle
//! aliases the buffer; [`StateBuffer::detached`] produces an independent copy.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::error::EngineError;

/// Schema version written to word 0.
pub const STATE_VERSION: u32 = 1;

/// Number of words preceding the seed section.
pub const STATE_HEADER_LENGTH: usize = 16;

const KEY: std::ops::Range<usize> = 1..9;
const STREAM: std::ops::Range<usize> = 9..11;
const WORD_POS: std::ops::Range<usize> = 11..15;
const SEED_LENGTH: usize = 15;

/// Number of words in the state of an engine seeded with `seed_length` words.
pub const fn state_length(seed_length: usize) -> usize {
    STATE_HEADER_LENGTH + seed_length
}

/// Size in bytes of a state buffer holding `words` words.
pub const fn byte_length(words: usize) -> usize {
    words * std::mem::size_of::<u32>()
}

/// Shared, mutable state buffer.
///
/// # Examples
///
/// ```rust
/// use variate_engine::StateBuffer;
///
/// let a = StateBuffer::from(vec![1_u32, 2, 3]);
/// let alias = a.clone();
/// let copy = a.detached();
///
/// assert!(a.ptr_eq(&alias));
/// assert!(!a.ptr_eq(&copy));
/// assert_eq!(copy.to_vec(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Default)]
pub struct StateBuffer(Rc<RefCell<Vec<u32>>>);

impl StateBuffer {
    /// Wraps `words` in a new, unshared buffer.
    pub fn new(words: Vec<u32>) -> Self {
        Self(Rc::new(RefCell::new(words)))
    }

    /// Returns an independent copy of the buffer contents.
    pub fn detached(&self) -> Self {
        Self::new(self.to_vec())
    }

    /// Returns `true` when both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copies the current words out of the buffer.
    pub fn to_vec(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }

    /// Number of words in the buffer.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if the buffer holds no words.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Overwrites the buffer contents in place.
    ///
    /// Every handle aliasing this buffer observes the new words, including
    /// engines drawing through it, which resume from the new position on
    /// their next draw.
    ///
    /// # Errors
    ///
    /// `StateLength` / `StateVersion` when `words` is not a valid state; the
    /// buffer is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variate_engine::{Seed, StateBuffer, UniformEngine};
    ///
    /// let mut engine = UniformEngine::from_seed(&Seed::from(3_u32)).unwrap();
    /// let start = engine.state();
    /// let first = engine.next_uniform();
    ///
    /// let shared = engine.state_buffer().clone();
    /// shared.set(&start).unwrap();
    /// assert_eq!(engine.next_uniform(), first);
    /// assert!(shared.set(&[1, 2, 3]).is_err());
    /// ```
    pub fn set(&self, words: &[u32]) -> Result<(), EngineError> {
        check_words(words)?;
        let mut buffer = self.0.borrow_mut();
        buffer.clear();
        buffer.extend_from_slice(words);
        Ok(())
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Vec<u32>> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Vec<u32>> {
        self.0.borrow_mut()
    }
}

impl From<Vec<u32>> for StateBuffer {
    fn from(words: Vec<u32>) -> Self {
        Self::new(words)
    }
}

impl From<&[u32]> for StateBuffer {
    fn from(words: &[u32]) -> Self {
        Self::new(words.to_vec())
    }
}

impl fmt::Debug for StateBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateBuffer").field(&*self.0.borrow()).finish()
    }
}

/// Checks that `words` is a state buffer this engine can resume from.
///
/// # Errors
///
/// - `StateLength` if `words` is shorter than a header plus one seed word,
///   or if its length disagrees with the recorded seed length
/// - `StateVersion` if word 0 is not `STATE_VERSION`
pub fn check_words(words: &[u32]) -> Result<(), EngineError> {
    if words.len() <= STATE_HEADER_LENGTH {
        return Err(EngineError::StateLength {
            expected: state_length(1),
            actual: words.len(),
        });
    }
    if words[0] != STATE_VERSION {
        return Err(EngineError::StateVersion {
            expected: STATE_VERSION,
            actual: words[0],
        });
    }
    let seed_length = words[SEED_LENGTH] as usize;
    if seed_length == 0 || state_length(seed_length) != words.len() {
        return Err(EngineError::StateLength {
            expected: state_length(seed_length.max(1)),
            actual: words.len(),
        });
    }
    Ok(())
}

/// Builds the starting state for a seed: stream 0, word position 0.
pub(crate) fn initial_words(key: &[u32; 8], seed: &[u32]) -> Vec<u32> {
    let mut words = vec![0u32; state_length(seed.len())];
    words[0] = STATE_VERSION;
    words[KEY].copy_from_slice(key);
    words[SEED_LENGTH] = seed.len() as u32;
    words[STATE_HEADER_LENGTH..].copy_from_slice(seed);
    words
}

/// Seed words of a validated state buffer.
pub(crate) fn seed_words(words: &[u32]) -> &[u32] {
    &words[STATE_HEADER_LENGTH..]
}

/// Rebuilds the ChaCha core described by a validated state buffer.
pub(crate) fn decode(words: &[u32]) -> ChaCha12Rng {
    let mut key = [0u8; 32];
    for (bytes, word) in key.chunks_exact_mut(4).zip(&words[KEY]) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    let stream = join(&words[STREAM]);
    let word_pos = join(&words[WORD_POS]);

    let mut rng = ChaCha12Rng::from_seed(key);
    rng.set_stream(stream as u64);
    rng.set_word_pos(word_pos);
    rng
}

/// Writes the stream and word position of `rng` back into `words`.
pub(crate) fn encode_position(rng: &ChaCha12Rng, words: &mut [u32]) {
    split(u128::from(rng.get_stream()), &mut words[STREAM]);
    split(rng.get_word_pos(), &mut words[WORD_POS]);
}

fn join(words: &[u32]) -> u128 {
    words
        .iter()
        .rev()
        .fold(0u128, |acc, &word| (acc << 32) | u128::from(word))
}

fn split(mut value: u128, words: &mut [u32]) {
    for word in words.iter_mut() {
        *word = value as u32;
        value >>= 32;
    }
}
