//! Engine seeds.
//!
//! A seed is either a single positive integer or a non-empty list of
//! integers. Every word must fit in 32 bits; wider values are accepted by the
//! type so that out-of-range input can be reported rather than truncated.

use crate::error::EngineError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seed for the uniform engine.
///
/// # Examples
///
/// ```rust
/// use variate_engine::Seed;
///
/// assert_eq!(Seed::from(12345_u32).words().unwrap(), vec![12345]);
/// assert_eq!(Seed::from(vec![1234_u32, 5678]).words().unwrap(), vec![1234, 5678]);
/// assert!(Seed::Scalar(u64::from(u32::MAX) + 1).words().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Seed {
    /// Single positive integer.
    Scalar(u64),
    /// Ordered, non-empty list of words.
    Words(Vec<u64>),
}

impl Seed {
    /// Validates the seed and returns its 32-bit words.
    ///
    /// # Errors
    ///
    /// - `InvalidSeed` for a zero scalar, an empty list or a list holding
    ///   only a zero
    /// - `SeedOutOfRange` for any word above `u32::MAX`
    pub fn words(&self) -> Result<Vec<u32>, EngineError> {
        match self {
            Self::Scalar(0) => Err(EngineError::InvalidSeed {
                reason: "Value: `0`".to_string(),
            }),
            Self::Scalar(value) => Ok(vec![narrow(0, *value)?]),
            Self::Words(words) if words.is_empty() => Err(EngineError::InvalidSeed {
                reason: "Value: `[]`".to_string(),
            }),
            // A one-word list is held to the scalar rule.
            Self::Words(words) if words[..] == [0] => Err(EngineError::InvalidSeed {
                reason: "Value: `[0]`".to_string(),
            }),
            Self::Words(words) => words
                .iter()
                .enumerate()
                .map(|(index, &value)| narrow(index, value))
                .collect(),
        }
    }
}

fn narrow(index: usize, value: u64) -> Result<u32, EngineError> {
    u32::try_from(value).map_err(|_| EngineError::SeedOutOfRange { index, value })
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self::Scalar(u64::from(value))
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<u32>> for Seed {
    fn from(words: Vec<u32>) -> Self {
        Self::Words(words.into_iter().map(u64::from).collect())
    }
}

impl From<&[u32]> for Seed {
    fn from(words: &[u32]) -> Self {
        Self::Words(words.iter().copied().map(u64::from).collect())
    }
}

impl From<Vec<u64>> for Seed {
    fn from(words: Vec<u64>) -> Self {
        Self::Words(words)
    }
}

/// Derives a 256-bit ChaCha key from seed words.
///
/// Every word contributes to every key slot; the result depends on both the
/// values and the order of the words.
pub(crate) fn derive_key(words: &[u32]) -> [u32; 8] {
    let mut acc = KEY_SALT ^ words.len() as u64;
    let mut key = [0u32; 8];
    for (i, &word) in words.iter().enumerate() {
        acc = splitmix64(acc ^ (u64::from(word) | ((i as u64) << 32)));
        key[i % 8] ^= acc as u32;
        key[(i + 1) % 8] ^= (acc >> 32) as u32;
    }
    for slot in key.iter_mut() {
        acc = splitmix64(acc ^ u64::from(*slot));
        *slot = (acc ^ (acc >> 32)) as u32;
    }
    key
}

const KEY_SALT: u64 = 0x6a09_e667_f3bc_c908;

/// SplitMix64 finaliser.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
