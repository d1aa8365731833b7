//! Uniform sources behind a generator.
//!
//! [`Prng`] is a cheap, cloneable handle over either the crate's own
//! [`UniformEngine`] or an externally supplied uniform source. Clones share
//! the underlying generator: drawing through any clone advances all of them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rand::distributions::Distribution;
use rand::RngCore;

use crate::uniform::UniformEngine;

/// Externally supplied zero-argument uniform source.
///
/// The closure must return values in the open interval (0, 1).
///
/// # Examples
///
/// ```rust
/// use variate_engine::ExternalPrng;
///
/// let mut x = 0.25_f64;
/// let prng = ExternalPrng::new(move || {
///     x = (x + 0.5) % 1.0;
///     x
/// });
/// assert_eq!(prng.call(), 0.75);
/// assert_eq!(prng.clone().call(), 0.25);
/// ```
#[derive(Clone)]
pub struct ExternalPrng(Rc<RefCell<dyn FnMut() -> f64>>);

impl ExternalPrng {
    /// Wraps a uniform source.
    pub fn new(source: impl FnMut() -> f64 + 'static) -> Self {
        Self(Rc::new(RefCell::new(source)))
    }

    /// Draws one uniform value.
    pub fn call(&self) -> f64 {
        (&mut *self.0.borrow_mut())()
    }

    /// Returns `true` when both handles wrap the same source.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ExternalPrng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExternalPrng(..)")
    }
}

/// Handle to the uniform source of a generator.
#[derive(Clone, Debug)]
pub enum Prng {
    /// The crate's own seeded engine.
    Engine(Rc<RefCell<UniformEngine>>),
    /// A caller-supplied uniform source.
    External(ExternalPrng),
}

impl Prng {
    /// Draws one uniform value in (0, 1).
    pub fn next_uniform(&self) -> f64 {
        match self {
            Self::Engine(engine) => engine.borrow_mut().next_uniform(),
            Self::External(source) => source.call(),
        }
    }

    /// Draws one value from `dist` using this source.
    pub fn sample<D: Distribution<f64>>(&self, dist: &D) -> f64 {
        match self {
            Self::Engine(engine) => engine.borrow_mut().sample(dist),
            Self::External(source) => dist.sample(&mut UniformBits(source)),
        }
    }

    /// Returns `true` for an externally supplied source.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }

    /// Returns `true` when both handles share one generator.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Engine(a), Self::Engine(b)) => Rc::ptr_eq(a, b),
            (Self::External(a), Self::External(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<UniformEngine> for Prng {
    fn from(engine: UniformEngine) -> Self {
        Self::Engine(Rc::new(RefCell::new(engine)))
    }
}

impl From<ExternalPrng> for Prng {
    fn from(source: ExternalPrng) -> Self {
        Self::External(source)
    }
}

/// Presents a uniform source as a stream of random bits.
///
/// Each draw `u` in (0, 1) yields the 32 most significant bits of its binary
/// fraction.
struct UniformBits<'a>(&'a ExternalPrng);

impl RngCore for UniformBits<'_> {
    fn next_u32(&mut self) -> u32 {
        // Saturating cast keeps out-of-contract values in range.
        (self.0.call() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
