//! # Variate Engine (Engine Layer)
//!
//! ## Engine Layer Role
//!
//! variate_engine supplies the collaborators the iterator layer builds on:
//! - A seeded uniform engine whose full position and seed are exported as a
//!   `u32` state buffer, so a run can be captured, replayed and shared
//! - A cloneable [`Prng`] handle over either that engine or an external
//!   uniform source
//! - A [`BetaGenerator`] binding a shape pair to a uniform source
//!
//! The uniform engine is `rand_chacha::ChaCha12Rng` (the algorithm behind
//! `rand::rngs::StdRng`); beta variates come from `rand_distr::Beta`.
//!
//! ## Usage Example
//!
//! ```rust
//! use variate_engine::{BetaGenerator, EngineOptions, Seed, StateBuffer};
//!
//! let options = EngineOptions {
//!     seed: Some(Seed::from(vec![1234_u32, 5678])),
//!     ..EngineOptions::default()
//! };
//! let mut gen = BetaGenerator::new(2.0, 5.0, &options).unwrap();
//!
//! // Capture a resume point
//! let saved = gen.state().unwrap();
//! let x = gen.sample();
//!
//! // Resume from it
//! let resume = EngineOptions {
//!     state: Some(StateBuffer::from(saved)),
//!     ..EngineOptions::default()
//! };
//! let mut replay = BetaGenerator::new(2.0, 5.0, &resume).unwrap();
//! assert_eq!(replay.sample(), x);
//! ```
//!
//! ## Threading
//!
//! Handles are `Rc`-based and therefore `!Send`. Each generator belongs to a
//! single thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod beta;
pub mod error;
pub mod prng;
pub mod seed;
pub mod state;
pub mod uniform;

pub use beta::{BetaGenerator, EngineOptions};
pub use error::{check_shape, EngineError, ErrorKind};
pub use prng::{ExternalPrng, Prng};
pub use seed::Seed;
pub use state::{check_words, StateBuffer, STATE_HEADER_LENGTH, STATE_VERSION};
pub use uniform::UniformEngine;
