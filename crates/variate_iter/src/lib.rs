//! # Variate Iterators (Iterator Layer)
//!
//! ## Iterator Layer Role
//!
//! variate_iter turns a beta-variate generator into a resumable sequence
//! object:
//! - Eager validation of shape parameters and options before any engine is built
//! - An iteration cap and a permanent close flag with a pull/stop protocol
//! - Private or shared (`copy(false)`) generator state, with read/write access
//! - Self-duplication that replays a run from its original starting point
//!
//! ## Usage Example
//!
//! ```rust
//! use variate_iter::{iterator, IterConfig};
//!
//! let config = IterConfig::builder()
//!     .seed(12345_u32)
//!     .iter(100)
//!     .build()
//!     .unwrap();
//!
//! let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();
//! let replay = it.duplicate().unwrap();
//!
//! let a: Vec<f64> = it.by_ref().collect();
//! let b: Vec<f64> = replay.collect();
//! assert_eq!(a.len(), 100);
//! assert_eq!(a, b);
//! assert!(it.pull().done);
//! ```
//!
//! ## Shared State
//!
//! ```rust
//! use variate_engine::StateBuffer;
//! use variate_iter::{iterator, IterConfig};
//!
//! let source = iterator(2.0, 5.0, None).unwrap();
//! let shared = StateBuffer::from(source.state().unwrap());
//!
//! let config = IterConfig::builder().state(shared.clone()).copy(false).build().unwrap();
//! let mut a = iterator(2.0, 5.0, Some(&config)).unwrap();
//! let mut b = iterator(2.0, 5.0, Some(&config)).unwrap();
//!
//! // Both draw from one stream; the caller's buffer follows along.
//! a.pull();
//! b.pull();
//! assert_eq!(shared.to_vec(), a.state().unwrap());
//! assert_eq!(shared.to_vec(), b.state().unwrap());
//! ```
//!
//! ## Threading
//!
//! Iterators are single-threaded (`!Send`); every operation completes
//! synchronously without I/O.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod iterator;
pub mod options;

pub use config::{IterConfig, IterConfigBuilder, DEFAULT_ITER};
pub use error::IterError;
pub use iterator::{iterator, iterator_from_options, BetaIterator, Step};
pub use variate_engine::ErrorKind;
