//! # CINDER Core
//!
//! Building blocks shared by every CINDER crate:
//! - [`GameTime`] - the simulation clock unit (integer milliseconds)
//! - [`Vec3`] / [`Axis`] - the small amount of 3D math effects need
//! - [`Sampler`] - uniform, symmetric and periodic pseudo-random streams
//! - [`RingPool`] - fixed-capacity storage that overwrites its oldest slot
//!
//! ## Architecture Rules
//!
//! 1. **Fixed memory** - pools are sized once and never grow
//! 2. **No effect semantics** - this crate knows nothing about explosions
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_core::{RingPool, Sampler};
//!
//! let mut pool: RingPool<u32> = RingPool::new(512);
//! let mut sampler = Sampler::from_seed(7);
//! let handle = pool.allocate(sampler.below(100));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod math;
pub mod random;
pub mod ring;

pub use math::{Axis, Vec3};
pub use random::Sampler;
pub use ring::{RingHandle, RingPool};

/// Simulation clock value in milliseconds.
///
/// Monotonically non-decreasing within a session. Signed so that effects
/// may be back-dated slightly before session start.
pub type GameTime = i64;

/// Milliseconds per second, for converting [`GameTime`] spans.
pub const MILLIS_PER_SECOND: f32 = 1000.0;

/// Converts a span of [`GameTime`] to seconds.
#[inline]
#[must_use]
pub fn millis_to_secs(span: GameTime) -> f32 {
    span as f32 / MILLIS_PER_SECOND
}
