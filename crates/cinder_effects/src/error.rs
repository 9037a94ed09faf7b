//! # Effects Error Types
//!
//! Contract violations and configuration failures. Running out of pool
//! slots and disabled toggles are not errors and never show up here.

use cinder_core::GameTime;
use thiserror::Error;

/// Errors that can occur while building effects.
#[derive(Error, Debug)]
pub enum EffectError {
    /// An effect was requested with a zero or negative duration.
    #[error("{effect}: duration must be positive, got {duration} ms")]
    NonPositiveDuration {
        /// Composer that rejected the request.
        effect: &'static str,
        /// The offending duration.
        duration: GameTime,
    },

    /// An effect duration runs past the end of the clock.
    #[error("{effect}: duration {duration} ms from {start_time} overflows the clock")]
    DurationOverflow {
        /// Composer that rejected the request.
        effect: &'static str,
        /// Requested start of the window.
        start_time: GameTime,
        /// The offending duration.
        duration: GameTime,
    },

    /// An entity window does not end after it starts.
    #[error("entity expires at {expire_time} but spawns at {spawn_time}")]
    InvalidLifetime {
        /// Requested spawn time.
        spawn_time: GameTime,
        /// Requested expiry time.
        expire_time: GameTime,
    },

    /// A trail was requested with a spacing below one unit.
    #[error("trail spacing must be at least 1 unit, got {0}")]
    InvalidSpacing(f32),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for EffectError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;
