//! Closed-form motion curves.
//!
//! A [`Trajectory`] never integrates: every query computes the state from
//! the stored base, the reference time and the elapsed span. Querying at
//! any time gives the same answer no matter how often (or whether) it was
//! queried before, so variable frame rates and interpolated render times
//! need no special handling.
//!
//! There is no clamping. Entities past their window are dropped by the
//! pool's lifetime check, not by the motion model.

use cinder_core::{GameTime, Vec3, MILLIS_PER_SECOND};
use std::f64::consts::TAU;

/// Downward acceleration used for ballistic effects, in units/s².
pub const GRAVITY: f32 = 800.0;

/// How a trajectory moves away from its base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Fixed at the base.
    Stationary,
    /// `base + velocity·t`
    Linear {
        /// Units per second.
        velocity: Vec3,
    },
    /// `base + velocity·t + ½·acceleration·t²`
    Accelerated {
        /// Initial velocity, units per second.
        velocity: Vec3,
        /// Constant acceleration, units per second squared.
        acceleration: Vec3,
    },
    /// `base + amplitude·sin(2π·t/period)`
    Periodic {
        /// Peak displacement.
        amplitude: Vec3,
        /// Milliseconds per full oscillation.
        period: GameTime,
    },
}

/// A position or orientation evolving over time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    /// State at `reference_time`.
    pub base: Vec3,
    /// Time at which the trajectory equals `base`.
    pub reference_time: GameTime,
    /// Curve applied to elapsed time.
    pub motion: Motion,
}

impl Trajectory {
    /// Never moves.
    #[must_use]
    pub const fn stationary(base: Vec3) -> Self {
        Self {
            base,
            reference_time: 0,
            motion: Motion::Stationary,
        }
    }

    /// Constant velocity from `base` starting at `time`.
    #[must_use]
    pub const fn linear(base: Vec3, velocity: Vec3, time: GameTime) -> Self {
        Self {
            base,
            reference_time: time,
            motion: Motion::Linear { velocity },
        }
    }

    /// Constant acceleration from `base` starting at `time`.
    #[must_use]
    pub const fn accelerated(
        base: Vec3,
        velocity: Vec3,
        acceleration: Vec3,
        time: GameTime,
    ) -> Self {
        Self {
            base,
            reference_time: time,
            motion: Motion::Accelerated {
                velocity,
                acceleration,
            },
        }
    }

    /// Ballistic flight under [`GRAVITY`].
    #[must_use]
    pub const fn gravity(base: Vec3, velocity: Vec3, time: GameTime) -> Self {
        Self::accelerated(base, velocity, Vec3::new(0.0, 0.0, -GRAVITY), time)
    }

    /// Oscillation about `base`.
    ///
    /// A non-zero phase is expressed by shifting `time`.
    #[must_use]
    pub const fn periodic(base: Vec3, amplitude: Vec3, period: GameTime, time: GameTime) -> Self {
        Self {
            base,
            reference_time: time,
            motion: Motion::Periodic { amplitude, period },
        }
    }

    /// State at absolute time `time`.
    #[must_use]
    pub fn evaluate(&self, time: GameTime) -> Vec3 {
        self.evaluate_elapsed(elapsed_secs(self.reference_time, time))
    }

    /// State `secs` seconds after the reference time.
    #[must_use]
    pub fn evaluate_elapsed(&self, secs: f64) -> Vec3 {
        match self.motion {
            Motion::Stationary => self.base,
            Motion::Linear { velocity } => Vec3::new(
                axis_linear(self.base.x, velocity.x, secs),
                axis_linear(self.base.y, velocity.y, secs),
                axis_linear(self.base.z, velocity.z, secs),
            ),
            Motion::Accelerated {
                velocity,
                acceleration,
            } => Vec3::new(
                axis_accelerated(self.base.x, velocity.x, acceleration.x, secs),
                axis_accelerated(self.base.y, velocity.y, acceleration.y, secs),
                axis_accelerated(self.base.z, velocity.z, acceleration.z, secs),
            ),
            Motion::Periodic { amplitude, period } => {
                if period <= 0 {
                    return self.base;
                }
                let cycles = secs * f64::from(MILLIS_PER_SECOND) / period as f64;
                let phase = (cycles * TAU).sin() as f32;
                self.base.mul_add(amplitude, phase)
            }
        }
    }

    /// Rate of change at absolute time `time`, per second.
    #[must_use]
    pub fn velocity_at(&self, time: GameTime) -> Vec3 {
        let secs = elapsed_secs(self.reference_time, time);
        match self.motion {
            Motion::Stationary => Vec3::ZERO,
            Motion::Linear { velocity } => velocity,
            Motion::Accelerated {
                velocity,
                acceleration,
            } => velocity.mul_add(acceleration, secs as f32),
            Motion::Periodic { amplitude, period } => {
                if period <= 0 {
                    return Vec3::ZERO;
                }
                let period_secs = period as f64 / f64::from(MILLIS_PER_SECOND);
                let cycles = secs / period_secs;
                let rate = ((cycles * TAU).cos() * TAU / period_secs) as f32;
                amplitude * rate
            }
        }
    }

    /// Restarts the curve at `time` from its current state with a new velocity.
    ///
    /// Periodic and stationary curves keep their shape and only move their base.
    pub fn rebase(&mut self, time: GameTime, velocity: Vec3) {
        self.base = self.evaluate(time);
        self.reference_time = time;
        match &mut self.motion {
            Motion::Linear { velocity: v } | Motion::Accelerated { velocity: v, .. } => {
                *v = velocity;
            }
            Motion::Stationary | Motion::Periodic { .. } => {}
        }
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::stationary(Vec3::ZERO)
    }
}

fn elapsed_secs(from: GameTime, to: GameTime) -> f64 {
    (to - from) as f64 / f64::from(MILLIS_PER_SECOND)
}

fn axis_linear(base: f32, velocity: f32, t: f64) -> f32 {
    (f64::from(base) + f64::from(velocity) * t) as f32
}

fn axis_accelerated(base: f32, velocity: f32, acceleration: f32, t: f64) -> f32 {
    (f64::from(base) + f64::from(velocity) * t + 0.5 * f64::from(acceleration) * t * t) as f32
}
