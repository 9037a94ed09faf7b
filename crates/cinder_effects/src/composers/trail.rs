//! Underwater bubble trails.

use cinder_core::{GameTime, Vec3};

use super::{contract_violation, Effects};
use crate::entity::{EntityFlags, EntityKind, LocalEntity, RenderTemplate};
use crate::error::{EffectError, EffectResult};
use crate::trajectory::Trajectory;

/// Bubble sprite radius.
const BUBBLE_RADIUS: f32 = 3.0;
/// Shortest bubble life, in ms.
const BUBBLE_LIFE: GameTime = 1000;
/// Random extra life, in ms.
const BUBBLE_LIFE_JITTER: f32 = 250.0;

impl Effects {
    /// Strings bubbles along `start..end`, one roughly every `spacing` units.
    ///
    /// The first bubble is placed a random distance below `spacing` from
    /// `start` so consecutive segments of a moving projectile do not line
    /// up. Returns the number of bubbles placed, which is capped at the pool
    /// capacity: for longer trails only the stretch nearest `end` is built.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidSpacing`] if `spacing` is below one unit.
    pub fn bubble_trail(
        &mut self,
        now: GameTime,
        start: Vec3,
        end: Vec3,
        spacing: f32,
    ) -> EffectResult<usize> {
        if !self.toggles().projectile_trails {
            tracing::trace!("Bubble trail skipped: projectile trails disabled");
            return Ok(0);
        }
        if spacing.is_nan() || spacing < 1.0 {
            return Err(contract_violation(EffectError::InvalidSpacing(spacing)));
        }

        let delta = end - start;
        let Some(dir) = delta.try_normalize() else {
            return Ok(0);
        };
        let length = f64::from(delta.length());
        let step = f64::from(spacing);

        let phase = f64::from(self.sampler.below(spacing as u32));
        let count = if phase < length {
            ((length - phase) / step).ceil() as u64
        } else {
            0
        };
        // Only the last pool's worth would survive the call anyway.
        let skip = count.saturating_sub(self.pool.capacity() as u64);

        for i in skip..count {
            let along = (phase + i as f64 * step) as f32;
            let point = start.mul_add(dir, along);
            let drift = Vec3::new(
                self.sampler.crandom() * 5.0,
                self.sampler.crandom() * 5.0,
                self.sampler.crandom() * 5.0 + 6.0,
            );
            let life = BUBBLE_LIFE + (self.sampler.random() * BUBBLE_LIFE_JITTER) as GameTime;

            let template = RenderTemplate {
                radius: BUBBLE_RADIUS,
                shader: Some(self.assets.shaders.water_bubble),
                shader_time: self.shader_time(now),
                ..RenderTemplate::default()
            };
            let bubble = LocalEntity::new(EntityKind::MoveScaleFade, now, now + life)?
                .with_flags(EntityFlags::PUFF_DONT_SCALE)
                .with_position(Trajectory::linear(point, drift, now))
                .with_template(template);
            self.pool.allocate(bubble);
        }

        Ok((count - skip) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::effects;
    use super::*;

    #[test]
    fn test_trail_density_matches_spacing() {
        let mut fx = effects(3);
        let placed = fx
            .bubble_trail(0, Vec3::ZERO, Vec3::new(320.0, 0.0, 0.0), 32.0)
            .unwrap();
        assert_eq!(placed, 10);
        assert_eq!(fx.pool().occupied(), placed);

        for (_, le) in fx.pool().iter() {
            let life = le.expire_time() - le.spawn_time();
            assert!((1000..1250).contains(&life));
            assert!(le.flags().contains(EntityFlags::PUFF_DONT_SCALE));
        }
    }

    #[test]
    fn test_long_trail_keeps_the_tail() {
        let mut fx = effects(5);
        let end = Vec3::new(2.0e7, 0.0, 0.0);
        let placed = fx.bubble_trail(0, Vec3::ZERO, end, 1.0).unwrap();

        let capacity = fx.pool().capacity();
        assert_eq!(placed, capacity);
        assert_eq!(fx.pool().occupied(), capacity);
        for (_, le) in fx.pool().iter() {
            let x = le.position().base.x;
            assert!(x > end.x - 300.0 && x <= end.x, "bubble at {x}");
        }
    }

    #[test]
    fn test_trail_phase_varies() {
        let mut fx = effects(11);
        let mut firsts = Vec::new();
        for _ in 0..8 {
            fx.pool_mut().clear();
            fx.bubble_trail(0, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), 16.0)
                .unwrap();
            let first = fx.pool().iter().next().unwrap().1.position().base.x;
            firsts.push(first as i32);
        }
        firsts.dedup();
        assert!(firsts.len() > 1);
    }

    #[test]
    fn test_trail_rejects_tiny_spacing() {
        let mut fx = effects(1);
        assert!(matches!(
            fx.bubble_trail(0, Vec3::ZERO, Vec3::X, 0.5),
            Err(EffectError::InvalidSpacing(_))
        ));
        assert!(fx.bubble_trail(0, Vec3::ZERO, Vec3::X, f32::NAN).is_err());
        assert_eq!(fx.pool().occupied(), 0);
    }

    #[test]
    fn test_trail_toggle_off() {
        let mut fx = effects(1);
        fx.toggles_mut().projectile_trails = false;
        assert_eq!(
            fx.bubble_trail(0, Vec3::ZERO, Vec3::new(500.0, 0.0, 0.0), 8.0)
                .unwrap(),
            0
        );
        assert_eq!(fx.pool().occupied(), 0);
    }
}
