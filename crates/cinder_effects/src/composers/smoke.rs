//! Smoke puffs and impact mist.

use cinder_core::{GameTime, Vec3};

use super::{contract_violation, window_end, Effects};
use crate::assets::ShaderHandle;
use crate::entity::{EntityFlags, EntityKind, LocalEntity, RenderTemplate};
use crate::error::{EffectError, EffectResult};
use crate::pool::EntityHandle;
use crate::render::to_byte;
use crate::trajectory::Trajectory;

/// Parameters for a single smoke puff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmokePuff {
    /// Where the puff starts.
    pub origin: Vec3,
    /// Drift, units per second.
    pub velocity: Vec3,
    /// Radius the puff grows by over its life.
    pub radius: f32,
    /// RGBA tint; alpha scales the fade.
    pub color: [f32; 4],
    /// Life in ms.
    pub duration: GameTime,
    /// Spawn time.
    pub start_time: GameTime,
    /// End of the fade-in; at or before `start_time` for none.
    pub fade_in_time: GameTime,
    /// Behaviour flags.
    pub flags: EntityFlags,
    /// Sprite shader.
    pub shader: ShaderHandle,
}

impl SmokePuff {
    /// Stationary opaque white puff with no fade-in.
    #[must_use]
    pub const fn new(
        origin: Vec3,
        radius: f32,
        start_time: GameTime,
        duration: GameTime,
        shader: ShaderHandle,
    ) -> Self {
        Self {
            origin,
            velocity: Vec3::ZERO,
            radius,
            color: [1.0; 4],
            duration,
            start_time,
            fade_in_time: 0,
            flags: EntityFlags::empty(),
            shader,
        }
    }
}

impl Effects {
    /// Spawns one smoke puff.
    ///
    /// The fade-out runs from the later of `fade_in_time` and `start_time`
    /// to expiry. Backends without alpha blending get the flat puff shader
    /// and an opaque white tint instead.
    ///
    /// # Errors
    ///
    /// [`EffectError::NonPositiveDuration`] if `duration <= 0`, or
    /// [`EffectError::DurationOverflow`] if the puff would expire past the
    /// end of the clock.
    pub fn smoke_puff(&mut self, puff: &SmokePuff) -> EffectResult<EntityHandle> {
        let entity = self.build_puff(puff)?;
        Ok(self.pool.allocate(entity))
    }

    pub(super) fn build_puff(&mut self, puff: &SmokePuff) -> EffectResult<LocalEntity> {
        if puff.duration <= 0 {
            return Err(contract_violation(EffectError::NonPositiveDuration {
                effect: "smoke_puff",
                duration: puff.duration,
            }));
        }

        let expire = window_end("smoke_puff", puff.start_time, puff.duration)?;

        let (shader, rgba) = if self.caps.alpha_blend {
            let [r, g, b, _] = puff.color;
            (puff.shader, [to_byte(r), to_byte(g), to_byte(b), 0xff])
        } else {
            (self.assets.shaders.smoke_puff_flat, [0xff; 4])
        };

        let template = RenderTemplate {
            rotation: self.sampler.periodic() * 360.0,
            radius: puff.radius,
            shader: Some(shader),
            rgba,
            shader_time: self.shader_time(puff.start_time),
            ..RenderTemplate::default()
        };

        let entity = LocalEntity::new(EntityKind::MoveScaleFade, puff.start_time, expire)
        .and_then(|le| le.with_fade_in(puff.fade_in_time))
        .map_err(contract_violation)?
        .with_flags(puff.flags)
        .with_radius(puff.radius)
        .with_color(puff.color)
        .with_position(Trajectory::linear(puff.origin, puff.velocity, puff.start_time))
        .with_template(template);

        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{effects, effects_with};
    use super::*;
    use crate::assets::SequentialResolver;
    use crate::config::EffectsConfig;
    use crate::render::RenderCapabilities;

    fn puff(fx: &Effects) -> SmokePuff {
        SmokePuff::new(Vec3::ZERO, 20.0, 1000, 2000, fx.assets().shaders.smoke_puff)
    }

    #[test]
    fn test_fade_rate_without_fade_in() {
        let mut fx = effects(1);
        let mut p = puff(&fx);
        p.fade_in_time = 1000;
        let h = fx.smoke_puff(&p).unwrap();
        let le = fx.pool().get(h).unwrap();
        assert_eq!(le.fade_rate(), 1.0 / (le.expire_time() - le.spawn_time()) as f32);
    }

    #[test]
    fn test_fade_rate_with_fade_in() {
        let mut fx = effects(1);
        let mut p = puff(&fx);
        p.fade_in_time = 1500;
        let h = fx.smoke_puff(&p).unwrap();
        let le = fx.pool().get(h).unwrap();
        assert_eq!(le.fade_rate(), 1.0 / (le.expire_time() - 1500) as f32);
        assert_eq!(le.expire_time(), 3000);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let mut fx = effects(1);
        let mut p = puff(&fx);
        p.duration = 0;
        assert!(matches!(
            fx.smoke_puff(&p),
            Err(EffectError::NonPositiveDuration { .. })
        ));
        p.duration = 500;
        p.fade_in_time = 1500;
        assert!(fx.smoke_puff(&p).is_err());
        assert_eq!(fx.pool().occupied(), 0);
    }

    #[test]
    fn test_rejects_duration_past_end_of_clock() {
        let mut fx = effects(1);
        let mut p = puff(&fx);
        p.duration = GameTime::MAX;
        assert!(matches!(
            fx.smoke_puff(&p),
            Err(EffectError::DurationOverflow { start_time: 1000, duration, .. }) if duration == GameTime::MAX
        ));
        assert_eq!(fx.pool().occupied(), 0);
    }

    #[test]
    fn test_flat_shader_without_alpha_blend() {
        let assets = crate::EffectAssets::resolve(&mut SequentialResolver::new());
        let caps = RenderCapabilities {
            alpha_blend: false,
            ..RenderCapabilities::default()
        };
        let mut fx = Effects::new(EffectsConfig::default(), caps, assets).unwrap();
        let mut p = puff(&fx);
        p.color = [0.5, 0.5, 0.5, 0.3];
        let h = fx.smoke_puff(&p).unwrap();
        let template = fx.pool().get(h).unwrap().template();
        assert_eq!(template.shader, Some(assets.shaders.smoke_puff_flat));
        assert_eq!(template.rgba, [0xff; 4]);

        let mut blended = effects_with(EffectsConfig::default());
        let h = blended.smoke_puff(&p).unwrap();
        let template = blended.pool().get(h).unwrap().template();
        assert_eq!(template.shader, Some(p.shader));
        assert_eq!(template.rgba, [127, 127, 127, 0xff]);
    }

    #[test]
    fn test_rotation_follows_periodic_stream() {
        let mut a = effects(1);
        let mut b = effects(999);
        for _ in 0..4 {
            let p = puff(&a);
            let ha = a.smoke_puff(&p).unwrap();
            let hb = b.smoke_puff(&p).unwrap();
            assert_eq!(
                a.pool().get(ha).unwrap().template().rotation,
                b.pool().get(hb).unwrap().template().rotation
            );
        }
    }
}
