//! Teleport flashes.

use cinder_core::{GameTime, Vec3};

use super::Effects;
use crate::config::GameVariant;
use crate::entity::{EntityKind, LocalEntity, RenderTemplate};
use crate::error::EffectResult;
use crate::pool::EntityHandle;
use crate::render::Shape;
use crate::trajectory::Trajectory;

const SPAWN_FLASH_LIFE: GameTime = 500;

impl Effects {
    /// Flash for a player teleporting in or out at `origin`.
    ///
    /// # Errors
    ///
    /// [`crate::EffectError::InvalidLifetime`] is propagated from entity
    /// construction; the fixed lifetimes used here never trigger it.
    pub fn spawn_effect(&mut self, now: GameTime, origin: Vec3) -> EffectResult<EntityHandle> {
        let (lift, shader) = match self.config.variant {
            GameVariant::Classic => (-24.0, Some(self.assets.shaders.teleport_effect)),
            GameVariant::TeamArena => (16.0, None),
        };

        let template = RenderTemplate {
            shape: Shape::Model,
            model: Some(self.assets.models.teleport_effect),
            shader,
            shader_time: self.shader_time(now),
            ..RenderTemplate::default()
        };
        let flash = LocalEntity::new(EntityKind::FadeRgb, now, now + SPAWN_FLASH_LIFE)?
            .with_position(Trajectory::stationary(origin + Vec3::new(0.0, 0.0, lift)))
            .with_template(template);

        Ok(self.pool.allocate(flash))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::effects_with;
    use super::*;
    use crate::config::EffectsConfig;

    #[test]
    fn test_variant_placement() {
        let mut classic = effects_with(EffectsConfig::default());
        let h = classic.spawn_effect(100, Vec3::new(0.0, 0.0, 64.0)).unwrap();
        let le = classic.pool().get(h).unwrap();
        assert_eq!(le.position().base.z, 40.0);
        assert_eq!(le.expire_time() - le.spawn_time(), 500);
        assert!(le.template().shader.is_some());

        let mut arena = effects_with(EffectsConfig {
            variant: GameVariant::TeamArena,
            ..EffectsConfig::default()
        });
        let h = arena.spawn_effect(100, Vec3::new(0.0, 0.0, 64.0)).unwrap();
        let le = arena.pool().get(h).unwrap();
        assert_eq!(le.position().base.z, 80.0);
        assert!(le.template().shader.is_none());
    }
}
