//! Team arena effects: lightning beams, the kamikaze shockwave, obelisk
//! hits and the invulnerability shield.

use cinder_core::{Axis, GameTime, Vec3};

use super::{Effects, Explosion, ExplosionStyle, LightFlash};
use crate::assets::{ModelHandle, SoundHandle};
use crate::entity::{EntityFlags, EntityKind, FollowUp, LocalEntity, RenderTemplate};
use crate::error::EffectResult;
use crate::pool::EntityHandle;
use crate::render::Shape;
use crate::trajectory::Trajectory;
use crate::world::{AudioSink, EntityId, SoundChannel};

const BEAM_LIFE: GameTime = 50;
const KAMIKAZE_LIFE: GameTime = 3000;
const IMPACT_LIFE: GameTime = 1000;
/// The shield bursts into gibs when this expires.
const JUICED_LIFE: GameTime = 5000;

const OBELISK_BLAST_HEIGHT: f32 = 64.0;
const OBELISK_BLAST_LIFE: GameTime = 600;
const OBELISK_LIGHT: LightFlash = LightFlash {
    intensity: 300.0,
    color: [1.0, 0.75, 0.0],
};

impl Effects {
    /// Lightning bolt between two points, shown for one beam frame.
    ///
    /// # Errors
    ///
    /// [`crate::EffectError::InvalidLifetime`] is propagated from entity
    /// construction; the fixed lifetimes used here never trigger it.
    pub fn lightning_bolt_beam(&mut self, now: GameTime, start: Vec3, end: Vec3) -> EffectResult<EntityHandle> {
        let template = RenderTemplate {
            shape: Shape::Beam,
            end,
            shader: Some(self.assets.shaders.lightning),
            ..RenderTemplate::default()
        };
        let beam = LocalEntity::new(EntityKind::Beam, now, now + BEAM_LIFE)?
            .with_flags(EntityFlags::ONE_SHOT)
            .with_position(Trajectory::stationary(start))
            .with_template(template);
        Ok(self.pool.allocate(beam))
    }

    /// Kamikaze shockwave.
    ///
    /// # Errors
    ///
    /// As [`Effects::lightning_bolt_beam`].
    pub fn kamikaze_effect(&mut self, now: GameTime, origin: Vec3) -> EffectResult<EntityHandle> {
        let model = self.assets.models.kamikaze_effect;
        self.model_effect(now, origin, EntityKind::Kamikaze, KAMIKAZE_LIFE, model, Axis::IDENTITY)
    }

    /// Obelisk destroyed: a lit explosion above its base.
    ///
    /// # Errors
    ///
    /// As [`Effects::make_explosion`]; the fixed duration never triggers it.
    pub fn obelisk_explode(&mut self, now: GameTime, origin: Vec3) -> EffectResult<EntityHandle> {
        let blast = Explosion {
            origin: origin + Vec3::new(0.0, 0.0, OBELISK_BLAST_HEIGHT),
            direction: None,
            model: Some(self.assets.models.dish_flash),
            shader: Some(self.assets.shaders.rocket_explosion),
            duration: OBELISK_BLAST_LIFE,
            style: ExplosionStyle::Model,
            light: Some(OBELISK_LIGHT),
        };
        self.make_explosion(now, &blast)
    }

    /// Obelisk hit: sound only.
    pub fn obelisk_pain(&mut self, origin: Vec3, audio: &mut impl AudioSink) {
        let variants = self.assets.sounds.obelisk_hit;
        let sfx = self.weighted_variant(&variants);
        audio.start_sound(Some(origin), EntityId::NONE, SoundChannel::Body, sfx);
    }

    /// Shot absorbed by an invulnerability shield.
    ///
    /// # Errors
    ///
    /// As [`Effects::lightning_bolt_beam`].
    pub fn invulnerability_impact(
        &mut self,
        now: GameTime,
        origin: Vec3,
        angles: Vec3,
        audio: &mut impl AudioSink,
    ) -> EffectResult<EntityHandle> {
        let model = self.assets.models.invulnerability_impact;
        let handle = self.model_effect(
            now,
            origin,
            EntityKind::InvulnerabilityImpact,
            IMPACT_LIFE,
            model,
            Axis::from_angles(angles),
        )?;

        let variants = self.assets.sounds.invulnerability_impact;
        let sfx = self.weighted_variant(&variants);
        audio.start_sound(Some(origin), EntityId::NONE, SoundChannel::Body, sfx);
        Ok(handle)
    }

    /// Shield overloaded: swells, then bursts into gibs when it expires.
    ///
    /// # Errors
    ///
    /// As [`Effects::lightning_bolt_beam`].
    pub fn invulnerability_juiced(
        &mut self,
        now: GameTime,
        origin: Vec3,
        audio: &mut impl AudioSink,
    ) -> EffectResult<EntityHandle> {
        let template = RenderTemplate {
            shape: Shape::Model,
            model: Some(self.assets.models.invulnerability_juiced),
            shader_time: self.shader_time(now),
            ..RenderTemplate::default()
        };
        let shield = LocalEntity::new(EntityKind::InvulnerabilityJuiced, now, now + JUICED_LIFE)?
            .with_position(Trajectory::stationary(origin))
            .with_follow_up(FollowUp::Gibs)
            .with_template(template);
        let handle = self.pool.allocate(shield);

        audio.start_sound(
            Some(origin),
            EntityId::NONE,
            SoundChannel::Body,
            self.assets.sounds.invulnerability_juiced,
        );
        Ok(handle)
    }

    fn model_effect(
        &mut self,
        now: GameTime,
        origin: Vec3,
        kind: EntityKind,
        life: GameTime,
        model: ModelHandle,
        axis: Axis,
    ) -> EffectResult<EntityHandle> {
        let template = RenderTemplate {
            shape: Shape::Model,
            model: Some(model),
            axis,
            shader_time: self.shader_time(now),
            ..RenderTemplate::default()
        };
        let effect = LocalEntity::new(kind, now, now + life)?
            .with_position(Trajectory::stationary(origin))
            .with_template(template);
        Ok(self.pool.allocate(effect))
    }

    /// Picks the first variant half the time and each other one a quarter.
    fn weighted_variant(&mut self, variants: &[SoundHandle; 3]) -> SoundHandle {
        match self.sampler.bits(3) {
            0 | 1 => variants[0],
            2 => variants[1],
            _ => variants[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::effects;
    use super::*;
    use crate::render::Renderable;
    use crate::world::Silence;

    #[derive(Default)]
    struct Recorder(Vec<SoundHandle>);

    impl AudioSink for Recorder {
        fn start_sound(&mut self, _: Option<Vec3>, entity: EntityId, channel: SoundChannel, sound: SoundHandle) {
            assert_eq!(entity, EntityId::NONE);
            assert_eq!(channel, SoundChannel::Body);
            self.0.push(sound);
        }
    }

    #[test]
    fn test_obelisk_pain_weights() {
        let mut fx = effects(12);
        let mut audio = Recorder::default();
        for _ in 0..4000 {
            fx.obelisk_pain(Vec3::ZERO, &mut audio);
        }
        let hits = fx.assets().sounds.obelisk_hit;
        let count = |h| audio.0.iter().filter(|s| **s == h).count();
        let (a, b, c) = (count(hits[0]), count(hits[1]), count(hits[2]));
        assert_eq!(a + b + c, 4000);
        assert!((1800..2200).contains(&a), "first {a}");
        assert!((850..1150).contains(&b), "second {b}");
        assert!((850..1150).contains(&c), "third {c}");
        assert_eq!(fx.pool().occupied(), 0);
    }

    #[test]
    fn test_obelisk_explode_is_lit_and_raised() {
        let mut fx = effects(12);
        let h = fx.obelisk_explode(1000, Vec3::new(0.0, 0.0, 10.0)).unwrap();
        let le = fx.pool().get(h).unwrap();
        assert_eq!(le.kind(), EntityKind::Explosion);
        assert_eq!(le.position().base.z, 74.0);
        assert_eq!(le.light(), 300.0);
        assert_eq!(le.expire_time() - le.spawn_time(), 600);
    }

    #[test]
    fn test_beam_gets_one_frame_of_leeway() {
        let mut fx = effects(12);
        let h = fx.lightning_bolt_beam(0, Vec3::ZERO, Vec3::new(0.0, 0.0, 100.0)).unwrap();
        let mut out: Vec<Renderable> = Vec::new();
        fx.update_and_collect(60, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].handle, h);
        assert_eq!(out[0].end, Vec3::new(0.0, 0.0, 100.0));

        out.clear();
        fx.update_and_collect(66, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_juiced_shield_bursts_into_gibs() {
        let mut fx = effects(12);
        let mut audio = Recorder::default();
        fx.invulnerability_juiced(0, Vec3::new(5.0, 5.0, 5.0), &mut audio).unwrap();
        assert_eq!(audio.0, vec![fx.assets().sounds.invulnerability_juiced]);

        let mut out = Vec::new();
        fx.update_and_collect(4000, &mut out);
        assert_eq!(fx.pool().occupied(), 1);

        fx.update_and_collect(5000, &mut out);
        assert_eq!(fx.pool().occupied(), 11);
        let gibs = fx
            .pool()
            .iter()
            .filter(|(_, le)| le.kind() == EntityKind::Fragment)
            .count();
        assert_eq!(gibs, 10);
        for (_, le) in fx.pool().iter().filter(|(_, le)| le.kind() == EntityKind::Fragment) {
            assert_eq!(le.position().base, Vec3::new(5.0, 5.0, 5.0));
            assert_eq!(le.spawn_time(), 5000);
        }

        fx.update_and_collect(6000, &mut out);
        assert_eq!(fx.pool().occupied(), 11);
    }

    #[test]
    fn test_impact_and_kamikaze_lifetimes() {
        let mut fx = effects(12);
        let h = fx
            .invulnerability_impact(0, Vec3::ZERO, Vec3::new(0.0, 90.0, 0.0), &mut Silence)
            .unwrap();
        assert_eq!(fx.pool().get(h).unwrap().expire_time(), 1000);
        let h = fx.kamikaze_effect(0, Vec3::ZERO).unwrap();
        assert_eq!(fx.pool().get(h).unwrap().expire_time(), 3000);
    }
}
