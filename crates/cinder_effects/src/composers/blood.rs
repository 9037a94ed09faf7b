//! # Directional Blood Spray
//!
//! A hit spawns a weapon-dependent number of droplets plus one trailing
//! mist puff. Each droplet independently picks one of two kinematic
//! profiles:
//!
//! - **Exit wound** (p = 0.8): fast, along the impact direction with a
//!   tight perpendicular spread and a slight upward bias.
//! - **Entry wound** (p = 0.2): slow, at a random angle in the plane
//!   perpendicular to the impact direction.
//!
//! Submerged hits collapse to a single rising puff. With particle blood
//! disabled a single expanding sprite is used instead.

use std::f32::consts::TAU;

use cinder_core::{GameTime, Sampler, Vec3, MILLIS_PER_SECOND};

use super::{Effects, SmokePuff};
use crate::entity::{EntityFlags, EntityKind, LocalEntity, RenderTemplate};
use crate::error::EffectResult;
use crate::render::{RenderFx, Shape};
use crate::trajectory::Trajectory;
use crate::world::{EntityId, Environment, Viewpoint};

/// Base exit-wound droplet speed, units per second.
pub const EXIT_SPEED: f32 = 600.0;
/// Base entry-wound droplet speed, units per second.
pub const ENTRY_SPEED: f32 = 50.0;
/// Probability that a droplet uses the exit-wound profile.
pub const EXIT_PROBABILITY: f32 = 0.8;

/// Weapon that caused a hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Weapon {
    /// Unknown or environmental.
    #[default]
    None,
    /// Melee.
    Gauntlet,
    /// Hitscan rifle.
    MachineGun,
    /// Pellets.
    Shotgun,
    /// Bouncing grenades.
    GrenadeLauncher,
    /// Rockets.
    RocketLauncher,
    /// Beam.
    LightningGun,
    /// Slug.
    Railgun,
    /// Plasma bolts.
    PlasmaGun,
    /// Big one.
    Bfg,
    /// Hook.
    GrapplingHook,
}

impl Weapon {
    /// Droplets sprayed per hit (the trailing mist is extra).
    #[must_use]
    pub const fn blood_droplets(self) -> u32 {
        match self {
            Self::PlasmaGun => 4,
            Self::Bfg => 7,
            Self::RocketLauncher | Self::GrenadeLauncher => 9,
            _ => 2,
        }
    }
}

/// Which kinematic profile a droplet used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WoundProfile {
    /// Fast, forward.
    Exit,
    /// Slow, sideways.
    Entry,
}

/// Orthonormal frame around the impact direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SprayBasis {
    /// Impact direction.
    pub forward: Vec3,
    /// First perpendicular.
    pub side: Vec3,
    /// Second perpendicular.
    pub up: Vec3,
}

impl SprayBasis {
    /// Frame around `direction`, or a world-up frame when it is unknown.
    #[must_use]
    pub fn new(direction: Option<Vec3>) -> Self {
        match direction.and_then(Vec3::try_normalize) {
            Some(forward) => {
                let side = forward.perpendicular();
                Self {
                    forward,
                    side,
                    up: forward.cross(side),
                }
            }
            None => Self {
                forward: Vec3::Z,
                side: Vec3::X,
                up: Vec3::Y,
            },
        }
    }
}

/// Rolls one droplet's profile and launch velocity.
pub fn sample_spray(sampler: &mut Sampler, basis: &SprayBasis) -> (WoundProfile, Vec3) {
    if sampler.chance(EXIT_PROBABILITY) {
        let speed = EXIT_SPEED * sampler.range(0.4, 1.0);
        let forward_bias = sampler.range(0.8, 1.2);
        let spread = (sampler.random() - 0.5) * 0.4;
        let lift = (sampler.random() - 0.5) * 0.6;

        let velocity = (basis.forward * (speed * forward_bias))
            .mul_add(basis.side, speed * spread)
            .mul_add(basis.up, speed * lift)
            + Vec3::new(0.0, 0.0, speed * 0.2);
        (WoundProfile::Exit, velocity)
    } else {
        let angle = sampler.random() * TAU;
        let speed = ENTRY_SPEED * sampler.range(0.4, 1.0);
        let planar = speed * sampler.range(0.8, 1.2);
        let (sin, cos) = angle.sin_cos();

        let velocity = (basis.side * (cos * planar)).mul_add(basis.up, sin * planar);
        (WoundProfile::Entry, velocity)
    }
}

/// A hit on a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wound {
    /// Hit point.
    pub origin: Vec3,
    /// Projectile travel direction, if known.
    pub direction: Option<Vec3>,
    /// Who was hit.
    pub victim: EntityId,
    /// What hit them.
    pub weapon: Weapon,
}

impl Effects {
    /// Sprays blood for `wound`.
    ///
    /// Hits on the local player are tagged third-person so the spray is not
    /// drawn over the player's own view.
    pub fn bleed(
        &mut self,
        now: GameTime,
        env: &impl Environment,
        view: &Viewpoint,
        wound: &Wound,
    ) -> EffectResult<()> {
        let toggles = self.toggles();
        if !toggles.blood {
            tracing::trace!("Bleed skipped: blood disabled");
            return Ok(());
        }

        let render_fx = if view.is_local(wound.victim) {
            RenderFx::THIRD_PERSON
        } else {
            RenderFx::empty()
        };

        if !toggles.blood_particles {
            let template = RenderTemplate {
                shape: Shape::Sprite,
                rotation: self.sampler.below(360) as f32,
                radius: 24.0,
                shader: Some(self.assets.shaders.blood_explosion),
                render_fx,
                ..RenderTemplate::default()
            };
            let burst = LocalEntity::new(EntityKind::Explosion, now, now + 500)?
                .with_position(Trajectory::stationary(wound.origin))
                .with_template(template);
            self.pool.allocate(burst);
            return Ok(());
        }

        if env.point_contents(wound.origin).is_submerged() {
            return self.blood_mist(now, wound.origin, -2.0, render_fx);
        }

        let basis = SprayBasis::new(wound.direction);
        for _ in 0..wound.weapon.blood_droplets() {
            let life = 800 + (self.sampler.random() * 400.0) as GameTime;
            let (_, velocity) = sample_spray(&mut self.sampler, &basis);
            let radius = self.sampler.range(3.0, 8.0);

            let template = RenderTemplate {
                rotation: self.sampler.below(360) as f32,
                radius,
                shader: Some(self.assets.shaders.blood_trail),
                shader_time: self.shader_time(now),
                render_fx,
                ..RenderTemplate::default()
            };
            let droplet = LocalEntity::new(EntityKind::BloodParticle, now, now + life)?
                .with_flags(EntityFlags::PUFF_DONT_SCALE)
                .with_radius(radius)
                .with_position(Trajectory::gravity(wound.origin, velocity, now))
                .with_template(template);
            self.pool.allocate(droplet);
        }

        self.blood_mist(now, wound.origin, 4.0, render_fx)
    }

    /// Small puff that sinks `fall` units over its life (negative rises).
    fn blood_mist(&mut self, now: GameTime, origin: Vec3, fall: f32, render_fx: RenderFx) -> EffectResult<()> {
        let radius = self.sampler.range(2.0, 5.0);
        let duration = 300 + (self.sampler.random() * 200.0) as GameTime;

        let puff = SmokePuff::new(origin, radius, now, duration, self.assets.shaders.blood_trail);
        let mut mist = self.build_puff(&puff)?;
        mist.kind = EntityKind::FallScaleFade;
        let sink = -fall * MILLIS_PER_SECOND / duration as f32;
        mist.position = Trajectory::linear(origin, Vec3::new(0.0, 0.0, sink), now);
        mist.template.render_fx |= render_fx;

        self.pool.allocate(mist);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::effects;
    use super::*;
    use crate::world::{Contents, OpenAir};

    const SHOOTER: EntityId = EntityId(3);
    const VICTIM: EntityId = EntityId(7);

    fn wound(weapon: Weapon) -> Wound {
        Wound {
            origin: Vec3::new(0.0, 0.0, 40.0),
            direction: Some(Vec3::X),
            victim: VICTIM,
            weapon,
        }
    }

    #[test]
    fn test_droplet_counts_per_weapon() {
        for (weapon, droplets) in [
            (Weapon::MachineGun, 2),
            (Weapon::PlasmaGun, 4),
            (Weapon::Bfg, 7),
            (Weapon::RocketLauncher, 9),
            (Weapon::GrenadeLauncher, 9),
        ] {
            let mut fx = effects(2);
            fx.bleed(0, &OpenAir, &Viewpoint::new(SHOOTER), &wound(weapon))
                .unwrap();
            assert_eq!(fx.pool().occupied(), droplets + 1, "{weapon:?}");
        }
    }

    #[test]
    fn test_submerged_hit_is_single_puff() {
        let mut fx = effects(2);
        let water = |_: Vec3| Contents::WATER;
        fx.bleed(0, &water, &Viewpoint::new(SHOOTER), &wound(Weapon::RocketLauncher))
            .unwrap();
        assert_eq!(fx.pool().occupied(), 1);
        let (_, le) = fx.pool().iter().next().unwrap();
        assert_eq!(le.kind(), EntityKind::FallScaleFade);
        // Rises two units over its life.
        let end = le.position().evaluate(le.expire_time());
        assert!((end.z - 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_own_blood_is_third_person() {
        let mut fx = effects(2);
        fx.bleed(0, &OpenAir, &Viewpoint::new(VICTIM), &wound(Weapon::Shotgun))
            .unwrap();
        for (_, le) in fx.pool().iter() {
            assert!(le.template().render_fx.contains(RenderFx::THIRD_PERSON));
        }
    }

    #[test]
    fn test_sprite_mode_bypasses_spray() {
        let mut fx = effects(2);
        fx.toggles_mut().blood_particles = false;
        let water = |_: Vec3| Contents::WATER;
        fx.bleed(0, &water, &Viewpoint::new(SHOOTER), &wound(Weapon::Bfg))
            .unwrap();
        assert_eq!(fx.pool().occupied(), 1);
        let (_, le) = fx.pool().iter().next().unwrap();
        assert_eq!(le.kind(), EntityKind::Explosion);
        assert_eq!(le.expire_time(), 500);
    }

    #[test]
    fn test_blood_toggle_off() {
        let mut fx = effects(2);
        fx.toggles_mut().blood = false;
        fx.bleed(0, &OpenAir, &Viewpoint::new(SHOOTER), &wound(Weapon::Bfg))
            .unwrap();
        assert_eq!(fx.pool().occupied(), 0);
    }

    #[test]
    fn test_entry_profile_stays_in_plane() {
        let mut sampler = Sampler::from_seed(17);
        let basis = SprayBasis::new(Some(Vec3::new(1.0, 1.0, 0.0)));
        let mut entries = 0;
        for _ in 0..2_000 {
            let (profile, v) = sample_spray(&mut sampler, &basis);
            if profile == WoundProfile::Entry {
                entries += 1;
                assert!(v.dot(basis.forward).abs() < 1e-3);
                assert!(v.length() <= ENTRY_SPEED * 1.2 + 1e-3);
            }
        }
        assert!(entries > 0);
    }

    #[test]
    fn test_default_basis_is_world_up() {
        let basis = SprayBasis::new(Some(Vec3::ZERO));
        assert_eq!(basis.forward, Vec3::Z);
        assert_eq!(SprayBasis::new(None), basis);
    }
}
