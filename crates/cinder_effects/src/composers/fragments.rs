//! # Fragments
//!
//! Ballistic model pieces: gibs and explosion debris. The composer only
//! launches them; bounces are reported back through
//! [`crate::LocalEntityPool::reflect`] by whoever detects ground contact,
//! using the bounce-sound and ground-mark tags set here.
//!
//! Full-body volleys are data: a [`GibTable`] lists the pieces and their
//! spread, and a small loop launches them.

use cinder_core::{GameTime, Sampler, Vec3};

use super::{contract_violation, Effects};
use crate::assets::{EffectModels, ModelHandle};
use crate::entity::{BounceSound, EntityFlags, EntityKind, GroundMark, LocalEntity, RenderTemplate};
use crate::error::EffectResult;
use crate::pool::EntityHandle;
use crate::render::Shape;
use crate::trajectory::Trajectory;

/// Peak gib spin about each axis, in degrees per second.
const TUMBLE_RATE: f32 = 360.0;

/// Physical class of a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentClass {
    /// Body part: 5-8 s, bouncy, leaves blood.
    Gib,
    /// Explosion debris: 10-16 s, barely bounces, clinks.
    Debris,
}

impl FragmentClass {
    /// Rolls a lifetime in ms.
    fn lifetime(self, sampler: &mut Sampler) -> GameTime {
        let (base, jitter) = match self {
            Self::Gib => (5000, 3000.0),
            Self::Debris => (10_000, 6000.0),
        };
        base + (sampler.random() * jitter) as GameTime
    }

    /// Body parts spin in flight; debris keeps its orientation.
    const fn tumbles(self) -> bool {
        matches!(self, Self::Gib)
    }

    /// Restitution and ground-contact tags.
    const fn bounce(self) -> (f32, BounceSound, GroundMark) {
        match self {
            Self::Gib => (0.6, BounceSound::Blood, GroundMark::Blood),
            Self::Debris => (0.1, BounceSound::Brass, GroundMark::None),
        }
    }
}

/// Launch velocity distribution for a volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchProfile {
    /// Peak horizontal speed before spread.
    pub horizontal: f32,
    /// Fixed upward speed.
    pub jump: f32,
    /// Peak random vertical speed either side of `jump`.
    pub vertical: f32,
}

impl LaunchProfile {
    /// Body parts.
    pub const GIB: Self = Self {
        horizontal: 250.0,
        jump: 250.0,
        vertical: 250.0,
    };

    /// Explosion debris.
    pub const DEBRIS: Self = Self {
        horizontal: 100.0,
        jump: 150.0,
        vertical: 100.0,
    };

    /// Rolls a velocity, scaling the horizontal range by `spread`.
    #[must_use]
    pub fn sample(&self, sampler: &mut Sampler, spread: f32) -> Vec3 {
        let horizontal = self.horizontal * spread;
        Vec3::new(
            sampler.crandom() * horizontal,
            sampler.crandom() * horizontal,
            self.jump + sampler.crandom() * self.vertical,
        )
    }
}

/// One entry of a volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolleyPiece {
    /// Model to launch.
    pub model: ModelHandle,
    /// Multiplier on the horizontal launch range.
    pub spread: f32,
}

impl VolleyPiece {
    /// Piece with the unscaled horizontal range.
    #[must_use]
    pub const fn new(model: ModelHandle) -> Self {
        Self { model, spread: 1.0 }
    }
}

/// Declarative description of the gib and debris volleys.
#[derive(Clone, Debug, PartialEq)]
pub struct GibTable {
    /// Head variants; one is picked by coin flip and always launched.
    pub heads: [ModelHandle; 2],
    /// Remaining body parts, launched only when gibs are enabled.
    pub body: Vec<VolleyPiece>,
    /// Pieces of a big explosion.
    pub debris: Vec<VolleyPiece>,
}

impl GibTable {
    /// The stock volley: ten gibs and five debris chunks.
    #[must_use]
    pub fn standard(models: &EffectModels) -> Self {
        let body = [
            models.gib_abdomen,
            models.gib_arm,
            models.gib_chest,
            models.gib_fist,
            models.gib_foot,
            models.gib_forearm,
            models.gib_intestine,
            models.gib_leg,
            models.gib_leg,
        ]
        .into_iter()
        .map(VolleyPiece::new)
        .collect();

        let debris = [1.0, 1.0, 1.5, 2.0, 2.5]
            .into_iter()
            .map(|spread| VolleyPiece {
                model: models.smoke_debris,
                spread,
            })
            .collect();

        Self {
            heads: [models.gib_skull, models.gib_brain],
            body,
            debris,
        }
    }
}

impl Effects {
    /// Launches one fragment from `origin`.
    ///
    /// # Errors
    ///
    /// [`crate::EffectError::InvalidLifetime`] is propagated from entity
    /// construction; class lifetimes are always positive so it never fires.
    pub fn launch_fragment(
        &mut self,
        now: GameTime,
        origin: Vec3,
        velocity: Vec3,
        model: ModelHandle,
        class: FragmentClass,
    ) -> EffectResult<EntityHandle> {
        let life = class.lifetime(&mut self.sampler);
        let (factor, sound, mark) = class.bounce();

        let template = RenderTemplate {
            shape: Shape::Model,
            model: Some(model),
            ..RenderTemplate::default()
        };
        let mut fragment = LocalEntity::new(EntityKind::Fragment, now, now + life)?
            .with_position(Trajectory::gravity(origin, velocity, now))
            .with_bounce(factor, sound, mark)
            .with_template(template);

        if class.tumbles() {
            let s = &mut self.sampler;
            let angles = Vec3::new(s.random() * 360.0, s.random() * 360.0, s.random() * 360.0);
            let spin = Vec3::new(s.crandom(), s.crandom(), s.crandom()) * TUMBLE_RATE;
            fragment = fragment
                .with_flags(EntityFlags::TUMBLE)
                .with_angles(Trajectory::linear(angles, spin, now));
        }

        Ok(self.pool.allocate(fragment))
    }

    /// Bursts a body into gibs.
    ///
    /// The head is launched whenever blood is on; the rest of the body only
    /// when gibs are enabled too.
    pub fn gib_player(&mut self, now: GameTime, origin: Vec3) {
        let toggles = self.toggles();
        if !toggles.blood {
            tracing::trace!("Gibs skipped: blood disabled");
            return;
        }

        let head = if self.sampler.coin() {
            self.gibs.heads[0]
        } else {
            self.gibs.heads[1]
        };
        self.launch_volley(now, origin, FragmentClass::Gib, LaunchProfile::GIB, &[VolleyPiece::new(head)]);

        if !toggles.gibs {
            tracing::trace!("Body gibs skipped: gibs disabled");
            return;
        }
        let body = std::mem::take(&mut self.gibs.body);
        self.launch_volley(now, origin, FragmentClass::Gib, LaunchProfile::GIB, &body);
        self.gibs.body = body;
    }

    /// Scatters smoke debris from a destroyed object.
    pub fn big_explode(&mut self, now: GameTime, origin: Vec3) {
        if !self.toggles().blood {
            tracing::trace!("Debris skipped: blood disabled");
            return;
        }
        let debris = std::mem::take(&mut self.gibs.debris);
        self.launch_volley(now, origin, FragmentClass::Debris, LaunchProfile::DEBRIS, &debris);
        self.gibs.debris = debris;
    }

    fn launch_volley(
        &mut self,
        now: GameTime,
        origin: Vec3,
        class: FragmentClass,
        profile: LaunchProfile,
        pieces: &[VolleyPiece],
    ) {
        for piece in pieces {
            let velocity = profile.sample(&mut self.sampler, piece.spread);
            if let Err(err) = self.launch_fragment(now, origin, velocity, piece.model, class) {
                contract_violation(err);
            }
        }
    }
}
