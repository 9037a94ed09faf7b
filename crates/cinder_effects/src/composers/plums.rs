//! Floating score and damage numbers.

use cinder_core::{GameTime, Vec3};

use super::Effects;
use crate::entity::{EntityKind, LocalEntity, RenderTemplate};
use crate::error::EffectResult;
use crate::pool::EntityHandle;
use crate::render::Shape;
use crate::trajectory::Trajectory;
use crate::world::{EntityId, Viewpoint};

/// Minimum vertical gap kept between consecutive score plums.
pub const PLUM_SEPARATION: f32 = 20.0;

const SCORE_PLUM_LIFE: GameTime = 4000;
const DAMAGE_PLUM_LIFE: GameTime = 1000;
const PLUM_RADIUS: f32 = 16.0;
/// Damage plum drift speed, units per second.
const DAMAGE_DRIFT: f32 = 48.0;
const DAMAGE_COLOR: [f32; 4] = [1.0, 0.5, 0.0, 1.0];

impl Effects {
    /// Shows `score` floating above `origin` for the scoring player.
    ///
    /// Only plums earned by the local player are shown. A plum that would
    /// land within [`PLUM_SEPARATION`] units of the previous one (vertically)
    /// is pushed below it.
    ///
    /// # Errors
    ///
    /// [`crate::EffectError::InvalidLifetime`] is propagated from entity
    /// construction; the fixed lifetimes used here never trigger it.
    pub fn score_plum(
        &mut self,
        now: GameTime,
        view: &mut Viewpoint,
        scorer: EntityId,
        origin: Vec3,
        score: i32,
    ) -> EffectResult<Option<EntityHandle>> {
        if !view.is_local(scorer) {
            tracing::trace!("Score plum skipped: scorer {} is not local", scorer.0);
            return Ok(None);
        }
        if !self.toggles().score_plums {
            tracing::trace!("Score plum skipped: score plums disabled");
            return Ok(None);
        }

        let mut base = origin;
        if let Some(last) = view.last_plum {
            if (origin.z - last.z).abs() <= PLUM_SEPARATION {
                base.z = origin.z.min(last.z - PLUM_SEPARATION);
            }
        }
        view.last_plum = Some(base);

        let template = RenderTemplate {
            shape: Shape::Plum { value: score },
            radius: PLUM_RADIUS,
            ..RenderTemplate::default()
        };
        let plum = LocalEntity::new(EntityKind::ScorePlum, now, now + SCORE_PLUM_LIFE)?
            .with_value(score)
            .with_position(Trajectory::stationary(base))
            .with_template(template);

        Ok(Some(self.pool.allocate(plum)))
    }

    /// Shows `damage` drifting away from `origin`.
    ///
    /// # Errors
    ///
    /// [`crate::EffectError::InvalidLifetime`] is propagated from entity
    /// construction; the fixed lifetimes used here never trigger it.
    pub fn damage_plum(
        &mut self,
        now: GameTime,
        origin: Vec3,
        damage: i32,
    ) -> EffectResult<Option<EntityHandle>> {
        if !self.toggles().damage_plums {
            tracing::trace!("Damage plum skipped: damage plums disabled");
            return Ok(None);
        }

        let drift = Vec3::new(
            self.sampler.crandom(),
            self.sampler.crandom(),
            self.sampler.range(0.5, 1.0),
        ) * DAMAGE_DRIFT;

        let template = RenderTemplate {
            shape: Shape::Plum { value: damage },
            radius: PLUM_RADIUS,
            ..RenderTemplate::default()
        };
        let plum = LocalEntity::new(EntityKind::DamagePlum, now, now + DAMAGE_PLUM_LIFE)?
            .with_value(damage)
            .with_color(DAMAGE_COLOR)
            .with_position(Trajectory::linear(origin, drift, now))
            .with_template(template);

        Ok(Some(self.pool.allocate(plum)))
    }
}
