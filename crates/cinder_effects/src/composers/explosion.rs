//! Explosions.

use cinder_core::{Axis, GameTime, Vec3};

use super::{contract_violation, window_end, Effects};
use crate::assets::{ModelHandle, ShaderHandle};
use crate::entity::{EntityKind, LocalEntity, RenderTemplate};
use crate::error::{EffectError, EffectResult};
use crate::pool::EntityHandle;
use crate::render::Shape;
use crate::trajectory::Trajectory;

/// Largest random back-dating applied to an explosion, in ms.
pub const DESYNC_MASK: u32 = 63;

/// Sprite explosions sit this far out along the impact normal.
const SPRITE_STANDOFF: f32 = 16.0;

/// How an explosion is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplosionStyle {
    /// Camera-facing sprite with random roll.
    Sprite,
    /// Model oriented along the impact direction with random spin.
    #[default]
    Model,
}

/// Dynamic light attached to an explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightFlash {
    /// Radius of influence.
    pub intensity: f32,
    /// RGB color.
    pub color: [f32; 3],
}

/// Parameters for [`Effects::make_explosion`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    /// Impact point.
    pub origin: Vec3,
    /// Impact normal or travel direction; `None` (or zero) for an upright blast.
    pub direction: Option<Vec3>,
    /// Model to draw.
    pub model: Option<ModelHandle>,
    /// Shader override.
    pub shader: Option<ShaderHandle>,
    /// Life in ms. Must be positive.
    pub duration: GameTime,
    /// Sprite or oriented model.
    pub style: ExplosionStyle,
    /// Optional light.
    pub light: Option<LightFlash>,
}

impl Effects {
    /// Spawns one explosion.
    ///
    /// The spawn time is pushed back by a random `0..=63` ms so explosions
    /// triggered on the same frame do not animate in lockstep; the window
    /// length is always exactly `duration`.
    ///
    /// # Errors
    ///
    /// [`EffectError::NonPositiveDuration`] if `duration <= 0`, or
    /// [`EffectError::DurationOverflow`] if the window ends past the end of
    /// the clock. Nothing is allocated in either case.
    pub fn make_explosion(&mut self, now: GameTime, explosion: &Explosion) -> EffectResult<EntityHandle> {
        if explosion.duration <= 0 {
            return Err(contract_violation(EffectError::NonPositiveDuration {
                effect: "make_explosion",
                duration: explosion.duration,
            }));
        }

        let offset = GameTime::from(self.sampler.bits(DESYNC_MASK));
        let direction = explosion.direction.unwrap_or(Vec3::ZERO);

        let (kind, origin, template) = match explosion.style {
            ExplosionStyle::Sprite => {
                let template = RenderTemplate {
                    shape: Shape::Sprite,
                    rotation: self.sampler.below(360) as f32,
                    ..RenderTemplate::default()
                };
                let origin = explosion.origin.mul_add(direction, SPRITE_STANDOFF);
                (EntityKind::SpriteExplosion, origin, template)
            }
            ExplosionStyle::Model => {
                let spin = self.sampler.below(360) as f32;
                let template = RenderTemplate {
                    shape: Shape::Model,
                    axis: Axis::from_direction(direction, spin),
                    ..RenderTemplate::default()
                };
                (EntityKind::Explosion, explosion.origin, template)
            }
        };

        let spawn = now.saturating_sub(offset);
        let expire = window_end("make_explosion", spawn, explosion.duration)?;
        let template = RenderTemplate {
            model: explosion.model,
            shader: explosion.shader,
            shader_time: self.shader_time(spawn),
            ..template
        };

        let mut entity = LocalEntity::new(kind, spawn, expire)
            .map_err(contract_violation)?
            .with_position(Trajectory::stationary(origin))
            .with_template(template);
        if let Some(light) = explosion.light {
            entity = entity.with_light(light.intensity, light.color);
        }

        Ok(self.pool.allocate(entity))
    }
}
