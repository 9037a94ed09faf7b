//! # Local Entities
//!
//! A local entity is one transient, client-only effect instance: a smoke
//! puff, a gib, a floating score. Composers build them completely and hand
//! them to the pool; after that only the per-frame pass reads them.

use bitflags::bitflags;
use cinder_core::{Axis, GameTime, Vec3};
use serde::{Deserialize, Serialize};

use crate::assets::{ModelHandle, ShaderHandle};
use crate::error::{EffectError, EffectResult};
use crate::render::{RenderFx, Shape, ShaderTime};
use crate::trajectory::Trajectory;

/// Selects how an entity is interpreted and drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntityKind {
    /// Oriented model explosion with optional dynamic light.
    Explosion,
    /// Camera-facing explosion sprite that grows as it fades.
    SpriteExplosion,
    /// Ballistic model piece (gibs, debris).
    Fragment,
    /// Moving sprite that grows and fades, with optional fade-in.
    MoveScaleFade,
    /// Sprite that drifts vertically while growing and fading.
    FallScaleFade,
    /// Model whose color fades to black.
    FadeRgb,
    /// Stationary sprite that grows and fades.
    ScaleFade,
    /// Floating score number.
    ScorePlum,
    /// Floating damage number.
    DamagePlum,
    /// Ballistic blood droplet.
    BloodParticle,
    /// Beam between two points.
    Beam,
    /// Expanding shockwave model.
    Kamikaze,
    /// Shield impact flash.
    InvulnerabilityImpact,
    /// Swelling shield that bursts when it expires.
    InvulnerabilityJuiced,
}

impl EntityKind {
    /// Number of kinds.
    pub const COUNT: usize = 14;

    /// Every kind, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Explosion,
        Self::SpriteExplosion,
        Self::Fragment,
        Self::MoveScaleFade,
        Self::FallScaleFade,
        Self::FadeRgb,
        Self::ScaleFade,
        Self::ScorePlum,
        Self::DamagePlum,
        Self::BloodParticle,
        Self::Beam,
        Self::Kamikaze,
        Self::InvulnerabilityImpact,
        Self::InvulnerabilityJuiced,
    ];

    /// Dense index for per-kind tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Config-file name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Explosion => "explosion",
            Self::SpriteExplosion => "sprite_explosion",
            Self::Fragment => "fragment",
            Self::MoveScaleFade => "move_scale_fade",
            Self::FallScaleFade => "fall_scale_fade",
            Self::FadeRgb => "fade_rgb",
            Self::ScaleFade => "scale_fade",
            Self::ScorePlum => "score_plum",
            Self::DamagePlum => "damage_plum",
            Self::BloodParticle => "blood_particle",
            Self::Beam => "beam",
            Self::Kamikaze => "kamikaze",
            Self::InvulnerabilityImpact => "invulnerability_impact",
            Self::InvulnerabilityJuiced => "invulnerability_juiced",
        }
    }

    /// Parses a config-file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

bitflags! {
    /// Auxiliary entity behaviours.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u32 {
        /// Keep the sprite radius fixed instead of growing it.
        const PUFF_DONT_SCALE = 0x0001;
        /// Orientation follows the angles trajectory.
        const TUMBLE          = 0x0002;
        /// Eligible for the per-kind expiry leeway.
        const ONE_SHOT        = 0x0004;
    }
}

/// Impact sound family used when a fragment touches ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BounceSound {
    /// Silent.
    #[default]
    None,
    /// Wet splats.
    Blood,
    /// Metallic clinks.
    Brass,
}

/// Decal family left where a fragment touches ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroundMark {
    /// No decal.
    #[default]
    None,
    /// Blood splat.
    Blood,
}

/// Construction logic run on an entity once it has expired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowUp {
    /// Burst into a full gib volley at the entity's last position.
    Gibs,
}

/// Spawn-time renderer parameters. The per-frame snapshot is derived
/// from these plus the entity's timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTemplate {
    /// Primitive to draw.
    pub shape: Shape,
    /// Model asset, for model shapes.
    pub model: Option<ModelHandle>,
    /// Shader override.
    pub shader: Option<ShaderHandle>,
    /// Second endpoint, for beams.
    pub end: Vec3,
    /// Orientation, for models.
    pub axis: Axis,
    /// Sprite roll in degrees.
    pub rotation: f32,
    /// Sprite radius.
    pub radius: f32,
    /// Visibility flags.
    pub render_fx: RenderFx,
    /// Tint at spawn.
    pub rgba: [u8; 4],
    /// Time origin for shader animation.
    pub shader_time: ShaderTime,
}

impl Default for RenderTemplate {
    fn default() -> Self {
        Self {
            shape: Shape::Sprite,
            model: None,
            shader: None,
            end: Vec3::ZERO,
            axis: Axis::IDENTITY,
            rotation: 0.0,
            radius: 0.0,
            render_fx: RenderFx::empty(),
            rgba: [0xff; 4],
            shader_time: ShaderTime::Ticks(0),
        }
    }
}

/// A transient visual effect instance.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalEntity {
    pub(crate) kind: EntityKind,
    pub(crate) flags: EntityFlags,
    pub(crate) spawn_time: GameTime,
    pub(crate) expire_time: GameTime,
    pub(crate) fade_in_time: GameTime,
    /// Reciprocal of the fade window, per millisecond.
    pub(crate) fade_rate: f32,
    pub(crate) color: [f32; 4],
    pub(crate) position: Trajectory,
    pub(crate) angles: Option<Trajectory>,
    pub(crate) radius: f32,
    pub(crate) bounce_factor: f32,
    pub(crate) light: f32,
    pub(crate) light_color: [f32; 3],
    pub(crate) bounce_sound: BounceSound,
    pub(crate) ground_mark: GroundMark,
    /// Number shown by plums.
    pub(crate) value: i32,
    pub(crate) follow_up: Option<FollowUp>,
    pub(crate) template: RenderTemplate,
}

impl LocalEntity {
    /// Starts a new entity active over `[spawn_time, expire_time)`.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidLifetime`] unless `expire_time > spawn_time`.
    pub fn new(kind: EntityKind, spawn_time: GameTime, expire_time: GameTime) -> EffectResult<Self> {
        if expire_time <= spawn_time {
            return Err(EffectError::InvalidLifetime {
                spawn_time,
                expire_time,
            });
        }
        Ok(Self {
            kind,
            flags: EntityFlags::empty(),
            spawn_time,
            expire_time,
            fade_in_time: 0,
            fade_rate: 1.0 / (expire_time - spawn_time) as f32,
            color: [1.0; 4],
            position: Trajectory::default(),
            angles: None,
            radius: 0.0,
            bounce_factor: 0.0,
            light: 0.0,
            light_color: [1.0; 3],
            bounce_sound: BounceSound::None,
            ground_mark: GroundMark::None,
            value: 0,
            follow_up: None,
            template: RenderTemplate::default(),
        })
    }

    /// Delays the start of the fade-out until `fade_in_time`.
    ///
    /// The fade rate then covers `[fade_in_time, expire_time)` so the fade-in
    /// does not eat into the fade-out. Times at or before spawn disable it.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidLifetime`] if the fade-in ends at or after expiry.
    pub fn with_fade_in(mut self, fade_in_time: GameTime) -> EffectResult<Self> {
        self.fade_in_time = fade_in_time;
        if fade_in_time > self.spawn_time {
            if fade_in_time >= self.expire_time {
                return Err(EffectError::InvalidLifetime {
                    spawn_time: fade_in_time,
                    expire_time: self.expire_time,
                });
            }
            self.fade_rate = 1.0 / (self.expire_time - fade_in_time) as f32;
        } else {
            self.fade_rate = 1.0 / (self.expire_time - self.spawn_time) as f32;
        }
        Ok(self)
    }

    /// Sets behaviour flags.
    #[must_use]
    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the RGBA color (tint or fade start).
    #[must_use]
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Sets the position trajectory.
    #[must_use]
    pub fn with_position(mut self, position: Trajectory) -> Self {
        self.position = position;
        self
    }

    /// Sets an orientation trajectory (angles in degrees).
    #[must_use]
    pub fn with_angles(mut self, angles: Trajectory) -> Self {
        self.angles = Some(angles);
        self
    }

    /// Sets the logical radius used by scaling kinds.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Sets restitution and the ground-contact tags.
    #[must_use]
    pub fn with_bounce(mut self, factor: f32, sound: BounceSound, mark: GroundMark) -> Self {
        self.bounce_factor = factor;
        self.bounce_sound = sound;
        self.ground_mark = mark;
        self
    }

    /// Adds a dynamic light.
    #[must_use]
    pub fn with_light(mut self, intensity: f32, color: [f32; 3]) -> Self {
        self.light = intensity;
        self.light_color = color;
        self
    }

    /// Sets the number shown by plums.
    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// Schedules construction logic for when the entity expires.
    #[must_use]
    pub fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    /// Sets the renderer template.
    #[must_use]
    pub fn with_template(mut self, template: RenderTemplate) -> Self {
        self.template = template;
        self
    }

    /// Entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Behaviour flags.
    #[must_use]
    pub const fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Start of the active window.
    #[must_use]
    pub const fn spawn_time(&self) -> GameTime {
        self.spawn_time
    }

    /// End of the active window (exclusive).
    #[must_use]
    pub const fn expire_time(&self) -> GameTime {
        self.expire_time
    }

    /// End of the fade-in window; at or before spawn means none.
    #[must_use]
    pub const fn fade_in_time(&self) -> GameTime {
        self.fade_in_time
    }

    /// Reciprocal of the fade window in milliseconds.
    #[must_use]
    pub const fn fade_rate(&self) -> f32 {
        self.fade_rate
    }

    /// RGBA color.
    #[must_use]
    pub const fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Position trajectory.
    #[must_use]
    pub const fn position(&self) -> &Trajectory {
        &self.position
    }

    /// Orientation trajectory, if any.
    #[must_use]
    pub const fn angles(&self) -> Option<&Trajectory> {
        self.angles.as_ref()
    }

    /// Logical radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Restitution applied on ground contact.
    #[must_use]
    pub const fn bounce_factor(&self) -> f32 {
        self.bounce_factor
    }

    /// Dynamic light intensity (0 for none).
    #[must_use]
    pub const fn light(&self) -> f32 {
        self.light
    }

    /// Impact sound family.
    #[must_use]
    pub const fn bounce_sound(&self) -> BounceSound {
        self.bounce_sound
    }

    /// Ground decal family.
    #[must_use]
    pub const fn ground_mark(&self) -> GroundMark {
        self.ground_mark
    }

    /// Number shown by plums.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Pending expiry construction logic.
    #[must_use]
    pub const fn follow_up(&self) -> Option<FollowUp> {
        self.follow_up
    }

    /// Renderer template.
    #[must_use]
    pub const fn template(&self) -> &RenderTemplate {
        &self.template
    }

    /// Fraction of the fade window still remaining at `time`, in `[0, 1]`.
    #[must_use]
    pub fn remaining(&self, time: GameTime) -> f32 {
        ((self.expire_time - time) as f32 * self.fade_rate).clamp(0.0, 1.0)
    }

    /// Fraction of the whole active window elapsed at `time`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, time: GameTime) -> f32 {
        let span = (self.expire_time - self.spawn_time) as f32;
        ((time - self.spawn_time) as f32 / span).clamp(0.0, 1.0)
    }

    /// Applies a ground contact reported by the physics collaborator.
    ///
    /// Reflects the current velocity about `normal` and scales it by the
    /// bounce factor, restarting the trajectory at `time`.
    pub fn reflect(&mut self, time: GameTime, normal: Vec3) {
        let Some(normal) = normal.try_normalize() else {
            return;
        };
        let velocity = self.position.velocity_at(time);
        let reflected = velocity.mul_add(normal, -2.0 * velocity.dot(normal));
        self.position.rebase(time, reflected * self.bounce_factor);
    }
}
