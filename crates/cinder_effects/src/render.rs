//! # Renderable Snapshots
//!
//! The renderer-facing projection of a local entity. Snapshots are
//! rebuilt every frame from the entity's template, timing and
//! trajectories and are never stored.
//!
//! Each [`EntityKind`] has exactly one projection rule in [`project`]; the
//! match is exhaustive so a new kind cannot be added without one.

use bitflags::bitflags;
use cinder_core::{millis_to_secs, Axis, GameTime, Vec3};

use crate::assets::{ModelHandle, ShaderHandle};
use crate::entity::{EntityFlags, EntityKind, LocalEntity};
use crate::pool::EntityHandle;

bitflags! {
    /// Renderer visibility flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RenderFx: u32 {
        /// Hidden from the owner's first-person view.
        const THIRD_PERSON = 0x0002;
    }
}

/// How the backend wants shader time expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderTimeFormat {
    /// Integer milliseconds.
    #[default]
    Ticks,
    /// Fractional seconds.
    Seconds,
}

/// Time origin for shader animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShaderTime {
    /// Milliseconds.
    Ticks(GameTime),
    /// Seconds.
    Seconds(f32),
}

impl ShaderTime {
    /// Expresses `time` in `format`.
    #[must_use]
    pub fn at(format: ShaderTimeFormat, time: GameTime) -> Self {
        match format {
            ShaderTimeFormat::Ticks => Self::Ticks(time),
            ShaderTimeFormat::Seconds => Self::Seconds(millis_to_secs(time)),
        }
    }
}

/// What the active rendering backend can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// Backend can fade sprites through vertex alpha.
    pub alpha_blend: bool,
    /// Shader time representation.
    pub shader_time: ShaderTimeFormat,
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self {
            alpha_blend: true,
            shader_time: ShaderTimeFormat::Ticks,
        }
    }
}

/// Primitive the renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Camera-facing quad.
    Sprite,
    /// 3D model.
    Model,
    /// Line between `origin` and `end`.
    Beam,
    /// Row of digit sprites showing `value`.
    Plum {
        /// Number to show.
        value: i32,
    },
}

/// Dynamic light attached to a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicLight {
    /// Radius of influence.
    pub intensity: f32,
    /// RGB color.
    pub color: [f32; 3],
}

/// One entity, ready to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    /// Entity this was projected from.
    pub handle: EntityHandle,
    /// Kind of the source entity.
    pub kind: EntityKind,
    /// Primitive.
    pub shape: Shape,
    /// World position.
    pub origin: Vec3,
    /// Second endpoint for beams.
    pub end: Vec3,
    /// Orientation (scaled for growing models).
    pub axis: Axis,
    /// Sprite roll in degrees.
    pub rotation: f32,
    /// Sprite radius.
    pub radius: f32,
    /// Model asset.
    pub model: Option<ModelHandle>,
    /// Shader override.
    pub shader: Option<ShaderHandle>,
    /// Tint.
    pub rgba: [u8; 4],
    /// Shader animation origin.
    pub shader_time: ShaderTime,
    /// Visibility flags.
    pub render_fx: RenderFx,
    /// Light emitted this frame.
    pub light: Option<DynamicLight>,
}

/// Rises this far over a plum's life, in world units.
const PLUM_RISE: f32 = 100.0;
/// Starting height above the plum's base.
const PLUM_LIFT: f32 = 110.0;

/// Builds the snapshot of `entity` at `time`.
#[must_use]
pub fn project(handle: EntityHandle, entity: &LocalEntity, time: GameTime) -> Renderable {
    let template = &entity.template;
    let mut out = Renderable {
        handle,
        kind: entity.kind,
        shape: template.shape,
        origin: entity.position.evaluate(time),
        end: template.end,
        axis: template.axis,
        rotation: template.rotation,
        radius: template.radius,
        model: template.model,
        shader: template.shader,
        rgba: template.rgba,
        shader_time: template.shader_time,
        render_fx: template.render_fx,
        light: None,
    };

    if entity.flags.contains(EntityFlags::TUMBLE) {
        if let Some(angles) = &entity.angles {
            out.axis = Axis::from_angles(angles.evaluate(time));
        }
    }

    let c = entity.remaining(time);
    match entity.kind {
        EntityKind::Explosion => {
            if entity.light > 0.0 {
                let p = entity.progress(time);
                let ramp = if p < 0.5 { 1.0 } else { 1.0 - (p - 0.5) * 2.0 };
                out.light = Some(DynamicLight {
                    intensity: entity.light * ramp,
                    color: entity.light_color,
                });
            }
        }
        EntityKind::SpriteExplosion => {
            out.rgba[3] = to_byte(c);
            out.radius = 42.0 * (1.0 - c) + 30.0;
        }
        EntityKind::Fragment | EntityKind::Beam => {}
        EntityKind::MoveScaleFade => {
            let c = if entity.fade_in_time > entity.spawn_time && time < entity.fade_in_time {
                1.0 - (entity.fade_in_time - time) as f32
                    / (entity.fade_in_time - entity.spawn_time) as f32
            } else {
                c
            };
            out.rgba[3] = to_byte(c * entity.color[3]);
            if !entity.flags.contains(EntityFlags::PUFF_DONT_SCALE) {
                out.radius = entity.radius * (1.0 - c) + 8.0;
            }
        }
        EntityKind::ScaleFade => {
            out.rgba[3] = to_byte(c * entity.color[3]);
            out.radius = entity.radius * (1.0 - c) + 8.0;
        }
        EntityKind::FallScaleFade => {
            out.rgba[3] = to_byte(c * entity.color[3]);
            out.radius = entity.radius * (1.0 - c) + 16.0;
        }
        EntityKind::FadeRgb => {
            let [r, g, b, a] = entity.color;
            out.rgba = [to_byte(r * c), to_byte(g * c), to_byte(b * c), to_byte(a * c)];
        }
        EntityKind::ScorePlum => {
            out.origin.z += PLUM_LIFT - c * PLUM_RISE;
            out.rgba = score_tint(entity.value);
            out.rgba[3] = if c < 0.25 { to_byte(4.0 * c) } else { 0xff };
        }
        EntityKind::DamagePlum => {
            let [r, g, b, a] = entity.color;
            out.rgba = [to_byte(r), to_byte(g), to_byte(b), to_byte(a * c)];
        }
        EntityKind::BloodParticle => {
            out.rgba[3] = to_byte(c * entity.color[3]);
        }
        EntityKind::Kamikaze => {
            let p = entity.progress(time);
            out.axis = out.axis.scaled(1.0 + 3.0 * p);
            out.rgba[3] = to_byte(c);
        }
        EntityKind::InvulnerabilityImpact => {
            out.rgba[3] = to_byte(c);
        }
        EntityKind::InvulnerabilityJuiced => {
            let t = (time - entity.spawn_time) as f32;
            if t > JUICED_SWELL_START {
                out.axis = out.axis.scaled(1.0 + 0.3 * (t - JUICED_SWELL_START) / JUICED_SWELL_SPAN);
            }
        }
    }

    out
}

/// Juiced shields hold still this long before swelling, in ms.
const JUICED_SWELL_START: f32 = 3000.0;
/// Span over which the swell grows by 30%, in ms.
const JUICED_SWELL_SPAN: f32 = 2000.0;

fn score_tint(score: i32) -> [u8; 4] {
    if score < 0 {
        return [0xff, 0x11, 0x11, 0xff];
    }
    match score {
        50.. => [0xff, 0x00, 0xff, 0xff],
        20..=49 => [0x00, 0x00, 0xff, 0xff],
        10..=19 => [0xff, 0xff, 0x00, 0xff],
        2..=9 => [0x00, 0xff, 0x00, 0xff],
        _ => [0xff, 0xff, 0xff, 0xff],
    }
}

/// Maps `[0, 1]` to a color byte.
#[inline]
#[must_use]
pub fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RenderTemplate;
    use crate::trajectory::Trajectory;
    use cinder_core::RingPool;

    fn handle() -> EntityHandle {
        let mut ring = RingPool::new(1);
        ring.allocate(())
    }

    #[test]
    fn test_sprite_explosion_grows_and_fades() {
        let le = LocalEntity::new(EntityKind::SpriteExplosion, 0, 1000).unwrap();
        let start = project(handle(), &le, 0);
        let end = project(handle(), &le, 999);
        assert_eq!(start.rgba[3], 0xff);
        assert!((start.radius - 30.0).abs() < 1e-4);
        assert!(end.rgba[3] < 2);
        assert!(end.radius > 71.0);
    }

    #[test]
    fn test_explosion_light_ramps_in_second_half() {
        let le = LocalEntity::new(EntityKind::Explosion, 0, 1000)
            .unwrap()
            .with_light(300.0, [1.0, 0.75, 0.0]);
        assert_eq!(project(handle(), &le, 250).light.unwrap().intensity, 300.0);
        let late = project(handle(), &le, 750).light.unwrap().intensity;
        assert!((late - 150.0).abs() < 1e-3);
        assert!(project(handle(), &LocalEntity::new(EntityKind::Explosion, 0, 10).unwrap(), 5)
            .light
            .is_none());
    }

    #[test]
    fn test_move_scale_fade_fade_in_then_out() {
        let le = LocalEntity::new(EntityKind::MoveScaleFade, 0, 2000)
            .unwrap()
            .with_fade_in(1000)
            .unwrap()
            .with_radius(20.0);
        assert_eq!(project(handle(), &le, 0).rgba[3], 0);
        assert_eq!(project(handle(), &le, 1000).rgba[3], 0xff);
        assert_eq!(project(handle(), &le, 1500).rgba[3], 127);
        assert!((project(handle(), &le, 1000).radius - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_score_plum_rises_and_tints() {
        let le = LocalEntity::new(EntityKind::ScorePlum, 0, 4000)
            .unwrap()
            .with_value(-1)
            .with_position(Trajectory::stationary(Vec3::new(0.0, 0.0, 50.0)))
            .with_template(RenderTemplate {
                shape: Shape::Plum { value: -1 },
                ..RenderTemplate::default()
            });
        let first = project(handle(), &le, 0);
        let last = project(handle(), &le, 3999);
        assert!((first.origin.z - 60.0).abs() < 1e-3);
        assert!(last.origin.z > first.origin.z + 99.0);
        assert_eq!(&first.rgba[..3], &[0xff, 0x11, 0x11]);
        assert!(last.rgba[3] < 2);
    }

    #[test]
    fn test_fade_rgb_darkens() {
        let le = LocalEntity::new(EntityKind::FadeRgb, 0, 500).unwrap();
        assert_eq!(project(handle(), &le, 0).rgba, [0xff; 4]);
        assert_eq!(project(handle(), &le, 250).rgba, [127; 4]);
    }

    #[test]
    fn test_tumbling_entity_follows_angles() {
        let spin = Trajectory::linear(Vec3::new(0.0, 90.0, 0.0), Vec3::new(0.0, 90.0, 45.0), 0);
        let le = LocalEntity::new(EntityKind::Fragment, 0, 5000)
            .unwrap()
            .with_flags(EntityFlags::TUMBLE)
            .with_angles(spin);

        let start = project(handle(), &le, 0);
        assert_eq!(start.axis, Axis::from_angles(Vec3::new(0.0, 90.0, 0.0)));
        assert!((start.axis.forward() - Vec3::Y).length() < 1e-5);

        let later = project(handle(), &le, 1000);
        assert_eq!(later.axis, Axis::from_angles(Vec3::new(0.0, 180.0, 45.0)));
        assert!((later.axis.forward() + Vec3::X).length() < 1e-5);

        // Without the flag the template axis is kept.
        let still = LocalEntity::new(EntityKind::Fragment, 0, 5000)
            .unwrap()
            .with_angles(spin);
        assert_eq!(project(handle(), &still, 1000).axis, Axis::IDENTITY);
    }

    #[test]
    fn test_shader_time_formats() {
        assert_eq!(ShaderTime::at(ShaderTimeFormat::Ticks, 1500), ShaderTime::Ticks(1500));
        assert_eq!(ShaderTime::at(ShaderTimeFormat::Seconds, 1500), ShaderTime::Seconds(1.5));
    }
}
