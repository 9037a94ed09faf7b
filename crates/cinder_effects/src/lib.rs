//! # CINDER Effects
//!
//! Client-side transient visual effects ("local entities"): explosions,
//! blood spray, gibs, smoke, teleport flashes and floating numbers.
//! Nothing here affects gameplay or is synchronised between clients.
//!
//! ## Data Flow
//!
//! ```text
//! event decoder ──▶ Effects::<composer>() ──▶ LocalEntityPool (ring)
//!                                                   │
//!        renderer ◀── Vec<Renderable> ◀── Effects::update_and_collect(t)
//! ```
//!
//! - Composers sample randomness, evaluate spawn geometry and allocate one
//!   or more pool entries.
//! - Entity motion is closed-form ([`Trajectory`]), so the per-frame pass
//!   can be evaluated at any time without integration.
//! - The pool never grows. A full pool overwrites its oldest entry.
//!
//! ## Collaborators
//!
//! The renderer, audio mixer, resource manager and world queries live
//! elsewhere and are reached through [`AssetResolver`], [`AudioSink`],
//! [`Environment`] and [`RenderCapabilities`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_effects::{EffectAssets, Effects, EffectsConfig, RenderCapabilities};
//!
//! let assets = EffectAssets::resolve(&mut resource_manager);
//! let mut fx = Effects::new(EffectsConfig::load("data/effects.toml")?, RenderCapabilities::default(), assets)?;
//!
//! fx.gib_player(now, origin);
//!
//! let mut frame = Vec::new();
//! fx.update_and_collect(now, &mut frame);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod assets;
pub mod composers;
pub mod config;
pub mod entity;
pub mod error;
pub mod pool;
pub mod render;
pub mod trajectory;
pub mod world;

pub use assets::{AssetResolver, EffectAssets, ModelHandle, SequentialResolver, ShaderHandle, SoundHandle};
pub use composers::{
    sample_spray, Effects, Explosion, ExplosionStyle, FragmentClass, GibTable, LaunchProfile,
    LightFlash, SmokePuff, SprayBasis, VolleyPiece, Weapon, Wound, WoundProfile, DESYNC_MASK,
    ENTRY_SPEED, EXIT_PROBABILITY, EXIT_SPEED, PLUM_SEPARATION,
};
pub use config::{EffectsConfig, GameVariant, Toggles};
pub use entity::{
    BounceSound, EntityFlags, EntityKind, FollowUp, GroundMark, LocalEntity, RenderTemplate,
};
pub use error::{EffectError, EffectResult};
pub use pool::{DueFollowUp, EntityHandle, ExpiryPolicy, FrameStats, LocalEntityPool};
pub use render::{
    DynamicLight, RenderCapabilities, RenderFx, Renderable, ShaderTime, ShaderTimeFormat, Shape,
};
pub use trajectory::{Motion, Trajectory, GRAVITY};
pub use world::{AudioSink, Contents, EntityId, Environment, OpenAir, Silence, SoundChannel, Viewpoint};
