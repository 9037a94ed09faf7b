//! # Effect Composers
//!
//! Construction logic that turns semantic event parameters (an origin, an
//! impact direction, a score) into fully initialised pool entries.
//!
//! Every composer is a method on [`Effects`], which owns the pool, the
//! sampler and the resolved asset handles. Composers are fire-and-forget:
//! the handles they return are for callers that want to track an effect,
//! and go stale when the ring reuses the slot.
//!
//! | Module | Composers |
//! |--------|-----------|
//! | `trail` | [`Effects::bubble_trail`] |
//! | `smoke` | [`Effects::smoke_puff`] |
//! | `explosion` | [`Effects::make_explosion`] |
//! | `blood` | [`Effects::bleed`] |
//! | `fragments` | [`Effects::launch_fragment`], [`Effects::gib_player`], [`Effects::big_explode`] |
//! | `plums` | [`Effects::score_plum`], [`Effects::damage_plum`] |
//! | `teleport` | [`Effects::spawn_effect`] |
//! | `arena` | beams, kamikaze, obelisk and invulnerability effects |

mod arena;
mod blood;
mod explosion;
mod fragments;
mod plums;
mod smoke;
mod teleport;
mod trail;

pub use blood::{
    sample_spray, SprayBasis, Weapon, Wound, WoundProfile, ENTRY_SPEED, EXIT_PROBABILITY, EXIT_SPEED,
};
pub use explosion::{Explosion, ExplosionStyle, LightFlash, DESYNC_MASK};
pub use fragments::{FragmentClass, GibTable, LaunchProfile, VolleyPiece};
pub use plums::PLUM_SEPARATION;
pub use smoke::SmokePuff;

use cinder_core::{GameTime, Sampler};

use crate::assets::EffectAssets;
use crate::config::{EffectsConfig, Toggles};
use crate::entity::FollowUp;
use crate::error::{EffectError, EffectResult};
use crate::pool::{FrameStats, LocalEntityPool};
use crate::render::{RenderCapabilities, Renderable, ShaderTime};

/// The effects context: pool, randomness, assets and configuration.
pub struct Effects {
    config: EffectsConfig,
    caps: RenderCapabilities,
    assets: EffectAssets,
    gibs: GibTable,
    pool: LocalEntityPool,
    sampler: Sampler,
}

impl Effects {
    /// Creates the effects context for a session.
    ///
    /// # Errors
    ///
    /// [`EffectError::Config`] if `config` fails validation.
    pub fn new(
        config: EffectsConfig,
        caps: RenderCapabilities,
        assets: EffectAssets,
    ) -> EffectResult<Self> {
        config.validate()?;

        let sampler = match config.seed {
            Some(seed) => Sampler::from_seed(seed),
            None => Sampler::from_entropy(),
        };
        let pool = LocalEntityPool::new(config.pool_capacity, config.expiry_policy());
        let gibs = GibTable::standard(&assets.models);

        tracing::debug!(
            "Effects context created: capacity={}, variant={:?}, alpha_blend={}",
            config.pool_capacity,
            config.variant,
            caps.alpha_blend
        );

        Ok(Self {
            config,
            caps,
            assets,
            gibs,
            pool,
            sampler,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Feature switches; changes apply from the next composer call.
    pub fn toggles_mut(&mut self) -> &mut Toggles {
        &mut self.config.toggles
    }

    /// Backend capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> RenderCapabilities {
        self.caps
    }

    /// Resolved asset handles.
    #[must_use]
    pub const fn assets(&self) -> &EffectAssets {
        &self.assets
    }

    /// Gib volley table.
    #[must_use]
    pub const fn gib_table(&self) -> &GibTable {
        &self.gibs
    }

    /// Swaps in a different gib volley table (mods, alternate art).
    pub fn set_gib_table(&mut self, gibs: GibTable) {
        self.gibs = gibs;
    }

    /// The entity pool.
    #[must_use]
    pub const fn pool(&self) -> &LocalEntityPool {
        &self.pool
    }

    /// The entity pool, for ground-contact forwarding.
    pub fn pool_mut(&mut self) -> &mut LocalEntityPool {
        &mut self.pool
    }

    /// Per-frame pass: collects snapshots and runs expired entities'
    /// follow-up logic.
    pub fn update_and_collect(&mut self, time: GameTime, out: &mut Vec<Renderable>) -> FrameStats {
        let stats = self.pool.update_and_collect(time, out);

        let due: Vec<_> = self.pool.drain_follow_ups().collect();
        for item in due {
            match item.follow_up {
                FollowUp::Gibs => self.gib_player(item.time, item.origin),
            }
        }

        stats
    }

    fn toggles(&self) -> Toggles {
        self.config.toggles
    }

    fn shader_time(&self, time: GameTime) -> ShaderTime {
        ShaderTime::at(self.caps.shader_time, time)
    }
}

/// End of a window of `duration` ms starting at `start_time`.
fn window_end(effect: &'static str, start_time: GameTime, duration: GameTime) -> EffectResult<GameTime> {
    start_time.checked_add(duration).ok_or_else(|| {
        contract_violation(EffectError::DurationOverflow {
            effect,
            start_time,
            duration,
        })
    })
}

/// Logs a contract violation on its way out.
fn contract_violation(err: EffectError) -> EffectError {
    tracing::error!("Effect rejected: {}", err);
    err
}
