//! # Effects Configuration
//!
//! Loaded once from TOML at startup. Toggles are read by composers on
//! every call, so flipping one through [`crate::Effects::toggles_mut`]
//! takes effect on the next event.
//!
//! ```toml
//! pool_capacity = 512
//! variant = "classic"
//!
//! [toggles]
//! damage_plums = true
//!
//! [expiry]
//! beam = 16
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use cinder_core::GameTime;
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::{EffectError, EffectResult};
use crate::pool::ExpiryPolicy;

/// Default number of pool slots.
pub const DEFAULT_POOL_CAPACITY: usize = 512;

/// One 60 Hz frame, the default beam leeway.
pub const DEFAULT_BEAM_LEEWAY: GameTime = 16;

/// Game flavour; changes placement of a few effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    /// Original rules and art.
    #[default]
    Classic,
    /// Team arena mission pack.
    TeamArena,
}

/// Feature switches checked at composer entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Bubble trails behind underwater projectiles.
    pub projectile_trails: bool,
    /// Any blood, gib or debris effect.
    pub blood: bool,
    /// Particle blood spray instead of a single sprite.
    pub blood_particles: bool,
    /// Full-body gib volleys (the head is always launched).
    pub gibs: bool,
    /// Floating score numbers.
    pub score_plums: bool,
    /// Floating damage numbers.
    pub damage_plums: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            projectile_trails: true,
            blood: true,
            blood_particles: true,
            gibs: true,
            score_plums: true,
            damage_plums: false,
        }
    }
}

/// Top-level effects configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Number of local-entity slots. Fixed for the session.
    pub pool_capacity: usize,
    /// Sampler seed; entropy when absent.
    pub seed: Option<u64>,
    /// Game flavour.
    pub variant: GameVariant,
    /// Feature switches.
    pub toggles: Toggles,
    /// One-shot leeway per entity kind name, in milliseconds.
    pub expiry: BTreeMap<String, GameTime>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        let mut expiry = BTreeMap::new();
        expiry.insert(EntityKind::Beam.name().to_owned(), DEFAULT_BEAM_LEEWAY);
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            seed: None,
            variant: GameVariant::Classic,
            toggles: Toggles::default(),
            expiry,
        }
    }
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`EffectError::Config`] on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> EffectResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`EffectError::Io`] if the file cannot be read, otherwise as
    /// [`EffectsConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EffectResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Effects config loaded from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges and kind names.
    ///
    /// # Errors
    ///
    /// [`EffectError::Config`] describing the first problem found.
    pub fn validate(&self) -> EffectResult<()> {
        if self.pool_capacity == 0 {
            return Err(EffectError::Config("pool_capacity must be positive".into()));
        }
        for (name, leeway) in &self.expiry {
            if EntityKind::from_name(name).is_none() {
                return Err(EffectError::Config(format!("unknown entity kind in [expiry]: {name}")));
            }
            if *leeway < 0 {
                return Err(EffectError::Config(format!(
                    "expiry leeway for {name} must not be negative, got {leeway}"
                )));
            }
        }
        Ok(())
    }

    /// Per-kind leeway table for the pool. Unknown names are skipped.
    #[must_use]
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.expiry
            .iter()
            .filter_map(|(name, leeway)| EntityKind::from_name(name).map(|kind| (kind, *leeway)))
            .fold(ExpiryPolicy::strict(), |policy, (kind, leeway)| {
                policy.with_leeway(kind, leeway)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = EffectsConfig::from_toml_str("").unwrap();
        assert_eq!(config, EffectsConfig::default());
        assert!(!config.toggles.damage_plums);
        assert!(config.toggles.gibs);
        assert_eq!(config.expiry_policy().leeway(EntityKind::Beam), 16);
        assert_eq!(config.expiry_policy().leeway(EntityKind::Explosion), 0);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = EffectsConfig::from_toml_str(
            r#"
            pool_capacity = 64
            seed = 7
            variant = "team_arena"

            [toggles]
            gibs = false

            [expiry]
            fragment = 33
            "#,
        )
        .unwrap();

        assert_eq!(config.pool_capacity, 64);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.variant, GameVariant::TeamArena);
        assert!(!config.toggles.gibs);
        assert!(config.toggles.blood);
        assert_eq!(config.expiry_policy().leeway(EntityKind::Fragment), 33);
        // Table replaced wholesale.
        assert_eq!(config.expiry_policy().leeway(EntityKind::Beam), 0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EffectsConfig::from_toml_str("pool_capacity = 0"),
            Err(EffectError::Config(_))
        ));
        assert!(matches!(
            EffectsConfig::from_toml_str("[expiry]\nlaser = 5"),
            Err(EffectError::Config(_))
        ));
        assert!(matches!(
            EffectsConfig::from_toml_str("[expiry]\nbeam = -1"),
            Err(EffectError::Config(_))
        ));
        assert!(matches!(
            EffectsConfig::from_toml_str("pool_capacity = \"many\""),
            Err(EffectError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            EffectsConfig::load("/definitely/not/here/effects.toml"),
            Err(EffectError::Io(_))
        ));
    }
}
