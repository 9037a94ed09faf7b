//! Asset handles and the one-time lookup that fills them.
//!
//! The resource manager is a collaborator: it resolves logical names to
//! handles once per session and always yields a valid (possibly
//! placeholder) handle. Composers only ever copy handles around.

/// Handle to a shader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Handle to a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

/// Handle to a sound effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Name-to-handle lookup provided by the resource manager.
pub trait AssetResolver {
    /// Resolves a shader.
    fn shader(&mut self, name: &str) -> ShaderHandle;
    /// Resolves a model.
    fn model(&mut self, name: &str) -> ModelHandle;
    /// Resolves a sound.
    fn sound(&mut self, name: &str) -> SoundHandle;
}

/// Hands out increasing handles and remembers every requested name.
///
/// Useful for headless clients and tests where nothing is drawn.
#[derive(Debug, Default)]
pub struct SequentialResolver {
    next: u32,
    names: Vec<String>,
}

impl SequentialResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names requested so far, in order. Handle `n` maps to entry `n - 1`.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn issue(&mut self, name: &str) -> u32 {
        self.next += 1;
        self.names.push(name.to_owned());
        self.next
    }
}

impl AssetResolver for SequentialResolver {
    fn shader(&mut self, name: &str) -> ShaderHandle {
        ShaderHandle(self.issue(name))
    }

    fn model(&mut self, name: &str) -> ModelHandle {
        ModelHandle(self.issue(name))
    }

    fn sound(&mut self, name: &str) -> SoundHandle {
        SoundHandle(self.issue(name))
    }
}

/// Shaders used by the composers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectShaders {
    /// Underwater trail bubble.
    pub water_bubble: ShaderHandle,
    /// Alpha-faded smoke.
    pub smoke_puff: ShaderHandle,
    /// Flat stand-in for backends without alpha blending.
    pub smoke_puff_flat: ShaderHandle,
    /// Blood droplets and mist.
    pub blood_trail: ShaderHandle,
    /// Single-sprite blood burst.
    pub blood_explosion: ShaderHandle,
    /// Teleport flash overlay.
    pub teleport_effect: ShaderHandle,
    /// Rocket explosion overlay.
    pub rocket_explosion: ShaderHandle,
    /// Lightning beam.
    pub lightning: ShaderHandle,
}

/// Models used by the composers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectModels {
    /// Teleport flash.
    pub teleport_effect: ModelHandle,
    /// Dish-shaped explosion flash.
    pub dish_flash: ModelHandle,
    /// Kamikaze shockwave.
    pub kamikaze_effect: ModelHandle,
    /// Shield impact.
    pub invulnerability_impact: ModelHandle,
    /// Swelling shield.
    pub invulnerability_juiced: ModelHandle,
    /// Smoke chunk used as explosion debris.
    pub smoke_debris: ModelHandle,
    /// Head gib, variant A.
    pub gib_skull: ModelHandle,
    /// Head gib, variant B.
    pub gib_brain: ModelHandle,
    /// Body gibs.
    pub gib_abdomen: ModelHandle,
    /// Body gibs.
    pub gib_arm: ModelHandle,
    /// Body gibs.
    pub gib_chest: ModelHandle,
    /// Body gibs.
    pub gib_fist: ModelHandle,
    /// Body gibs.
    pub gib_foot: ModelHandle,
    /// Body gibs.
    pub gib_forearm: ModelHandle,
    /// Body gibs.
    pub gib_intestine: ModelHandle,
    /// Body gibs.
    pub gib_leg: ModelHandle,
}

/// Sounds used by the composers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectSounds {
    /// Obelisk hit variants.
    pub obelisk_hit: [SoundHandle; 3],
    /// Shield impact variants.
    pub invulnerability_impact: [SoundHandle; 3],
    /// Shield swelling.
    pub invulnerability_juiced: SoundHandle,
}

/// Every handle the composers need, resolved once at session start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectAssets {
    /// Shaders.
    pub shaders: EffectShaders,
    /// Models.
    pub models: EffectModels,
    /// Sounds.
    pub sounds: EffectSounds,
}

impl EffectAssets {
    /// Looks up every effect asset through `resolver`.
    pub fn resolve(resolver: &mut impl AssetResolver) -> Self {
        let shaders = EffectShaders {
            water_bubble: resolver.shader("waterBubble"),
            smoke_puff: resolver.shader("smokePuff"),
            smoke_puff_flat: resolver.shader("smokePuffFlat"),
            blood_trail: resolver.shader("bloodTrail"),
            blood_explosion: resolver.shader("bloodExplosion"),
            teleport_effect: resolver.shader("teleportEffect"),
            rocket_explosion: resolver.shader("rocketExplosion"),
            lightning: resolver.shader("lightningBolt"),
        };

        let models = EffectModels {
            teleport_effect: resolver.model("models/misc/telep.md3"),
            dish_flash: resolver.model("models/weaphits/boom01.md3"),
            kamikaze_effect: resolver.model("models/weaphits/kamboom2.md3"),
            invulnerability_impact: resolver.model("models/powerups/shield/impact.md3"),
            invulnerability_juiced: resolver.model("models/powerups/shield/juicer.md3"),
            smoke_debris: resolver.model("models/gibs/smoke.md3"),
            gib_skull: resolver.model("models/gibs/skull.md3"),
            gib_brain: resolver.model("models/gibs/brain.md3"),
            gib_abdomen: resolver.model("models/gibs/abdomen.md3"),
            gib_arm: resolver.model("models/gibs/arm.md3"),
            gib_chest: resolver.model("models/gibs/chest.md3"),
            gib_fist: resolver.model("models/gibs/fist.md3"),
            gib_foot: resolver.model("models/gibs/foot.md3"),
            gib_forearm: resolver.model("models/gibs/forearm.md3"),
            gib_intestine: resolver.model("models/gibs/intestine.md3"),
            gib_leg: resolver.model("models/gibs/leg.md3"),
        };

        let sounds = EffectSounds {
            obelisk_hit: [
                resolver.sound("sound/items/obelisk_hit_01.wav"),
                resolver.sound("sound/items/obelisk_hit_02.wav"),
                resolver.sound("sound/items/obelisk_hit_03.wav"),
            ],
            invulnerability_impact: [
                resolver.sound("sound/items/invul_impact_01.wav"),
                resolver.sound("sound/items/invul_impact_02.wav"),
                resolver.sound("sound/items/invul_impact_03.wav"),
            ],
            invulnerability_juiced: resolver.sound("sound/items/invul_juiced.wav"),
        };

        Self {
            shaders,
            models,
            sounds,
        }
    }
}
