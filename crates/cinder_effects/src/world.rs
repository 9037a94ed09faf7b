//! Collaborators outside the effects subsystem: world queries, audio,
//! and the identity of the local viewpoint.

use bitflags::bitflags;
use cinder_core::Vec3;

use crate::assets::SoundHandle;

bitflags! {
    /// Medium classification of a point in space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Contents: u32 {
        /// Inside solid geometry.
        const SOLID = 0x0001;
        /// Lava volume.
        const LAVA  = 0x0008;
        /// Slime volume.
        const SLIME = 0x0010;
        /// Water volume.
        const WATER = 0x0020;
        /// Fog volume.
        const FOG   = 0x0040;
    }
}

impl Contents {
    /// Liquids that mute sprays into a single puff.
    pub const SUBMERGED: Self = Self::WATER.union(Self::LAVA).union(Self::SLIME);

    /// True if any liquid is present.
    #[must_use]
    pub const fn is_submerged(self) -> bool {
        self.intersects(Self::SUBMERGED)
    }
}

/// Point classification provided by the simulation.
pub trait Environment {
    /// Contents at `point`.
    fn point_contents(&self, point: Vec3) -> Contents;
}

/// An environment with nothing in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenAir;

impl Environment for OpenAir {
    fn point_contents(&self, _point: Vec3) -> Contents {
        Contents::empty()
    }
}

impl<F> Environment for F
where
    F: Fn(Vec3) -> Contents,
{
    fn point_contents(&self, point: Vec3) -> Contents {
        self(point)
    }
}

/// Simulation entity number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    /// No particular entity; sounds play unattached.
    pub const NONE: Self = Self(1023);
}

/// Mixer channel class for a sound cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundChannel {
    /// Picks any free channel.
    Auto,
    /// Menu and local feedback.
    Local,
    /// Weapon fire.
    Weapon,
    /// Voice.
    Voice,
    /// Item pickup.
    Item,
    /// Body impacts.
    Body,
}

/// Fire-and-forget sound playback.
pub trait AudioSink {
    /// Starts `sound` at `origin` (or attached to `entity` when `None`).
    fn start_sound(
        &mut self,
        origin: Option<Vec3>,
        entity: EntityId,
        channel: SoundChannel,
        sound: SoundHandle,
    );
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl AudioSink for Silence {
    fn start_sound(&mut self, _: Option<Vec3>, _: EntityId, _: SoundChannel, _: SoundHandle) {}
}

/// Per-viewpoint UI state threaded into composers that care who is
/// watching: the locally controlled client and the last score plum spot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    /// Client the local player controls.
    pub client: EntityId,
    /// Where the previous score plum was placed.
    pub(crate) last_plum: Option<Vec3>,
}

impl Viewpoint {
    /// Viewpoint of `client` with no plum history.
    #[must_use]
    pub const fn new(client: EntityId) -> Self {
        Self {
            client,
            last_plum: None,
        }
    }

    /// True if `entity` is the local player.
    #[must_use]
    pub fn is_local(&self, entity: EntityId) -> bool {
        self.client == entity
    }

    /// Where the previous score plum was placed.
    #[must_use]
    pub const fn last_plum(&self) -> Option<Vec3> {
        self.last_plum
    }
}
