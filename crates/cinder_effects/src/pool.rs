//! # Local-Entity Pool
//!
//! Fixed-capacity ring of [`LocalEntity`] slots plus the per-frame
//! collection pass.
//!
//! ## Lifecycle
//!
//! - Composers build an entity completely and hand it to [`LocalEntityPool::allocate`].
//! - Allocation never fails. When the ring wraps, the oldest slot is
//!   overwritten whether or not its effect has finished.
//! - [`LocalEntityPool::update_and_collect`] walks the slots in order and
//!   emits a [`Renderable`] for every entity inside its active window.
//! - Expired entities stay in their slot until the ring reaches them again.
//!   Their follow-up logic (if any) is handed out exactly once.

use cinder_core::{GameTime, RingHandle, RingPool, Vec3};

use crate::entity::{EntityFlags, EntityKind, FollowUp, LocalEntity};
use crate::render::{project, Renderable};

/// Handle to a pooled entity. Goes stale when the ring reuses its slot.
pub type EntityHandle = RingHandle;

/// Per-kind grace period past `expire_time` for [`EntityFlags::ONE_SHOT`] entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpiryPolicy {
    leeway: [GameTime; EntityKind::COUNT],
}

impl ExpiryPolicy {
    /// No leeway for any kind.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            leeway: [0; EntityKind::COUNT],
        }
    }

    /// Sets the leeway for `kind`. Negative values are treated as zero.
    #[must_use]
    pub fn with_leeway(mut self, kind: EntityKind, leeway: GameTime) -> Self {
        self.leeway[kind.index()] = leeway.max(0);
        self
    }

    /// Leeway for `kind`, in milliseconds.
    #[inline]
    #[must_use]
    pub const fn leeway(&self, kind: EntityKind) -> GameTime {
        self.leeway[kind.index()]
    }

    /// End of the collection window for `entity`, exclusive.
    #[inline]
    #[must_use]
    pub fn collect_until(&self, entity: &LocalEntity) -> GameTime {
        if entity.flags.contains(EntityFlags::ONE_SHOT) {
            entity.expire_time + self.leeway(entity.kind)
        } else {
            entity.expire_time
        }
    }
}

/// Counters from one collection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Slots holding an entity.
    pub occupied: u32,
    /// Snapshots emitted.
    pub rendered: u32,
    /// Entities past their window.
    pub expired: u32,
}

/// Expiry logic released by a collection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DueFollowUp {
    /// What to build.
    pub follow_up: FollowUp,
    /// Where the expired entity was at its expiry time.
    pub origin: Vec3,
    /// When it expired.
    pub time: GameTime,
}

/// Fixed-capacity ring of local entities.
pub struct LocalEntityPool {
    ring: RingPool<LocalEntity>,
    expiry: ExpiryPolicy,
    due: Vec<DueFollowUp>,
}

impl LocalEntityPool {
    /// Creates a pool with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Config validation rejects that first.
    #[must_use]
    pub fn new(capacity: usize, expiry: ExpiryPolicy) -> Self {
        tracing::debug!("Local entity pool created: {} slots", capacity);
        Self {
            ring: RingPool::new(capacity),
            expiry,
            due: Vec::new(),
        }
    }

    /// Stores `entity`, evicting the oldest slot if the ring is full.
    pub fn allocate(&mut self, entity: LocalEntity) -> EntityHandle {
        self.ring.allocate(entity)
    }

    /// Entity behind `handle`, unless the slot has been reused.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&LocalEntity> {
        self.ring.get(handle)
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Slots currently holding an entity, live or expired.
    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.ring.occupied()
    }

    /// Expiry rules in effect.
    #[must_use]
    pub const fn expiry(&self) -> &ExpiryPolicy {
        &self.expiry
    }

    /// Replaces the expiry rules.
    pub fn set_expiry(&mut self, expiry: ExpiryPolicy) {
        self.expiry = expiry;
    }

    /// True if `entity` would be collected at `time`.
    #[must_use]
    pub fn is_active(&self, entity: &LocalEntity, time: GameTime) -> bool {
        entity.spawn_time <= time && time < self.expiry.collect_until(entity)
    }

    /// Every occupied slot, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &LocalEntity)> {
        self.ring.iter()
    }

    /// Entities that react to ground contact.
    pub fn bouncing(&self) -> impl Iterator<Item = (EntityHandle, &LocalEntity)> {
        self.ring.iter().filter(|(_, le)| le.bounce_factor > 0.0)
    }

    /// Forwards a ground contact at `time` to the entity behind `handle`.
    ///
    /// Returns `false` if the handle is stale.
    pub fn reflect(&mut self, handle: EntityHandle, time: GameTime, normal: Vec3) -> bool {
        match self.ring.get_mut(handle) {
            Some(le) => {
                le.reflect(time, normal);
                true
            }
            None => false,
        }
    }

    /// Per-frame pass: appends a snapshot of every active entity to `out`.
    ///
    /// Entities with `spawn_time <= time < expire_time` (plus the kind's
    /// leeway when flagged [`EntityFlags::ONE_SHOT`]) are emitted in slot
    /// order. Expired entities are skipped, and their follow-up logic is
    /// queued for [`LocalEntityPool::drain_follow_ups`].
    pub fn update_and_collect(&mut self, time: GameTime, out: &mut Vec<Renderable>) -> FrameStats {
        let mut stats = FrameStats::default();
        let expiry = self.expiry;

        for (handle, le) in self.ring.iter_mut() {
            stats.occupied += 1;

            if time >= expiry.collect_until(le) {
                stats.expired += 1;
                if let Some(follow_up) = le.follow_up.take() {
                    self.due.push(DueFollowUp {
                        follow_up,
                        origin: le.position.evaluate(le.expire_time),
                        time,
                    });
                }
                continue;
            }
            if time < le.spawn_time {
                continue;
            }

            out.push(project(handle, le, time));
            stats.rendered += 1;
        }

        stats
    }

    /// Takes the follow-ups released by previous collection passes.
    pub fn drain_follow_ups(&mut self) -> std::vec::Drain<'_, DueFollowUp> {
        self.due.drain(..)
    }

    /// Drops every entity, e.g. on level change.
    pub fn clear(&mut self) {
        self.ring.clear();
        self.due.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale_fade(spawn: GameTime, expire: GameTime) -> LocalEntity {
        LocalEntity::new(EntityKind::ScaleFade, spawn, expire).unwrap()
    }

    #[test]
    fn test_collect_window_is_half_open() {
        let mut pool = LocalEntityPool::new(8, ExpiryPolicy::strict());
        pool.allocate(scale_fade(100, 200));
        let mut out = Vec::new();

        for (t, want) in [(99, 0), (100, 1), (199, 1), (200, 0)] {
            out.clear();
            let stats = pool.update_and_collect(t, &mut out);
            assert_eq!(out.len(), want, "t = {t}");
            assert_eq!(stats.rendered as usize, want);
            assert_eq!(stats.occupied, 1);
        }
    }

    #[test]
    fn test_leeway_needs_flag() {
        let policy = ExpiryPolicy::strict().with_leeway(EntityKind::Beam, 16);
        let mut pool = LocalEntityPool::new(8, policy);
        let flagged = pool.allocate(
            LocalEntity::new(EntityKind::Beam, 0, 50)
                .unwrap()
                .with_flags(EntityFlags::ONE_SHOT),
        );
        pool.allocate(LocalEntity::new(EntityKind::Beam, 0, 50).unwrap());

        let mut out = Vec::new();
        pool.update_and_collect(60, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].handle, flagged);

        out.clear();
        pool.update_and_collect(66, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_follow_up_released_once() {
        let mut pool = LocalEntityPool::new(4, ExpiryPolicy::strict());
        pool.allocate(
            LocalEntity::new(EntityKind::InvulnerabilityJuiced, 0, 5000)
                .unwrap()
                .with_position(crate::trajectory::Trajectory::stationary(Vec3::new(1.0, 2.0, 3.0)))
                .with_follow_up(FollowUp::Gibs),
        );
        let mut out = Vec::new();

        pool.update_and_collect(4999, &mut out);
        assert_eq!(pool.drain_follow_ups().count(), 0);

        let stats = pool.update_and_collect(5000, &mut out);
        assert_eq!(stats.expired, 1);
        let due: Vec<_> = pool.drain_follow_ups().collect();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].origin, Vec3::new(1.0, 2.0, 3.0));

        pool.update_and_collect(6000, &mut out);
        assert_eq!(pool.drain_follow_ups().count(), 0);
    }

    #[test]
    fn test_overflow_keeps_most_recent() {
        let mut pool = LocalEntityPool::new(3, ExpiryPolicy::strict());
        let handles: Vec<_> = (0..7).map(|i| pool.allocate(scale_fade(i, 1000))).collect();

        assert_eq!(pool.occupied(), 3);
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(pool.get(*h).is_some(), i >= 4, "allocation {i}");
        }
    }

    #[test]
    fn test_bouncing_filters_on_restitution() {
        let mut pool = LocalEntityPool::new(4, ExpiryPolicy::strict());
        pool.allocate(scale_fade(0, 100));
        let gib = pool.allocate(
            LocalEntity::new(EntityKind::Fragment, 0, 100).unwrap().with_bounce(
                0.6,
                crate::entity::BounceSound::Blood,
                crate::entity::GroundMark::Blood,
            ),
        );
        let found: Vec<_> = pool.bouncing().map(|(h, _)| h).collect();
        assert_eq!(found, vec![gib]);
        assert!(pool.reflect(gib, 10, Vec3::Z));
    }
}
