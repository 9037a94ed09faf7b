//! # Ring Pool
//!
//! Fixed-capacity storage reused in ring order.
//!
//! Allocation never fails: the cursor walks the slots in order and the next
//! slot is overwritten whether or not its occupant is still in use. Under
//! pressure the oldest value is silently evicted, which bounds memory
//! without ever refusing a request.

/// A ring allocator for fixed-size objects.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: RingPool<u32> = RingPool::new(2);
///
/// let a = pool.allocate(1);
/// let b = pool.allocate(2);
/// let c = pool.allocate(3); // overwrites `a`
///
/// assert!(pool.get(a).is_none());
/// assert_eq!(pool.get(c), Some(&3));
/// ```
pub struct RingPool<T> {
    /// The storage array.
    storage: Box<[Slot<T>]>,
    /// Index of the slot the next allocation overwrites.
    cursor: usize,
    /// Number of occupied slots.
    occupied: usize,
}

/// One storage slot.
struct Slot<T> {
    /// Bumped every time the slot is handed out.
    generation: u32,
    /// Current occupant.
    value: Option<T>,
}

/// Handle to a value in a [`RingPool`].
///
/// Handles go stale once the ring wraps around and the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RingHandle {
    /// Index into the pool.
    index: usize,
    /// Generation of the slot when this handle was issued.
    generation: u32,
}

impl RingHandle {
    /// Slot index this handle refers to.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation tag of the slot when the handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> RingPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let storage: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();

        Self {
            storage: storage.into_boxed_slice(),
            cursor: 0,
            occupied: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.occupied
    }

    /// Stores `value` in the next slot in ring order.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**.
    pub fn allocate(&mut self, value: T) -> RingHandle {
        self.allocate_evicting(value).0
    }

    /// Like [`RingPool::allocate`], also returning whatever was evicted.
    pub fn allocate_evicting(&mut self, value: T) -> (RingHandle, Option<T>) {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.storage.len();

        let slot = &mut self.storage[index];
        slot.generation = slot.generation.wrapping_add(1);
        let evicted = slot.value.replace(value);
        if evicted.is_none() {
            self.occupied += 1;
        }

        (
            RingHandle {
                index,
                generation: slot.generation,
            },
            evicted,
        )
    }

    /// True if `handle` still refers to the value it was issued for.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: RingHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Gets a reference to an allocated object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: RingHandle) -> Option<&T> {
        let slot = self.storage.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to an allocated object.
    #[inline]
    pub fn get_mut(&mut self, handle: RingHandle) -> Option<&mut T> {
        let slot = self.storage.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Empties the slot behind `handle`, returning its value.
    pub fn free(&mut self, handle: RingHandle) -> Option<T> {
        let slot = self.storage.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        self.occupied -= 1;
        Some(value)
    }

    /// Clears all slots and rewinds the cursor.
    ///
    /// Outstanding handles become stale.
    pub fn clear(&mut self) {
        for slot in self.storage.iter_mut() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.cursor = 0;
        self.occupied = 0;
    }

    /// Iterates over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RingHandle, &T)> {
        self.storage.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|v| {
                (
                    RingHandle {
                        index,
                        generation: slot.generation,
                    },
                    v,
                )
            })
        })
    }

    /// Iterates mutably over occupied slots in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RingHandle, &mut T)> {
        self.storage.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|v| (RingHandle { index, generation }, v))
        })
    }
}
