//! Doubling bump arena.
//!
//! [`ArenaAllocator`] hands out slots from one contiguous buffer by
//! advancing a cursor. When a request does not fit, the buffer is replaced
//! by one of `max(capacity * 2, used + n)` slots and every live object is
//! relocated. Slots are never handed back individually: see
//! [`ArenaAllocator::deallocate`].

use std::fmt;

use strata_core::{Allocator, ArenaError, ArenaId, Slot, SlotRange};

use crate::buffer::SlotBuffer;
use crate::config::ArenaConfig;

/// A monotonic bump allocator over a single growable buffer.
///
/// # Deallocation does not reclaim
///
/// [`deallocate`](ArenaAllocator::deallocate) only checks that the range
/// belongs to this instance. The cursor is never moved back and released
/// slots are never reused, so a loop of allocate/deallocate keeps consuming
/// capacity and eventually triggers growth. Storage is reclaimed in bulk
/// only: when the buffer is replaced during growth, and when the allocator
/// is dropped (which also drops every object still live in it).
///
/// # Equality
///
/// All `ArenaAllocator<T>` instances compare equal, whatever their capacity
/// or history. Ownership checks are still per instance: a range from one
/// arena is rejected by every other arena even though the two are `==`.
///
/// # Thread Safety
///
/// Not thread-safe. All mutation goes through `&mut self`; do not share
/// one live arena between independently mutating containers.
pub struct ArenaAllocator<T> {
    id: ArenaId,
    buffer: SlotBuffer<T>,
    /// Bump cursor: slots `[0, used)` have been handed out.
    used: usize,
    growths: u32,
    config: ArenaConfig,
}

impl<T> ArenaAllocator<T> {
    /// Create an arena with room for `capacity` objects and no growth ceiling.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from a config.
    ///
    /// Fails with `ResourceExhausted` if the initial buffer cannot be
    /// obtained or already exceeds `max_capacity`.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        let limit = config.limit();
        if config.initial_capacity > limit {
            return Err(ArenaError::ResourceExhausted {
                requested: config.initial_capacity,
                limit,
            });
        }
        let buffer = SlotBuffer::with_capacity(config.initial_capacity, limit)?;
        Ok(Self {
            id: ArenaId::next(),
            buffer,
            used: 0,
            growths: 0,
            config,
        })
    }

    /// This instance's identifier.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The config this arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Total slots in the current buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Slots handed out so far. Never decreases.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Slots still available before the next growth.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Number of slots currently holding a live object.
    pub fn live(&self) -> usize {
        self.buffer.live_in(self.used)
    }

    /// How many times the buffer has been replaced by a larger one.
    pub fn growth_count(&self) -> u32 {
        self.growths
    }

    /// Memory held by the backing buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.buffer.memory_bytes()
    }

    /// Compute the capacity growth must reach to satisfy `n` more slots.
    fn growth_target(&self, n: usize) -> Result<usize, ArenaError> {
        let capacity = self.capacity();
        let required = self
            .used
            .checked_add(n)
            .ok_or(ArenaError::InvalidGrowth {
                target: capacity,
                used: self.used,
            })?;
        let limit = self.config.limit();
        if required > limit {
            return Err(ArenaError::ResourceExhausted {
                requested: required,
                limit,
            });
        }
        let target = capacity.saturating_mul(2).max(required).min(limit);
        if target <= self.used {
            return Err(ArenaError::InvalidGrowth {
                target,
                used: self.used,
            });
        }
        Ok(target)
    }

    fn grow(&mut self, new_capacity: usize) -> Result<(), ArenaError> {
        let from = self.capacity();
        self.buffer
            .relocate(self.used, new_capacity, self.config.limit())?;
        self.growths += 1;
        tracing::debug!(
            arena = %self.id,
            from,
            to = new_capacity,
            relocated = self.used,
            "arena grew"
        );
        Ok(())
    }

    /// Reject handles that are foreign or reach past `bound`.
    ///
    /// Ranges are released against the whole buffer; slot operations only
    /// against the handed-out prefix `[0, used)`, since growth relocates
    /// nothing beyond it.
    fn check_owned(
        &self,
        arena: ArenaId,
        start: usize,
        len: usize,
        bound: usize,
    ) -> Result<(), ArenaError> {
        let capacity = self.capacity();
        let in_bounds = match start.checked_add(len) {
            Some(end) => end <= bound && (len == 0 || start < bound),
            None => false,
        };
        if arena != self.id || !in_bounds {
            return Err(ArenaError::OwnershipViolation {
                index: start,
                len,
                capacity,
            });
        }
        Ok(())
    }
}

impl<T> Allocator for ArenaAllocator<T> {
    type Value = T;
    type Rebind<U> = ArenaAllocator<U>;

    /// Bump-allocate `n` slots, growing the buffer first if they do not fit.
    ///
    /// Growth relocates every live object; handles stay valid because they
    /// are index-addressed. `used` advances by exactly `n`.
    fn allocate(&mut self, n: usize) -> Result<SlotRange, ArenaError> {
        if n > self.remaining() {
            let target = self.growth_target(n)?;
            self.grow(target)?;
        }
        let range = SlotRange::new(self.id, self.used, n);
        self.used += n;
        tracing::trace!(arena = %self.id, start = range.start(), n, "allocate");
        Ok(range)
    }

    /// Validate that `range` lies in this arena's buffer. Reclaims nothing.
    fn deallocate(&mut self, range: SlotRange) -> Result<(), ArenaError> {
        if range.is_empty() && range.arena() == self.id {
            return Ok(());
        }
        self.check_owned(range.arena(), range.start(), range.len(), self.capacity())
    }

    fn construct(&mut self, slot: Slot, value: T) -> Result<(), ArenaError> {
        self.check_owned(slot.arena(), slot.index(), 1, self.used)?;
        self.buffer.put(slot.index(), value)
    }

    fn destroy(&mut self, slot: Slot) -> Result<(), ArenaError> {
        self.check_owned(slot.arena(), slot.index(), 1, self.used)?;
        drop(self.buffer.take(slot.index()));
        Ok(())
    }

    fn take(&mut self, slot: Slot) -> Result<T, ArenaError> {
        self.check_owned(slot.arena(), slot.index(), 1, self.used)?;
        self.buffer
            .take(slot.index())
            .ok_or(ArenaError::VacantSlot {
                index: slot.index(),
            })
    }

    fn get(&self, slot: Slot) -> Option<&T> {
        if slot.arena() != self.id {
            return None;
        }
        self.buffer.get(slot.index())
    }

    fn get_mut(&mut self, slot: Slot) -> Option<&mut T> {
        if slot.arena() != self.id {
            return None;
        }
        self.buffer.get_mut(slot.index())
    }

    /// A fresh, empty arena for `U` sized to this arena's current capacity.
    fn rebind<U>(&self) -> Result<ArenaAllocator<U>, ArenaError> {
        let mut config = self.config.clone();
        config.initial_capacity = self.capacity();
        ArenaAllocator::with_config(config)
    }
}

impl<T> Default for ArenaAllocator<T> {
    /// An arena of [`ArenaConfig::DEFAULT_INITIAL_CAPACITY`] slots.
    ///
    /// # Panics
    ///
    /// Panics if the ten-slot buffer cannot be reserved, matching `Vec`.
    fn default() -> Self {
        match Self::with_config(ArenaConfig::default()) {
            Ok(arena) => arena,
            Err(err) => panic!("default arena: {err}"),
        }
    }
}

/// Every arena of the same element type is equal to every other.
impl<T> PartialEq for ArenaAllocator<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for ArenaAllocator<T> {}

impl<T> fmt::Debug for ArenaAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .field("growths", &self.growths)
            .finish()
    }
}
