//! Reclaiming general-purpose storage provider.
//!
//! [`FreeListAllocator`] is the counterpart to the arena for containers that
//! release storage often. Released ranges go on a sorted, coalesced free
//! list and are reused first-fit before the buffer is extended.

use std::collections::BTreeMap;
use std::fmt;

use strata_core::{Allocator, ArenaError, ArenaId, Slot, SlotRange};

use crate::buffer::SlotBuffer;
use crate::config::ArenaConfig;

/// A released run of slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FreeRange {
    start: usize,
    len: usize,
}

impl FreeRange {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A storage provider whose `deallocate` makes slots reusable.
///
/// Ranges must be destroyed (or moved out of) before they are released.
/// Only a range exactly as `allocate` returned it may be released; a
/// sub-range, a range spanning two allocations, or one that is already free
/// is an error. Like [`ArenaAllocator`](crate::ArenaAllocator), all
/// instances compare equal while ownership checks stay per instance.
pub struct FreeListAllocator<T> {
    id: ArenaId,
    buffer: SlotBuffer<T>,
    /// High-water mark: slots `[0, end)` have been handed out at least once.
    end: usize,
    /// Released ranges, sorted by start, never adjacent or overlapping.
    free: Vec<FreeRange>,
    /// Runs currently handed out, keyed by start slot.
    issued: BTreeMap<usize, usize>,
    config: ArenaConfig,
}

impl<T> FreeListAllocator<T> {
    /// Create a provider with `capacity` slots reserved up front.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create a provider from a config.
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
            end: 0,
            free: Vec::new(),
            issued: BTreeMap::new(),
            config,
        })
    }

    /// This instance's identifier.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Total slots in the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Slots currently handed out and not released.
    pub fn allocated(&self) -> usize {
        self.end - self.free_slots()
    }

    /// Released slots awaiting reuse.
    pub fn free_slots(&self) -> usize {
        self.free.iter().map(|r| r.len).sum()
    }

    /// Number of separate runs on the free list.
    pub fn free_ranges(&self) -> usize {
        self.free.len()
    }

    /// Number of slots currently holding a live object.
    pub fn live(&self) -> usize {
        self.buffer.live_in(self.end)
    }

    /// Reuse the first free run long enough for `n` slots.
    fn take_first_fit(&mut self, n: usize) -> Option<usize> {
        let pos = self.free.iter().position(|r| r.len >= n)?;
        let run = &mut self.free[pos];
        let start = run.start;
        if run.len == n {
            self.free.remove(pos);
        } else {
            run.start += n;
            run.len -= n;
        }
        Some(start)
    }

    /// Bump `n` slots past the high-water mark, extending the buffer if needed.
    fn bump(&mut self, n: usize) -> Result<usize, ArenaError> {
        let limit = self.config.limit();
        let required = self
            .end
            .checked_add(n)
            .ok_or(ArenaError::InvalidGrowth {
                target: self.capacity(),
                used: self.end,
            })?;
        if required > limit {
            return Err(ArenaError::ResourceExhausted {
                requested: required,
                limit,
            });
        }
        let capacity = self.capacity();
        if required > capacity {
            let target = capacity.saturating_mul(2).max(required).min(limit);
            self.buffer.extend(target - capacity, limit)?;
            tracing::debug!(
                allocator = %self.id,
                from = capacity,
                to = target,
                "free list extended"
            );
        }
        let start = self.end;
        self.end = required;
        Ok(start)
    }

    fn ownership_violation(&self, start: usize, len: usize) -> ArenaError {
        ArenaError::OwnershipViolation {
            index: start,
            len,
            capacity: self.capacity(),
        }
    }

    /// Accept a slot only if it lies inside a run that is currently issued.
    fn check_slot(&self, slot: Slot) -> Result<(), ArenaError> {
        let index = slot.index();
        let issued = slot.arena() == self.id
            && matches!(
                self.issued.range(..=index).next_back(),
                Some((&start, &len)) if index - start < len
            );
        if !issued {
            return Err(self.ownership_violation(index, 1));
        }
        Ok(())
    }

    /// Whether `run` overlaps anything already on the free list.
    fn overlaps_free(&self, run: FreeRange) -> bool {
        let pos = self.free.partition_point(|r| r.start < run.start);
        let overlaps_prev = pos > 0 && self.free[pos - 1].end() > run.start;
        let overlaps_next = pos < self.free.len() && run.end() > self.free[pos].start;
        overlaps_prev || overlaps_next
    }

    /// Insert a released run, merging it with touching neighbours.
    fn release(&mut self, run: FreeRange) {
        let pos = self.free.partition_point(|r| r.start < run.start);
        self.free.insert(pos, run);
        if pos + 1 < self.free.len() && self.free[pos].end() == self.free[pos + 1].start {
            let next = self.free.remove(pos + 1);
            self.free[pos].len += next.len;
        }
        if pos > 0 && self.free[pos - 1].end() == self.free[pos].start {
            let cur = self.free.remove(pos);
            self.free[pos - 1].len += cur.len;
        }
    }
}

impl<T> Allocator for FreeListAllocator<T> {
    type Value = T;
    type Rebind<U> = FreeListAllocator<U>;

    fn allocate(&mut self, n: usize) -> Result<SlotRange, ArenaError> {
        if n == 0 {
            return Ok(SlotRange::new(self.id, self.end, 0));
        }
        let start = match self.take_first_fit(n) {
            Some(start) => start,
            None => self.bump(n)?,
        };
        self.issued.insert(start, n);
        tracing::trace!(allocator = %self.id, start, n, "allocate");
        Ok(SlotRange::new(self.id, start, n))
    }

    /// Return a destroyed range to the free list.
    fn deallocate(&mut self, range: SlotRange) -> Result<(), ArenaError> {
        if range.is_empty() && range.arena() == self.id {
            return Ok(());
        }
        let run = FreeRange {
            start: range.start(),
            len: range.len(),
        };
        if range.arena() != self.id {
            return Err(self.ownership_violation(run.start, run.len));
        }
        if self.issued.get(&run.start) != Some(&run.len) {
            let in_bounds = matches!(run.start.checked_add(run.len), Some(end) if end <= self.end);
            if in_bounds && self.overlaps_free(run) {
                return Err(ArenaError::DoubleFree {
                    index: run.start,
                    len: run.len,
                });
            }
            return Err(self.ownership_violation(run.start, run.len));
        }
        if let Some(slot) = range.slots().find(|s| self.buffer.is_occupied(s.index())) {
            return Err(ArenaError::SlotOccupied {
                index: slot.index(),
            });
        }
        self.issued.remove(&run.start);
        self.release(run);
        Ok(())
    }

    fn construct(&mut self, slot: Slot, value: T) -> Result<(), ArenaError> {
        self.check_slot(slot)?;
        self.buffer.put(slot.index(), value)
    }

    fn destroy(&mut self, slot: Slot) -> Result<(), ArenaError> {
        self.check_slot(slot)?;
        drop(self.buffer.take(slot.index()));
        Ok(())
    }

    fn take(&mut self, slot: Slot) -> Result<T, ArenaError> {
        self.check_slot(slot)?;
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

    fn rebind<U>(&self) -> Result<FreeListAllocator<U>, ArenaError> {
        let mut config = self.config.clone();
        config.initial_capacity = self.capacity();
        FreeListAllocator::with_config(config)
    }
}

impl<T> Default for FreeListAllocator<T> {
    /// A provider with [`ArenaConfig::DEFAULT_INITIAL_CAPACITY`] slots reserved.
    ///
    /// # Panics
    ///
    /// Panics if the initial buffer cannot be reserved, matching `Vec`.
    fn default() -> Self {
        match Self::with_config(ArenaConfig::default()) {
            Ok(alloc) => alloc,
            Err(err) => panic!("default free-list allocator: {err}"),
        }
    }
}

impl<T> PartialEq for FreeListAllocator<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for FreeListAllocator<T> {}

impl<T> fmt::Debug for FreeListAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeListAllocator")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("allocated", &self.allocated())
            .field("free_ranges", &self.free.len())
            .finish()
    }
}
