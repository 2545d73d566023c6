//! Owned slot storage with explicit relocation.
//!
//! [`SlotBuffer`] is the single contiguous block behind both providers.
//! Each position is an `Option<T>`: `None` is a vacant slot, `Some` a live
//! object. Growth moves live objects into a freshly reserved block in index
//! order; the moved-from positions are left vacant and the old block is
//! released only after the new one is fully populated.

use std::mem;

use strata_core::ArenaError;

pub(crate) struct SlotBuffer<T> {
    /// Always exactly `capacity` entries long.
    slots: Vec<Option<T>>,
}

impl<T> SlotBuffer<T> {
    /// Reserve a vacant buffer of `capacity` slots.
    ///
    /// Fails with `ResourceExhausted` if the reservation is refused.
    pub(crate) fn with_capacity(capacity: usize, limit: usize) -> Result<Self, ArenaError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| ArenaError::ResourceExhausted {
                requested: capacity,
                limit,
            })?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    pub(crate) fn is_occupied(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Place a value into a vacant in-bounds slot.
    pub(crate) fn put(&mut self, index: usize, value: T) -> Result<(), ArenaError> {
        let capacity = self.capacity();
        let entry = self
            .slots
            .get_mut(index)
            .ok_or(ArenaError::OwnershipViolation {
                index,
                len: 1,
                capacity,
            })?;
        if entry.is_some() {
            return Err(ArenaError::SlotOccupied { index });
        }
        *entry = Some(value);
        Ok(())
    }

    /// Move the value out of a slot, if any.
    pub(crate) fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index)?.take()
    }

    /// Number of live objects in `[0, end)`.
    pub(crate) fn live_in(&self, end: usize) -> usize {
        let end = end.min(self.slots.len());
        self.slots[..end].iter().filter(|s| s.is_some()).count()
    }

    /// Append `additional` vacant slots at the end.
    ///
    /// Existing positions keep their values; used by providers that extend
    /// in place rather than doubling.
    pub(crate) fn extend(&mut self, additional: usize, limit: usize) -> Result<(), ArenaError> {
        let requested = self.slots.len().saturating_add(additional);
        self.slots
            .try_reserve_exact(additional)
            .map_err(|_| ArenaError::ResourceExhausted { requested, limit })?;
        self.slots.resize_with(requested, || None);
        Ok(())
    }

    /// Replace this buffer with one of `new_capacity` slots, moving the
    /// objects in `[0, used)` across in index order.
    ///
    /// On error the current buffer is untouched.
    pub(crate) fn relocate(
        &mut self,
        used: usize,
        new_capacity: usize,
        limit: usize,
    ) -> Result<(), ArenaError> {
        debug_assert!(used <= new_capacity);
        let mut fresh = Self::with_capacity(new_capacity, limit)?;
        let used = used.min(self.slots.len());
        for (dst, src) in fresh.slots.iter_mut().zip(self.slots[..used].iter_mut()) {
            *dst = src.take();
        }
        // The old block now holds only vacant prefix slots; dropping it
        // releases the raw storage.
        drop(mem::replace(self, fresh));
        Ok(())
    }

    /// Memory held by the buffer in bytes.
    pub(crate) fn memory_bytes(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Option<T>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_test_utils::DropLog;

    #[test]
    fn new_buffer_is_vacant() {
        let buf: SlotBuffer<u32> = SlotBuffer::with_capacity(8, usize::MAX).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.live_in(8), 0);
        assert!(buf.get(0).is_none());
    }

    #[test]
    fn put_rejects_occupied_and_out_of_range() {
        let mut buf = SlotBuffer::with_capacity(2, usize::MAX).unwrap();
        buf.put(0, 'a').unwrap();
        assert_eq!(buf.put(0, 'b'), Err(ArenaError::SlotOccupied { index: 0 }));
        assert!(matches!(
            buf.put(2, 'c'),
            Err(ArenaError::OwnershipViolation { index: 2, .. })
        ));
    }

    #[test]
    fn relocate_moves_prefix_in_order() {
        let mut buf = SlotBuffer::with_capacity(3, usize::MAX).unwrap();
        for i in 0..3 {
            buf.put(i, i * 10).unwrap();
        }
        buf.relocate(3, 6, usize::MAX).unwrap();
        assert_eq!(buf.capacity(), 6);
        assert_eq!(buf.get(0), Some(&0));
        assert_eq!(buf.get(2), Some(&20));
        assert!(buf.get(3).is_none());
    }

    #[test]
    fn relocate_drops_nothing() {
        let log = DropLog::new();
        let mut buf = SlotBuffer::with_capacity(2, usize::MAX).unwrap();
        buf.put(0, log.track(1)).unwrap();
        buf.put(1, log.track(2)).unwrap();
        buf.relocate(2, 4, usize::MAX).unwrap();
        assert_eq!(log.count(), 0);
        drop(buf);
        assert_eq!(log.count(), 2);
    }

    #[test]
    fn extend_keeps_existing_values() {
        let mut buf = SlotBuffer::with_capacity(1, usize::MAX).unwrap();
        buf.put(0, "x").unwrap();
        buf.extend(3, usize::MAX).unwrap();
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.get(0), Some(&"x"));
    }

    #[test]
    fn refused_reservation_is_resource_exhausted() {
        let result: Result<SlotBuffer<u64>, _> = SlotBuffer::with_capacity(usize::MAX, 7);
        assert_eq!(
            result.err(),
            Some(ArenaError::ResourceExhausted {
                requested: usize::MAX,
                limit: 7,
            })
        );
    }
}
