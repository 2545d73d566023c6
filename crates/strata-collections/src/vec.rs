//! Dynamic array over a pluggable storage provider.
//!
//! [`ArenaVec`] keeps its own `len`/`capacity` bookkeeping and treats the
//! allocator purely as a source of slots. It doubles its capacity when an
//! append does not fit, independently of (but consistently with) whatever
//! growth the allocator performs internally.

use std::fmt;
use std::marker::PhantomData;

use strata_arena::FreeListAllocator;
use strata_core::{Allocator, ArenaError, SlotRange};

/// A growable sequence whose elements live in allocator-owned slots.
///
/// The allocator is held by value; the vector is its only mutator.
///
/// Over an [`ArenaAllocator`](strata_arena::ArenaAllocator), every growth
/// of the vector abandons its previous range inside the arena (the arena
/// never reclaims), so the arena's `used` count is the sum of every
/// capacity the vector has ever had.
pub struct ArenaVec<T, A = FreeListAllocator<T>>
where
    A: Allocator<Value = T>,
{
    alloc: A,
    storage: SlotRange,
    len: usize,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T, A> ArenaVec<T, A>
where
    A: Allocator<Value = T>,
{
    /// Initial capacity used by [`ArenaVec::new_in`].
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Create an empty vector with [`ArenaVec::DEFAULT_CAPACITY`] slots.
    pub fn new_in(alloc: A) -> Result<Self, ArenaError> {
        Self::with_capacity_in(Self::DEFAULT_CAPACITY, alloc)
    }

    /// Create an empty vector, requesting `capacity` slots up front.
    pub fn with_capacity_in(capacity: usize, mut alloc: A) -> Result<Self, ArenaError> {
        let storage = alloc.allocate(capacity)?;
        Ok(Self {
            alloc,
            storage,
            len: 0,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots currently reserved for elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The storage provider backing this vector.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Append `value`, doubling the capacity first if the vector is full.
    ///
    /// If growth fails the vector is unchanged and `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<(), ArenaError> {
        if self.len == self.capacity {
            let target = self.capacity.checked_mul(2).ok_or(ArenaError::InvalidGrowth {
                target: self.capacity,
                used: self.len,
            })?;
            self.grow(target.max(1))?;
        }
        self.alloc.construct(self.storage.nth(self.len), value)?;
        self.len += 1;
        Ok(())
    }

    /// Append every item of `iter` in order, stopping at the first failure.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), ArenaError>
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push(value)?;
        }
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<Option<T>, ArenaError> {
        if self.len == 0 {
            return Ok(None);
        }
        let value = self.alloc.take(self.storage.nth(self.len - 1))?;
        self.len -= 1;
        Ok(Some(value))
    }

    /// Borrow the element at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.alloc.get(self.storage.nth(index))
    }

    /// Mutably borrow the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        self.alloc.get_mut(self.storage.nth(index))
    }

    /// Destroy every element, keeping the reserved storage.
    pub fn clear(&mut self) -> Result<(), ArenaError> {
        while self.len > 0 {
            self.alloc.destroy(self.storage.nth(self.len - 1))?;
            self.len -= 1;
        }
        Ok(())
    }

    /// Iterate the elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter {
            vec: self,
            front: 0,
        }
    }

    /// Move to a fresh range of `new_capacity` slots.
    ///
    /// The allocation happens first; if it fails nothing has changed.
    fn grow(&mut self, new_capacity: usize) -> Result<(), ArenaError> {
        let fresh = self.alloc.allocate(new_capacity)?;
        for i in 0..self.len {
            let value = self.alloc.take(self.storage.nth(i))?;
            self.alloc.construct(fresh.nth(i), value)?;
        }
        let old = std::mem::replace(&mut self.storage, fresh);
        let from = std::mem::replace(&mut self.capacity, new_capacity);
        tracing::debug!(from, to = new_capacity, moved = self.len, "vector grew");
        // Every old slot is vacant now: moved-from positions count as destroyed.
        self.alloc.deallocate(old)
    }
}

impl<T, A> Drop for ArenaVec<T, A>
where
    A: Allocator<Value = T>,
{
    fn drop(&mut self) {
        let released = self
            .clear()
            .and_then(|()| self.alloc.deallocate(self.storage));
        if let Err(err) = released {
            tracing::warn!(%err, "failed to release vector storage");
        }
    }
}

impl<T, A> fmt::Debug for ArenaVec<T, A>
where
    T: fmt::Debug,
    A: Allocator<Value = T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, A> IntoIterator for &'a ArenaVec<T, A>
where
    A: Allocator<Value = T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over an [`ArenaVec`].
///
/// Reads the vector at each step rather than snapshotting it. A clone
/// continues from the same position; call [`ArenaVec::iter`] to restart.
pub struct Iter<'a, T, A>
where
    A: Allocator<Value = T>,
{
    vec: &'a ArenaVec<T, A>,
    front: usize,
}

impl<T, A> Clone for Iter<'_, T, A>
where
    A: Allocator<Value = T>,
{
    fn clone(&self) -> Self {
        Self {
            vec: self.vec,
            front: self.front,
        }
    }
}

impl<'a, T, A> Iterator for Iter<'a, T, A>
where
    A: Allocator<Value = T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.vec.get(self.front)?;
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vec.len.saturating_sub(self.front);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_arena::{ArenaAllocator, ArenaConfig};
    use strata_test_utils::DropLog;

    fn arena_vec<T>(capacity: usize) -> ArenaVec<T, ArenaAllocator<T>> {
        let alloc = ArenaAllocator::with_capacity(capacity).unwrap();
        ArenaVec::with_capacity_in(capacity, alloc).unwrap()
    }

    #[test]
    fn ten_appends_fit_default_capacity() {
        let mut v = ArenaVec::new_in(ArenaAllocator::default()).unwrap();
        for i in 0..10 {
            v.push(i).unwrap();
            assert_eq!(v.len(), i as usize + 1);
        }
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.allocator().growth_count(), 0);
        let seen: Vec<i32> = v.iter().copied().collect();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn eleventh_append_grows_once() {
        let mut v = arena_vec(10);
        for i in 0..11 {
            v.push(i).unwrap();
        }
        assert_eq!(v.capacity(), 20);
        assert_eq!(v.len(), 11);
        // 10 original + 20 fresh slots; the first range is never reclaimed.
        assert_eq!(v.allocator().used(), 30);
        assert_eq!(v.allocator().growth_count(), 1);
        let seen: Vec<i32> = v.iter().copied().collect();
        assert_eq!(seen, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn zero_capacity_vector_can_grow() {
        let mut v = arena_vec(0);
        v.push('a').unwrap();
        v.push('b').unwrap();
        assert_eq!(v.capacity(), 2);
        assert_eq!(v.get(1), Some(&'b'));
    }

    #[test]
    fn growth_failure_leaves_vector_unchanged() {
        let config = ArenaConfig::new(4).with_max_capacity(6);
        let alloc = ArenaAllocator::with_config(config).unwrap();
        let mut v = ArenaVec::with_capacity_in(4, alloc).unwrap();
        v.try_extend(0..4).unwrap();
        assert!(matches!(
            v.push(4),
            Err(ArenaError::ResourceExhausted { .. })
        ));
        assert_eq!(v.len(), 4);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn default_provider_reclaims_old_storage() {
        let mut v: ArenaVec<u8> = ArenaVec::new_in(FreeListAllocator::default()).unwrap();
        v.try_extend(0..25).unwrap();
        assert_eq!(v.capacity(), 40);
        // 10 + 20 released, then reused by nothing larger: 30 free slots.
        assert_eq!(v.allocator().free_slots(), 30);
        assert_eq!(v.allocator().allocated(), 40);
    }

    #[test]
    fn pop_and_get_mut() {
        let mut v = arena_vec(2);
        v.try_extend([1, 2, 3]).unwrap();
        *v.get_mut(0).unwrap() = 10;
        assert_eq!(v.pop().unwrap(), Some(3));
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![10, 2]);
        assert!(v.get(2).is_none());
    }

    #[test]
    fn pop_empty_is_none() {
        let mut v: ArenaVec<u8, ArenaAllocator<u8>> = arena_vec(1);
        assert_eq!(v.pop().unwrap(), None);
        assert!(v.is_empty());
    }

    #[test]
    fn iteration_is_restartable() {
        let mut v = arena_vec(4);
        v.try_extend(["a", "b"]).unwrap();
        let first: Vec<_> = v.iter().collect();
        let second: Vec<_> = (&v).into_iter().collect();
        assert_eq!(first, second);
        let mut it = v.iter();
        it.next();
        assert_eq!(it.size_hint(), (1, Some(1)));
        assert_eq!(it.clone().next(), Some(&"b"));
    }

    #[test]
    fn drop_destroys_each_element_once() {
        let log = DropLog::new();
        {
            let mut v = arena_vec(1);
            for i in 0..5 {
                v.push(log.track(i)).unwrap();
            }
            // Relocation moves, it never drops.
            assert_eq!(log.count(), 0);
        }
        assert_eq!(log.dropped(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn clear_destroys_but_keeps_capacity() {
        let log = DropLog::new();
        let mut v = arena_vec(4);
        v.push(log.track(1)).unwrap();
        v.push(log.track(2)).unwrap();
        v.clear().unwrap();
        assert_eq!(log.count(), 2);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn debug_lists_elements() {
        let mut v = arena_vec(2);
        v.try_extend([1, 2]).unwrap();
        assert_eq!(format!("{v:?}"), "[1, 2]");
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn size_tracks_appends_and_order_is_kept(
                initial in 0usize..12,
                values in proptest::collection::vec(any::<i32>(), 0..300),
            ) {
                let mut v = arena_vec(initial);
                for (n, &x) in values.iter().enumerate() {
                    v.push(x).unwrap();
                    prop_assert_eq!(v.len(), n + 1);
                    prop_assert!(v.len() <= v.capacity());
                }
                let seen: Vec<i32> = v.iter().copied().collect();
                prop_assert_eq!(seen, values);
            }
        }
    }
}
