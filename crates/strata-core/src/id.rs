//! Allocator instance identifiers and index-addressed slot handles.
//!
//! Handles never carry a raw address. A [`Slot`] names one position in an
//! allocator's logical slot space, a [`SlotRange`] names a contiguous run
//! of them. Because positions survive buffer relocation, a handle obtained
//! before an allocator grows still resolves to the same (moved) object.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an allocator.
///
/// Allocated from a monotonic atomic counter via [`ArenaId::next`]. Two
/// allocator instances always have different IDs, even when they have the
/// same element type and capacity. Used by ownership checks only; allocator
/// equality deliberately ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process.
    pub fn next() -> Self {
        Self(ARENA_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single element position inside one allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Slot {
    arena: ArenaId,
    index: usize,
}

impl Slot {
    /// Create a slot handle. Only allocators should mint handles.
    pub fn new(arena: ArenaId, index: usize) -> Self {
        Self { arena, index }
    }

    /// The allocator instance this slot was handed out by.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Position within the allocator's slot space.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot(arena={}, index={})", self.arena, self.index)
    }
}

/// A contiguous run of positions inside one allocator.
///
/// Returned by [`Allocator::allocate`](crate::Allocator::allocate) and
/// handed back to [`Allocator::deallocate`](crate::Allocator::deallocate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct SlotRange {
    arena: ArenaId,
    start: usize,
    len: usize,
}

impl SlotRange {
    /// Create a range handle. Only allocators should mint handles.
    pub fn new(arena: ArenaId, start: usize, len: usize) -> Self {
        Self { arena, start, len }
    }

    /// The allocator instance this range was handed out by.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// First position of the range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of positions in the range.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the range names no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last position, saturating on overflow.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    /// The `i`-th slot of the range.
    ///
    /// No bounds check is made here; the owning allocator rejects
    /// positions outside its buffer when the slot is used.
    pub fn nth(&self, i: usize) -> Slot {
        debug_assert!(i < self.len, "slot {i} outside range of {}", self.len);
        Slot::new(self.arena, self.start + i)
    }

    /// Iterate the slots of the range in order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        let arena = self.arena;
        (self.start..self.end()).map(move |index| Slot::new(arena, index))
    }
}

impl From<Slot> for SlotRange {
    fn from(slot: Slot) -> Self {
        Self::new(slot.arena, slot.index, 1)
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlotRange(arena={}, {}..{})",
            self.arena,
            self.start,
            self.end()
        )
    }
}
