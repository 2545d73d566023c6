//! Error types for allocator and container operations.
//!
//! Every failure is synchronous and reported to the immediate caller.
//! Nothing in the workspace retries on error.

use std::error::Error;
use std::fmt;

/// Errors that can occur while allocating, releasing, or addressing slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A handle does not belong to this allocator instance, or names
    /// positions outside the current buffer.
    OwnershipViolation {
        /// First slot index named by the handle.
        index: usize,
        /// Number of slots named by the handle.
        len: usize,
        /// Capacity of the allocator that rejected it.
        capacity: usize,
    },
    /// A computed growth target does not exceed the number of used slots.
    ///
    /// Only reachable when the requested size overflows `usize`.
    InvalidGrowth {
        /// The capacity growth would have adopted.
        target: usize,
        /// Slots already handed out.
        used: usize,
    },
    /// Backing storage could not be obtained, either because the system
    /// refused the reservation or because a configured limit was hit.
    ResourceExhausted {
        /// Slot count that was requested for the new buffer.
        requested: usize,
        /// The configured ceiling, or `usize::MAX` when unbounded.
        limit: usize,
    },
    /// Attempted to construct into a slot that already holds a value.
    SlotOccupied {
        /// The occupied slot index.
        index: usize,
    },
    /// Attempted to move out of, or link through, a slot holding no value.
    VacantSlot {
        /// The vacant slot index.
        index: usize,
    },
    /// A range was released twice to a reclaiming allocator.
    DoubleFree {
        /// First slot index of the range.
        index: usize,
        /// Number of slots in the range.
        len: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnershipViolation {
                index,
                len,
                capacity,
            } => {
                write!(
                    f,
                    "slots {index}..{} not owned by allocator (capacity {capacity})",
                    index.saturating_add(*len)
                )
            }
            Self::InvalidGrowth { target, used } => {
                write!(
                    f,
                    "new capacity {target} must be greater than the {used} used slots"
                )
            }
            Self::ResourceExhausted { requested, limit } => {
                write!(
                    f,
                    "could not obtain storage for {requested} slots (limit {limit})"
                )
            }
            Self::SlotOccupied { index } => write!(f, "slot {index} is already occupied"),
            Self::VacantSlot { index } => write!(f, "slot {index} holds no value"),
            Self::DoubleFree { index, len } => {
                write!(
                    f,
                    "slots {index}..{} were already released",
                    index.saturating_add(*len)
                )
            }
        }
    }
}

impl Error for ArenaError {}
