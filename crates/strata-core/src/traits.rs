//! The allocator capability set consumed by generic containers.

use crate::error::ArenaError;
use crate::id::{Slot, SlotRange};

/// A pluggable storage provider for values of one element type.
///
/// The capability set is: an element-type declaration ([`Allocator::Value`]),
/// an allocate/deallocate pair, a construct/destroy pair (plus [`take`] for
/// moving a value out), a rebind facility for obtaining a provider of a
/// different element type, and equality via the [`PartialEq`] supertrait.
///
/// Containers only ever pass back handles they obtained from the same
/// instance (or, after [`rebind`], from the rebound instance they hold).
/// They know nothing about the provider's buffer layout, and the provider
/// knows nothing about what the container stores in its slots.
///
/// # Equality
///
/// Implementations in this workspace compare equal across all instances of
/// the same type. Equality therefore does NOT imply that one instance may
/// release another's handles: ownership checks in [`deallocate`] and
/// [`construct`] are instance-specific.
///
/// [`take`]: Allocator::take
/// [`rebind`]: Allocator::rebind
/// [`deallocate`]: Allocator::deallocate
/// [`construct`]: Allocator::construct
pub trait Allocator: PartialEq {
    /// The element type this provider stores.
    type Value;

    /// The same provider flavour specialised for another element type.
    type Rebind<U>: Allocator<Value = U>;

    /// Reserve `n` contiguous vacant slots.
    fn allocate(&mut self, n: usize) -> Result<SlotRange, ArenaError>;

    /// Hand a range obtained from [`Allocator::allocate`] back.
    ///
    /// Whether the slots become reusable is provider-specific.
    fn deallocate(&mut self, range: SlotRange) -> Result<(), ArenaError>;

    /// Place `value` into a vacant slot. No allocation occurs.
    fn construct(&mut self, slot: Slot, value: Self::Value) -> Result<(), ArenaError>;

    /// Drop the value held in `slot`, leaving it vacant.
    ///
    /// Destroying an already-vacant slot is a no-op.
    fn destroy(&mut self, slot: Slot) -> Result<(), ArenaError>;

    /// Move the value out of `slot`, leaving it vacant.
    fn take(&mut self, slot: Slot) -> Result<Self::Value, ArenaError>;

    /// Borrow the value in `slot`, or `None` if the slot is vacant or foreign.
    fn get(&self, slot: Slot) -> Option<&Self::Value>;

    /// Mutably borrow the value in `slot`, or `None` if vacant or foreign.
    fn get_mut(&mut self, slot: Slot) -> Option<&mut Self::Value>;

    /// Produce an empty provider of the same flavour for element type `U`.
    fn rebind<U>(&self) -> Result<Self::Rebind<U>, ArenaError>;
}
