//! Containers generic over strata storage providers.
//!
//! Both containers take their provider by value and talk to it only
//! through [`strata_core::Allocator`]:
//!
//! - [`ArenaVec`]: a doubling dynamic array that relocates its elements
//!   into a fresh range on growth and releases the old one.
//! - [`OrderedMap`]: an AA-tree map that rebinds a `(K, V)` provider to
//!   its private node type and allocates one slot per entry.
//!
//! ```
//! use strata_arena::ArenaAllocator;
//! use strata_collections::ArenaVec;
//!
//! let alloc = ArenaAllocator::with_capacity(10)?;
//! let mut v = ArenaVec::with_capacity_in(10, alloc)?;
//! for i in 0..10 {
//!     v.push(i)?;
//! }
//! assert_eq!(v.iter().sum::<i32>(), 45);
//! # Ok::<(), strata_core::ArenaError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod map;
pub mod vec;

pub use map::OrderedMap;
pub use vec::ArenaVec;
