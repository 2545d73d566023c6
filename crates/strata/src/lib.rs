//! strata: a doubling bump arena and containers built on it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the strata sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let arena = ArenaAllocator::with_capacity(10)?;
//! let mut map = OrderedMap::new_in(arena)?;
//! for i in 0..10u64 {
//!     map.insert(i, i * i)?;
//! }
//! assert_eq!(map.get(&3), Some(&9));
//! // Ten nodes fit the rebound arena without growth.
//! assert_eq!(map.node_allocator().growth_count(), 0);
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Slot handles, `ArenaError`, the `Allocator` trait |
//! | [`arena`] | `strata-arena` | `ArenaAllocator`, `FreeListAllocator`, `ArenaConfig` |
//! | [`collections`] | `strata-collections` | `ArenaVec`, `OrderedMap` |
//! | [`demo`] | | The walkthrough behind the `strata-demo` binary |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core handles, errors, and the allocator trait (`strata-core`).
pub use strata_core as types;

/// Storage providers and their config (`strata-arena`).
pub use strata_arena as arena;

/// Containers generic over a storage provider (`strata-collections`).
pub use strata_collections as collections;

pub mod demo;

/// Common imports for typical usage.
pub mod prelude {
    pub use strata_arena::{ArenaAllocator, ArenaConfig, FreeListAllocator};
    pub use strata_collections::{ArenaVec, OrderedMap};
    pub use strata_core::{Allocator, ArenaError, Slot, SlotRange};
}
