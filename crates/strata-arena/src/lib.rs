//! Storage providers for strata containers.
//!
//! Two implementations of [`strata_core::Allocator`] over the same
//! slot buffer:
//!
//! ```text
//! ArenaAllocator<T>      bump cursor, doubles on overflow, never reclaims
//! FreeListAllocator<T>   first-fit reuse of released ranges
//! └── SlotBuffer<T>      Vec<Option<T>>, relocation on growth
//! ```
//!
//! # Safety
//!
//! All storage is `Vec<Option<T>>`. A vacant slot is `None`, so moving a
//! value out during relocation leaves nothing to double-drop, and dropping
//! a provider drops exactly the objects still live in it. No `unsafe`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
mod buffer;
pub mod config;
pub mod free_list;

// Public re-exports for the primary API surface.
pub use arena::ArenaAllocator;
pub use config::ArenaConfig;
pub use free_list::FreeListAllocator;
pub use strata_core::{Allocator, ArenaError, Slot, SlotRange};
