//! Core types and traits for the strata allocator workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every storage provider and container:
//! slot handles, the error type, and the [`Allocator`] capability trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::ArenaError;
pub use id::{ArenaId, Slot, SlotRange};
pub use traits::Allocator;
