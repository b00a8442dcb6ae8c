//! Outline writing.
//!
//! ## Architecture
//!
//! ```text
//! BookmarkTree
//!     ↓
//! [OutlineWriter] (nodes → linked outline dictionaries)
//!     ↓
//! [ObjectStore] (allocation, page lookup, catalog /Outlines swap)
//! ```
//!
//! The store is a trait so the linking logic runs the same against a real PDF
//! library and against [`MemoryDocument`](crate::document::MemoryDocument).

mod object_store;
mod outline_builder;

pub use object_store::ObjectStore;
pub use outline_builder::{
    destination_array, style_flags, OutlineWriter, FLAG_BOLD, FLAG_ITALIC,
};
