// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Bookmark Oxide
//!
//! Bookmark (outline) tree engine for PDF bookmark editors.
//!
//! ## Core Features
//!
//! - **Editable Tree**: Ordered bookmark forest with ids, colors, styles and explicit destinations
//! - **Undo/Redo**: Linear snapshot history, one commit per edit
//! - **Interchange**: CSV (`title,page,level`) and JSON import/export
//! - **Outline Writing**: Tree → linked `/Outlines` dictionaries (Parent/First/Last/Prev/Next/Count)
//! - **Outline Reading**: Existing outline → tree, resolving explicit and named destinations
//!
//! ## Architecture
//!
//! ```text
//! CSV / JSON ──[codec]──┐                  ┌──[OutlineWriter]──→ ObjectStore
//!                       ├→ BookmarkSession ┤
//! OutlineWalker ──[OutlineReader]──┘       └──[History]
//! ```
//!
//! The PDF side is reached only through the [`ObjectStore`] and [`OutlineWalker`]
//! traits. [`MemoryDocument`] implements both for tests and for callers that do
//! not bring their own PDF library.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bookmark_oxide::{BookmarkSession, MemoryDocument, SessionConfig};
//!
//! # fn main() -> bookmark_oxide::Result<()> {
//! let mut session = BookmarkSession::new(SessionConfig::default());
//! session.import_csv("title,page,level\n\"Chapter 1\",1,0\n\"Section 1.1\",2,1\n")?;
//!
//! let mut doc = MemoryDocument::new(10);
//! session.write_outline(&mut doc)?;
//! println!("{}", session.export_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// PDF object model and text strings
pub mod object;
pub mod text;

// Bookmark data
pub mod color;
/// Session configuration options
pub mod config;
pub mod model;

// Interchange formats
pub mod codec;

// Outline object graph
pub mod document;
pub mod outline;
pub mod writer;

// Editing
pub mod history;
pub mod session;

// Re-exports
pub use codec::CsvImport;
pub use color::{BookmarkColor, NamedColor, Rgb};
pub use config::{IdStrategy, SessionConfig};
pub use document::MemoryDocument;
pub use error::{Error, Result};
pub use history::History;
pub use model::{BookmarkNode, BookmarkStyle, BookmarkTree, ExplicitDestination, IdGenerator};
pub use object::{Object, ObjectRef};
pub use outline::{OutlineEntry, OutlineReader, OutlineWalker};
pub use session::{BookmarkEdit, BookmarkSession, MoveTarget};
pub use writer::{ObjectStore, OutlineWriter};
