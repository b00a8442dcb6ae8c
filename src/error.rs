//! Error types for the bookmark engine.
//!
//! This module defines all error types that can occur while editing, importing,
//! exporting and writing bookmark trees.

use crate::object::ObjectRef;

/// Result type alias for bookmark engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during bookmark processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input could not be parsed (CSV without any usable row, bad color or style string)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// JSON document could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single outline item's destination could not be resolved
    #[error("Destination could not be resolved: {0}")]
    DestinationResolution(String),

    /// The PDF object store rejected an allocation or registration call
    #[error("Object store failure: {0}")]
    ObjectStore(String),

    /// Bookmark targets a page the document does not have
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// 1-based page number that was requested
        page: u32,
        /// Number of pages in the document
        page_count: usize,
    },

    /// Referenced object not found in the object table
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectRef),

    /// Circular reference detected in the outline graph
    #[error("Circular reference detected: object {0}")]
    CircularReference(ObjectRef),

    /// Outline nesting deeper than the walker allows
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(usize),

    /// No bookmark with this id exists in the tree
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    /// A move would detach a node or place it inside its own subtree
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
