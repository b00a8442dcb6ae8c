//! The object table the outline writer allocates into.

use crate::error::Result;
use crate::object::{Dictionary, ObjectRef};

/// Indirect-object storage of the document being written.
///
/// Implemented over whatever PDF library owns the document. The writer only
/// allocates dictionaries, patches them while linking siblings, looks up page
/// objects and finally swaps the catalog's `/Outlines` pointer.
pub trait ObjectStore {
    /// Register a new indirect dictionary and return its reference.
    fn allocate(&mut self, dict: Dictionary) -> Result<ObjectRef>;

    /// Mutable access to a dictionary previously returned by [`allocate`](Self::allocate).
    fn dictionary_mut(&mut self, obj: ObjectRef) -> Result<&mut Dictionary>;

    /// Reference of the page object at `page_index` (0-based).
    fn page_ref(&self, page_index: usize) -> Result<ObjectRef>;

    /// Point the document catalog's `/Outlines` entry at `outlines`.
    fn set_catalog_outlines(&mut self, outlines: ObjectRef) -> Result<()>;
}
