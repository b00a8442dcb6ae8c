//! Document outline (bookmarks) writer.
//!
//! Turns a [`BookmarkTree`] into the linked dictionary graph of PDF spec
//! Section 12.3.3 (Document Outline) inside an [`ObjectStore`].
//!
//! # Example
//!
//! ```ignore
//! use bookmark_oxide::document::MemoryDocument;
//! use bookmark_oxide::writer::OutlineWriter;
//!
//! let mut doc = MemoryDocument::new(10);
//! let outlines = OutlineWriter::new(&mut doc).write(&tree)?;
//! ```
//!
//! Every item gets `Title`, `Parent` and `Dest`; `C` and `F` only when a color
//! or style is set. Parents get `First`/`Last`/`Count` (direct children only),
//! siblings are chained with `Prev`/`Next`. The catalog is only pointed at the
//! new `/Outlines` dictionary once the whole graph has been built.

use super::object_store::ObjectStore;
use crate::error::{Error, Result};
use crate::model::{BookmarkNode, BookmarkStyle, BookmarkTree, ExplicitDestination};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::text::encode_text_string;

/// `/F` bit for bold titles.
pub const FLAG_BOLD: i64 = 1;

/// `/F` bit for italic titles.
pub const FLAG_ITALIC: i64 = 2;

/// `/F` value for a style (0 = plain, key omitted).
pub fn style_flags(style: Option<BookmarkStyle>) -> i64 {
    let Some(style) = style else {
        return 0;
    };
    let mut flags = 0i64;
    if style.is_bold() {
        flags |= FLAG_BOLD;
    }
    if style.is_italic() {
        flags |= FLAG_ITALIC;
    }
    flags
}

/// Build the `/Dest` array for a page and optional explicit view.
///
/// Unset coordinates and Fit Page zoom are written as `null`, which viewers
/// read as "keep the current value".
pub fn destination_array(page_ref: ObjectRef, dest: Option<&ExplicitDestination>) -> Object {
    let real = |v: Option<f64>| v.map(Object::Real).unwrap_or(Object::Null);

    let (left, top, zoom) = match dest {
        Some(dest) => (real(dest.x), real(dest.y), real(dest.zoom_factor())),
        None => (Object::Null, Object::Null, Object::Null),
    };

    Object::Array(vec![
        Object::Reference(page_ref),
        Object::name("XYZ"),
        left,
        top,
        zoom,
    ])
}

/// Writes bookmark trees into an object store.
pub struct OutlineWriter<'a, S: ObjectStore + ?Sized> {
    store: &'a mut S,
    items_written: usize,
}

impl<'a, S: ObjectStore + ?Sized> OutlineWriter<'a, S> {
    /// Create a writer over a store.
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            items_written: 0,
        }
    }

    /// Write the tree and install it as the document outline.
    ///
    /// Returns the `/Outlines` reference, or `None` for an empty tree, in which
    /// case the store is not touched and any existing outline is kept.
    ///
    /// Any store failure aborts the write before the catalog is updated.
    pub fn write(&mut self, tree: &BookmarkTree) -> Result<Option<ObjectRef>> {
        if tree.is_empty() {
            log::debug!("Bookmark tree is empty, leaving document outline untouched");
            return Ok(None);
        }

        let mut root = Dictionary::new();
        root.insert("Type".to_string(), Object::name("Outlines"));
        let root_ref = self.store.allocate(root)?;

        let items = self.build_siblings(&tree.roots, root_ref)?;
        link_children(self.store.dictionary_mut(root_ref)?, &items);

        self.store.set_catalog_outlines(root_ref)?;
        log::debug!("Wrote outline {} with {} items", root_ref, self.items_written);

        Ok(Some(root_ref))
    }

    /// Build one sibling list and chain it with `Prev`/`Next`.
    fn build_siblings(&mut self, nodes: &[BookmarkNode], parent: ObjectRef) -> Result<Vec<ObjectRef>> {
        let refs = nodes
            .iter()
            .map(|node| self.build_item(node, parent))
            .collect::<Result<Vec<_>>>()?;

        for pair in refs.windows(2) {
            self.store
                .dictionary_mut(pair[0])?
                .insert("Next".to_string(), Object::Reference(pair[1]));
            self.store
                .dictionary_mut(pair[1])?
                .insert("Prev".to_string(), Object::Reference(pair[0]));
        }

        Ok(refs)
    }

    /// Build a single outline item and its children.
    fn build_item(&mut self, node: &BookmarkNode, parent: ObjectRef) -> Result<ObjectRef> {
        let page_index = node.page.checked_sub(1).ok_or_else(|| {
            Error::MalformedInput(format!("bookmark '{}' targets page 0", node.title))
        })?;
        let page_ref = self.store.page_ref(page_index as usize)?;

        let mut dict = Dictionary::new();
        dict.insert("Title".to_string(), Object::String(encode_text_string(&node.title)));
        dict.insert("Parent".to_string(), Object::Reference(parent));
        dict.insert(
            "Dest".to_string(),
            destination_array(page_ref, node.destination().as_ref()),
        );

        if let Some(color) = node.color {
            let [r, g, b] = color.to_rgb();
            dict.insert(
                "C".to_string(),
                Object::Array(vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            );
        }

        let flags = style_flags(node.style);
        if flags != 0 {
            dict.insert("F".to_string(), Object::Integer(flags));
        }

        let item_ref = self.store.allocate(dict)?;
        self.items_written += 1;

        if !node.children.is_empty() {
            let children = self.build_siblings(&node.children, item_ref)?;
            link_children(self.store.dictionary_mut(item_ref)?, &children);
        }

        Ok(item_ref)
    }
}

/// Set `First`/`Last`/`Count` on a parent; leaves get none of the three.
fn link_children(parent: &mut Dictionary, children: &[ObjectRef]) {
    let (Some(first), Some(last)) = (children.first(), children.last()) else {
        return;
    };
    parent.insert("First".to_string(), Object::Reference(*first));
    parent.insert("Last".to_string(), Object::Reference(*last));
    parent.insert("Count".to_string(), Object::Integer(children.len() as i64));
}
