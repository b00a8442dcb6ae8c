//! In-memory PDF object table.
//!
//! [`MemoryDocument`] holds just enough of a PDF document to host an outline:
//! numbered indirect objects, a page list, the catalog's `/Outlines` pointer and
//! a named-destination table. It implements both collaborator traits, so an
//! outline written by [`OutlineWriter`](crate::writer::OutlineWriter) can be read
//! straight back by [`OutlineReader`](crate::outline::OutlineReader).

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::outline::{OutlineEntry, OutlineWalker};
use crate::text::decode_text_string;
use crate::writer::{ObjectStore, FLAG_BOLD, FLAG_ITALIC};
use std::collections::{HashMap, HashSet};

/// Default maximum outline nesting accepted when walking.
pub const DEFAULT_MAX_OUTLINE_DEPTH: usize = 100;

/// A PDF document reduced to its object table.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    objects: HashMap<u32, Object>,
    next_id: u32,
    pages: Vec<ObjectRef>,
    outlines: Option<ObjectRef>,
    named_destinations: HashMap<String, Object>,
    /// Allocations allowed before the store starts failing (`None` = never fail)
    fail_after: Option<usize>,
    allocations: usize,
    max_depth: usize,
}

impl MemoryDocument {
    /// Create a document with `page_count` empty pages.
    pub fn new(page_count: usize) -> Self {
        let mut doc = Self {
            objects: HashMap::new(),
            next_id: 1,
            pages: Vec::with_capacity(page_count),
            outlines: None,
            named_destinations: HashMap::new(),
            fail_after: None,
            allocations: 0,
            max_depth: DEFAULT_MAX_OUTLINE_DEPTH,
        };

        for _ in 0..page_count {
            let mut page = Dictionary::new();
            page.insert("Type".to_string(), Object::name("Page"));
            let page_ref = doc.insert_object(Object::Dictionary(page));
            doc.pages.push(page_ref);
        }

        doc
    }

    /// Make every allocation after the first `allocations` fail.
    pub fn fail_after_allocations(mut self, allocations: usize) -> Self {
        self.fail_after = Some(allocations);
        self
    }

    /// Limit how deep [`OutlineWalker::outline`] descends.
    pub fn with_max_outline_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of indirect objects, pages included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The catalog's current `/Outlines` entry.
    pub fn outlines(&self) -> Option<ObjectRef> {
        self.outlines
    }

    /// Look up an indirect object.
    pub fn object(&self, obj: ObjectRef) -> Option<&Object> {
        self.objects.get(&obj.id)
    }

    /// Look up an indirect dictionary.
    pub fn dictionary(&self, obj: ObjectRef) -> Option<&Dictionary> {
        self.object(obj).and_then(Object::as_dict)
    }

    /// Insert an arbitrary object, bypassing allocation failure injection.
    pub fn insert_object(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = ObjectRef::new(self.next_id, 0);
        self.next_id += 1;
        self.objects.insert(obj_ref.id, obj);
        obj_ref
    }

    /// Replace an existing object.
    pub fn replace_object(&mut self, obj_ref: ObjectRef, obj: Object) -> Result<()> {
        match self.objects.get_mut(&obj_ref.id) {
            Some(slot) => {
                *slot = obj;
                Ok(())
            },
            None => Err(Error::ObjectNotFound(obj_ref)),
        }
    }

    /// Register a named destination (an explicit array or `<< /D [...] >>`).
    pub fn add_named_destination(&mut self, name: impl Into<String>, dest: Object) {
        self.named_destinations.insert(name.into(), dest);
    }

    /// Follow an indirect reference, leaving direct objects alone.
    fn resolve(&self, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(r) => self.object(*r).cloned().ok_or(Error::ObjectNotFound(*r)),
            other => Ok(other.clone()),
        }
    }

    /// Parse a sibling chain starting at `first`, children included.
    fn read_chain(
        &self,
        first: Option<ObjectRef>,
        depth: usize,
        visited: &mut HashSet<ObjectRef>,
    ) -> Result<Vec<OutlineEntry>> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimitExceeded(self.max_depth));
        }

        let mut entries = Vec::new();
        let mut current = first;

        while let Some(item_ref) = current {
            if !visited.insert(item_ref) {
                log::warn!("Outline chain revisits {}, stopping", item_ref);
                break;
            }

            let dict = self
                .dictionary(item_ref)
                .ok_or(Error::ObjectNotFound(item_ref))?;
            entries.push(self.read_item(dict, depth, visited)?);

            current = dict.get("Next").and_then(Object::as_reference);
        }

        Ok(entries)
    }

    fn read_item(
        &self,
        dict: &Dictionary,
        depth: usize,
        visited: &mut HashSet<ObjectRef>,
    ) -> Result<OutlineEntry> {
        let title = dict
            .get("Title")
            .and_then(Object::as_string)
            .map(decode_text_string)
            .unwrap_or_default();

        // /Dest first, then a GoTo action's /D
        let dest = match dict.get("Dest") {
            Some(dest) => Some(self.resolve(dest)?),
            None => match dict.get("A").map(|a| self.resolve(a)).transpose()? {
                Some(Object::Dictionary(action)) => {
                    action.get("D").map(|d| self.resolve(d)).transpose()?
                },
                _ => None,
            },
        };

        let color = dict.get("C").and_then(Object::as_array).and_then(|c| {
            match c.as_slice() {
                [r, g, b] => Some([r.as_number()?, g.as_number()?, b.as_number()?]),
                _ => None,
            }
        });

        let flags = dict.get("F").and_then(Object::as_integer).unwrap_or(0);

        let children = match dict.get("First").and_then(Object::as_reference) {
            Some(first) => self.read_chain(Some(first), depth + 1, visited)?,
            None => Vec::new(),
        };

        Ok(OutlineEntry {
            title,
            dest,
            color,
            bold: flags & FLAG_BOLD != 0,
            italic: flags & FLAG_ITALIC != 0,
            children,
        })
    }
}

impl ObjectStore for MemoryDocument {
    fn allocate(&mut self, dict: Dictionary) -> Result<ObjectRef> {
        if self.fail_after.is_some_and(|limit| self.allocations >= limit) {
            return Err(Error::ObjectStore(format!(
                "allocation {} rejected",
                self.allocations + 1
            )));
        }
        self.allocations += 1;
        Ok(self.insert_object(Object::Dictionary(dict)))
    }

    fn dictionary_mut(&mut self, obj: ObjectRef) -> Result<&mut Dictionary> {
        self.objects
            .get_mut(&obj.id)
            .and_then(Object::as_dict_mut)
            .ok_or(Error::ObjectNotFound(obj))
    }

    fn page_ref(&self, page_index: usize) -> Result<ObjectRef> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: u32::try_from(page_index + 1).unwrap_or(u32::MAX),
                page_count: self.pages.len(),
            })
    }

    fn set_catalog_outlines(&mut self, outlines: ObjectRef) -> Result<()> {
        if self.dictionary(outlines).is_none() {
            return Err(Error::ObjectNotFound(outlines));
        }
        self.outlines = Some(outlines);
        Ok(())
    }
}

impl OutlineWalker for MemoryDocument {
    fn outline(&mut self) -> Result<Vec<OutlineEntry>> {
        let Some(root) = self.outlines else {
            return Ok(Vec::new());
        };

        let first = self
            .dictionary(root)
            .ok_or(Error::ObjectNotFound(root))?
            .get("First")
            .and_then(Object::as_reference);

        let mut visited = HashSet::new();
        self.read_chain(first, 0, &mut visited)
    }

    fn resolve_named_destination(&mut self, name: &str) -> Result<Object> {
        let dest = self.named_destinations.get(name).ok_or_else(|| {
            Error::DestinationResolution(format!("unknown named destination '{}'", name))
        })?;
        self.resolve(dest)
    }

    fn page_index_of(&mut self, page: ObjectRef) -> Result<usize> {
        self.pages
            .iter()
            .position(|p| *p == page)
            .ok_or_else(|| Error::DestinationResolution(format!("{} is not a page", page)))
    }
}
