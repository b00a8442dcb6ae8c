//! Existing document outline (bookmarks) import.
//!
//! The document side is abstracted as an [`OutlineWalker`], which hands over the
//! outline as plain [`OutlineEntry`] values and resolves named destinations and
//! page references on request. [`OutlineReader`] turns those entries into a
//! fresh [`BookmarkTree`].

use crate::color::{BookmarkColor, NamedColor};
use crate::error::{Error, Result};
use crate::model::{BookmarkNode, BookmarkStyle, BookmarkTree, IdGenerator};
use crate::object::{Object, ObjectRef};
use crate::text::{decode_text_string, strip_control_chars};

/// A single outline item as read from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    /// The title of this bookmark
    pub title: String,

    /// Raw destination: an explicit array, a name/string to look up, or a
    /// dictionary with a `/D` entry. `None` if the item has none.
    pub dest: Option<Object>,

    /// `/C` color, if present
    pub color: Option<[f64; 3]>,

    /// Bold flag from `/F`
    pub bold: bool,

    /// Italic flag from `/F`
    pub italic: bool,

    /// Child bookmarks under this item
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Create an entry without color, style or children.
    pub fn new(title: impl Into<String>, dest: Option<Object>) -> Self {
        Self {
            title: title.into(),
            dest,
            color: None,
            bold: false,
            italic: false,
            children: Vec::new(),
        }
    }

    /// Set the color.
    pub fn with_color(mut self, rgb: [f64; 3]) -> Self {
        self.color = Some(rgb);
        self
    }

    /// Set the style flags.
    pub fn with_flags(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: OutlineEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// Read access to an existing document outline.
pub trait OutlineWalker {
    /// Top-level outline items with their children. Empty if there is no outline.
    fn outline(&mut self) -> Result<Vec<OutlineEntry>>;

    /// Look up a named destination.
    fn resolve_named_destination(&mut self, name: &str) -> Result<Object>;

    /// 0-based index of a page object.
    fn page_index_of(&mut self, page: ObjectRef) -> Result<usize>;
}

/// Where a destination points after resolution.
#[derive(Debug, Clone, Default, PartialEq)]
struct ResolvedDestination {
    page: u32,
    x: Option<f64>,
    y: Option<f64>,
    zoom: Option<String>,
}

/// Converts a document outline into a bookmark tree.
pub struct OutlineReader<'a> {
    ids: &'a mut IdGenerator,
    unresolved: usize,
}

impl<'a> OutlineReader<'a> {
    /// Create a reader that draws node ids from `ids`.
    pub fn new(ids: &'a mut IdGenerator) -> Self {
        Self { ids, unresolved: 0 }
    }

    /// Read the whole outline.
    ///
    /// A destination that cannot be resolved never fails the import: that node
    /// points at page 1 with no explicit view. Only a failure to walk the
    /// outline itself is returned as an error.
    pub fn read<W: OutlineWalker + ?Sized>(&mut self, walker: &mut W) -> Result<BookmarkTree> {
        let entries = walker.outline()?;
        let roots = entries
            .iter()
            .map(|entry| self.convert(walker, entry))
            .collect();
        let tree = BookmarkTree::from_roots(roots);

        log::debug!(
            "Imported {} bookmarks from outline ({} unresolved destinations)",
            tree.len(),
            self.unresolved
        );
        Ok(tree)
    }

    /// Number of items whose destination fell back to page 1.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    fn convert<W: OutlineWalker + ?Sized>(&mut self, walker: &mut W, entry: &OutlineEntry) -> BookmarkNode {
        let mut node = self.ids.create_node(strip_control_chars(&entry.title), 1);

        match entry.dest.as_ref().map(|dest| resolve_destination(walker, dest)) {
            Some(Ok(resolved)) => {
                node.page = resolved.page;
                node.dest_x = resolved.x;
                node.dest_y = resolved.y;
                node.zoom = resolved.zoom;
            },
            Some(Err(e)) => {
                log::warn!("Bookmark '{}' falls back to page 1: {}", node.title, e);
                self.unresolved += 1;
            },
            None => {
                log::debug!("Outline item '{}' has no destination", node.title);
                self.unresolved += 1;
            },
        }

        node.color = entry
            .color
            .and_then(NamedColor::classify)
            .map(BookmarkColor::Named);
        node.style = BookmarkStyle::from_flags(entry.bold, entry.italic);
        node.children = entry
            .children
            .iter()
            .map(|child| self.convert(walker, child))
            .collect();

        node
    }
}

/// Resolve a raw destination to a 1-based page and optional `/XYZ` view.
fn resolve_destination<W: OutlineWalker + ?Sized>(
    walker: &mut W,
    dest: &Object,
) -> Result<ResolvedDestination> {
    let explicit = match dest {
        Object::String(name) => walker.resolve_named_destination(&decode_text_string(name))?,
        Object::Name(name) => walker.resolve_named_destination(name)?,
        other => other.clone(),
    };

    // Name trees may map to << /D [...] >> instead of a bare array
    let explicit = match explicit {
        Object::Dictionary(mut dict) => dict.remove("D").ok_or_else(|| {
            Error::DestinationResolution("destination dictionary has no /D entry".to_string())
        })?,
        other => other,
    };

    let arr = explicit.as_array().ok_or_else(|| {
        Error::DestinationResolution(format!(
            "expected destination array, found {}",
            explicit.type_name()
        ))
    })?;

    let page_index = match arr.first() {
        Some(Object::Reference(page_ref)) => walker.page_index_of(*page_ref)?,
        // Remote-style destinations carry the page number directly
        Some(Object::Integer(index)) => usize::try_from(*index).map_err(|_| {
            Error::DestinationResolution(format!("invalid destination page index {}", index))
        })?,
        Some(other) => {
            return Err(Error::DestinationResolution(format!(
                "destination page is a {}",
                other.type_name()
            )))
        },
        None => return Err(Error::DestinationResolution("empty destination array".to_string())),
    };

    let page = page_index
        .checked_add(1)
        .and_then(|page| u32::try_from(page).ok())
        .ok_or_else(|| {
            Error::DestinationResolution(format!("page index {} out of range", page_index))
        })?;

    let mut resolved = ResolvedDestination {
        page,
        ..Default::default()
    };

    if arr.len() >= 5 && arr[1].as_name() == Some("XYZ") {
        resolved.x = arr[2].as_number();
        resolved.y = arr[3].as_number();
        resolved.zoom = arr[4]
            .as_number()
            .map(|z| format!("{}", (z * 100.0).round() as i64));
    }

    Ok(resolved)
}
