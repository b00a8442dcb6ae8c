//! Bookmark tree model.
//!
//! A [`BookmarkTree`] is an ordered forest of [`BookmarkNode`]s. Children are
//! owned, so a node can never be shared between two parents or two history
//! snapshots. Sibling order is both display order and the `/Prev`/`/Next` order
//! of the generated outline.

use crate::color::BookmarkColor;
use crate::config::IdStrategy;
use crate::text::strip_control_chars;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text style of a bookmark title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookmarkStyle {
    /// Regular weight, upright
    Normal,
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// Bold and italic
    BoldItalic,
}

impl BookmarkStyle {
    /// Infer a style from outline flags; neither flag means no style at all.
    pub fn from_flags(bold: bool, italic: bool) -> Option<Self> {
        match (bold, italic) {
            (true, true) => Some(BookmarkStyle::BoldItalic),
            (true, false) => Some(BookmarkStyle::Bold),
            (false, true) => Some(BookmarkStyle::Italic),
            (false, false) => None,
        }
    }

    /// Whether the style includes bold.
    pub fn is_bold(&self) -> bool {
        matches!(self, BookmarkStyle::Bold | BookmarkStyle::BoldItalic)
    }

    /// Whether the style includes italic.
    pub fn is_italic(&self) -> bool {
        matches!(self, BookmarkStyle::Italic | BookmarkStyle::BoldItalic)
    }
}

/// Explicit view target of a bookmark: `[page /XYZ x y zoom]`.
///
/// Unset coordinates keep the viewer's current value for that axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitDestination {
    /// Left coordinate in page space
    pub x: Option<f64>,
    /// Top coordinate in page space
    pub y: Option<f64>,
    /// Zoom as a percentage string; `"0"` or empty means Fit Page
    pub zoom: Option<String>,
}

impl ExplicitDestination {
    /// Destination at a point, keeping the current zoom.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            zoom: None,
        }
    }

    /// Set the zoom percentage.
    pub fn with_zoom(mut self, zoom: impl Into<String>) -> Self {
        self.zoom = Some(zoom.into());
        self
    }

    /// Zoom as a scale factor (`"150"` → `1.5`).
    ///
    /// `None` for Fit Page (`"0"`, empty) and for values that are not numbers.
    pub fn zoom_factor(&self) -> Option<f64> {
        let zoom = self.zoom.as_deref()?.trim();
        match zoom.parse::<f64>() {
            Ok(percent) if percent.is_finite() && percent != 0.0 => Some(percent / 100.0),
            _ => None,
        }
    }
}

/// A single bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    /// Unique id within the tree
    #[serde(default)]
    pub id: String,
    /// Display title
    pub title: String,
    /// Target page (1-based)
    pub page: u32,
    /// Child bookmarks, in display order
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
    /// Title color
    #[serde(default)]
    pub color: Option<BookmarkColor>,
    /// Title style
    #[serde(default)]
    pub style: Option<BookmarkStyle>,
    /// Explicit destination x coordinate
    #[serde(default)]
    pub dest_x: Option<f64>,
    /// Explicit destination y coordinate
    #[serde(default)]
    pub dest_y: Option<f64>,
    /// Explicit destination zoom percentage
    #[serde(default)]
    pub zoom: Option<String>,
}

impl BookmarkNode {
    /// Create a bookmark with no children, color, style or explicit destination.
    pub fn new(id: impl Into<String>, title: impl Into<String>, page: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            page,
            children: Vec::new(),
            color: None,
            style: None,
            dest_x: None,
            dest_y: None,
            zoom: None,
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<BookmarkColor>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: BookmarkStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Set an explicit destination.
    pub fn with_destination(mut self, dest: ExplicitDestination) -> Self {
        self.set_destination(Some(dest));
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: BookmarkNode) -> Self {
        self.children.push(child);
        self
    }

    /// The explicit destination, if any component is set.
    pub fn destination(&self) -> Option<ExplicitDestination> {
        if self.dest_x.is_none() && self.dest_y.is_none() && self.zoom.is_none() {
            return None;
        }
        Some(ExplicitDestination {
            x: self.dest_x,
            y: self.dest_y,
            zoom: self.zoom.clone(),
        })
    }

    /// Replace (or clear) the explicit destination.
    pub fn set_destination(&mut self, dest: Option<ExplicitDestination>) {
        let dest = dest.unwrap_or_default();
        self.dest_x = dest.x;
        self.dest_y = dest.y;
        self.zoom = dest.zoom;
    }

    /// Whether `id` names this node or one of its descendants.
    pub fn subtree_contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|c| c.subtree_contains(id))
    }
}

/// Produces fresh node ids.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

const SEQUENTIAL_PREFIX: &str = "bm-";

impl IdGenerator {
    /// Create a generator for a strategy.
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, next: 1 }
    }

    /// Produce an id that this generator has not produced before.
    pub fn next_id(&mut self) -> String {
        match self.strategy {
            IdStrategy::Uuid => Uuid::new_v4().to_string(),
            IdStrategy::Sequential => {
                let id = format!("{}{}", SEQUENTIAL_PREFIX, self.next);
                self.next += 1;
                id
            },
        }
    }

    /// Create a fresh node with a new id.
    pub fn create_node(&mut self, title: impl Into<String>, page: u32) -> BookmarkNode {
        BookmarkNode::new(self.next_id(), title, page)
    }

    /// Make sure future sequential ids skip ids already present in `tree`.
    pub fn reserve(&mut self, tree: &BookmarkTree) {
        for (node, _) in tree.flatten() {
            if let Some(n) = node
                .id
                .strip_prefix(SEQUENTIAL_PREFIX)
                .and_then(|n| n.parse::<u64>().ok())
            {
                self.next = self.next.max(n.saturating_add(1));
            }
        }
    }
}

/// An ordered forest of bookmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkTree {
    /// Top-level bookmarks
    pub roots: Vec<BookmarkNode>,
}

impl BookmarkTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree from root nodes.
    pub fn from_roots(roots: Vec<BookmarkNode>) -> Self {
        Self { roots }
    }

    /// True when there are no bookmarks at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes, descendants included.
    pub fn len(&self) -> usize {
        fn count(nodes: &[BookmarkNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    /// First node with this id in pre-order.
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        fn find_in<'a>(nodes: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = find_in(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.roots, id)
    }

    /// Mutable access to the first node with this id in pre-order.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut BookmarkNode> {
        fn find_in<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
            for node in nodes.iter_mut() {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = find_in(&mut node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&mut self.roots, id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Detach and return the first node with this id (depth-first).
    pub fn take(&mut self, id: &str) -> Option<BookmarkNode> {
        fn take_from(nodes: &mut Vec<BookmarkNode>, id: &str) -> Option<BookmarkNode> {
            for i in 0..nodes.len() {
                if nodes[i].id == id {
                    return Some(nodes.remove(i));
                }
                if let Some(taken) = take_from(&mut nodes[i].children, id) {
                    return Some(taken);
                }
            }
            None
        }
        take_from(&mut self.roots, id)
    }

    /// Remove the first node with this id; its subtree goes with it.
    pub fn remove(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Pre-order `(node, depth)` pairs, roots at depth 0.
    pub fn flatten(&self) -> Vec<(&BookmarkNode, usize)> {
        fn walk<'a>(nodes: &'a [BookmarkNode], depth: usize, out: &mut Vec<(&'a BookmarkNode, usize)>) {
            for node in nodes {
                out.push((node, depth));
                walk(&node.children, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }

    /// Parent id (`None` for roots) and sibling index of a node.
    pub fn position_of(&self, id: &str) -> Option<(Option<&str>, usize)> {
        fn locate<'a>(
            nodes: &'a [BookmarkNode],
            parent: Option<&'a str>,
            id: &str,
        ) -> Option<(Option<&'a str>, usize)> {
            for (index, node) in nodes.iter().enumerate() {
                if node.id == id {
                    return Some((parent, index));
                }
                if let Some(found) = locate(&node.children, Some(node.id.as_str()), id) {
                    return Some(found);
                }
            }
            None
        }
        locate(&self.roots, None, id)
    }

    /// The sibling list under `parent`, or the roots for `None`.
    pub fn children_mut(&mut self, parent: Option<&str>) -> Option<&mut Vec<BookmarkNode>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.find_mut(id).map(|node| &mut node.children),
        }
    }

    /// Apply `f` to every node in pre-order.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut BookmarkNode)) {
        fn walk(nodes: &mut [BookmarkNode], f: &mut impl FnMut(&mut BookmarkNode)) {
            for node in nodes.iter_mut() {
                f(node);
                walk(&mut node.children, f);
            }
        }
        walk(&mut self.roots, f);
    }

    /// Strip control characters from every title.
    pub fn sanitize_titles(&mut self) {
        self.for_each_mut(&mut |node: &mut BookmarkNode| node.title = strip_control_chars(&node.title));
    }
}
