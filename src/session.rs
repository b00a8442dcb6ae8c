//! Editing session: one bookmark tree, its history and its id source.
//!
//! All edits go through [`BookmarkSession`]. Each edit works on a fresh copy of
//! the tree, installs it only if the whole edit succeeded, and commits exactly
//! one history snapshot, including batch edits that touch many nodes.
//!
//! ```ignore
//! use bookmark_oxide::{BookmarkSession, SessionConfig};
//!
//! let mut session = BookmarkSession::new(SessionConfig::default());
//! let chapter = session.add_bookmark("Chapter 1", 1, None)?;
//! session.add_bookmark("Section 1.1", 2, Some(&chapter))?;
//! session.undo();
//! ```

use crate::codec::{self, CsvImport};
use crate::color::BookmarkColor;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::history::History;
use crate::model::{BookmarkNode, BookmarkStyle, BookmarkTree, ExplicitDestination, IdGenerator};
use crate::object::ObjectRef;
use crate::outline::{OutlineReader, OutlineWalker};
use crate::text::strip_control_chars;
use crate::writer::{ObjectStore, OutlineWriter};

/// Where [`BookmarkSession::move_bookmark`] puts a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// Immediately before the given sibling
    Before(String),
    /// Immediately after the given sibling
    After(String),
    /// As the last child of the given node
    Into(String),
    /// At a top-level position (clamped to the end)
    Root(usize),
}

/// Field changes for [`BookmarkSession::edit_bookmark`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkEdit {
    /// New title
    pub title: Option<String>,
    /// New target page
    pub page: Option<u32>,
    /// New color (`Some(None)` clears it)
    pub color: Option<Option<BookmarkColor>>,
    /// New style (`Some(None)` clears it)
    pub style: Option<Option<BookmarkStyle>>,
    /// New explicit destination (`Some(None)` clears it)
    pub destination: Option<Option<ExplicitDestination>>,
}

impl BookmarkEdit {
    /// An edit that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Change the page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Change or clear the color.
    pub fn color(mut self, color: Option<BookmarkColor>) -> Self {
        self.color = Some(color);
        self
    }

    /// Change or clear the style.
    pub fn style(mut self, style: Option<BookmarkStyle>) -> Self {
        self.style = Some(style);
        self
    }

    /// Change or clear the explicit destination.
    pub fn destination(mut self, destination: Option<ExplicitDestination>) -> Self {
        self.destination = Some(destination);
        self
    }
}

/// The editing state of one open document.
#[derive(Debug, Clone)]
pub struct BookmarkSession {
    tree: BookmarkTree,
    history: History,
    ids: IdGenerator,
    config: SessionConfig,
}

impl Default for BookmarkSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl BookmarkSession {
    /// Start with an empty tree (recorded as the first snapshot).
    pub fn new(config: SessionConfig) -> Self {
        Self::with_tree(config, BookmarkTree::new())
    }

    /// Start from an existing tree.
    pub fn with_tree(config: SessionConfig, tree: BookmarkTree) -> Self {
        let mut ids = IdGenerator::new(config.id_strategy);
        ids.reserve(&tree);

        let mut history = History::with_limit(config.history_limit);
        history.commit(&tree);

        Self {
            tree,
            history,
            ids,
            config,
        }
    }

    /// The current tree.
    pub fn tree(&self) -> &BookmarkTree {
        &self.tree
    }

    /// The undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run an edit on a copy of the tree; install and commit it only on success.
    fn apply<T>(
        &mut self,
        edit: impl FnOnce(&mut BookmarkTree, &mut IdGenerator) -> Result<T>,
    ) -> Result<T> {
        let mut next = self.tree.clone();
        let out = edit(&mut next, &mut self.ids)?;
        self.tree = next;
        self.history.commit(&self.tree);
        Ok(out)
    }

    /// Replace the tree wholesale and restart history from it.
    fn install(&mut self, tree: BookmarkTree) {
        self.ids.reserve(&tree);
        self.tree = tree;
        self.history.reset(&self.tree);
    }

    /// Append a new bookmark to `parent`'s children (or the roots); returns its id.
    pub fn add_bookmark(&mut self, title: &str, page: u32, parent: Option<&str>) -> Result<String> {
        self.apply(|tree, ids| {
            let siblings = tree
                .children_mut(parent)
                .ok_or_else(|| Error::BookmarkNotFound(parent.unwrap_or_default().to_string()))?;
            let node = ids.create_node(strip_control_chars(title), page);
            let id = node.id.clone();
            siblings.push(node);
            Ok(id)
        })
    }

    /// Change fields of one bookmark.
    pub fn edit_bookmark(&mut self, id: &str, edit: BookmarkEdit) -> Result<()> {
        self.apply(|tree, _| {
            let node = tree
                .find_mut(id)
                .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))?;

            if let Some(title) = edit.title {
                node.title = strip_control_chars(&title);
            }
            if let Some(page) = edit.page {
                node.page = page;
            }
            if let Some(color) = edit.color {
                node.color = color;
            }
            if let Some(style) = edit.style {
                node.style = style;
            }
            if let Some(destination) = edit.destination {
                if let Some(dest) = &destination {
                    check_coordinates(dest)?;
                }
                node.set_destination(destination);
            }
            Ok(())
        })
    }

    /// Remove a bookmark and its subtree.
    pub fn delete_bookmark(&mut self, id: &str) -> Result<()> {
        self.apply(|tree, _| {
            if tree.remove(id) {
                Ok(())
            } else {
                Err(Error::BookmarkNotFound(id.to_string()))
            }
        })
    }

    /// Move a bookmark (with its subtree) to a new position.
    pub fn move_bookmark(&mut self, id: &str, target: MoveTarget) -> Result<()> {
        self.apply(|tree, _| {
            let moving = tree
                .find(id)
                .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))?;

            if let MoveTarget::Before(anchor) | MoveTarget::After(anchor) | MoveTarget::Into(anchor) =
                &target
            {
                if !tree.contains(anchor) {
                    return Err(Error::BookmarkNotFound(anchor.clone()));
                }
                if moving.subtree_contains(anchor) {
                    return Err(Error::InvalidMove(format!(
                        "'{}' cannot be placed relative to itself or its own descendant '{}'",
                        id, anchor
                    )));
                }
            }

            let node = tree
                .take(id)
                .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))?;

            let (parent, index) = match &target {
                MoveTarget::Root(index) => (None, *index),
                MoveTarget::Into(anchor) => {
                    let len = tree.find(anchor).map_or(0, |n| n.children.len());
                    (Some(anchor.clone()), len)
                },
                MoveTarget::Before(anchor) | MoveTarget::After(anchor) => {
                    let (parent, index) = tree
                        .position_of(anchor)
                        .map(|(p, i)| (p.map(str::to_string), i))
                        .ok_or_else(|| Error::BookmarkNotFound(anchor.clone()))?;
                    let offset = usize::from(matches!(target, MoveTarget::After(_)));
                    (parent, index + offset)
                },
            };

            let siblings = tree
                .children_mut(parent.as_deref())
                .ok_or_else(|| Error::InvalidMove(format!("no destination list for '{}'", id)))?;
            let index = index.min(siblings.len());
            siblings.insert(index, node);
            Ok(())
        })
    }

    /// Set (or clear) the color of many bookmarks in one step.
    ///
    /// Fails without changing anything if any id is unknown.
    pub fn apply_color(&mut self, ids: &[&str], color: Option<BookmarkColor>) -> Result<()> {
        self.apply_batch(ids, |node| node.color = color)
    }

    /// Set (or clear) the style of many bookmarks in one step.
    pub fn apply_style(&mut self, ids: &[&str], style: Option<BookmarkStyle>) -> Result<()> {
        self.apply_batch(ids, |node| node.style = style)
    }

    fn apply_batch(
        &mut self,
        ids: &[&str],
        mut change: impl FnMut(&mut BookmarkNode),
    ) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.apply(|tree, _| {
            for id in ids {
                let node = tree
                    .find_mut(id)
                    .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))?;
                change(node);
            }
            Ok(())
        })
    }

    /// Step back one edit. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(tree) => {
                self.tree = tree;
                true
            },
            None => false,
        }
    }

    /// Re-apply an undone edit. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(tree) => {
                self.tree = tree;
                true
            },
            None => false,
        }
    }

    /// Replace the tree with CSV content.
    ///
    /// Malformed rows are skipped and their line numbers returned. If rows were
    /// present but none could be read, the import fails and the tree is kept.
    pub fn import_csv(&mut self, input: &str) -> Result<Vec<usize>> {
        let CsvImport {
            tree,
            skipped_lines,
        } = codec::csv::decode(input, &mut self.ids);

        if tree.is_empty() && !skipped_lines.is_empty() {
            return Err(Error::MalformedInput(format!(
                "no readable CSV rows ({} malformed)",
                skipped_lines.len()
            )));
        }

        self.install(tree);
        Ok(skipped_lines)
    }

    /// Replace the tree with a JSON document. On error the tree is kept.
    pub fn import_json(&mut self, input: &str) -> Result<()> {
        let tree = codec::json::decode(input, &mut self.ids)?;
        self.install(tree);
        Ok(())
    }

    /// Replace the tree with a document's existing outline.
    pub fn import_outline<W: OutlineWalker + ?Sized>(&mut self, walker: &mut W) -> Result<()> {
        let tree = OutlineReader::new(&mut self.ids).read(walker)?;
        self.install(tree);
        Ok(())
    }

    /// The tree as CSV.
    pub fn export_csv(&self) -> String {
        codec::csv::encode(&self.tree)
    }

    /// The tree as JSON.
    pub fn export_json(&self) -> Result<String> {
        codec::json::encode(&self.tree)
    }

    /// Write the tree as the document outline; see [`OutlineWriter::write`].
    pub fn write_outline<S: ObjectStore + ?Sized>(&self, store: &mut S) -> Result<Option<ObjectRef>> {
        OutlineWriter::new(store).write(&self.tree)
    }
}

/// Destination coordinates must be finite; NaN and infinities have no PDF or JSON form.
fn check_coordinates(dest: &ExplicitDestination) -> Result<()> {
    for (axis, value) in [("x", dest.x), ("y", dest.y)] {
        if let Some(value) = value.filter(|v| !v.is_finite()) {
            return Err(Error::MalformedInput(format!(
                "destination {} coordinate {} is not finite",
                axis, value
            )));
        }
    }
    Ok(())
}
