//! JSON bookmark interchange.
//!
//! The document is an array of node objects:
//!
//! ```json
//! [
//!   {
//!     "id": "bm-1",
//!     "title": "Chapter 1",
//!     "page": 1,
//!     "children": [],
//!     "color": "red",
//!     "style": "bold",
//!     "destX": 72.0,
//!     "destY": 700.0,
//!     "zoom": "150"
//!   }
//! ]
//! ```
//!
//! Absent optional fields are written as `null`. Ids must be unique across the
//! whole document; an id may be omitted (or empty) to have one generated.

use crate::error::{Error, Result};
use crate::model::{BookmarkNode, BookmarkTree, IdGenerator};
use std::collections::HashSet;

/// Serialize a tree, ids included.
pub fn encode(tree: &BookmarkTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Parse a JSON document into a tree.
///
/// Unlike CSV there is no per-row recovery: any syntax or shape error fails the
/// whole decode, and so does an id used by more than one node. Titles are
/// sanitized, and nodes without an id get a fresh one.
pub fn decode(input: &str, ids: &mut IdGenerator) -> Result<BookmarkTree> {
    let mut tree: BookmarkTree = serde_json::from_str(input)?;
    check_unique_ids(&tree)?;
    tree.sanitize_titles();

    ids.reserve(&tree);
    let mut assigned = 0usize;
    tree.for_each_mut(&mut |node: &mut BookmarkNode| {
        if node.id.is_empty() {
            node.id = ids.next_id();
            assigned += 1;
        }
    });
    if assigned > 0 {
        log::debug!("Assigned {} missing bookmark ids during JSON import", assigned);
    }

    Ok(tree)
}

fn check_unique_ids(tree: &BookmarkTree) -> Result<()> {
    let mut seen = HashSet::new();
    for (node, _) in tree.flatten() {
        if !node.id.is_empty() && !seen.insert(node.id.as_str()) {
            return Err(Error::MalformedInput(format!(
                "bookmark id '{}' is used more than once",
                node.id
            )));
        }
    }
    Ok(())
}
