//! Integration tests for outline handling.
//!
//! Writes bookmark trees into a `MemoryDocument` and reads them back.

use bookmark_oxide::object::Dictionary;
use bookmark_oxide::writer::ObjectStore;
use bookmark_oxide::{
    BookmarkColor, BookmarkNode, BookmarkStyle, BookmarkTree, Error, ExplicitDestination,
    IdGenerator, IdStrategy, MemoryDocument, NamedColor, Object, ObjectRef, OutlineReader,
    OutlineWriter,
};

fn sample_tree() -> BookmarkTree {
    BookmarkTree::from_roots(vec![
        BookmarkNode::new("c1", "Chapter 1", 1)
            .with_color(NamedColor::Red)
            .with_style(BookmarkStyle::Bold)
            .with_child(
                BookmarkNode::new("s11", "Section 1.1", 2).with_destination(
                    ExplicitDestination::at(100.0, 700.0).with_zoom("150"),
                ),
            )
            .with_child(BookmarkNode::new("s12", "Section 1.2", 3)),
        BookmarkNode::new("c2", "Chapter 2", 5).with_style(BookmarkStyle::Italic),
        BookmarkNode::new("c3", "Épilogue", 9),
    ])
}

fn dict(doc: &MemoryDocument, r: ObjectRef) -> &Dictionary {
    doc.dictionary(r).expect("outline dictionary exists")
}

fn reference(d: &Dictionary, key: &str) -> Option<ObjectRef> {
    d.get(key).and_then(Object::as_reference)
}

/// Collect a sibling chain by following /Next from `first`.
fn chain(doc: &MemoryDocument, first: Option<ObjectRef>) -> Vec<ObjectRef> {
    let mut out = Vec::new();
    let mut current = first;
    while let Some(r) = current {
        out.push(r);
        current = reference(dict(doc, r), "Next");
    }
    out
}

/// Check the sibling and parent links of every level below `parent`.
fn assert_well_linked(doc: &MemoryDocument, parent: ObjectRef, expected_children: &[BookmarkNode]) {
    let parent_dict = dict(doc, parent);
    let items = chain(doc, reference(parent_dict, "First"));
    assert_eq!(items.len(), expected_children.len());

    if expected_children.is_empty() {
        assert!(parent_dict.get("First").is_none());
        assert!(parent_dict.get("Last").is_none());
        assert!(parent_dict.get("Count").is_none());
        return;
    }

    assert_eq!(
        parent_dict.get("Count").and_then(Object::as_integer),
        Some(expected_children.len() as i64)
    );
    assert_eq!(reference(parent_dict, "Last"), items.last().copied());

    for (i, (item, node)) in items.iter().zip(expected_children).enumerate() {
        let d = dict(doc, *item);
        assert_eq!(reference(d, "Parent"), Some(parent));
        assert_eq!(reference(d, "Prev"), if i == 0 { None } else { Some(items[i - 1]) });
        assert_eq!(reference(d, "Next"), items.get(i + 1).copied());
        assert_well_linked(doc, *item, &node.children);
    }
}

#[test]
fn test_outline_missing() {
    let mut doc = MemoryDocument::new(3);
    let mut ids = IdGenerator::new(IdStrategy::Sequential);
    let tree = OutlineReader::new(&mut ids).read(&mut doc).expect("read empty outline");
    assert!(tree.is_empty());
}

#[test]
fn test_written_outline_is_well_linked() {
    let tree = sample_tree();
    let mut doc = MemoryDocument::new(10);

    let root = OutlineWriter::new(&mut doc)
        .write(&tree)
        .expect("write outline")
        .expect("non-empty tree produces an outline");

    assert_eq!(doc.outlines(), Some(root));
    assert_eq!(
        dict(&doc, root).get("Type").and_then(Object::as_name),
        Some("Outlines")
    );
    assert_well_linked(&doc, root, &tree.roots);
}

#[test]
fn test_written_destination_and_style() {
    let tree = sample_tree();
    let mut doc = MemoryDocument::new(10);
    let root = OutlineWriter::new(&mut doc).write(&tree).unwrap().unwrap();

    let chapter = reference(dict(&doc, root), "First").unwrap();
    let chapter_dict = dict(&doc, chapter);
    assert_eq!(chapter_dict.get("F").and_then(Object::as_integer), Some(1));
    assert_eq!(
        chapter_dict.get("C"),
        Some(&Object::Array(vec![
            Object::Real(1.0),
            Object::Real(0.0),
            Object::Real(0.0)
        ]))
    );

    let section = reference(chapter_dict, "First").unwrap();
    let page_two = doc.page_ref(1).unwrap();
    assert_eq!(
        dict(&doc, section).get("Dest"),
        Some(&Object::Array(vec![
            Object::Reference(page_two),
            Object::name("XYZ"),
            Object::Real(100.0),
            Object::Real(700.0),
            Object::Real(1.5),
        ]))
    );
}

#[test]
fn test_outline_round_trip() {
    let tree = sample_tree();
    let mut doc = MemoryDocument::new(10);
    OutlineWriter::new(&mut doc).write(&tree).unwrap();

    let mut ids = IdGenerator::new(IdStrategy::Sequential);
    let mut reader = OutlineReader::new(&mut ids);
    let read = reader.read(&mut doc).expect("read outline back");
    assert_eq!(reader.unresolved(), 0);

    let summary: Vec<(&str, u32, usize)> = read
        .flatten()
        .into_iter()
        .map(|(node, depth)| (node.title.as_str(), node.page, depth))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Chapter 1", 1, 0),
            ("Section 1.1", 2, 1),
            ("Section 1.2", 3, 1),
            ("Chapter 2", 5, 0),
            ("Épilogue", 9, 0),
        ]
    );

    let chapter = &read.roots[0];
    assert_eq!(chapter.color, Some(BookmarkColor::Named(NamedColor::Red)));
    assert_eq!(chapter.style, Some(BookmarkStyle::Bold));
    assert_eq!(read.roots[1].style, Some(BookmarkStyle::Italic));

    let section = &chapter.children[0];
    assert_eq!(section.dest_x, Some(100.0));
    assert_eq!(section.dest_y, Some(700.0));
    assert_eq!(section.zoom.as_deref(), Some("150"));

    // Unset coordinates come back unset
    assert_eq!(chapter.children[1].destination(), None);
    assert_eq!(read.roots[2].title, "Épilogue");
}

#[test]
fn test_missing_page_fails_and_keeps_previous_outline() {
    let mut doc = MemoryDocument::new(2);
    let small_tree = BookmarkTree::from_roots(vec![BookmarkNode::new("p1", "Cover", 1)]);
    let first = OutlineWriter::new(&mut doc).write(&small_tree).unwrap();
    assert!(first.is_some());

    let err = OutlineWriter::new(&mut doc).write(&sample_tree()).unwrap_err();
    assert!(matches!(
        err,
        Error::PageOutOfRange {
            page: 3,
            page_count: 2
        }
    ));
    assert_eq!(doc.outlines(), first);
}

#[test]
fn test_store_failure_leaves_catalog_untouched() {
    let mut doc = MemoryDocument::new(10);
    let previous = OutlineWriter::new(&mut doc).write(&sample_tree()).unwrap();

    // Six allocations for the first outline, then two more are allowed
    let mut doc = doc.fail_after_allocations(8);
    let err = OutlineWriter::new(&mut doc).write(&sample_tree()).unwrap_err();
    assert!(matches!(err, Error::ObjectStore(_)));
    assert_eq!(doc.outlines(), previous);
}

#[test]
fn test_empty_tree_writes_nothing() {
    let mut doc = MemoryDocument::new(1);
    let before = doc.object_count();
    let written = OutlineWriter::new(&mut doc).write(&BookmarkTree::new()).unwrap();
    assert_eq!(written, None);
    assert_eq!(doc.object_count(), before);
    assert_eq!(doc.outlines(), None);
}

#[test]
fn test_named_and_broken_destinations() {
    let mut doc = MemoryDocument::new(4);
    let page_three = doc.page_ref(2).unwrap();

    let mut target = Dictionary::new();
    target.insert(
        "D".to_string(),
        Object::Array(vec![
            Object::Reference(page_three),
            Object::name("XYZ"),
            Object::Integer(72),
            Object::Null,
            Object::Real(0.0),
        ]),
    );
    doc.add_named_destination("appendix", Object::Dictionary(target));

    let broken = item(&mut doc, "Broken", Object::name("nowhere"));
    let named = item(&mut doc, "Appendix", Object::String(b"appendix".to_vec()));
    doc.dictionary_mut(named)
        .unwrap()
        .insert("Next".to_string(), Object::Reference(broken));

    let mut root = Dictionary::new();
    root.insert("Type".to_string(), Object::name("Outlines"));
    root.insert("First".to_string(), Object::Reference(named));
    let root_ref = doc.allocate(root).unwrap();
    doc.set_catalog_outlines(root_ref).unwrap();

    let mut ids = IdGenerator::new(IdStrategy::Sequential);
    let mut reader = OutlineReader::new(&mut ids);
    let tree = reader.read(&mut doc).unwrap();

    assert_eq!(tree.roots.len(), 2);
    let appendix = &tree.roots[0];
    assert_eq!(appendix.page, 3);
    assert_eq!(appendix.dest_x, Some(72.0));
    assert_eq!(appendix.dest_y, None);
    assert_eq!(appendix.zoom.as_deref(), Some("0"));

    let broken = &tree.roots[1];
    assert_eq!(broken.page, 1);
    assert_eq!(broken.destination(), None);
    assert_eq!(reader.unresolved(), 1);
}

fn item(doc: &mut MemoryDocument, title: &str, dest: Object) -> ObjectRef {
    let mut d = Dictionary::new();
    d.insert("Title".to_string(), Object::String(title.as_bytes().to_vec()));
    d.insert("Dest".to_string(), dest);
    doc.insert_object(Object::Dictionary(d))
}
