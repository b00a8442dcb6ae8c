//! CSV bookmark interchange.
//!
//! ```text
//! title,page,level
//! "Chapter 1",1,0
//! "Section 1.1",1,1
//! Chapter 2,5,0
//! ```
//!
//! One row per node in pre-order. `level` is the nesting depth (roots are 0).
//! Titles are quoted RFC 4180 style when they contain a comma, a quote or a
//! line break, with inner quotes doubled.

use crate::model::{BookmarkNode, BookmarkTree, IdGenerator};
use crate::text::strip_control_chars;
use lazy_static::lazy_static;
use regex::Regex;

/// Header row written by [`encode`] and skipped by [`decode`].
pub const HEADER: &str = "title,page,level";

lazy_static! {
    /// `"quoted ""title""",page,level`
    static ref RE_QUOTED_ROW: Regex =
        Regex::new(r#"^"((?:[^"]|"")*)"\s*,\s*(\d+)\s*,\s*(\d+)\s*$"#).unwrap();

    /// `bare title,page,level`
    static ref RE_BARE_ROW: Regex = Regex::new(r#"^([^,"]*),\s*(\d+)\s*,\s*(\d+)\s*$"#).unwrap();
}

/// Result of decoding a CSV document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    /// The reconstructed tree
    pub tree: BookmarkTree,
    /// 1-based line numbers of rows that were skipped as malformed
    pub skipped_lines: Vec<usize>,
}

/// Serialize a tree as CSV, header included.
pub fn encode(tree: &BookmarkTree) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + tree.len() * 24);
    out.push_str(HEADER);
    out.push('\n');

    for (node, depth) in tree.flatten() {
        out.push_str(&escape_field(&node.title));
        out.push_str(&format!(",{},{}\n", node.page, depth));
    }

    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse CSV into a fresh tree.
///
/// Rows that match neither the quoted nor the bare row pattern are skipped and
/// reported; they never abort the import. Ids are always freshly generated.
pub fn decode(input: &str, ids: &mut IdGenerator) -> CsvImport {
    let mut roots: Vec<BookmarkNode> = Vec::new();
    let mut skipped_lines = Vec::new();

    // Levels of the open sibling lists; the roots sit at -1 and are never popped.
    let mut levels: Vec<i64> = vec![-1];
    // Child indices leading from the roots to the list on top of `levels`.
    let mut path: Vec<usize> = Vec::new();

    let mut header_checked = false;
    for (line, record) in split_records(input) {
        if record.trim().is_empty() {
            continue;
        }
        if !header_checked {
            header_checked = true;
            if record.trim().eq_ignore_ascii_case(HEADER) {
                continue;
            }
        }

        let Some((title, page, level)) = parse_row(record) else {
            log::warn!("Skipping malformed CSV row at line {}: {:?}", line, record);
            skipped_lines.push(line);
            continue;
        };
        let level = i64::from(level);

        while levels.last().is_some_and(|&top| top >= level) {
            levels.pop();
            path.pop();
        }

        let siblings = children_at(&mut roots, &path);
        siblings.push(ids.create_node(title, page));
        path.push(siblings.len() - 1);
        levels.push(level);
    }

    let tree = BookmarkTree::from_roots(roots);
    log::debug!(
        "Decoded {} bookmarks from CSV ({} rows skipped)",
        tree.len(),
        skipped_lines.len()
    );

    CsvImport {
        tree,
        skipped_lines,
    }
}

fn children_at<'a>(roots: &'a mut Vec<BookmarkNode>, path: &[usize]) -> &'a mut Vec<BookmarkNode> {
    let mut list = roots;
    for &index in path {
        list = &mut list[index].children;
    }
    list
}

fn parse_row(record: &str) -> Option<(String, u32, u32)> {
    let (title, page, level) = if let Some(caps) = RE_QUOTED_ROW.captures(record) {
        (caps[1].replace("\"\"", "\""), caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else if let Some(caps) = RE_BARE_ROW.captures(record) {
        (caps[1].to_string(), caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else {
        return None;
    };

    Some((strip_control_chars(&title), page, level))
}

/// Split input into records at line breaks outside quoted fields.
///
/// Yields the 1-based line each record starts on. A trailing `\r` is dropped.
fn split_records(input: &str) -> Vec<(usize, &str)> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut start_line = 1;
    let mut line = 1;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' => {
                if !in_quotes {
                    records.push((start_line, trim_cr(&input[start..i])));
                    start = i + 1;
                    start_line = line + 1;
                }
                line += 1;
            },
            _ => {},
        }
    }

    if start < input.len() {
        records.push((start_line, trim_cr(&input[start..])));
    }

    records
}

fn trim_cr(record: &str) -> &str {
    record.strip_suffix('\r').unwrap_or(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdStrategy;

    fn ids() -> IdGenerator {
        IdGenerator::new(IdStrategy::Sequential)
    }

    fn shape(nodes: &[BookmarkNode]) -> Vec<(String, u32, usize)> {
        BookmarkTree::from_roots(nodes.to_vec())
            .flatten()
            .into_iter()
            .map(|(n, d)| (n.title.clone(), n.page, d))
            .collect()
    }

    #[test]
    fn test_decode_reference_example() {
        let input = "title,page,level\n\"Chapter 1\",1,0\n\"Section 1.1\",1,1\n\"Chapter 2\",5,0";
        let import = decode(input, &mut ids());

        assert!(import.skipped_lines.is_empty());
        let roots = &import.tree.roots;
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].title, "Chapter 1");
        assert_eq!(roots[0].page, 1);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].title, "Section 1.1");
        assert_eq!(roots[0].children[0].page, 1);
        assert!(roots[0].children[0].children.is_empty());
        assert_eq!(roots[1].title, "Chapter 2");
        assert_eq!(roots[1].page, 5);
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn test_encode_quotes_only_when_needed() {
        let tree = BookmarkTree::from_roots(vec![
            BookmarkNode::new("1", "Plain", 1)
                .with_child(BookmarkNode::new("2", "Tom, Dick \"and\" Harry", 2)),
            BookmarkNode::new("3", "Line\nbreak", 3),
        ]);

        assert_eq!(
            encode(&tree),
            "title,page,level\nPlain,1,0\n\"Tom, Dick \"\"and\"\" Harry\",2,1\n\"Line\nbreak\",3,0\n"
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let input = "title,page,level\nGood,1,0\nno page here\n\"Unclosed,2,0\nAlso good,3,1\n";
        let import = decode(input, &mut ids());

        // The unclosed quote swallows the rest of the input into one bad record
        assert_eq!(shape(&import.tree.roots), vec![("Good".to_string(), 1, 0)]);
        assert_eq!(import.skipped_lines, vec![3, 4]);
    }

    #[test]
    fn test_bad_numbers_are_skipped() {
        let input = "A,1,0\nB,x,0\nC,2,-1\nD,99999999999,0\nE,4,0";
        let import = decode(input, &mut ids());
        let titles: Vec<_> = import.tree.roots.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "E"]);
        assert_eq!(import.skipped_lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_header_is_optional() {
        let import = decode("Only,7,0\n", &mut ids());
        assert_eq!(import.tree.roots.len(), 1);
        assert_eq!(import.tree.roots[0].page, 7);
    }

    #[test]
    fn test_level_jump_nests_under_previous() {
        let import = decode("A,1,0\nB,2,3\nC,3,1\nD,4,0", &mut ids());
        assert_eq!(
            shape(&import.tree.roots),
            vec![
                ("A".to_string(), 1, 0),
                ("B".to_string(), 2, 1),
                ("C".to_string(), 3, 1),
                ("D".to_string(), 4, 0),
            ]
        );
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let import = decode("title,page,level\r\n\r\nA,1,0\r\n  \r\nB,2,1\r\n", &mut ids());
        assert!(import.skipped_lines.is_empty());
        assert_eq!(shape(&import.tree.roots), vec![("A".to_string(), 1, 0), ("B".to_string(), 2, 1)]);
    }

    #[test]
    fn test_titles_are_sanitized_after_unescape() {
        let import = decode("\"Multi\nline \"\"x\"\"\",1,0\nTab\there,2,0", &mut ids());
        let titles: Vec<_> = import.tree.roots.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Multiline \"x\"", "Tabhere"]);
    }

    #[test]
    fn test_ids_are_regenerated() {
        let tree = BookmarkTree::from_roots(vec![BookmarkNode::new("keep-me", "A", 1)]);
        let import = decode(&encode(&tree), &mut ids());
        assert_eq!(import.tree.roots[0].id, "bm-1");
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let tree = BookmarkTree::from_roots(vec![
            BookmarkNode::new("a", "Part I", 1)
                .with_child(
                    BookmarkNode::new("b", "Chapter, the first", 2)
                        .with_child(BookmarkNode::new("c", "\"Quoted\"", 3)),
                )
                .with_child(BookmarkNode::new("d", "Chapter 2", 9)),
            BookmarkNode::new("e", "Index", 40),
        ]);

        let import = decode(&encode(&tree), &mut ids());
        assert_eq!(shape(&import.tree.roots), shape(&tree.roots));
    }
}
