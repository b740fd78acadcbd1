use super::{descendant_count, find_by_id, find_by_level_and_text, subtree_line_range};
use crate::heading::{parse, HeadingNode, ROOT_ID};

const DOC: &str = "# A\n## B\n## C\n# D";

#[test]
fn test_find_by_id_walks_depth_first() {
    let tree = parse(DOC);

    assert_eq!(find_by_id(&tree, ROOT_ID).unwrap().id, ROOT_ID);
    assert_eq!(find_by_id(&tree, "heading-1").unwrap().text, "B");
    assert_eq!(find_by_id(&tree, "heading-3").unwrap().text, "D");
    assert!(find_by_id(&tree, "heading-99").is_none());
}

#[test]
fn test_find_by_level_and_text_prefers_document_order() {
    // "Notes" appears under both topics; the earlier match wins
    let tree = parse("# One\n## Notes\n# Two\n## Notes");

    let found = find_by_level_and_text(&tree, 2, "Notes").unwrap();
    assert_eq!(found.line, 1);

    assert!(find_by_level_and_text(&tree, 3, "Notes").is_none());
    assert!(find_by_level_and_text(&tree, 2, "Missing").is_none());
}

#[test]
fn test_find_by_level_and_text_resolves_root() {
    let tree = parse(DOC);
    let found = find_by_level_and_text(&tree, 0, "").unwrap();
    assert!(found.is_root());
}

#[test]
fn test_descendant_count() {
    let tree = parse(DOC);

    assert_eq!(descendant_count(&tree), 4);
    assert_eq!(descendant_count(find_by_id(&tree, "heading-0").unwrap()), 2);
    assert_eq!(descendant_count(find_by_id(&tree, "heading-1").unwrap()), 0);
}

#[test]
fn test_subtree_range_ends_at_same_level_heading() {
    let tree = parse(DOC);

    let a = find_by_id(&tree, "heading-0").unwrap();
    assert_eq!(subtree_line_range(DOC, a), (0, 3), "A spans B and C");

    let b = find_by_id(&tree, "heading-1").unwrap();
    assert_eq!(subtree_line_range(DOC, b), (1, 2), "C is B's sibling");

    let c = find_by_id(&tree, "heading-2").unwrap();
    assert_eq!(subtree_line_range(DOC, c), (2, 3));
}

#[test]
fn test_subtree_range_extends_to_end_of_buffer() {
    let tree = parse(DOC);
    let d = find_by_id(&tree, "heading-3").unwrap();
    assert_eq!(subtree_line_range(DOC, d), (3, 4));
}

#[test]
fn test_subtree_range_includes_body_lines() {
    let text = "# A\nprose\nmore prose\n# B\ntail";
    let tree = parse(text);

    let a = find_by_id(&tree, "heading-0").unwrap();
    assert_eq!(subtree_line_range(text, a), (0, 3));

    let b = find_by_id(&tree, "heading-3").unwrap();
    assert_eq!(subtree_line_range(text, b), (3, 5));
}

#[test]
fn test_shallower_heading_ends_range() {
    let text = "## B\nbody\n# A";
    let tree = parse(text);
    let b = find_by_level_and_text(&tree, 2, "B").unwrap();
    assert_eq!(subtree_line_range(text, b), (0, 2));
}

#[test]
fn test_root_range_covers_whole_buffer() {
    let tree = parse(DOC);
    assert_eq!(subtree_line_range(DOC, &tree), (0, 4));

    let bodies = "prose only\nno headings";
    let tree = parse(bodies);
    assert_eq!(subtree_line_range(bodies, &tree), (0, 2));

    let empty = parse("");
    assert_eq!(subtree_line_range("", &empty), (0, 0));
}

#[test]
fn test_containment_holds_for_every_node() {
    let text = "# A\n## B\n### C\nbody\n## D\n# E\n## F";
    let tree = parse(text);
    assert_containment(text, &tree);
}

fn assert_containment(buffer: &str, node: &HeadingNode) {
    let (start, end) = subtree_line_range(buffer, node);
    let mut floor = if node.is_root() { start } else { start + 1 };
    for child in &node.children {
        let (child_start, child_end) = subtree_line_range(buffer, child);
        assert!(
            child_start >= floor,
            "{} must not reach into an earlier sibling",
            child.text
        );
        assert!(
            child_end <= end,
            "{} must stay inside its parent's range",
            child.text
        );
        floor = child_end;
        assert_containment(buffer, child);
    }
}
