use super::{heading_level, heading_line, node_id, parse, HeadingNode, MAX_LEVEL, ROOT_ID};

#[test]
fn test_heading_recognition() {
    assert_eq!(heading_level("# A"), Some(1));
    assert_eq!(heading_level("## Two words"), Some(2));
    assert_eq!(heading_level("###### deep"), Some(MAX_LEVEL));
    assert_eq!(heading_level("##\ttab separated"), Some(2));

    // Seven or more markers is body text, not a deeper heading
    assert_eq!(heading_level("####### too deep"), None);
    // Marker run must be followed by whitespace
    assert_eq!(heading_level("#nospace"), None);
    // A separator with nothing after it names nothing
    assert_eq!(heading_level("#"), None);
    assert_eq!(heading_level("##   "), None);
    // Markers must start the line
    assert_eq!(heading_level(" # indented"), None);
    assert_eq!(heading_level("plain text"), None);
    assert_eq!(heading_level(""), None);
}

#[test]
fn test_parse_builds_hierarchy() {
    let tree = parse("# A\n## B\n### C\n## D\n# E");

    assert_eq!(tree.children.len(), 2, "root should hold A and E");
    let a = &tree.children[0];
    assert_eq!(a.text, "A");
    assert_eq!(a.level, 1);
    assert_eq!(a.line, 0);
    assert_eq!(a.children.len(), 2, "A should hold B and D");
    assert_eq!(a.children[0].text, "B");
    assert_eq!(a.children[0].children[0].text, "C");
    assert_eq!(a.children[1].text, "D");
    assert_eq!(tree.children[1].text, "E");
}

#[test]
fn test_equal_levels_are_siblings() {
    let tree = parse("# A\n## B\n## C\n# D");

    assert_eq!(tree.children.len(), 2);
    let a = &tree.children[0];
    assert_eq!(a.children.len(), 2, "B and C sit side by side under A");
    assert_eq!(a.children[0].text, "B");
    assert_eq!(a.children[1].text, "C");
    assert!(tree.children[1].children.is_empty());
}

#[test]
fn test_level_jumps_nest_under_nearest_shallower() {
    let tree = parse("# A\n### C");
    assert_eq!(tree.children[0].children[0].text, "C");
    assert_eq!(tree.children[0].children[0].level, 3);

    // A document may open deeper than level 1; the root adopts it
    let tree = parse("### C\n# A");
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[0].text, "C");
    assert_eq!(tree.children[1].text, "A");
}

#[test]
fn test_body_text_produces_no_nodes() {
    let tree = parse("# A\nsome prose\nmore prose\n## B\n- a list item");

    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].children.len(), 1);
    assert_eq!(tree.children[0].children[0].text, "B");
    assert_eq!(tree.children[0].children[0].line, 3);
}

#[test]
fn test_empty_buffer_yields_bare_root() {
    let tree = parse("");
    assert!(tree.is_root());
    assert_eq!(tree.id, ROOT_ID);
    assert_eq!(tree.level, 0);
    assert!(tree.children.is_empty());

    let tree = parse("just prose\nno headings anywhere");
    assert!(tree.children.is_empty());
}

#[test]
fn test_node_ids_follow_line_indices() {
    let tree = parse("# A\nbody\n## B");
    assert_eq!(tree.children[0].id, node_id(0));
    assert_eq!(tree.children[0].children[0].id, "heading-2");
}

#[test]
fn test_parse_is_deterministic() {
    let text = "# A\n## B\nbody\n## C\n# D";
    assert_eq!(parse(text), parse(text));
}

#[test]
fn test_heading_line_renders_marker_prefix() {
    assert_eq!(heading_line(1, "Topic"), "# Topic");
    assert_eq!(heading_line(3, "New"), "### New");
    assert_eq!(heading_line(MAX_LEVEL, "x"), "###### x");
}

#[test]
fn test_root_constructor() {
    let root = HeadingNode::root();
    assert!(root.is_root());
    assert!(root.text.is_empty());
    assert_eq!(root.level, 0);
}

#[test]
fn test_reserializing_headings_reproduces_the_buffer() {
    let text = "# A\n## B\n### C\n## D\n# E\n###### F";
    let tree = parse(text);

    let mut lines = Vec::new();
    collect_heading_lines(&tree, &mut lines);
    assert_eq!(lines.join("\n"), text);
}

fn collect_heading_lines(node: &HeadingNode, lines: &mut Vec<String>) {
    if !node.is_root() {
        lines.push(heading_line(node.level, &node.text));
    }
    for child in &node.children {
        collect_heading_lines(child, lines);
    }
}
