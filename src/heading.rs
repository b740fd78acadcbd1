//! Heading recognition and tree construction for outline documents.
//!
//! A document is plain text in which some lines are headings: 1 to 6 marker
//! characters, at least one whitespace character, then non-empty title text.
//! Everything else is body text and produces no node. The tree is derived
//! from the buffer on every change and never stored independently of it.

/// Marker character that introduces a heading line.
pub const MARKER: char = '#';

/// Deepest heading level a document can express.
pub const MAX_LEVEL: usize = 6;

/// Reserved identifier of the synthetic document root.
pub const ROOT_ID: &str = "root";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One heading line together with everything nested beneath it.
pub struct HeadingNode {
    /// Identifier derived from the originating line index, stable for one
    /// parse only. The synthetic root uses [`ROOT_ID`].
    pub id: String,
    /// Heading title with the marker prefix stripped and edges trimmed.
    pub text: String,
    /// Nesting depth, equal to the marker count (1 to 6). The root is 0.
    pub level: usize,
    /// Zero-based line index of the heading in the buffer. The root carries
    /// 0 as a sentinel and never corresponds to a real line.
    pub line: usize,
    /// Child headings in document order, exclusively owned by this node.
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    #[must_use]
    /// Creates the synthetic root that anchors every parsed tree.
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            text: String::new(),
            level: 0,
            line: 0,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Whether this node is the synthetic document root.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }
}

#[must_use]
/// Identifier for the heading found at a given line index.
pub fn node_id(line: usize) -> String {
    format!("heading-{line}")
}

#[must_use]
/// Heading depth of a line, or `None` if the line is body text.
///
/// A line qualifies only with 1 to 6 markers, then at least one whitespace
/// character, then non-empty text. Seven or more markers, a missing
/// separator, or an empty title all disqualify the line.
pub fn heading_level(line: &str) -> Option<usize> {
    let level = line.chars().take_while(|c| *c == MARKER).count();
    if level == 0 || level > MAX_LEVEL {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) || rest.trim().is_empty() {
        return None;
    }
    Some(level)
}

#[must_use]
/// Renders a heading line for a given depth and title.
pub fn heading_line(level: usize, text: &str) -> String {
    let markers = MARKER.to_string().repeat(level);
    format!("{markers} {text}")
}

#[must_use]
/// Parses a buffer into its heading tree.
///
/// Single left-to-right scan maintaining the rightmost spine as an ancestor
/// stack: each heading pops the stack while the top is at its level or
/// deeper (equal levels are siblings, not nested), then attaches as the last
/// child of the new top. Non-heading lines are skipped. Never fails; a
/// buffer without headings yields a bare root.
pub fn parse(buffer: &str) -> HeadingNode {
    let mut stack = vec![HeadingNode::root()];

    for (index, line) in buffer.lines().enumerate() {
        let Some(level) = heading_level(line) else {
            continue;
        };
        let node = HeadingNode {
            id: node_id(index),
            text: line[level..].trim().to_string(),
            level,
            line: index,
            children: Vec::new(),
        };
        while stack.last().is_some_and(|top| top.level >= level) {
            attach_top(&mut stack);
        }
        stack.push(node);
    }

    while stack.len() > 1 {
        attach_top(&mut stack);
    }
    stack.pop().unwrap_or_else(HeadingNode::root)
}

/// Pop the top of the spine and attach it to its parent below.
fn attach_top(stack: &mut Vec<HeadingNode>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(done);
        }
    }
}

#[cfg(test)]
#[path = "tests/heading.rs"]
mod tests;
