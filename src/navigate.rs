//! Lookups over a parsed heading tree.
//!
//! Identifiers are only stable for the parse that produced them, so callers
//! that survive a rebuild re-resolve nodes by level and title instead. All
//! searches are depth-first in document order and return the first match.

use crate::heading::{self, HeadingNode};

#[must_use]
/// Finds the node carrying `id`, including the root itself.
pub fn find_by_id<'a>(tree: &'a HeadingNode, id: &str) -> Option<&'a HeadingNode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_by_id(child, id))
}

#[must_use]
/// First node in document order with the given level and title.
///
/// This is the cross-rebuild resolution rule: duplicates are legal in a
/// document, and an ambiguous pair resolves to the earlier occurrence.
pub fn find_by_level_and_text<'a>(
    tree: &'a HeadingNode,
    level: usize,
    text: &str,
) -> Option<&'a HeadingNode> {
    if tree.level == level && tree.text == text {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_by_level_and_text(child, level, text))
}

#[must_use]
/// Number of headings strictly beneath a node.
pub fn descendant_count(node: &HeadingNode) -> usize {
    node.children
        .iter()
        .map(|child| 1 + descendant_count(child))
        .sum()
}

#[must_use]
/// Half-open line range `[start, end)` covering a node's heading line and
/// every line beneath it, body text included.
///
/// The range ends at the next heading whose level does not exceed the
/// node's own, or at the end of the buffer. For the root this is the whole
/// buffer.
pub fn subtree_line_range(buffer: &str, node: &HeadingNode) -> (usize, usize) {
    let total = buffer.lines().count();
    if node.is_root() {
        return (0, total);
    }
    let start = node.line;
    let end = buffer
        .lines()
        .enumerate()
        .skip(start + 1)
        .find_map(|(index, line)| {
            heading::heading_level(line)
                .filter(|level| *level <= node.level)
                .map(|_| index)
        })
        .unwrap_or(total);
    (start, end)
}

#[cfg(test)]
#[path = "tests/navigate.rs"]
mod tests;
