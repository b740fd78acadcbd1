//! Structural edits expressed as whole-buffer rewrites.
//!
//! Every operation takes the current buffer plus the tree parsed from it and
//! returns the full replacement text. Splicing the line array and rejoining
//! keeps exactly one separator between lines, so repeated edits never
//! accumulate blank padding. Unresolvable targets leave the buffer
//! untouched; the caller detects no-ops by comparison and reparses after
//! any real change.

use crate::heading::{self, HeadingNode};
use crate::navigate;

#[must_use]
/// Appends a new heading as the last child of `parent_id`.
///
/// The child is written at the parent's subtree end so existing descendants
/// keep their order. Its level is the parent's plus one, capped at
/// [`heading::MAX_LEVEL`]. Inserting under the root appends a top-level
/// heading at the end of the buffer. An unknown parent is a no-op.
pub fn insert_child(buffer: &str, tree: &HeadingNode, parent_id: &str, text: &str) -> String {
    let Some(parent) = navigate::find_by_id(tree, parent_id) else {
        return buffer.to_string();
    };
    let level = (parent.level + 1).min(heading::MAX_LEVEL);
    let (_, end) = navigate::subtree_line_range(buffer, parent);

    let mut lines: Vec<&str> = buffer.lines().collect();
    let line = heading::heading_line(level, text);
    lines.insert(end.min(lines.len()), &line);
    rejoin(buffer, &lines)
}

#[must_use]
/// Removes a heading line and everything nested beneath it.
///
/// Deleting the root or an unknown identifier is a no-op; the root can only
/// be emptied by deleting its children individually.
pub fn delete_subtree(buffer: &str, tree: &HeadingNode, node_id: &str) -> String {
    if node_id == heading::ROOT_ID {
        return buffer.to_string();
    }
    let Some(node) = navigate::find_by_id(tree, node_id) else {
        return buffer.to_string();
    };
    let (start, end) = navigate::subtree_line_range(buffer, node);

    let mut lines: Vec<&str> = buffer.lines().collect();
    let end = end.min(lines.len());
    lines.drain(start.min(end)..end);
    rejoin(buffer, &lines)
}

/// Joins lines back into a buffer, preserving the original's trailing
/// newline convention.
fn rejoin(original: &str, lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    if original.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "tests/mutate.rs"]
mod tests;
