//! Menu and dialog state for structural edits.
//!
//! The controller owns the pop-up layer above the graph: a context menu
//! anchored where the user clicked, and the input or confirmation dialog a
//! menu choice opens. It never mutates the buffer itself; confirming a
//! dialog yields an [`Effect`] describing the edit for the caller to apply.

use ratatui::layout::{Position, Rect};

use crate::heading::{self, HeadingNode};
use crate::navigate;

/// On-screen width of the context menu, borders included.
const MENU_WIDTH: u16 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One selectable row of the context menu.
pub enum MenuEntry {
    /// Insert a new heading under the anchored node.
    AddChild,
    /// Delete the anchored node and its whole subtree.
    DeleteSubtree,
    /// Insert a new top-level heading at the end of the document.
    AddTopic,
}

impl MenuEntry {
    #[must_use]
    /// Row label shown in the menu.
    pub fn label(self) -> &'static str {
        match self {
            Self::AddChild => "Add child heading",
            Self::DeleteSubtree => "Delete subtree",
            Self::AddTopic => "Add topic",
        }
    }
}

#[derive(Clone, Debug)]
/// Context menu anchored at the cell where the click landed.
pub struct ContextMenu {
    /// Anchor column in screen cells.
    pub column: u16,
    /// Anchor row in screen cells.
    pub row: u16,
    /// Node the menu acts on, or `None` for the background menu.
    pub target: Option<String>,
    /// Rows on offer, in display order.
    pub entries: Vec<MenuEntry>,
    /// Highlighted row.
    pub cursor: usize,
}

impl ContextMenu {
    #[must_use]
    /// Screen rectangle the menu occupies, clamped inside `frame`.
    ///
    /// Rendering and click hit-testing both go through here so they can
    /// never disagree about where the menu is.
    pub fn area(&self, frame: Rect) -> Rect {
        let width = MENU_WIDTH.min(frame.width);
        let height = u16::try_from(self.entries.len())
            .unwrap_or(0)
            .saturating_add(2)
            .min(frame.height);
        let max_x = frame.x + frame.width - width;
        let max_y = frame.y + frame.height - height;
        Rect::new(self.column.min(max_x), self.row.min(max_y), width, height)
    }

    #[must_use]
    /// Menu row under a screen cell, if the cell lands on one.
    pub fn hit_entry(&self, frame: Rect, column: u16, row: u16) -> Option<usize> {
        let area = self.area(frame);
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        if row <= area.y || row >= area.y + area.height - 1 {
            return None;
        }
        if column <= area.x || column >= area.x + area.width - 1 {
            return None;
        }
        let index = usize::from(row - area.y - 1);
        (index < self.entries.len()).then_some(index)
    }
}

#[derive(Clone, Debug)]
/// Modal dialog opened from the menu or a keyboard shortcut.
pub enum Dialog {
    /// Free-text prompt for a new heading title.
    Input {
        /// Prompt shown above the input line.
        title: String,
        /// Node the new heading attaches to.
        parent_id: String,
        /// Text typed so far.
        buffer: String,
        /// Caret position as a character offset into `buffer`.
        cursor: usize,
    },
    /// Yes-or-no check before a destructive edit.
    Confirm {
        /// Question shown to the user.
        question: String,
        /// Node the deletion targets.
        node_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of a confirmed dialog, applied by the caller.
pub enum Effect {
    /// Nothing to do; the dialog was cancelled or empty.
    None,
    /// Scroll the source view to a buffer line.
    Navigate(usize),
    /// Insert a new heading under a parent.
    Insert {
        /// Identifier of the parent node.
        parent_id: String,
        /// Title of the new heading.
        text: String,
    },
    /// Delete a heading and its subtree.
    Delete {
        /// Identifier of the doomed node.
        node_id: String,
    },
}

#[derive(Debug, Default)]
/// Pop-up state for the graph pane.
///
/// Both machines are deliberately small:
///
/// ```text
/// menu:   closed -> open(anchor, target?) -> closed
/// dialog: closed -> pending -> confirmed | cancelled -> closed
/// ```
///
/// The menu closes on selection, escape, or any click outside its area.
/// At most one dialog exists at a time and it is modal; while it is open
/// the menu is already gone.
pub struct Controller {
    /// Open context menu, if any.
    pub menu: Option<ContextMenu>,
    /// Open dialog, if any.
    pub dialog: Option<Dialog>,
}

impl Controller {
    /// Opens the node menu anchored at a screen cell.
    ///
    /// The root offers only insertion; every other node also offers
    /// deletion.
    pub fn open_node_menu(&mut self, column: u16, row: u16, node: &HeadingNode) {
        let entries = if node.is_root() {
            vec![MenuEntry::AddChild]
        } else {
            vec![MenuEntry::AddChild, MenuEntry::DeleteSubtree]
        };
        self.menu = Some(ContextMenu {
            column,
            row,
            target: Some(node.id.clone()),
            entries,
            cursor: 0,
        });
    }

    /// Opens the background menu anchored at a screen cell.
    pub fn open_background_menu(&mut self, column: u16, row: u16) {
        self.menu = Some(ContextMenu {
            column,
            row,
            target: None,
            entries: vec![MenuEntry::AddTopic],
            cursor: 0,
        });
    }

    /// Closes the menu without acting.
    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Moves the menu highlight down, wrapping.
    pub fn menu_next(&mut self) {
        if let Some(menu) = &mut self.menu {
            if !menu.entries.is_empty() {
                menu.cursor = (menu.cursor + 1) % menu.entries.len();
            }
        }
    }

    /// Moves the menu highlight up, wrapping.
    pub fn menu_prev(&mut self) {
        if let Some(menu) = &mut self.menu {
            let len = menu.entries.len();
            if len > 0 {
                menu.cursor = (menu.cursor + len - 1) % len;
            }
        }
    }

    /// Fires the highlighted menu entry, replacing the menu with the dialog
    /// it calls for. A menu whose target no longer resolves closes without
    /// opening anything.
    pub fn activate(&mut self, tree: &HeadingNode) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        match menu.entries.get(menu.cursor) {
            Some(MenuEntry::AddTopic) => self.open_add_dialog(tree, heading::ROOT_ID),
            Some(MenuEntry::AddChild) => {
                if let Some(id) = menu.target {
                    self.open_add_dialog(tree, &id);
                }
            }
            Some(MenuEntry::DeleteSubtree) => {
                if let Some(id) = menu.target {
                    self.open_delete_dialog(tree, &id);
                }
            }
            None => {}
        }
    }

    /// Opens the title prompt for a new heading under `parent_id`. Does
    /// nothing if the parent cannot be resolved.
    pub fn open_add_dialog(&mut self, tree: &HeadingNode, parent_id: &str) {
        let Some(parent) = navigate::find_by_id(tree, parent_id) else {
            return;
        };
        let title = if parent.is_root() {
            "New topic".to_string()
        } else {
            format!("New heading under \"{}\"", parent.text)
        };
        self.dialog = Some(Dialog::Input {
            title,
            parent_id: parent.id.clone(),
            buffer: String::new(),
            cursor: 0,
        });
    }

    /// Opens the deletion check for a node. The root and unresolvable
    /// identifiers are refused silently.
    pub fn open_delete_dialog(&mut self, tree: &HeadingNode, node_id: &str) {
        let Some(node) = navigate::find_by_id(tree, node_id) else {
            return;
        };
        if node.is_root() {
            return;
        }
        let nested = navigate::descendant_count(node);
        let question = if nested == 0 {
            format!("Delete \"{}\"?", node.text)
        } else if nested == 1 {
            format!("Delete \"{}\" and 1 nested heading?", node.text)
        } else {
            format!("Delete \"{}\" and {nested} nested headings?", node.text)
        };
        self.dialog = Some(Dialog::Confirm {
            question,
            node_id: node.id.clone(),
        });
    }

    /// Inserts a character at the input caret.
    pub fn dialog_char(&mut self, c: char) {
        if let Some(Dialog::Input { buffer, cursor, .. }) = &mut self.dialog {
            let at = byte_index(buffer, *cursor);
            buffer.insert(at, c);
            *cursor += 1;
        }
    }

    /// Deletes the character before the input caret.
    pub fn dialog_backspace(&mut self) {
        if let Some(Dialog::Input { buffer, cursor, .. }) = &mut self.dialog {
            if *cursor > 0 {
                let at = byte_index(buffer, *cursor - 1);
                buffer.remove(at);
                *cursor -= 1;
            }
        }
    }

    /// Moves the input caret one character left.
    pub fn dialog_cursor_left(&mut self) {
        if let Some(Dialog::Input { cursor, .. }) = &mut self.dialog {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Moves the input caret one character right.
    pub fn dialog_cursor_right(&mut self) {
        if let Some(Dialog::Input { buffer, cursor, .. }) = &mut self.dialog {
            *cursor = (*cursor + 1).min(buffer.chars().count());
        }
    }

    /// Confirms the open dialog and returns the edit it stands for.
    ///
    /// An input whose trimmed text is empty cancels instead of inserting.
    pub fn confirm(&mut self) -> Effect {
        match self.dialog.take() {
            Some(Dialog::Input {
                parent_id, buffer, ..
            }) => {
                let text = buffer.trim();
                if text.is_empty() {
                    Effect::None
                } else {
                    Effect::Insert {
                        parent_id,
                        text: text.to_string(),
                    }
                }
            }
            Some(Dialog::Confirm { node_id, .. }) => Effect::Delete { node_id },
            None => Effect::None,
        }
    }

    /// Dismisses whatever pop-up is open without acting.
    pub fn cancel(&mut self) {
        self.dialog = None;
        self.menu = None;
    }
}

#[must_use]
/// Buffer line a graph click should navigate to.
///
/// Node identifiers go stale the moment the buffer changes, so clicks
/// resolve by level and title against the current tree instead; duplicates
/// land on the first occurrence in document order.
pub fn navigate_target(tree: &HeadingNode, level: usize, text: &str) -> Option<usize> {
    navigate::find_by_level_and_text(tree, level, text).map(|node| node.line)
}

/// Byte offset of a character position within `text`.
fn byte_index(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map_or(text.len(), |(index, _)| index)
}

#[cfg(test)]
#[path = "tests/controller.rs"]
mod tests;
