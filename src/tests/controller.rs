use super::{navigate_target, Controller, Dialog, Effect, MenuEntry};
use crate::heading::{parse, HeadingNode, ROOT_ID};
use crate::navigate::find_by_id;
use ratatui::layout::Rect;

const DOC: &str = "# A\n## B\n## C\n# D";

fn tree() -> HeadingNode {
    parse(DOC)
}

fn node<'a>(tree: &'a HeadingNode, id: &str) -> &'a HeadingNode {
    find_by_id(tree, id).unwrap()
}

#[test]
fn test_node_menu_offers_delete_except_for_root() {
    let tree = tree();
    let mut controller = Controller::default();

    controller.open_node_menu(5, 5, node(&tree, "heading-0"));
    let menu = controller.menu.as_ref().unwrap();
    assert_eq!(menu.entries, [MenuEntry::AddChild, MenuEntry::DeleteSubtree]);
    assert_eq!(menu.target.as_deref(), Some("heading-0"));

    controller.open_node_menu(5, 5, node(&tree, ROOT_ID));
    let menu = controller.menu.as_ref().unwrap();
    assert_eq!(menu.entries, [MenuEntry::AddChild]);
}

#[test]
fn test_background_menu_adds_topics() {
    let mut controller = Controller::default();
    controller.open_background_menu(2, 2);

    let menu = controller.menu.as_ref().unwrap();
    assert_eq!(menu.entries, [MenuEntry::AddTopic]);
    assert!(menu.target.is_none());
}

#[test]
fn test_menu_cursor_wraps() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(0, 0, node(&tree, "heading-0"));

    controller.menu_next();
    assert_eq!(controller.menu.as_ref().unwrap().cursor, 1);
    controller.menu_next();
    assert_eq!(controller.menu.as_ref().unwrap().cursor, 0);
    controller.menu_prev();
    assert_eq!(controller.menu.as_ref().unwrap().cursor, 1);
}

#[test]
fn test_activate_add_child_opens_input_dialog() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(0, 0, node(&tree, "heading-0"));

    controller.activate(&tree);

    assert!(controller.menu.is_none(), "activation consumes the menu");
    match controller.dialog.as_ref().unwrap() {
        Dialog::Input {
            title, parent_id, ..
        } => {
            assert!(title.contains('A'));
            assert_eq!(parent_id, "heading-0");
        }
        Dialog::Confirm { .. } => panic!("expected an input dialog"),
    }
}

#[test]
fn test_activate_delete_counts_descendants() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(0, 0, node(&tree, "heading-0"));
    controller.menu_next();

    controller.activate(&tree);

    match controller.dialog.as_ref().unwrap() {
        Dialog::Confirm { question, node_id } => {
            assert!(
                question.contains("2 nested headings"),
                "B and C should be counted: {question}"
            );
            assert_eq!(node_id, "heading-0");
        }
        Dialog::Input { .. } => panic!("expected a confirm dialog"),
    }
}

#[test]
fn test_activate_with_stale_target_closes_quietly() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(0, 0, node(&tree, "heading-0"));

    // The document emptied underneath the menu
    controller.activate(&parse(""));

    assert!(controller.menu.is_none());
    assert!(controller.dialog.is_none());
}

#[test]
fn test_confirmed_input_yields_insert_effect() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_add_dialog(&tree, "heading-0");

    for c in "New".chars() {
        controller.dialog_char(c);
    }
    let effect = controller.confirm();

    assert_eq!(
        effect,
        Effect::Insert {
            parent_id: "heading-0".to_string(),
            text: "New".to_string(),
        }
    );
    assert!(controller.dialog.is_none());
}

#[test]
fn test_input_trims_and_empty_cancels() {
    let tree = tree();
    let mut controller = Controller::default();

    controller.open_add_dialog(&tree, ROOT_ID);
    assert_eq!(controller.confirm(), Effect::None);

    controller.open_add_dialog(&tree, ROOT_ID);
    for c in "   ".chars() {
        controller.dialog_char(c);
    }
    assert_eq!(controller.confirm(), Effect::None);

    controller.open_add_dialog(&tree, ROOT_ID);
    for c in "  padded  ".chars() {
        controller.dialog_char(c);
    }
    assert_eq!(
        controller.confirm(),
        Effect::Insert {
            parent_id: ROOT_ID.to_string(),
            text: "padded".to_string(),
        }
    );
}

#[test]
fn test_input_editing_follows_the_caret() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_add_dialog(&tree, ROOT_ID);

    controller.dialog_char('a');
    controller.dialog_char('b');
    controller.dialog_cursor_left();
    controller.dialog_char('c');
    controller.dialog_backspace();
    controller.dialog_char('x');

    assert_eq!(
        controller.confirm(),
        Effect::Insert {
            parent_id: ROOT_ID.to_string(),
            text: "axb".to_string(),
        }
    );
}

#[test]
fn test_cancel_discards_everything() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_add_dialog(&tree, ROOT_ID);
    controller.dialog_char('z');

    controller.cancel();

    assert!(controller.dialog.is_none());
    assert_eq!(controller.confirm(), Effect::None);
}

#[test]
fn test_confirmed_delete_yields_effect() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_delete_dialog(&tree, "heading-2");

    assert_eq!(
        controller.confirm(),
        Effect::Delete {
            node_id: "heading-2".to_string(),
        }
    );
}

#[test]
fn test_delete_dialog_refuses_root_and_unknowns() {
    let tree = tree();
    let mut controller = Controller::default();

    controller.open_delete_dialog(&tree, ROOT_ID);
    assert!(controller.dialog.is_none());

    controller.open_delete_dialog(&tree, "heading-9");
    assert!(controller.dialog.is_none());
}

#[test]
fn test_add_dialog_refuses_unknown_parent() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_add_dialog(&tree, "heading-9");
    assert!(controller.dialog.is_none());
}

#[test]
fn test_menu_area_clamps_inside_frame() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(100, 50, node(&tree, "heading-0"));

    let frame = Rect::new(0, 0, 80, 24);
    let area = controller.menu.as_ref().unwrap().area(frame);

    assert!(area.x + area.width <= 80);
    assert!(area.y + area.height <= 24);
    assert_eq!(area.height, 4, "two entries plus borders");
}

#[test]
fn test_hit_entry_maps_rows_inside_borders() {
    let tree = tree();
    let mut controller = Controller::default();
    controller.open_node_menu(10, 5, node(&tree, "heading-0"));

    let frame = Rect::new(0, 0, 80, 24);
    let menu = controller.menu.as_ref().unwrap();

    assert_eq!(menu.hit_entry(frame, 12, 6), Some(0));
    assert_eq!(menu.hit_entry(frame, 12, 7), Some(1));
    assert_eq!(menu.hit_entry(frame, 12, 5), None, "top border");
    assert_eq!(menu.hit_entry(frame, 12, 8), None, "bottom border");
    assert_eq!(menu.hit_entry(frame, 9, 6), None, "left of the menu");
    assert_eq!(menu.hit_entry(frame, 70, 6), None, "right of the menu");
}

#[test]
fn test_navigate_target_resolves_first_match() {
    let tree = parse("# One\n## Notes\n# Two\n## Notes");

    assert_eq!(navigate_target(&tree, 2, "Notes"), Some(1));
    assert_eq!(navigate_target(&tree, 1, "Two"), Some(2));
    assert_eq!(navigate_target(&tree, 1, "Missing"), None);
    assert_eq!(navigate_target(&tree, 0, ""), Some(0), "root maps to the top");
}
