//! Selections following edits made through the buffer.

use gaptext::{Selection, SelectionRole, TextBuffer, UndoTracker};

fn digits() -> TextBuffer {
    TextBuffer::from_text("0123456789").with_undo_tracker(UndoTracker::new())
}

fn bounds(buf: &TextBuffer) -> Option<(usize, usize)> {
    buf.selection_position().map(|sel| (sel.start, sel.end))
}

// ============================================================================
// The five update cases
// ============================================================================

#[test]
fn insert_before_selection_shifts_it() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.insert(0, "XY");
    assert_eq!(bounds(&buf), Some((4, 7)));
    assert_eq!(buf.selection_text(), "234");
}

#[test]
fn remove_inside_selection_shrinks_it() {
    let mut buf = digits();
    buf.select(2, 8);
    buf.remove(4, 6);
    assert_eq!(bounds(&buf), Some((2, 6)));
    assert_eq!(buf.selection_text(), "2367");
}

#[test]
fn edit_after_selection_leaves_it_alone() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.remove(7, 9);
    buf.insert(6, "zz");
    assert_eq!(bounds(&buf), Some((2, 5)));
}

#[test]
fn insert_at_selection_end_does_not_extend_it() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.insert(5, "ab");
    assert_eq!(bounds(&buf), Some((2, 5)));
}

#[test]
fn insert_at_selection_start_shifts_it() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.insert(2, "ab");
    assert_eq!(bounds(&buf), Some((4, 7)));
}

#[test]
fn insert_inside_selection_grows_it() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.insert(3, "ab");
    assert_eq!(bounds(&buf), Some((2, 7)));
    assert_eq!(buf.selection_text(), "2ab34");
}

#[test]
fn remove_covering_selection_deselects() {
    let mut buf = digits();
    buf.select(3, 5);
    buf.remove(2, 6);
    assert_eq!(bounds(&buf), None);
    assert_eq!(buf.selection_text(), "");
    assert_eq!(buf.selection(SelectionRole::Primary).start(), 2);
}

#[test]
fn remove_overlapping_front_snaps_start() {
    let mut buf = digits();
    buf.select(4, 8);
    buf.remove(2, 6);
    assert_eq!(bounds(&buf), Some((2, 4)));
    assert_eq!(buf.selection_text(), "67");
}

#[test]
fn remove_running_past_selection_end_deselects() {
    let mut buf = digits();
    buf.select(2, 5);
    buf.remove(3, 9);
    assert_eq!(buf.text(), "0129");
    assert_eq!(bounds(&buf), None);
    assert_eq!(buf.selection(SelectionRole::Primary).end(), 2);
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn all_three_roles_track_the_same_edit() {
    let mut buf = digits();
    buf.select(1, 3);
    buf.secondary_select(4, 6);
    buf.highlight(7, 9);

    buf.insert(0, "__");

    for role in SelectionRole::ALL {
        assert!(buf.selection(role).selected());
    }
    assert_eq!(buf.selection_text(), "12");
    assert_eq!(buf.secondary_selection_text(), "45");
    assert_eq!(buf.highlight_text(), "78");
}

#[test]
fn replace_secondary_leaves_primary_tracking() {
    let mut buf = digits();
    buf.select(6, 9);
    buf.secondary_select(0, 2);
    buf.replace_secondary_selection("abcd");

    assert_eq!(buf.text(), "abcd23456789");
    assert!(buf.secondary_selection_position().is_none());
    assert_eq!(bounds(&buf), Some((8, 11)));
    assert_eq!(buf.selection_text(), "678");
}

#[test]
fn inverted_select_is_normalized() {
    let mut buf = digits();
    buf.select(7, 3);
    assert_eq!(bounds(&buf), Some((3, 7)));
}

#[test]
fn empty_select_is_a_tracked_caret() {
    let mut buf = digits();
    buf.select(4, 4);
    assert_eq!(bounds(&buf), None);
    assert!(buf.selection(SelectionRole::Primary).zero_width());

    buf.insert(0, "ab");
    assert_eq!(buf.selection(SelectionRole::Primary).start(), 6);
}

#[test]
fn set_text_drops_every_selection() {
    let mut buf = digits();
    buf.select(0, 2);
    buf.secondary_select(2, 4);
    buf.highlight(4, 6);
    buf.set_text("fresh");
    for role in SelectionRole::ALL {
        assert!(buf.selection_position_of(role).is_none());
    }
}

// ============================================================================
// Rectangular selections
// ============================================================================

#[test]
fn rectangular_selection_reports_columns() {
    let mut buf = TextBuffer::from_text("abcdef\nghijkl\nmnopqr");
    buf.select_rectangular(0, 13, 1, 4);
    let sel = buf.selection_position().expect("selected");
    assert_eq!((sel.start, sel.end, sel.rect), (0, 13, Some((1, 4))));
    assert_eq!(buf.selection_text(), "bcd\nhij");
}

#[test]
fn rectangular_selection_with_empty_columns_is_not_selected() {
    let mut buf = TextBuffer::from_text("abcdef\nghijkl");
    buf.select_rectangular(0, 13, 3, 3);
    assert!(buf.selection_position().is_none());
}

#[test]
fn remove_rectangular_selection() {
    let mut buf = TextBuffer::from_text("abcdef\nghijkl").with_undo_tracker(UndoTracker::new());
    buf.set_use_tabs(false);
    buf.select_rectangular(0, 13, 2, 4);
    buf.remove_selection();
    assert_eq!(buf.text(), "abef\nghkl");
}

#[test]
fn includes_uses_columns_for_rectangles() {
    let mut sel = Selection::new();
    sel.set_rectangular(0, 20, 2, 5);
    assert!(sel.includes(9, 7, 3));
    assert!(!sel.includes(8, 7, 1));
    assert!(!sel.includes(12, 7, 5));
    assert!(!sel.includes(25, 21, 3));

    let mut linear = Selection::new();
    linear.set(2, 5);
    assert!(linear.includes(2, 0, 99));
    assert!(!linear.includes(5, 0, 0));
}
