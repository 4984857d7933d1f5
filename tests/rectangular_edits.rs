//! Column-block editing through the buffer, with and without tabs.

use gaptext::{BufferOptions, TextBuffer, UndoTracker};

fn buffer(text: &str, tab_distance: usize, use_tabs: bool) -> TextBuffer {
    let mut buf = TextBuffer::with_options(BufferOptions {
        tab_distance,
        use_tabs,
        ..BufferOptions::default()
    })
    .with_undo_tracker(UndoTracker::new());
    buf.insert(0, text);
    buf
}

// ============================================================================
// Plain text
// ============================================================================

#[test]
fn insert_column_into_every_line() {
    let mut buf = buffer("abc\ndef\nghi", 8, false);
    buf.insert_column(1, 0, "1\n2\n3");
    assert_eq!(buf.text(), "a1bc\nd2ef\ng3hi");
}

#[test]
fn insert_column_pads_short_lines() {
    let mut buf = buffer("abcdef\nx", 8, false);
    buf.insert_column(4, 0, "|\n|");
    assert_eq!(buf.text(), "abcd|ef\nx   |");
}

#[test]
fn overlay_keeps_text_right_of_rectangle_in_place() {
    let mut buf = buffer("abcdef\nghijkl", 8, false);
    buf.overlay_rectangular(0, 2, Some(4), "X\nY");
    assert_eq!(buf.text(), "abX ef\nghY kl");
}

#[test]
fn clear_then_text_in_rectangle_is_blank() {
    let mut buf = buffer("abcdef\nghijkl\nmnopqr", 8, false);
    buf.clear_rectangular(0, 13, 1, 3);
    assert_eq!(buf.text(), "a  def\ng  jkl\nmnopqr");
    assert_eq!(buf.text_in_rectangle(0, 13, 1, 3), "  \n  ");
}

#[test]
fn replace_rectangular_through_selection() {
    let mut buf = buffer("abcdef\nghijkl", 8, false);
    buf.select_rectangular(0, 13, 2, 4);
    buf.replace_selection("12\n34");
    assert_eq!(buf.text(), "ab12ef\ngh34kl");
    assert!(buf.selection_position().is_none());
}

// ============================================================================
// Tabs
// ============================================================================

#[test]
fn remove_rectangle_from_under_a_tab() {
    // The tab spans columns 0..8; x keeps its distance from the left edge.
    let mut buf = buffer("\tx", 8, true);
    buf.remove_rectangular(0, 2, 2, 4);
    assert_eq!(buf.text(), "      x");
}

#[test]
fn insert_column_splits_a_tab() {
    let mut buf = buffer("\tx", 8, true);
    buf.insert_column(4, 0, "AB");
    assert_eq!(buf.text(), "    AB\t  x");
    assert_eq!(buf.count_displayed_characters(0, buf.len()), 11);
}

#[test]
fn text_in_rectangle_expands_tab_crossing_left_edge() {
    let buf = buffer("a\tbc\nxyz", 8, true);
    assert_eq!(buf.text_in_rectangle(0, 3, 4, 10), "    bc");
}

#[test]
fn rectangular_boundaries_on_plain_line() {
    let buf = buffer("abcdef", 8, true);
    assert_eq!(buf.rectangular_selection_boundaries(0, 2, 4), (2, 4));
    assert_eq!(buf.rectangular_selection_boundaries(0, 4, 99), (4, 6));
    assert_eq!(buf.rectangular_selection_boundaries(0, 10, 12), (6, 6));
}

// ============================================================================
// Undo and hints
// ============================================================================

#[test]
fn rectangular_overlay_is_one_undo_step() {
    let mut buf = buffer("abcdef\nghijkl", 8, false);
    buf.overlay_rectangular(0, 1, None, "XY\nZW");
    assert_eq!(buf.text(), "aXYdef\ngZWjkl");
    assert!(buf.undo());
    assert_eq!(buf.text(), "abcdef\nghijkl");
}

#[test]
fn cursor_hint_follows_last_rewritten_line() {
    let mut buf = buffer("abcdef\nghijkl", 8, false);
    buf.insert_column(2, 0, "--\n--");
    assert_eq!(buf.text(), "ab--cdef\ngh--ijkl");
    assert_eq!(buf.cursor_pos_hint(), 13);
}
