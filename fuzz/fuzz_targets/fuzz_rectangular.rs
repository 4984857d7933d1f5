//! Fuzz target for rectangular edits.
//!
//! Tabs, control characters and ragged lines all feed the column engine; none
//! of them may panic it.

#![no_main]

use arbitrary::Arbitrary;
use gaptext::{BufferOptions, TextBuffer, UndoTracker};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    block: String,
    tab_distance: u8,
    use_tabs: bool,
    rect_start: u8,
    rect_end: u8,
    op: u8,
}

fuzz_target!(|input: Input| {
    let mut buf = TextBuffer::with_options(BufferOptions {
        tab_distance: input.tab_distance.into(),
        use_tabs: input.use_tabs,
        ..BufferOptions::default()
    })
    .with_undo_tracker(UndoTracker::new());
    buf.insert(0, &input.text);

    let (rs, re) = (usize::from(input.rect_start), usize::from(input.rect_end));
    let (lo, hi) = (rs.min(re), rs.max(re));
    let end = buf.len();

    match input.op % 5 {
        0 => {
            buf.insert_column(rs, 0, &input.block);
        }
        1 => {
            buf.overlay_rectangular(0, lo, Some(hi), &input.block);
        }
        2 => buf.replace_rectangular(0, end, lo, hi, &input.block),
        3 => buf.remove_rectangular(0, end, lo, hi),
        _ => buf.clear_rectangular(0, end, lo, hi),
    }

    assert!(buf.storage().check_invariant());
    let _ = buf.text_in_rectangle(0, buf.len(), lo, hi);
    let _ = buf.undo();
});
