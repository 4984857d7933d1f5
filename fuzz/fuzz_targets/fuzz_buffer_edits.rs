//! Fuzz target for linear edits, selections and undo.
//!
//! Runs an arbitrary edit script against a buffer and checks the storage
//! invariant and selection bounds after every step.

#![no_main]

use arbitrary::Arbitrary;
use gaptext::{TextBuffer, UndoTracker};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { pos: u16, bytes: Vec<u8> },
    Remove { start: u16, end: u16 },
    Replace { start: u16, end: u16, text: String },
    Select { start: u16, end: u16 },
    Undo,
    SetTabDistance(u8),
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buf = TextBuffer::new().with_undo_tracker(UndoTracker::new());

    for op in ops.into_iter().take(256) {
        match op {
            Op::Insert { pos, bytes } => buf.insert_bytes(pos.into(), &bytes),
            Op::Remove { start, end } => buf.remove(start.into(), end.into()),
            Op::Replace { start, end, text } => buf.replace(start.into(), end.into(), &text),
            Op::Select { start, end } => {
                let len = buf.len();
                buf.select(usize::from(start).min(len), usize::from(end).min(len));
            }
            Op::Undo => {
                let _ = buf.undo();
            }
            Op::SetTabDistance(n) => buf.set_tab_distance(n.into()),
        }

        assert!(buf.storage().check_invariant());
        if let Some(sel) = buf.selection_position() {
            assert!(sel.start < sel.end && sel.end <= buf.len());
        }
    }

    // Queries must tolerate whatever bytes ended up in the buffer
    let len = buf.len();
    let _ = buf.text();
    let _ = buf.line_text(len / 2);
    let _ = buf.count_displayed_characters(0, len);
    let _ = buf.search_forward(0, "ab", false);
});
