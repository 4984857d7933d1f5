//! Single-step coalescing undo.
//!
//! An [`UndoTracker`] holds exactly one undo record. Each recorded edit either
//! extends that record (typing forward, or backspacing over text) or replaces it.
//! The record remembers which buffer made it; only that buffer can undo it, so
//! two buffers sharing a tracker discard each other's undo step.
//!
//! Buffers created without an explicit tracker share one per thread, which gives
//! a single-threaded program a single process-wide undo slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a buffer as seen by an undo tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The edit that undoing the current record performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UndoAction {
    /// Put `text` back in place of `[start, end)`.
    Replace {
        start: usize,
        end: usize,
        text: Vec<u8>,
    },
    /// Take out the inserted span `[start, end)`.
    Remove { start: usize, end: usize },
    /// Reinsert deleted `text` at `pos`.
    Insert { pos: usize, text: Vec<u8> },
}

#[derive(Debug, Default)]
struct UndoSlot {
    owner: Option<BufferId>,
    /// Position just past the last insert, or where the last delete happened.
    at: usize,
    /// Bytes deleted by the pending delete.
    cut: usize,
    /// Bytes inserted by the pending insert.
    insert: usize,
    /// Bytes deleted just before the pending insert, at the same spot.
    yank_cut: usize,
    saved: Vec<u8>,
}

impl UndoSlot {
    fn owned_by(&self, owner: BufferId) -> bool {
        self.owner == Some(owner)
    }
}

/// Shared handle to one undo slot. Clones refer to the same slot.
#[derive(Clone, Debug, Default)]
pub struct UndoTracker {
    slot: Arc<Mutex<UndoSlot>>,
}

thread_local! {
    static THREAD_TRACKER: UndoTracker = UndoTracker::new();
}

impl UndoTracker {
    /// Create a tracker with an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracker shared by every buffer on this thread that was not given one.
    #[must_use]
    pub fn thread_default() -> Self {
        THREAD_TRACKER.with(Clone::clone)
    }

    fn lock(&self) -> MutexGuard<'_, UndoSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles refer to the same slot.
    #[must_use]
    pub fn shares_slot_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// The buffer that made the pending record, if any.
    #[must_use]
    pub fn owner(&self) -> Option<BufferId> {
        self.lock().owner
    }

    /// Record `len` bytes inserted at `pos` by `owner`.
    pub fn record_insert(&self, owner: BufferId, pos: usize, len: usize) {
        let mut slot = self.lock();
        let same_spot = slot.owned_by(owner) && slot.at == pos;
        if same_spot && slot.insert > 0 {
            slot.insert += len;
        } else {
            slot.insert = len;
            slot.yank_cut = if same_spot { slot.cut } else { 0 };
        }
        slot.at = pos + len;
        slot.cut = 0;
        slot.owner = Some(owner);
    }

    /// Record `deleted` removed from `[start, start + deleted.len())` by `owner`.
    pub fn record_delete(&self, owner: BufferId, start: usize, deleted: &[u8]) {
        let mut slot = self.lock();
        let end = start + deleted.len();
        if slot.owned_by(owner) && slot.at == end && slot.cut > 0 {
            // Backspacing: the new bytes come before the ones already saved.
            let cut = slot.cut;
            slot.saved.truncate(cut);
            slot.saved.splice(0..0, deleted.iter().copied());
            slot.cut += deleted.len();
        } else {
            slot.cut = deleted.len();
            slot.saved.clear();
            slot.saved.extend_from_slice(deleted);
        }
        slot.at = start;
        slot.insert = 0;
        slot.yank_cut = 0;
        slot.owner = Some(owner);
    }

    /// What undoing would do for `owner`, or `None` if it has nothing to undo.
    #[must_use]
    pub fn pending(&self, owner: BufferId) -> Option<UndoAction> {
        let slot = self.lock();
        if !slot.owned_by(owner) {
            return None;
        }
        let inserted = slot.insert;
        let mut cut = slot.cut;
        if inserted > 0 && slot.yank_cut > 0 && cut == 0 {
            cut = slot.yank_cut;
        }
        let saved = &slot.saved[..cut.min(slot.saved.len())];
        let start = slot.at - inserted;

        match (inserted > 0, cut > 0) {
            (true, true) => Some(UndoAction::Replace {
                start,
                end: slot.at,
                text: saved.to_vec(),
            }),
            (true, false) => Some(UndoAction::Remove {
                start,
                end: slot.at,
            }),
            (false, true) => Some(UndoAction::Insert {
                pos: slot.at,
                text: saved.to_vec(),
            }),
            (false, false) => None,
        }
    }

    /// Forget the delete that preceded the pending insert.
    pub(crate) fn clear_yank_cut(&self) {
        self.lock().yank_cut = 0;
    }

    /// Drop the pending record.
    pub fn clear(&self) {
        *self.lock() = UndoSlot::default();
    }
}
