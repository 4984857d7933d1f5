//! Change notification.
//!
//! Observers register two kinds of callback on a buffer:
//!
//! - **pre-delete** callbacks run before any bytes are removed, with the
//!   position and length about to go, while the text is still readable;
//! - **modify** callbacks run after every edit has been applied and after the
//!   selections and the undo record have caught up, with a [`ModifyEvent`].
//!
//! Selection changes that do not touch the text are reported as modify events
//! with only `nrestyled` set, covering the smallest range that needs a redraw.
//!
//! Callbacks run in registration order and are removed by the [`CallbackId`]
//! returned when they were added.

use std::fmt;

use super::selection::Selection;
use crate::event::{LogLevel, emit_log};

/// Description of one change to a buffer, passed to modify callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifyEvent<'a> {
    pub pos: usize,
    pub ninserted: usize,
    pub ndeleted: usize,
    /// Bytes whose presentation changed without being edited.
    pub nrestyled: usize,
    /// The removed text, when `ndeleted > 0`.
    pub deleted_text: Option<&'a str>,
}

impl ModifyEvent<'_> {
    /// A redraw hint for `len` bytes at `pos`.
    #[must_use]
    pub fn restyle(pos: usize, len: usize) -> Self {
        Self {
            pos,
            ninserted: 0,
            ndeleted: 0,
            nrestyled: len,
            deleted_text: None,
        }
    }
}

/// Handle returned when registering a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Callback run after each change.
pub type ModifyCallback = Box<dyn FnMut(&ModifyEvent<'_>) + Send>;

/// Callback run before text is removed, with `(pos, ndeleted)`.
pub type PredeleteCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Ordered list of callbacks.
pub struct CallbackRegistry<F> {
    entries: Vec<(CallbackId, F)>,
}

impl<F> Default for CallbackRegistry<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F> CallbackRegistry<F> {
    fn push(&mut self, id: CallbackId, callback: F) {
        self.entries.push((id, callback));
    }

    fn remove(&mut self, id: CallbackId) -> bool {
        match self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    fn callbacks_mut(&mut self) -> impl Iterator<Item = &mut F> {
        self.entries.iter_mut().map(|(_, callback)| callback)
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The modify and pre-delete registries of one buffer.
#[derive(Default)]
pub struct NotificationHub {
    modify: CallbackRegistry<ModifyCallback>,
    predelete: CallbackRegistry<PredeleteCallback>,
    next_id: u64,
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("modify", &self.modify.len())
            .field("predelete", &self.predelete.len())
            .finish()
    }
}

impl NotificationHub {
    /// Create a hub with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> CallbackId {
        self.next_id += 1;
        CallbackId(self.next_id)
    }

    /// Register a modify callback.
    pub fn add_modify_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&ModifyEvent<'_>) + Send + 'static,
    {
        let id = self.next_id();
        self.modify.push(id, Box::new(callback));
        id
    }

    /// Unregister a modify callback. Returns false if `id` is not registered.
    pub fn remove_modify_callback(&mut self, id: CallbackId) -> bool {
        let removed = self.modify.remove(id);
        if !removed {
            emit_log(
                LogLevel::Warn,
                &format!("remove_modify_callback: {id:?} is not registered"),
            );
        }
        removed
    }

    /// Register a pre-delete callback.
    pub fn add_predelete_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        let id = self.next_id();
        self.predelete.push(id, Box::new(callback));
        id
    }

    /// Unregister a pre-delete callback. Returns false if `id` is not registered.
    pub fn remove_predelete_callback(&mut self, id: CallbackId) -> bool {
        let removed = self.predelete.remove(id);
        if !removed {
            emit_log(
                LogLevel::Warn,
                &format!("remove_predelete_callback: {id:?} is not registered"),
            );
        }
        removed
    }

    #[must_use]
    pub fn modify_callbacks(&self) -> &CallbackRegistry<ModifyCallback> {
        &self.modify
    }

    #[must_use]
    pub fn predelete_callbacks(&self) -> &CallbackRegistry<PredeleteCallback> {
        &self.predelete
    }

    /// Run every modify callback with `event`.
    pub fn call_modify(&mut self, event: &ModifyEvent<'_>) {
        for callback in self.modify.callbacks_mut() {
            callback(event);
        }
    }

    /// Run every pre-delete callback. Insertions call this with `ndeleted == 0`.
    pub fn call_predelete(&mut self, pos: usize, ndeleted: usize) {
        for callback in self.predelete.callbacks_mut() {
            callback(pos, ndeleted);
        }
    }

    /// Send redraw hints for the change from `old` to `new`.
    pub fn redisplay_selection(&mut self, old: &Selection, new: &Selection) {
        for (pos, len) in redisplay_ranges(old, new) {
            self.call_modify(&ModifyEvent::restyle(pos, len));
        }
    }
}

/// Ranges `(pos, len)` needing a redraw when a selection changes from `old` to
/// `new`. At most two ranges are returned.
///
/// A rectangular selection is widened by one byte so the area past the end of
/// its last line is repainted too.
#[must_use]
pub fn redisplay_ranges(old: &Selection, new: &Selection) -> Vec<(usize, usize)> {
    let old_start = old.start();
    let new_start = new.start();
    let old_end = old.end() + usize::from(old.rectangular());
    let new_end = new.end() + usize::from(new.rectangular());

    match (old.selected(), new.selected()) {
        (false, false) => return Vec::new(),
        (false, true) => return vec![(new_start, new_end - new_start)],
        (true, false) => return vec![(old_start, old_end - old_start)],
        (true, true) => {}
    }

    let shape_changed = old.rectangular() != new.rectangular()
        || (old.rectangular()
            && (old.rect_start() != new.rect_start() || old.rect_end() != new.rect_end()));
    if shape_changed {
        let start = old_start.min(new_start);
        return vec![(start, old_end.max(new_end) - start)];
    }

    if old_end < new_start || new_end < old_start {
        return vec![
            (old_start, old_end - old_start),
            (new_start, new_end - new_start),
        ];
    }

    // Overlapping: only the two ends that moved need repainting.
    let head = (old_start.min(new_start), old_start.max(new_start));
    let tail = (old_end.min(new_end), old_end.max(new_end));
    [head, tail]
        .into_iter()
        .filter(|(start, end)| start != end)
        .map(|(start, end)| (start, end - start))
        .collect()
}
