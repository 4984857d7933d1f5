//! Observable gap-buffer text storage.
//!
//! [`TextBuffer`] owns a [`GapBuffer`] and keeps three [`Selection`]s, an undo
//! record and a set of change callbacks in step with every edit.
//!
//! Positions are byte offsets. Out-of-range positions are clamped and inverted
//! ranges are reordered, so no editing call can fail.
//!
//! # Examples
//!
//! ```
//! use gaptext::TextBuffer;
//!
//! let mut buf = TextBuffer::from_text("0123456789");
//! buf.select(2, 5);
//! buf.insert(0, "XY");
//! let sel = buf.selection_position().unwrap();
//! assert_eq!((sel.start, sel.end), (4, 7));
//! ```

use std::borrow::Cow;

use super::column::{TabSettings, character_width, expand_character};
use super::gap::GapBuffer;
use super::notify::{CallbackId, ModifyEvent, NotificationHub};
use super::selection::{Selection, SelectionPosition, SelectionRole};
use super::undo::{BufferId, UndoAction, UndoTracker};

/// Construction options for [`TextBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferOptions {
    /// Bytes of text the buffer can hold before its first reallocation.
    pub initial_capacity: usize,
    /// Distance between tab stops, in columns. Clamped to at least 1.
    pub tab_distance: usize,
    /// Whether rectangular edits may pad with tab characters.
    pub use_tabs: bool,
    /// Character displayed as `^@` in place of a NUL.
    pub null_subs_char: char,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            tab_distance: 8,
            use_tabs: true,
            null_subs_char: '\0',
        }
    }
}

/// One primitive change to the stored bytes.
///
/// Every insertion or removal produces exactly one of these; the selections
/// and the undo tracker are both updated from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub pos: usize,
    pub ndeleted: usize,
    pub ninserted: usize,
    /// The removed bytes.
    pub deleted: Vec<u8>,
}

impl Edit {
    fn insertion(pos: usize, ninserted: usize) -> Self {
        Self {
            pos,
            ndeleted: 0,
            ninserted,
            deleted: Vec::new(),
        }
    }

    fn removal(pos: usize, deleted: Vec<u8>) -> Self {
        Self {
            pos,
            ndeleted: deleted.len(),
            ninserted: 0,
            deleted,
        }
    }
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0xF0.. => 4,
        0xE0.. => 3,
        0xC0.. => 2,
        _ => 1,
    }
}

/// Gap-buffer text storage with selections, undo and change callbacks.
#[derive(Debug)]
pub struct TextBuffer {
    gap: GapBuffer,
    tabs: TabSettings,
    selections: [Selection; 3],
    undo: UndoTracker,
    id: BufferId,
    can_undo: bool,
    cursor_pos_hint: usize,
    hub: NotificationHub,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    /// Create an empty buffer that can hold `capacity` bytes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(BufferOptions {
            initial_capacity: capacity,
            ..BufferOptions::default()
        })
    }

    /// Create an empty buffer from `options`.
    #[must_use]
    pub fn with_options(options: BufferOptions) -> Self {
        Self {
            gap: GapBuffer::with_capacity(options.initial_capacity),
            tabs: TabSettings {
                tab_distance: options.tab_distance.max(1),
                use_tabs: options.use_tabs,
                null_subs: options.null_subs_char,
            },
            selections: [Selection::new(); 3],
            undo: UndoTracker::thread_default(),
            id: BufferId::next(),
            can_undo: true,
            cursor_pos_hint: 0,
            hub: NotificationHub::new(),
        }
    }

    /// Create a buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.gap = GapBuffer::from_bytes(text.as_bytes());
        buf
    }

    /// Use `tracker` for undo instead of the thread's shared one.
    #[must_use]
    pub fn with_undo_tracker(mut self, tracker: UndoTracker) -> Self {
        self.undo = tracker;
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gap.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gap.is_empty()
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &GapBuffer {
        &self.gap
    }

    /// Identity used by the undo tracker.
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// The whole text. Invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.gap.to_vec()).into_owned()
    }

    /// Order `start`/`end` and clamp both to `[0, len]`.
    #[must_use]
    pub fn clamp_range(&self, start: usize, end: usize) -> (usize, usize) {
        let len = self.len();
        (start.min(end).min(len), start.max(end).min(len))
    }

    /// Raw bytes of `[start, end)`, clamped.
    #[must_use]
    pub fn bytes_range(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        let (start, end) = self.clamp_range(start, end);
        self.gap.range(start, end)
    }

    /// Text of `[start, end)`, clamped. Invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn text_range(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.bytes_range(start, end)).into_owned()
    }

    /// The byte at `pos`, or `0` past the end.
    #[must_use]
    pub fn character(&self, pos: usize) -> u8 {
        self.gap.byte(pos).unwrap_or(0)
    }

    /// Where the last edit left the natural cursor position.
    #[must_use]
    pub fn cursor_pos_hint(&self) -> usize {
        self.cursor_pos_hint
    }

    /// The character starting at byte `pos` and its encoded length.
    pub(crate) fn char_at(&self, pos: usize) -> Option<(char, usize)> {
        let lead = self.gap.byte(pos)?;
        let end = (pos + utf8_sequence_len(lead)).min(self.len());
        let bytes = self.gap.range(pos, end);
        match std::str::from_utf8(&bytes) {
            Ok(s) => s.chars().next().map(|c| (c, c.len_utf8())),
            Err(_) => Some((char::REPLACEMENT_CHARACTER, 1)),
        }
    }

    // ------------------------------------------------------------------
    // Primitive edits
    // ------------------------------------------------------------------

    /// Bring the selections and the undo record up to date with `edit`.
    fn track(&mut self, edit: &Edit) {
        for selection in &mut self.selections {
            selection.update(edit.pos, edit.ndeleted, edit.ninserted);
        }
        if !self.can_undo {
            return;
        }
        if edit.ndeleted > 0 {
            self.undo.record_delete(self.id, edit.pos, &edit.deleted);
        }
        if edit.ninserted > 0 {
            self.undo.record_insert(self.id, edit.pos, edit.ninserted);
        }
    }

    fn insert_raw(&mut self, pos: usize, bytes: &[u8]) -> Edit {
        self.gap.insert(pos, bytes);
        let edit = Edit::insertion(pos, bytes.len());
        self.track(&edit);
        edit
    }

    fn remove_raw(&mut self, start: usize, end: usize) -> Edit {
        let deleted = self.gap.remove(start, end);
        let edit = Edit::removal(start, deleted);
        self.track(&edit);
        edit
    }

    /// Swap `[start, end)` for `bytes` without notifying. Returns the removed bytes.
    pub(crate) fn splice_raw(&mut self, start: usize, end: usize, bytes: &[u8]) -> Vec<u8> {
        let removed = self.remove_raw(start, end);
        self.insert_raw(start, bytes);
        removed.deleted
    }

    /// Run the modify callbacks for a text change.
    pub(crate) fn notify_modified(
        &mut self,
        pos: usize,
        ndeleted: usize,
        ninserted: usize,
        deleted: &[u8],
    ) {
        let deleted_text = (!deleted.is_empty()).then(|| String::from_utf8_lossy(deleted));
        self.hub.call_modify(&ModifyEvent {
            pos,
            ninserted,
            ndeleted,
            nrestyled: 0,
            deleted_text: deleted_text.as_deref(),
        });
    }

    pub(crate) fn notify_predelete(&mut self, pos: usize, ndeleted: usize) {
        self.hub.call_predelete(pos, ndeleted);
    }

    pub(crate) fn set_cursor_pos_hint(&mut self, pos: usize) {
        self.cursor_pos_hint = pos.min(self.len());
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Insert `text` at `pos`. A position past the end appends.
    pub fn insert(&mut self, pos: usize, text: &str) {
        self.insert_bytes(pos, text.as_bytes());
    }

    /// Insert raw bytes at `pos`.
    pub fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) {
        let pos = pos.min(self.len());
        self.notify_predelete(pos, 0);
        let edit = self.insert_raw(pos, bytes);
        self.cursor_pos_hint = pos + edit.ninserted;
        self.notify_modified(pos, 0, edit.ninserted, &[]);
    }

    /// Append `text` at the end.
    pub fn append(&mut self, text: &str) {
        self.insert(self.len(), text);
    }

    /// Remove `[start, end)`. Does nothing for an empty range.
    pub fn remove(&mut self, start: usize, end: usize) {
        let (start, end) = self.clamp_range(start, end);
        if start == end {
            return;
        }
        self.notify_predelete(start, end - start);
        let edit = self.remove_raw(start, end);
        self.cursor_pos_hint = start;
        self.notify_modified(start, edit.ndeleted, 0, &edit.deleted);
    }

    /// Replace `[start, end)` with `text`, reported as one change.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        self.replace_bytes(start, end, text.as_bytes());
    }

    /// Replace `[start, end)` with raw bytes, reported as one change. Does
    /// nothing when the range and `bytes` are both empty.
    pub fn replace_bytes(&mut self, start: usize, end: usize, bytes: &[u8]) {
        let (start, end) = self.clamp_range(start, end);
        if start == end && bytes.is_empty() {
            return;
        }
        self.notify_predelete(start, end - start);
        let deleted = self.splice_raw(start, end, bytes);
        self.cursor_pos_hint = start + bytes.len();
        self.notify_modified(start, end - start, bytes.len(), &deleted);
    }

    /// Copy `[src_start, src_end)` of `src` into this buffer at `dest_pos`.
    ///
    /// The bytes come straight out of the source's storage. Only this buffer's
    /// selections, undo record and callbacks see the change. Unlike a bare
    /// storage copy, this is a full edit: it can be undone and it fires the
    /// pre-delete and modify callbacks like [`insert`](Self::insert).
    pub fn copy_from(&mut self, src: &Self, src_start: usize, src_end: usize, dest_pos: usize) {
        let (src_start, src_end) = src.clamp_range(src_start, src_end);
        let pos = dest_pos.min(self.len());
        let n = src_end - src_start;
        self.notify_predelete(pos, 0);
        self.gap.insert_from(pos, &src.gap, src_start, src_end);
        self.track(&Edit::insertion(pos, n));
        self.cursor_pos_hint = pos + n;
        self.notify_modified(pos, 0, n, &[]);
    }

    /// Replace the entire contents with `text`.
    ///
    /// The storage is rebuilt with the gap in the middle, all selections are
    /// dropped, and the change is not recorded for undo.
    pub fn set_text(&mut self, text: &str) {
        let old_len = self.len();
        self.notify_predelete(0, old_len);
        let old = self.gap.to_vec();
        self.gap = GapBuffer::from_bytes(text.as_bytes());
        for selection in &mut self.selections {
            selection.update(0, old_len, 0);
        }
        self.notify_modified(0, old_len, text.len(), &old);
    }

    // ------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------

    /// The tracker holding this buffer's undo record.
    #[must_use]
    pub fn undo_tracker(&self) -> &UndoTracker {
        &self.undo
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    /// Enable or disable undo recording for this buffer.
    pub fn set_can_undo(&mut self, flag: bool) {
        self.can_undo = flag;
    }

    /// Revert the pending undo record. Returns false if there is nothing this
    /// buffer can undo.
    ///
    /// The revert is an ordinary edit: callbacks fire and it is recorded, so a
    /// second call re-applies the change.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo {
            return false;
        }
        let Some(action) = self.undo.pending(self.id) else {
            return false;
        };
        match action {
            UndoAction::Replace { start, end, text } => self.replace_bytes(start, end, &text),
            UndoAction::Remove { start, end } => self.remove(start, end),
            UndoAction::Insert { pos, text } => {
                self.insert_bytes(pos, &text);
                self.undo.clear_yank_cut();
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    /// The selection for `role`.
    #[must_use]
    pub fn selection(&self, role: SelectionRole) -> &Selection {
        &self.selections[role.index()]
    }

    fn change_selection(&mut self, role: SelectionRole, change: impl FnOnce(&mut Selection)) {
        let index = role.index();
        let old = self.selections[index];
        change(&mut self.selections[index]);
        self.hub.redisplay_selection(&old, &self.selections[index]);
    }

    /// Select `[start, end)` for `role`.
    pub fn set_selection(&mut self, role: SelectionRole, start: usize, end: usize) {
        self.change_selection(role, |sel| sel.set(start, end));
    }

    /// Select a rectangle for `role`.
    pub fn set_rectangular_selection(
        &mut self,
        role: SelectionRole,
        start: usize,
        end: usize,
        rect_start: usize,
        rect_end: usize,
    ) {
        self.change_selection(role, |sel| {
            sel.set_rectangular(start, end, rect_start, rect_end);
        });
    }

    /// Drop the selection for `role`.
    pub fn clear_selection(&mut self, role: SelectionRole) {
        self.change_selection(role, Selection::clear);
    }

    /// Bounds of the selection for `role`, if anything is selected.
    #[must_use]
    pub fn selection_position_of(&self, role: SelectionRole) -> Option<SelectionPosition> {
        self.selection(role).position()
    }

    /// Text of the selection for `role`; empty if nothing is selected.
    #[must_use]
    pub fn selected_text(&self, role: SelectionRole) -> String {
        match self.selection_position_of(role) {
            None => String::new(),
            Some(SelectionPosition {
                start,
                end,
                rect: Some((rect_start, rect_end)),
            }) => self.text_in_rectangle(start, end, rect_start, rect_end),
            Some(SelectionPosition { start, end, .. }) => self.text_range(start, end),
        }
    }

    /// Delete the text selected for `role`.
    pub fn remove_selected(&mut self, role: SelectionRole) {
        match self.selection_position_of(role) {
            None => {}
            Some(SelectionPosition {
                start,
                end,
                rect: Some((rect_start, rect_end)),
            }) => self.remove_rectangular(start, end, rect_start, rect_end),
            Some(SelectionPosition { start, end, .. }) => self.remove(start, end),
        }
    }

    /// Replace the text selected for `role` with `text` and drop the selection.
    pub fn replace_selected(&mut self, role: SelectionRole, text: &str) {
        let old = *self.selection(role);
        match old.position() {
            None => return,
            Some(SelectionPosition {
                start,
                end,
                rect: Some((rect_start, rect_end)),
            }) => self.replace_rectangular(start, end, rect_start, rect_end, text),
            Some(SelectionPosition { start, end, .. }) => self.replace(start, end, text),
        }
        let index = role.index();
        self.selections[index].clear();
        self.hub.redisplay_selection(&old, &self.selections[index]);
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.set_selection(SelectionRole::Primary, start, end);
    }

    pub fn unselect(&mut self) {
        self.clear_selection(SelectionRole::Primary);
    }

    pub fn select_rectangular(&mut self, start: usize, end: usize, rect_start: usize, rect_end: usize) {
        self.set_rectangular_selection(SelectionRole::Primary, start, end, rect_start, rect_end);
    }

    #[must_use]
    pub fn selection_position(&self) -> Option<SelectionPosition> {
        self.selection_position_of(SelectionRole::Primary)
    }

    #[must_use]
    pub fn selection_text(&self) -> String {
        self.selected_text(SelectionRole::Primary)
    }

    pub fn remove_selection(&mut self) {
        self.remove_selected(SelectionRole::Primary);
    }

    pub fn replace_selection(&mut self, text: &str) {
        self.replace_selected(SelectionRole::Primary, text);
    }

    pub fn secondary_select(&mut self, start: usize, end: usize) {
        self.set_selection(SelectionRole::Secondary, start, end);
    }

    pub fn secondary_unselect(&mut self) {
        self.clear_selection(SelectionRole::Secondary);
    }

    pub fn secondary_select_rectangular(
        &mut self,
        start: usize,
        end: usize,
        rect_start: usize,
        rect_end: usize,
    ) {
        self.set_rectangular_selection(SelectionRole::Secondary, start, end, rect_start, rect_end);
    }

    #[must_use]
    pub fn secondary_selection_position(&self) -> Option<SelectionPosition> {
        self.selection_position_of(SelectionRole::Secondary)
    }

    #[must_use]
    pub fn secondary_selection_text(&self) -> String {
        self.selected_text(SelectionRole::Secondary)
    }

    pub fn remove_secondary_selection(&mut self) {
        self.remove_selected(SelectionRole::Secondary);
    }

    pub fn replace_secondary_selection(&mut self, text: &str) {
        self.replace_selected(SelectionRole::Secondary, text);
    }

    pub fn highlight(&mut self, start: usize, end: usize) {
        self.set_selection(SelectionRole::Highlight, start, end);
    }

    pub fn unhighlight(&mut self) {
        self.clear_selection(SelectionRole::Highlight);
    }

    pub fn highlight_rectangular(&mut self, start: usize, end: usize, rect_start: usize, rect_end: usize) {
        self.set_rectangular_selection(SelectionRole::Highlight, start, end, rect_start, rect_end);
    }

    #[must_use]
    pub fn highlight_position(&self) -> Option<SelectionPosition> {
        self.selection_position_of(SelectionRole::Highlight)
    }

    #[must_use]
    pub fn highlight_text(&self) -> String {
        self.selected_text(SelectionRole::Highlight)
    }

    // ------------------------------------------------------------------
    // Callbacks
    // ------------------------------------------------------------------

    /// Register a callback run after every change.
    pub fn add_modify_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&ModifyEvent<'_>) + Send + 'static,
    {
        self.hub.add_modify_callback(callback)
    }

    /// Returns false (and logs a warning) if `id` is not registered.
    pub fn remove_modify_callback(&mut self, id: CallbackId) -> bool {
        self.hub.remove_modify_callback(id)
    }

    /// Register a callback run with `(pos, ndeleted)` before text is removed.
    pub fn add_predelete_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        self.hub.add_predelete_callback(callback)
    }

    /// Returns false (and logs a warning) if `id` is not registered.
    pub fn remove_predelete_callback(&mut self, id: CallbackId) -> bool {
        self.hub.remove_predelete_callback(id)
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationHub {
        &self.hub
    }

    // ------------------------------------------------------------------
    // Tab settings
    // ------------------------------------------------------------------

    #[must_use]
    pub fn tab_settings(&self) -> TabSettings {
        self.tabs
    }

    #[must_use]
    pub fn tab_distance(&self) -> usize {
        self.tabs.tab_distance
    }

    /// Change the tab distance.
    ///
    /// Every column position changes, so observers are told the whole text was
    /// deleted and reinserted.
    pub fn set_tab_distance(&mut self, tab_distance: usize) {
        let len = self.len();
        self.notify_predelete(0, len);
        self.tabs.tab_distance = tab_distance.max(1);
        let text = self.gap.to_vec();
        self.notify_modified(0, len, len, &text);
    }

    #[must_use]
    pub fn use_tabs(&self) -> bool {
        self.tabs.use_tabs
    }

    pub fn set_use_tabs(&mut self, use_tabs: bool) {
        self.tabs.use_tabs = use_tabs;
    }

    #[must_use]
    pub fn null_subs_char(&self) -> char {
        self.tabs.null_subs
    }

    pub fn set_null_subs_char(&mut self, c: char) {
        self.tabs.null_subs = c;
    }

    // ------------------------------------------------------------------
    // Lines and words
    // ------------------------------------------------------------------

    /// Start of the line containing `pos`.
    #[must_use]
    pub fn line_start(&self, pos: usize) -> usize {
        self.find_char_backward(pos, b'\n').map_or(0, |found| found + 1)
    }

    /// End of the line containing `pos`: its newline, or the buffer end.
    #[must_use]
    pub fn line_end(&self, pos: usize) -> usize {
        self.find_char_forward(pos, b'\n')
            .unwrap_or_else(|end| end)
    }

    /// Text of the line containing `pos`, without its newline.
    #[must_use]
    pub fn line_text(&self, pos: usize) -> String {
        self.text_range(self.line_start(pos), self.line_end(pos))
    }

    /// Start of the word containing `pos`. Words are ASCII alphanumerics and `_`.
    #[must_use]
    pub fn word_start(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.len());
        while pos > 0 && is_word_byte(self.character(pos)) {
            pos -= 1;
        }
        if !is_word_byte(self.character(pos)) {
            pos += 1;
        }
        pos.min(self.len())
    }

    /// End of the word containing `pos`.
    #[must_use]
    pub fn word_end(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.len());
        while pos < self.len() && is_word_byte(self.character(pos)) {
            pos += 1;
        }
        pos
    }

    /// Newlines in `[start, end)`.
    #[must_use]
    pub fn count_lines(&self, start: usize, end: usize) -> usize {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return 0;
        }
        self.gap
            .range(start, end)
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
    }

    /// Start of the line `nlines` lines after the one containing `start`.
    ///
    /// Stops at the buffer end if there are not enough lines.
    #[must_use]
    pub fn skip_lines(&self, start: usize, nlines: usize) -> usize {
        let len = self.len();
        let start = start.min(len);
        if nlines == 0 {
            return start;
        }
        let mut seen = 0;
        for pos in start..len {
            if self.character(pos) == b'\n' {
                seen += 1;
                if seen == nlines {
                    return pos + 1;
                }
            }
        }
        len
    }

    /// Start of the line `nlines` lines before the one containing `start`,
    /// not counting a newline at `start` itself. `0` finds the line start.
    #[must_use]
    pub fn rewind_lines(&self, start: usize, nlines: usize) -> usize {
        let start = start.min(self.len());
        let mut seen = 0;
        for pos in (0..start).rev() {
            if self.character(pos) == b'\n' {
                if seen >= nlines {
                    return pos + 1;
                }
                seen += 1;
            }
        }
        0
    }

    // ------------------------------------------------------------------
    // Display columns
    // ------------------------------------------------------------------

    /// Display text for the character at `pos` when it starts at `column`.
    #[must_use]
    pub fn expand_character_at(&self, pos: usize, column: usize) -> String {
        self.char_at(pos)
            .map(|(c, _)| expand_character(c, column, self.tabs))
            .unwrap_or_default()
    }

    /// Display columns from `line_start` to `target`.
    #[must_use]
    pub fn count_displayed_characters(&self, line_start: usize, target: usize) -> usize {
        let target = target.min(self.len());
        let mut pos = line_start;
        let mut column = 0;
        while pos < target {
            let Some((c, n)) = self.char_at(pos) else {
                break;
            };
            if c == '\n' {
                break;
            }
            column += character_width(c, column, self.tabs);
            pos += n;
        }
        column
    }

    /// Position reached by advancing `ncolumns` display columns from
    /// `line_start`, stopping at the end of the line.
    #[must_use]
    pub fn skip_displayed_characters(&self, line_start: usize, ncolumns: usize) -> usize {
        let len = self.len();
        let mut pos = line_start.min(len);
        let mut column = 0;
        while column < ncolumns && pos < len {
            let Some((c, n)) = self.char_at(pos) else {
                break;
            };
            if c == '\n' {
                return pos;
            }
            column += character_width(c, column, self.tabs);
            pos += n;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn private(text: &str) -> TextBuffer {
        TextBuffer::from_text(text).with_undo_tracker(UndoTracker::new())
    }

    #[test]
    fn test_options_default() {
        let options = BufferOptions::default();
        assert_eq!(options.tab_distance, 8);
        assert!(options.use_tabs);
        assert_eq!(options.null_subs_char, '\0');

        let buf = TextBuffer::with_options(BufferOptions {
            tab_distance: 0,
            ..options
        });
        assert_eq!(buf.tab_distance(), 1);
    }

    #[test]
    fn test_insert_clamps_position() {
        let mut buf = private("abc");
        buf.insert(100, "d");
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor_pos_hint(), 4);
    }

    #[test]
    fn test_remove_reorders_and_clamps() {
        let mut buf = private("0123456789");
        buf.remove(8, 3);
        assert_eq!(buf.text(), "012389");
        buf.remove(4, 100);
        assert_eq!(buf.text(), "0123");
        assert_eq!(buf.cursor_pos_hint(), 4);
    }

    #[test]
    fn test_replace() {
        let mut buf = private("hello world");
        buf.replace(6, 11, "there");
        assert_eq!(buf.text(), "hello there");
        assert_eq!(buf.cursor_pos_hint(), 11);
    }

    #[test]
    fn test_text_range_and_character() {
        let buf = private("abcdef");
        assert_eq!(buf.text_range(4, 1), "bcd");
        assert_eq!(buf.text_range(3, 3), "");
        assert_eq!(buf.text_range(5, 99), "f");
        assert_eq!(buf.character(0), b'a');
        assert_eq!(buf.character(6), 0);
    }

    #[test]
    fn test_line_helpers() {
        let buf = private("one\ntwo\nthree");
        assert_eq!(buf.line_start(5), 4);
        assert_eq!(buf.line_end(5), 7);
        assert_eq!(buf.line_text(9), "three");
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(10), 13);
        assert_eq!(buf.count_lines(0, 13), 2);
        assert_eq!(buf.skip_lines(0, 1), 4);
        assert_eq!(buf.skip_lines(0, 5), 13);
        assert_eq!(buf.rewind_lines(10, 0), 8);
        assert_eq!(buf.rewind_lines(10, 1), 4);
        assert_eq!(buf.rewind_lines(10, 9), 0);
    }

    #[test]
    fn test_word_boundaries() {
        let buf = private("foo bar_baz!");
        assert_eq!(buf.word_start(6), 4);
        assert_eq!(buf.word_end(6), 11);
        assert_eq!(buf.word_start(1), 0);
        assert_eq!(buf.word_end(100), 12);
    }

    #[test]
    fn test_count_displayed_characters_with_tabs() {
        let mut buf = private("a\tb\tc");
        buf.set_tab_distance(4);
        assert_eq!(buf.count_displayed_characters(0, 5), 9);
        assert_eq!(buf.skip_displayed_characters(0, 4), 2);
        assert_eq!(buf.skip_displayed_characters(0, 100), 5);
    }

    #[test]
    fn test_display_walk_stops_at_newline() {
        let buf = private("ab\ncd");
        assert_eq!(buf.count_displayed_characters(0, 5), 2);
        assert_eq!(buf.skip_displayed_characters(0, 10), 2);
    }

    #[test]
    fn test_expand_character_at() {
        let buf = private("\t\x01x");
        assert_eq!(buf.expand_character_at(0, 3), "     ");
        assert_eq!(buf.expand_character_at(1, 0), "^A");
        assert_eq!(buf.expand_character_at(2, 0), "x");
        assert_eq!(buf.expand_character_at(9, 0), "");
    }

    #[test]
    fn test_set_text_drops_selections_and_centers_gap() {
        let mut buf = private("hello");
        buf.select(1, 3);
        buf.set_text("a much longer replacement");
        assert!(buf.selection_position().is_none());
        assert_eq!(buf.storage().gap_start(), buf.len() / 2);
        assert!(!buf.undo());
    }

    #[test]
    fn test_set_tab_distance_reports_full_change() {
        let mut buf = private("a\tb");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        buf.add_modify_callback(move |event| {
            sink.lock().unwrap().push((
                event.pos,
                event.ndeleted,
                event.ninserted,
                event.deleted_text.map(str::to_string),
            ));
        });
        buf.set_tab_distance(4);
        assert_eq!(
            *events.lock().unwrap(),
            vec![(0, 3, 3, Some("a\tb".to_string()))]
        );
    }

    #[test]
    fn test_copy_from_other_buffer() {
        let src = private("0123456789");
        let mut dst = private("[]");
        dst.select(1, 2);
        dst.copy_from(&src, 7, 2, 1);
        assert_eq!(dst.text(), "[23456]");
        let sel = dst.selection_position().unwrap();
        assert_eq!((sel.start, sel.end), (6, 7));
        assert!(dst.undo());
        assert_eq!(dst.text(), "[]");
    }

    #[test]
    fn test_replace_selection_unselects() {
        let mut buf = private("hello world");
        buf.select(0, 5);
        buf.replace_selection("bye");
        assert_eq!(buf.text(), "bye world");
        assert!(buf.selection_position().is_none());
    }

    #[test]
    fn test_selection_roles_are_independent() {
        let mut buf = private("0123456789");
        buf.select(0, 2);
        buf.secondary_select(3, 5);
        buf.highlight(6, 9);
        assert_eq!(buf.selection_text(), "01");
        assert_eq!(buf.secondary_selection_text(), "34");
        assert_eq!(buf.highlight_text(), "678");

        buf.remove_secondary_selection();
        assert_eq!(buf.text(), "01256789");
        let hl = buf.highlight_position().unwrap();
        assert_eq!((hl.start, hl.end), (4, 7));
        buf.unhighlight();
        assert!(buf.highlight_position().is_none());
    }

    #[test]
    fn test_char_at_decodes_utf8() {
        let buf = private("é!");
        assert_eq!(buf.char_at(0), Some(('é', 2)));
        assert_eq!(buf.char_at(2), Some(('!', 1)));
        assert_eq!(buf.char_at(1), Some((char::REPLACEMENT_CHARACTER, 1)));
        assert_eq!(buf.char_at(3), None);
    }
}
