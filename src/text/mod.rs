//! Gap-buffer text storage with selections, rectangular edits and undo.
//!
//! Key types:
//!
//! - [`GapBuffer`]: raw byte storage with a movable gap
//! - [`TextBuffer`]: the editable, observable buffer built on it
//! - [`Selection`]: a linear or rectangular range kept in step with edits
//! - [`UndoTracker`]: the single coalescing undo record
//! - [`NotificationHub`]: modify and pre-delete callbacks
//!
//! Column arithmetic for tabs and control characters lives in the free
//! functions re-exported from [`column`].
//!
//! # Examples
//!
//! ## Editing with Undo
//!
//! ```
//! use gaptext::{TextBuffer, UndoTracker};
//!
//! let mut buf = TextBuffer::new().with_undo_tracker(UndoTracker::new());
//! buf.insert(0, "hello");
//! buf.replace(0, 5, "bye");
//! assert_eq!(buf.text(), "bye");
//!
//! assert!(buf.undo());
//! assert_eq!(buf.text(), "hello");
//! ```
//!
//! ## Rectangular Edits
//!
//! ```
//! use gaptext::TextBuffer;
//!
//! let mut buf = TextBuffer::from_text("abcdef\nghijkl");
//! buf.remove_rectangular(0, 13, 1, 3);
//! assert_eq!(buf.text(), "adef\ngjkl");
//! ```

mod buffer;
pub mod column;
mod file;
mod gap;
mod notify;
mod rect;
mod search;
mod selection;
mod undo;

pub use buffer::{BufferOptions, Edit, TextBuffer};
pub use column::{
    LineSplice, TabSettings, add_padding, character_width, count_lines, delete_rect_from_line,
    expand_character, expand_tabs, insert_column_in_line, overlay_rect_in_line, realign_tabs,
    text_width, unexpand_tabs,
};
pub use file::DEFAULT_FILE_CHUNK;
pub use gap::{GapBuffer, PREFERRED_GAP_SIZE};
pub use notify::{
    CallbackId, CallbackRegistry, ModifyCallback, ModifyEvent, NotificationHub, PredeleteCallback,
    redisplay_ranges,
};
pub use selection::{Selection, SelectionPosition, SelectionRole};
pub use undo::{BufferId, UndoAction, UndoTracker};
