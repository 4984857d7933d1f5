//! `gaptext` - gap-buffer text engine for editor widgets
//!
//! Mutable, observable text storage: a gap buffer with three tracked
//! selections, tab-aware rectangular editing, a single-step coalescing undo
//! record, and modify/pre-delete callbacks that keep views in sync.

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // Allow text::TextBuffer etc
#![allow(clippy::struct_excessive_bools)] // Selection state needs multiple flags
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::must_use_candidate)] // Selection wrappers mirror each other
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::branches_sharing_code)] // Code clarity over DRY in branching
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod error;
pub mod event;
pub mod text;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use text::{
    BufferOptions, CallbackId, DEFAULT_FILE_CHUNK, GapBuffer, ModifyEvent, PREFERRED_GAP_SIZE,
    Selection, SelectionPosition, SelectionRole, TabSettings, TextBuffer, UndoTracker,
};
