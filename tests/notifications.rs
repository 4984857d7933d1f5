//! Modify and pre-delete callbacks as seen from outside the buffer.
//!
//! Run with logging:
//!   cargo test --test `notifications` -- --nocapture

use std::sync::{Arc, Mutex};

use gaptext::{LogLevel, TextBuffer, UndoTracker, clear_log_callback, set_log_callback};
use tracing::{Level, debug, info, span};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

fn private(text: &str) -> TextBuffer {
    TextBuffer::from_text(text).with_undo_tracker(UndoTracker::new())
}

/// Record every callback invocation as a line of text, in call order.
fn record(buf: &mut TextBuffer) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    buf.add_predelete_callback(move |pos, ndeleted| {
        sink.lock().unwrap().push(format!("pre {pos} {ndeleted}"));
    });

    let sink = Arc::clone(&log);
    buf.add_modify_callback(move |event| {
        let line = if event.nrestyled > 0 {
            format!("restyle {} {}", event.pos, event.nrestyled)
        } else {
            format!(
                "mod {} +{} -{} {:?}",
                event.pos, event.ninserted, event.ndeleted, event.deleted_text
            )
        };
        debug!(%line, "modify callback");
        sink.lock().unwrap().push(line);
    });
    log
}

fn take(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

// ============================================================================
// Edits
// ============================================================================

#[test]
fn insert_fires_empty_predelete_then_modify() {
    init_logging();
    let mut buf = private("abc");
    let log = record(&mut buf);
    buf.insert(1, "XY");
    assert_eq!(take(&log), vec!["pre 1 0", "mod 1 +2 -0 None"]);
}

#[test]
fn remove_fires_predelete_then_modify() {
    init_logging();
    let mut buf = private("abcdef");
    let log = record(&mut buf);
    buf.remove(2, 4);
    assert_eq!(take(&log), vec!["pre 2 2", "mod 2 +0 -2 Some(\"cd\")"]);
}

#[test]
fn empty_remove_fires_nothing() {
    let mut buf = private("abcdef");
    let log = record(&mut buf);
    buf.remove(3, 3);
    assert!(take(&log).is_empty());
}

#[test]
fn empty_replace_with_nothing_fires_nothing() {
    let mut buf = private("abcdef");
    let log = record(&mut buf);
    buf.replace(4, 4, "");
    buf.replace_bytes(9, 9, b"");
    assert!(take(&log).is_empty());
    assert_eq!(buf.text(), "abcdef");
}

#[test]
fn copy_from_is_reported_as_an_insert() {
    let src = private("0123456789");
    let mut buf = private("[]");
    let log = record(&mut buf);
    buf.copy_from(&src, 2, 5, 1);
    assert_eq!(buf.text(), "[234]");
    assert_eq!(take(&log), vec!["pre 1 0", "mod 1 +3 -0 None"]);
}

#[test]
fn replace_is_reported_once() {
    init_logging();
    let span = span!(Level::INFO, "replace_is_reported_once");
    let _enter = span.enter();

    let mut buf = private("hello world");
    let log = record(&mut buf);
    buf.replace(0, 5, "bye");
    let events = take(&log);
    info!(?events, "replace notifications");
    assert_eq!(events, vec!["pre 0 5", "mod 0 +3 -5 Some(\"hello\")"]);
}

#[test]
fn rectangular_remove_is_reported_once() {
    let mut buf = private("abcdef\nghijkl");
    buf.set_use_tabs(false);
    let log = record(&mut buf);
    buf.remove_rectangular(0, 13, 1, 3);
    assert_eq!(buf.text(), "adef\ngjkl");
    assert_eq!(
        take(&log),
        vec!["pre 0 13", "mod 0 +9 -13 Some(\"abcdef\\nghijkl\")"]
    );
}

#[test]
fn undo_is_reported_as_an_edit() {
    let mut buf = private("");
    buf.insert(0, "abc");
    let log = record(&mut buf);
    assert!(buf.undo());
    assert_eq!(take(&log), vec!["pre 0 3", "mod 0 +0 -3 Some(\"abc\")"]);
}

#[test]
fn set_text_reports_whole_replacement() {
    let mut buf = private("old");
    let log = record(&mut buf);
    buf.set_text("brand new");
    assert_eq!(take(&log), vec!["pre 0 3", "mod 0 +9 -3 Some(\"old\")"]);
}

#[test]
fn tab_distance_change_reports_full_redraw() {
    let mut buf = private("a\tb");
    let log = record(&mut buf);
    buf.set_tab_distance(4);
    assert_eq!(take(&log), vec!["pre 0 3", "mod 0 +3 -3 Some(\"a\\tb\")"]);
}

// ============================================================================
// Selection redraw hints
// ============================================================================

#[test]
fn selection_changes_send_restyle_hints() {
    let mut buf = private("0123456789");
    let log = record(&mut buf);

    buf.select(2, 5);
    assert_eq!(take(&log), vec!["restyle 2 3"]);

    buf.select(2, 7);
    assert_eq!(take(&log), vec!["restyle 5 2"]);

    buf.unselect();
    assert_eq!(take(&log), vec!["restyle 2 5"]);

    buf.unselect();
    assert!(take(&log).is_empty());
}

#[test]
fn rectangular_selection_hint_covers_line_end() {
    let mut buf = private("abcdef\nghijkl");
    let log = record(&mut buf);
    buf.select_rectangular(0, 13, 1, 3);
    assert_eq!(take(&log), vec!["restyle 0 14"]);
}

#[test]
fn moving_to_a_disjoint_selection_sends_two_hints() {
    let mut buf = private("0123456789");
    buf.highlight(0, 2);
    let log = record(&mut buf);
    buf.highlight(6, 9);
    assert_eq!(take(&log), vec!["restyle 0 2", "restyle 6 3"]);
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn callbacks_run_in_registration_order() {
    let mut buf = private("");
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let sink = Arc::clone(&order);
        buf.add_modify_callback(move |_| sink.lock().unwrap().push(name));
    }
    buf.insert(0, "x");
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn removed_callback_stops_running() {
    let mut buf = private("");
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let id = buf.add_modify_callback(move |_| *sink.lock().unwrap() += 1);

    buf.insert(0, "a");
    assert!(buf.remove_modify_callback(id));
    buf.insert(0, "b");

    assert_eq!(*count.lock().unwrap(), 1);
    assert!(buf.notifications().modify_callbacks().is_empty());
}

#[test]
fn unknown_callback_removal_warns_through_log_hook() {
    init_logging();
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&warnings);
    set_log_callback(move |level, message| {
        tracing::warn!(?level, text = message, "gaptext log");
        if level == LogLevel::Warn {
            sink.lock().unwrap().push(message.to_string());
        }
    });

    let mut buf = private("");
    let modify = buf.add_modify_callback(|_| {});
    let predelete = buf.add_predelete_callback(|_, _| {});
    assert!(buf.remove_modify_callback(modify));
    assert!(buf.remove_predelete_callback(predelete));
    assert!(!buf.remove_modify_callback(modify));
    assert!(!buf.remove_predelete_callback(predelete));
    clear_log_callback();

    let warnings = warnings.lock().unwrap();
    assert!(
        warnings
            .iter()
            .any(|m| m.starts_with("remove_modify_callback"))
    );
    assert!(
        warnings
            .iter()
            .any(|m| m.starts_with("remove_predelete_callback"))
    );
}
