//! Rectangular (columnar) edits.
//!
//! A rectangle is a run of whole lines plus a display-column range. Each
//! operation here reads the affected lines, rewrites them one at a time with the
//! per-line primitives in [`column`](super::column), and swaps the rewritten
//! block in with a single remove and insert. Observers see one pre-delete and
//! one modify notification covering the whole block.
//!
//! The buffer may hold bytes that are not UTF-8. While a block is being
//! rewritten each such byte stands in as one character from the top of the
//! last private-use plane, and is turned back into the same byte on the way
//! out, so bytes outside the rectangle are never altered.

use super::buffer::TextBuffer;
use super::column::{
    LineSplice, TabSettings, character_width, count_lines, delete_rect_from_line,
    insert_column_in_line, overlay_rect_in_line, realign_tabs, text_width,
};
use crate::event::{LogLevel, emit_log};

/// First stand-in character. Byte `b` maps to `RAW_BYTE_BASE + b`; only bytes
/// `0x80..=0xFF` are ever mapped.
const RAW_BYTE_BASE: u32 = 0x10_FF00;

#[inline]
fn is_raw_byte_char(c: char) -> bool {
    (RAW_BYTE_BASE + 0x80..=RAW_BYTE_BASE + 0xFF).contains(&u32::from(c))
}

#[inline]
fn raw_byte_char(b: u8) -> char {
    char::from_u32(RAW_BYTE_BASE + u32::from(b)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Decode `bytes` for the column functions without losing anything.
///
/// Invalid bytes become stand-in characters. A genuine character from the
/// stand-in range is split into its bytes too, so [`encode_raw`] restores it.
fn decode_raw(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            if is_raw_byte_char(c) {
                let mut buf = [0; 4];
                out.extend(c.encode_utf8(&mut buf).bytes().map(raw_byte_char));
            } else {
                out.push(c);
            }
        }
        out.extend(chunk.invalid().iter().copied().map(raw_byte_char));
    }
    out
}

/// Inverse of [`decode_raw`].
fn encode_raw(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        if is_raw_byte_char(c) {
            out.push(u8::try_from(u32::from(c) - RAW_BYTE_BASE).unwrap_or(b'?'));
        } else {
            let mut buf = [0; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    out
}

/// Byte length `text` will have once encoded.
fn encoded_len(text: &str) -> usize {
    text.chars()
        .map(|c| if is_raw_byte_char(c) { 1 } else { c.len_utf8() })
        .sum()
}

#[inline]
fn ordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Join rewritten lines with newlines. Returns the block and the offset within
/// it of the last line's `end_offset`.
fn join_lines(lines: impl IntoIterator<Item = LineSplice>) -> (String, usize) {
    let mut out = String::new();
    let mut hint = 0;
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        hint = out.len() + line.end_offset;
        out.push_str(&line.text);
    }
    (out, hint)
}

/// Drop trailing whitespace, but never the first character of the line.
fn trim_line_end(line: &mut LineSplice) {
    let first = line.text.chars().next().map_or(0, char::len_utf8);
    let keep = line
        .text
        .trim_end_matches(|c: char| c.is_ascii_whitespace())
        .len()
        .max(first);
    line.text.truncate(keep);
    line.end_offset = line.end_offset.min(keep);
}

/// Insert `ins` as a column at `column` into the lines of `block`.
///
/// The result has as many lines as `ins`; missing block lines count as empty.
fn insert_column_block(block: &str, ins: &str, column: usize, tabs: TabSettings) -> (String, usize, bool) {
    let ins_width = text_width(ins, tabs);
    let mut lines = block.split('\n');
    let spliced: Vec<LineSplice> = ins
        .split('\n')
        .map(|ins_line| {
            insert_column_in_line(lines.next().unwrap_or(""), ins_line, column, ins_width, tabs)
        })
        .collect();
    let leftover = lines.next().is_some();
    let (out, hint) = join_lines(spliced);
    (out, hint, leftover)
}

impl TextBuffer {
    /// `[start, end)` decoded for rewriting.
    fn raw_block(&self, start: usize, end: usize) -> String {
        decode_raw(&self.bytes_range(start, end))
    }

    /// Swap `[start, end)` for the encoded `block` and report it as one change.
    /// Returns the number of bytes inserted.
    fn replace_block(&mut self, start: usize, end: usize, block: &str, hint: usize) -> usize {
        let bytes = encode_raw(block);
        let deleted = self.splice_raw(start, end, &bytes);
        self.set_cursor_pos_hint(start + encoded_len(&block[..hint]));
        self.notify_modified(start, end - start, bytes.len(), &deleted);
        bytes.len()
    }

    /// Insert `text` as a column at display column `column`, starting on the
    /// line containing `start_pos`.
    ///
    /// Text right of the column moves right by the width of `text`. Lines are
    /// appended if `text` runs past the end of the buffer. Returns
    /// `(ninserted, ndeleted)` counted from the start of the first line.
    pub fn insert_column(&mut self, column: usize, start_pos: usize, text: &str) -> (usize, usize) {
        let start = self.line_start(start_pos);
        let end = self.line_end(self.skip_lines(start, count_lines(text)));
        self.notify_predelete(start, end - start);

        let block = self.raw_block(start, end);
        let ins = decode_raw(text.as_bytes());
        let (out, hint, leftover) = insert_column_block(&block, &ins, column, self.tab_settings());
        if leftover {
            emit_log(
                LogLevel::Warn,
                "insert_column: more buffer lines than inserted lines",
            );
        }
        let ninserted = self.replace_block(start, end, &out, hint);
        (ninserted, end - start)
    }

    /// Write `text` over display columns `[rect_start, rect_end)` starting on the
    /// line containing `start_pos`. With `rect_end` of `None` the rectangle is as
    /// wide as `text`.
    ///
    /// Text right of the rectangle keeps its columns. Trailing whitespace is
    /// trimmed from each rewritten line. Inverted columns are reordered.
    /// Returns `(ninserted, ndeleted)`.
    pub fn overlay_rectangular(
        &mut self,
        start_pos: usize,
        rect_start: usize,
        rect_end: Option<usize>,
        text: &str,
    ) -> (usize, usize) {
        let tabs = self.tab_settings();
        let ins = decode_raw(text.as_bytes());
        let (rect_start, rect_end) = match rect_end {
            Some(rect_end) => ordered(rect_start, rect_end),
            None => (rect_start, rect_start + text_width(&ins, tabs)),
        };
        let start = self.line_start(start_pos);
        let end = self.line_end(self.skip_lines(start, count_lines(text)));
        self.notify_predelete(start, end - start);

        let block = self.raw_block(start, end);
        let mut lines = block.split('\n');
        let spliced: Vec<LineSplice> = ins
            .split('\n')
            .map(|ins_line| {
                let line = lines.next().unwrap_or("");
                let mut splice = overlay_rect_in_line(line, ins_line, rect_start, rect_end, tabs);
                trim_line_end(&mut splice);
                splice
            })
            .collect();
        if lines.next().is_some() {
            emit_log(
                LogLevel::Warn,
                "overlay_rectangular: more buffer lines than overlaid lines",
            );
        }
        let (out, hint) = join_lines(spliced);
        let ninserted = self.replace_block(start, end, &out, hint);
        (ninserted, end - start)
    }

    /// Replace the rectangle with `text`.
    ///
    /// If `text` has fewer lines than the rectangle it is padded with empty
    /// lines; if it has more, empty lines are added below the rectangle to make
    /// room.
    pub fn replace_rectangular(
        &mut self,
        start: usize,
        end: usize,
        rect_start: usize,
        rect_end: usize,
        text: &str,
    ) {
        let tabs = self.tab_settings();
        let (start, end) = self.clamp_range(start, end);
        let (rect_start, rect_end) = ordered(rect_start, rect_end);
        let start = self.line_start(start);
        let end = self.line_end(end);
        self.notify_predelete(start, end - start);

        let inserted_lines = count_lines(text);
        let deleted_lines = self.count_lines(start, end);
        let mut ins = decode_raw(text.as_bytes());
        if inserted_lines < deleted_lines {
            ins.extend(std::iter::repeat_n('\n', deleted_lines - inserted_lines));
        }

        let block = self.raw_block(start, end);
        let (mut cleared, _) = join_lines(
            block
                .split('\n')
                .map(|line| delete_rect_from_line(line, rect_start, rect_end, tabs)),
        );
        cleared.extend(std::iter::repeat_n(
            '\n',
            inserted_lines.saturating_sub(deleted_lines),
        ));

        let (out, hint, leftover) = insert_column_block(&cleared, &ins, rect_start, tabs);
        if leftover {
            emit_log(
                LogLevel::Warn,
                "replace_rectangular: line counts of the cleared and inserted text differ",
            );
        }
        self.replace_block(start, end, &out, hint);
    }

    /// Delete display columns `[rect_start, rect_end)` from every line spanning
    /// `[start, end)`, pulling the rest of each line left.
    pub fn remove_rectangular(&mut self, start: usize, end: usize, rect_start: usize, rect_end: usize) {
        let tabs = self.tab_settings();
        let (start, end) = self.clamp_range(start, end);
        let (rect_start, rect_end) = ordered(rect_start, rect_end);
        let start = self.line_start(start);
        let end = self.line_end(end);
        self.notify_predelete(start, end - start);

        let block = self.raw_block(start, end);
        let (out, hint) = join_lines(
            block
                .split('\n')
                .map(|line| delete_rect_from_line(line, rect_start, rect_end, tabs)),
        );
        self.replace_block(start, end, &out, hint);
    }

    /// Blank display columns `[rect_start, rect_end)` on every line spanning
    /// `[start, end)` without moving the text to their right.
    pub fn clear_rectangular(&mut self, start: usize, end: usize, rect_start: usize, rect_end: usize) {
        let (start, end) = self.clamp_range(start, end);
        let newlines = "\n".repeat(self.count_lines(start, end));
        self.overlay_rectangular(start, rect_start, Some(rect_end), &newlines);
    }

    /// Text inside the rectangle, one line per buffer line, re-tabbed as if it
    /// started at column 0. Invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn text_in_rectangle(&self, start: usize, end: usize, rect_start: usize, rect_end: usize) -> String {
        let (start, end) = self.clamp_range(start, end);
        let (rect_start, rect_end) = ordered(rect_start, rect_end);
        let start = self.line_start(start);
        let end = self.line_end(end);
        let mut out = String::new();
        let mut line_start = start;
        while line_start <= end {
            let (left, right) = self.rectangular_selection_boundaries(line_start, rect_start, rect_end);
            out.push_str(&self.text_range(left, right));
            out.push('\n');
            line_start = self.line_end(right) + 1;
        }
        out.pop();
        realign_tabs(&out, rect_start, 0, self.tab_settings())
    }

    /// Byte range of the part of the line at `line_start` that falls inside
    /// display columns `[rect_start, rect_end)`.
    ///
    /// A tab crossing the left edge is included; a control character crossing it
    /// is not. Anything crossing the right edge is left out unless it is a
    /// character (not a tab) that starts inside the rectangle.
    #[must_use]
    pub fn rectangular_selection_boundaries(
        &self,
        line_start: usize,
        rect_start: usize,
        rect_end: usize,
    ) -> (usize, usize) {
        let tabs = self.tab_settings();
        let (rect_start, rect_end) = ordered(rect_start, rect_end);
        let len = self.len();
        let mut pos = line_start.min(len);
        let mut indent = 0;

        while let Some((c, n)) = self.char_at(pos) {
            if c == '\n' {
                break;
            }
            let width = character_width(c, indent, tabs);
            if indent + width > rect_start {
                if indent != rect_start && c != '\t' {
                    pos += n;
                    indent += width;
                }
                break;
            }
            indent += width;
            pos += n;
        }
        let left = pos;

        while let Some((c, n)) = self.char_at(pos) {
            if c == '\n' {
                break;
            }
            let width = character_width(c, indent, tabs);
            indent += width;
            if indent > rect_end {
                if indent - width != rect_end && c != '\t' {
                    pos += n;
                }
                break;
            }
            pos += n;
        }
        (left, pos)
    }
}
