//! Display-column arithmetic and per-line rectangle splicing.
//!
//! A display column is where a character lands on screen once tabs and control
//! characters are expanded. Everything in this module is a pure function of its
//! inputs and a [`TabSettings`]; the buffer composes these functions one line at
//! a time to implement rectangular (columnar) edits.
//!
//! Width rules:
//!
//! - a tab advances to the next multiple of the tab distance;
//! - control characters (`< 0x20`, `0x7f`) and the null-substitution character
//!   are shown as a two-column caret escape such as `^A`;
//! - everything else takes its Unicode display width, and never less than one
//!   column.
//!
//! # Examples
//!
//! ```
//! use gaptext::text::{TabSettings, expand_tabs, realign_tabs};
//!
//! let tabs = TabSettings::new(4, true);
//! assert_eq!(expand_tabs("a\tb", 0, tabs), "a   b");
//!
//! // Moved from column 0 to column 2, 'x' must still sit four columns after
//! // the start of the text; the two-column stop at 2 is not worth a tab.
//! assert_eq!(realign_tabs("\tx", 0, 2, tabs), "    x");
//! ```

use unicode_width::UnicodeWidthChar;

/// Tab and escape settings shared by every column computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabSettings {
    /// Distance between tab stops, in columns.
    pub tab_distance: usize,
    /// Whether padding and re-tabbing may emit tab characters.
    pub use_tabs: bool,
    /// Character displayed as `^@` in place of a NUL.
    pub null_subs: char,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            tab_distance: 8,
            use_tabs: true,
            null_subs: '\0',
        }
    }
}

impl TabSettings {
    /// Settings with the given tab distance and the default null substitute.
    #[must_use]
    pub fn new(tab_distance: usize, use_tabs: bool) -> Self {
        Self {
            tab_distance: tab_distance.max(1),
            use_tabs,
            null_subs: '\0',
        }
    }

    /// Columns consumed by a tab starting at `column`.
    #[inline]
    #[must_use]
    pub fn tab_width_at(&self, column: usize) -> usize {
        let dist = self.tab_distance.max(1);
        dist - column % dist
    }

    #[inline]
    fn same_tab_phase(&self, a: usize, b: usize) -> bool {
        let dist = self.tab_distance.max(1);
        a % dist == b % dist
    }
}

/// Result of splicing one line of a rectangular edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineSplice {
    /// The rewritten line (no trailing newline).
    pub text: String,
    /// Byte offset in `text` of the right edge of the edit, used as a cursor hint.
    pub end_offset: usize,
}

impl LineSplice {
    fn whole(text: String) -> Self {
        Self {
            end_offset: text.len(),
            text,
        }
    }
}

#[inline]
fn is_control(c: char) -> bool {
    (c as u32) < 0x20 || c == '\u{7f}'
}

/// Number of display columns `c` occupies when it starts at `column`.
#[must_use]
pub fn character_width(c: char, column: usize, tabs: TabSettings) -> usize {
    if c == '\t' {
        tabs.tab_width_at(column)
    } else if is_control(c) || c == tabs.null_subs {
        2
    } else {
        c.width().unwrap_or(1).max(1)
    }
}

/// The text shown on screen for `c` starting at `column`.
///
/// Only used for measuring and for tab/space comparisons; the buffer never
/// stores expanded text.
#[must_use]
pub fn expand_character(c: char, column: usize, tabs: TabSettings) -> String {
    if c == '\t' {
        " ".repeat(tabs.tab_width_at(column))
    } else if is_control(c) {
        let caret = char::from((c as u8) ^ 0x40);
        format!("^{caret}")
    } else if c == tabs.null_subs {
        "^@".to_string()
    } else {
        c.to_string()
    }
}

/// Number of newlines in `text`.
#[must_use]
pub fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Width in columns of the widest line of `text`.
#[must_use]
pub fn text_width(text: &str, tabs: TabSettings) -> usize {
    text.split('\n')
        .map(|line| {
            line.chars()
                .fold(0, |col, c| col + character_width(c, col, tabs))
        })
        .max()
        .unwrap_or(0)
}

/// Replace tabs with spaces, as if `text` started at `start_column`.
///
/// Every line of a multi-line `text` is taken to start at `start_column`, which
/// is how a rectangular block behaves.
#[must_use]
pub fn expand_tabs(text: &str, start_column: usize, tabs: TabSettings) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = start_column;
    for c in text.chars() {
        match c {
            '\t' => {
                let width = tabs.tab_width_at(column);
                out.extend(std::iter::repeat_n(' ', width));
                column += width;
            }
            '\n' => {
                column = start_column;
                out.push('\n');
            }
            _ => {
                column += character_width(c, column, tabs);
                out.push(c);
            }
        }
    }
    out
}

/// Collapse runs of spaces that exactly fill a tab stop back into tabs.
///
/// Only tab stops at least three columns wide are collapsed, so a double space
/// between sentences survives.
#[must_use]
pub fn unexpand_tabs(text: &str, start_column: usize, tabs: TabSettings) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = start_column;
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            ' ' => {
                let width = tabs.tab_width_at(column);
                if width >= 3 && rest.bytes().take(width).filter(|&b| b == b' ').count() == width
                {
                    out.push('\t');
                    i += width;
                    column += width;
                } else {
                    out.push(' ');
                    i += 1;
                    column += 1;
                }
            }
            '\n' => {
                out.push('\n');
                column = start_column;
                i += 1;
            }
            _ => {
                column += character_width(c, column, tabs);
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    out
}

/// Re-tab `text` so its non-blank characters stay on the same columns relative
/// to its start when it moves from `from_column` to `to_column`.
///
/// Text is returned unchanged when both columns sit at the same offset within a
/// tab stop. Otherwise tabs are expanded at the old position and, when
/// [`TabSettings::use_tabs`] is set, re-collapsed at the new one.
#[must_use]
pub fn realign_tabs(text: &str, from_column: usize, to_column: usize, tabs: TabSettings) -> String {
    if tabs.same_tab_phase(from_column, to_column) {
        return text.to_string();
    }
    let expanded = expand_tabs(text, from_column, tabs);
    if !tabs.use_tabs {
        return expanded;
    }
    unexpand_tabs(&expanded, to_column, tabs)
}

/// Append whitespace to `out` to advance from `from_column` to `to_column`.
pub fn add_padding(out: &mut String, from_column: usize, to_column: usize, tabs: TabSettings) {
    let mut column = from_column;
    while column < to_column {
        let width = tabs.tab_width_at(column);
        if tabs.use_tabs && width > 1 && column + width <= to_column {
            out.push('\t');
            column += width;
        } else {
            out.push(' ');
            column += 1;
        }
    }
}

/// Insert `ins_line` into `line` at display column `column`, leaving `ins_width`
/// columns before the rest of the line continues.
///
/// A line shorter than `column` is padded. A tab straddling `column` is dropped
/// and replaced by padding; a control character straddling it is kept whole.
#[must_use]
pub fn insert_column_in_line(
    line: &str,
    ins_line: &str,
    column: usize,
    ins_width: usize,
    tabs: TabSettings,
) -> LineSplice {
    let mut out = String::with_capacity(line.len() + ins_line.len() + column);
    let mut indent = 0;
    let mut split = line.len();
    let mut straddle = None;
    for (i, c) in line.char_indices() {
        let width = character_width(c, indent, tabs);
        if indent + width > column {
            split = i;
            straddle = Some((c, width));
            break;
        }
        indent += width;
        out.push(c);
    }

    let mut post_column_indent = indent;
    if let Some((c, width)) = straddle {
        if indent < column {
            post_column_indent = indent + width;
            split += c.len_utf8();
            if c != '\t' {
                out.push(c);
                indent += width;
            }
        }
    }
    let rest = &line[split..];

    if ins_line.is_empty() && rest.is_empty() {
        return LineSplice::whole(out);
    }

    if indent < column {
        add_padding(&mut out, indent, column, tabs);
        indent = column;
    }

    if !ins_line.is_empty() {
        for c in realign_tabs(ins_line, 0, indent, tabs).chars() {
            indent += character_width(c, indent, tabs);
            out.push(c);
        }
    }

    if rest.is_empty() {
        return LineSplice::whole(out);
    }

    let to_indent = ins_width + post_column_indent;
    add_padding(&mut out, indent, to_indent, tabs);
    let end_offset = out.len();
    out.push_str(&realign_tabs(rest, post_column_indent, to_indent, tabs));
    LineSplice {
        text: out,
        end_offset,
    }
}

/// Remove the columns `[rect_start, rect_end)` from `line`.
///
/// Tabs crossing either edge are removed and the gap they leave is padded, so
/// text right of the rectangle keeps its alignment. The line can get longer
/// when a tab has to be turned into spaces.
#[must_use]
pub fn delete_rect_from_line(
    line: &str,
    rect_start: usize,
    rect_end: usize,
    tabs: TabSettings,
) -> LineSplice {
    let mut out = String::with_capacity(line.len());
    let mut indent = 0;
    let mut split = line.len();
    for (i, c) in line.char_indices() {
        if indent > rect_start {
            split = i;
            break;
        }
        let width = character_width(c, indent, tabs);
        if indent + width > rect_start && (indent == rect_start || c == '\t') {
            split = i;
            break;
        }
        indent += width;
        out.push(c);
    }
    let pre_rect_indent = indent;

    let mut pos = split;
    for c in line[split..].chars() {
        if indent >= rect_end {
            break;
        }
        indent += character_width(c, indent, tabs);
        pos += c.len_utf8();
    }
    let post_rect_indent = indent;

    if pos == line.len() {
        return LineSplice::whole(out);
    }

    let indent = (rect_start + post_rect_indent - rect_end).max(pre_rect_indent);
    add_padding(&mut out, pre_rect_indent, indent, tabs);
    let end_offset = out.len();
    out.push_str(&realign_tabs(&line[pos..], post_rect_indent, indent, tabs));
    LineSplice {
        text: out,
        end_offset,
    }
}

/// Write `ins_line` over the columns `[rect_start, rect_end)` of `line`.
///
/// Text right of the rectangle stays on its original columns; the inserted text
/// is re-tabbed for its new starting column.
#[must_use]
pub fn overlay_rect_in_line(
    line: &str,
    ins_line: &str,
    rect_start: usize,
    rect_end: usize,
    tabs: TabSettings,
) -> LineSplice {
    let mut out = String::with_capacity(line.len() + ins_line.len());
    let mut in_indent = 0;
    let mut out_indent = 0;
    let mut split = line.len();
    let mut straddle = None;
    for (i, c) in line.char_indices() {
        let width = character_width(c, in_indent, tabs);
        if in_indent + width > rect_start {
            split = i;
            straddle = Some((c, width));
            break;
        }
        in_indent += width;
        out_indent += width;
        out.push(c);
    }

    let mut pos = split;
    if let Some((c, width)) = straddle {
        if in_indent < rect_start {
            pos += c.len_utf8();
            in_indent += width;
            if c != '\t' {
                out.push(c);
                out_indent += width;
            }
        }
    }

    let mut post_rect_indent = rect_end;
    let mut consumed = pos;
    for c in line[pos..].chars() {
        in_indent += character_width(c, in_indent, tabs);
        consumed += c.len_utf8();
        if in_indent >= rect_end {
            post_rect_indent = in_indent;
            break;
        }
    }
    let rest = &line[consumed..];

    if ins_line.is_empty() && rest.is_empty() {
        return LineSplice::whole(out);
    }

    if out_indent < rect_start {
        add_padding(&mut out, out_indent, rect_start, tabs);
    }
    out_indent = rect_start;

    if !ins_line.is_empty() {
        for c in realign_tabs(ins_line, 0, rect_start, tabs).chars() {
            out_indent += character_width(c, out_indent, tabs);
            out.push(c);
        }
    }

    if rest.is_empty() {
        return LineSplice::whole(out);
    }

    add_padding(&mut out, out_indent, post_rect_indent, tabs);
    let end_offset = out.len();
    out.push_str(rest);
    LineSplice {
        text: out,
        end_offset,
    }
}
