//! Selection ranges that follow the text through edits.
//!
//! A buffer carries three of these (primary, secondary and highlight). Each is
//! either a plain byte range or a rectangle: a byte range spanning whole lines
//! plus a display-column range within each line.

/// Which of the buffer's three selections an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionRole {
    Primary,
    Secondary,
    Highlight,
}

impl SelectionRole {
    /// All roles, in the order the buffer stores them.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Highlight];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Highlight => 2,
        }
    }
}

/// Bounds of an active selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionPosition {
    pub start: usize,
    pub end: usize,
    /// Display-column range for a rectangular selection.
    pub rect: Option<(usize, usize)>,
}

/// One selected range.
///
/// `start == end` with `zero_width` set is a caret: not selected, but still
/// tracked through edits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: bool,
    zero_width: bool,
    rectangular: bool,
    start: usize,
    end: usize,
    rect_start: usize,
    rect_end: usize,
}

impl Selection {
    /// Create an unselected selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the byte range `[start, end)`. Bounds are stored in order.
    pub fn set(&mut self, start: usize, end: usize) {
        self.selected = start != end;
        self.zero_width = start == end;
        self.rectangular = false;
        self.start = start.min(end);
        self.end = start.max(end);
    }

    /// Select columns `[rect_start, rect_end)` of the lines spanning `[start, end)`.
    pub fn set_rectangular(&mut self, start: usize, end: usize, rect_start: usize, rect_end: usize) {
        let (rect_start, rect_end) = (rect_start.min(rect_end), rect_start.max(rect_end));
        self.selected = rect_start < rect_end;
        self.zero_width = rect_start == rect_end;
        self.rectangular = true;
        self.start = start.min(end);
        self.end = start.max(end);
        self.rect_start = rect_start;
        self.rect_end = rect_end;
    }

    /// Drop the selection. Bounds are kept but no longer tracked.
    pub fn clear(&mut self) {
        self.selected = false;
        self.zero_width = false;
    }

    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn zero_width(&self) -> bool {
        self.zero_width
    }

    #[must_use]
    pub fn rectangular(&self) -> bool {
        self.rectangular
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn rect_start(&self) -> usize {
        self.rect_start
    }

    #[must_use]
    pub fn rect_end(&self) -> usize {
        self.rect_end
    }

    /// Bounds of the selection, or `None` if nothing is selected.
    #[must_use]
    pub fn position(&self) -> Option<SelectionPosition> {
        if !self.selected {
            return None;
        }
        Some(SelectionPosition {
            start: self.start,
            end: self.end,
            rect: self
                .rectangular
                .then_some((self.rect_start, self.rect_end)),
        })
    }

    /// Whether the character at `pos` is inside the selection.
    ///
    /// `line_start` and `display_column` locate `pos` for the rectangular test
    /// and are ignored for a linear selection.
    #[must_use]
    pub fn includes(&self, pos: usize, line_start: usize, display_column: usize) -> bool {
        if !self.selected {
            return false;
        }
        if self.rectangular {
            pos >= self.start
                && line_start <= self.end
                && display_column >= self.rect_start
                && display_column < self.rect_end
        } else {
            pos >= self.start && pos < self.end
        }
    }

    /// Adjust the bounds for `ndeleted` bytes removed and `ninserted` bytes
    /// inserted at `pos`.
    pub fn update(&mut self, pos: usize, ndeleted: usize, ninserted: usize) {
        if !(self.selected || self.zero_width) || pos > self.end {
            return;
        }
        if pos + ndeleted <= self.start {
            // Entirely before the selection.
            self.start = (self.start + ninserted) - ndeleted;
            self.end = (self.end + ninserted) - ndeleted;
        } else if pos <= self.start && pos + ndeleted >= self.end {
            // Swallows the selection.
            self.start = pos;
            self.end = pos;
            self.selected = false;
            self.zero_width = false;
        } else if pos <= self.start {
            // Cuts off the front.
            self.start = pos;
            self.end = (self.end + ninserted).saturating_sub(ndeleted).max(pos);
        } else if pos < self.end {
            // Starts inside.
            self.end = (self.end + ninserted).saturating_sub(ndeleted).max(self.start);
            if self.end <= self.start {
                self.selected = false;
            }
        }
    }
}
