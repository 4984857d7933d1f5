//! Raw gap-buffer storage.
//!
//! [`GapBuffer`] keeps the text as one byte vector with a free region (the gap)
//! somewhere inside it. Edits move the gap to the edit point first, so a run of
//! edits in one place costs time proportional to how far the gap travels, not to
//! the size of the text. When an insertion does not fit in the gap the storage is
//! reallocated with a fresh gap of `inserted + PREFERRED_GAP_SIZE` bytes.

use std::borrow::Cow;

use crate::event::{LogLevel, emit_log};

/// Size of the free region left behind after a reallocation.
pub const PREFERRED_GAP_SIZE: usize = 80;

/// Byte storage with a movable gap.
///
/// Logical position `p` lives at raw index `p` when `p < gap_start`, and at
/// `p + gap_len()` otherwise.
#[derive(Clone, Debug)]
pub struct GapBuffer {
    buf: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl GapBuffer {
    /// Create an empty buffer able to hold `capacity` bytes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let raw = capacity + PREFERRED_GAP_SIZE;
        Self {
            buf: vec![0; raw],
            gap_start: 0,
            gap_end: raw,
        }
    }

    /// Create a buffer holding `bytes`, with the gap centered in the text.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len();
        let gap_start = len / 2;
        let gap_end = gap_start + PREFERRED_GAP_SIZE;
        let mut buf = vec![0; len + PREFERRED_GAP_SIZE];
        buf[..gap_start].copy_from_slice(&bytes[..gap_start]);
        buf[gap_end..].copy_from_slice(&bytes[gap_start..]);
        Self {
            buf,
            gap_start,
            gap_end,
        }
    }

    /// Logical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len() - self.gap_len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total raw capacity, gap included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Raw index of the first gap byte.
    #[must_use]
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    /// Raw index one past the last gap byte.
    #[must_use]
    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Byte at a logical position.
    #[must_use]
    pub fn byte(&self, pos: usize) -> Option<u8> {
        if pos >= self.len() {
            return None;
        }
        if pos < self.gap_start {
            Some(self.buf[pos])
        } else {
            Some(self.buf[pos + self.gap_len()])
        }
    }

    /// The stored text on either side of the gap.
    #[must_use]
    pub fn segments(&self) -> (&[u8], &[u8]) {
        (&self.buf[..self.gap_start], &self.buf[self.gap_end..])
    }

    /// Bytes of a logical range. Borrowed unless the range straddles the gap.
    ///
    /// The caller guarantees `start <= end <= len()`.
    #[must_use]
    pub fn range(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        debug_assert!(start <= end && end <= self.len());
        let gap = self.gap_len();
        if end <= self.gap_start {
            Cow::Borrowed(&self.buf[start..end])
        } else if start >= self.gap_start {
            Cow::Borrowed(&self.buf[start + gap..end + gap])
        } else {
            let mut out = Vec::with_capacity(end - start);
            out.extend_from_slice(&self.buf[start..self.gap_start]);
            out.extend_from_slice(&self.buf[self.gap_end..end + gap]);
            Cow::Owned(out)
        }
    }

    /// Move the gap so that it starts at logical position `pos`.
    pub fn move_gap(&mut self, pos: usize) {
        let gap = self.gap_len();
        if pos > self.gap_start {
            self.buf
                .copy_within(self.gap_end..pos + gap, self.gap_start);
        } else {
            self.buf.copy_within(pos..self.gap_start, pos + gap);
        }
        self.gap_end = pos + gap;
        self.gap_start = pos;
    }

    /// Reallocate the storage with a gap of `gap_len` bytes at `gap_start`.
    pub fn reallocate_with_gap(&mut self, new_gap_start: usize, new_gap_len: usize) {
        let len = self.len();
        let new_gap_end = new_gap_start + new_gap_len;
        emit_log(
            LogLevel::Debug,
            &format!("gap buffer reallocating: {len} bytes, gap of {new_gap_len} at {new_gap_start}"),
        );

        let mut new_buf = vec![0; len + new_gap_len];
        let (before, after) = self.segments();
        if new_gap_start <= self.gap_start {
            new_buf[..new_gap_start].copy_from_slice(&before[..new_gap_start]);
            let moved = self.gap_start - new_gap_start;
            new_buf[new_gap_end..new_gap_end + moved].copy_from_slice(&before[new_gap_start..]);
            new_buf[new_gap_end + moved..].copy_from_slice(after);
        } else {
            let split = new_gap_start - self.gap_start;
            new_buf[..self.gap_start].copy_from_slice(before);
            new_buf[self.gap_start..new_gap_start].copy_from_slice(&after[..split]);
            new_buf[new_gap_end..].copy_from_slice(&after[split..]);
        }

        self.buf = new_buf;
        self.gap_start = new_gap_start;
        self.gap_end = new_gap_end;
    }

    /// Make room for `n` bytes at `pos` and leave the gap starting there.
    fn prepare_insert(&mut self, pos: usize, n: usize) {
        if n > self.gap_len() {
            self.reallocate_with_gap(pos, n + PREFERRED_GAP_SIZE);
        } else if pos != self.gap_start {
            self.move_gap(pos);
        }
    }

    /// Insert bytes at a logical position. The caller clamps `pos`.
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) {
        debug_assert!(pos <= self.len());
        self.prepare_insert(pos, bytes.len());
        self.buf[pos..pos + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();
    }

    /// Copy `[start, end)` of another buffer into this one at `pos`, straight
    /// from the source's storage segments.
    pub fn insert_from(&mut self, pos: usize, src: &GapBuffer, start: usize, end: usize) {
        let n = end - start;
        self.prepare_insert(pos, n);
        let src_gap = src.gap_len();
        if end <= src.gap_start {
            self.buf[pos..pos + n].copy_from_slice(&src.buf[start..end]);
        } else if start >= src.gap_start {
            self.buf[pos..pos + n].copy_from_slice(&src.buf[start + src_gap..end + src_gap]);
        } else {
            let first = src.gap_start - start;
            self.buf[pos..pos + first].copy_from_slice(&src.buf[start..src.gap_start]);
            self.buf[pos + first..pos + n]
                .copy_from_slice(&src.buf[src.gap_end..src.gap_end + n - first]);
        }
        self.gap_start += n;
    }

    /// Remove `[start, end)` by widening the gap over it. Returns the removed bytes.
    pub fn remove(&mut self, start: usize, end: usize) -> Vec<u8> {
        debug_assert!(start <= end && end <= self.len());
        let removed = self.range(start, end).into_owned();
        if start > self.gap_start {
            self.move_gap(start);
        } else if end < self.gap_start {
            self.move_gap(end);
        }
        self.gap_end += end - self.gap_start;
        self.gap_start = start;
        removed
    }

    /// Copy the whole logical content out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let (before, after) = self.segments();
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(before);
        out.extend_from_slice(after);
        out
    }

    /// Check the storage invariant: gap bounds inside the raw capacity.
    #[must_use]
    pub fn check_invariant(&self) -> bool {
        self.gap_start <= self.gap_end
            && self.gap_end <= self.buf.len()
            && self.len() == self.buf.len() - (self.gap_end - self.gap_start)
    }
}
