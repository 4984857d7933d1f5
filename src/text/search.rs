//! Byte and substring search.
//!
//! Every search returns `Ok(pos)` on a hit and `Err(boundary)` on a miss, where
//! the boundary is the buffer length for forward searches and `0` for backward
//! ones. Backward searches start with the byte *before* the given position.

use super::buffer::TextBuffer;

impl TextBuffer {
    /// First `c` at or after `start`.
    pub fn find_char_forward(&self, start: usize, c: u8) -> Result<usize, usize> {
        self.find_chars_forward(start, &[c])
    }

    /// Last `c` before `start`.
    pub fn find_char_backward(&self, start: usize, c: u8) -> Result<usize, usize> {
        self.find_chars_backward(start, &[c])
    }

    /// First byte at or after `start` that is any of `set`.
    pub fn find_chars_forward(&self, start: usize, set: &[u8]) -> Result<usize, usize> {
        let len = self.len();
        if start >= len {
            return Err(len);
        }
        let (before, after) = self.storage().segments();
        let split = before.len();
        let hit = if start < split {
            before[start..]
                .iter()
                .position(|b| set.contains(b))
                .map(|i| start + i)
                .or_else(|| after.iter().position(|b| set.contains(b)).map(|i| split + i))
        } else {
            after[start - split..]
                .iter()
                .position(|b| set.contains(b))
                .map(|i| start + i)
        };
        hit.ok_or(len)
    }

    /// Last byte before `start` that is any of `set`.
    pub fn find_chars_backward(&self, start: usize, set: &[u8]) -> Result<usize, usize> {
        let start = start.min(self.len());
        if start == 0 {
            return Err(0);
        }
        let (before, after) = self.storage().segments();
        let split = before.len();
        let hit = if start > split {
            after[..start - split]
                .iter()
                .rposition(|b| set.contains(b))
                .map(|i| split + i)
                .or_else(|| before.iter().rposition(|b| set.contains(b)))
        } else {
            before[..start].iter().rposition(|b| set.contains(b))
        };
        hit.ok_or(0)
    }

    fn matches_at(&self, pos: usize, needle: &[u8], match_case: bool) -> bool {
        let found = self.storage().range(pos, pos + needle.len());
        if match_case {
            *found == *needle
        } else {
            found.eq_ignore_ascii_case(needle)
        }
    }

    /// First occurrence of `needle` starting at or after `start`.
    ///
    /// An empty needle matches at `start` itself when `start` is inside the text.
    pub fn search_forward(&self, start: usize, needle: &str, match_case: bool) -> Result<usize, usize> {
        let len = self.len();
        let needle = needle.as_bytes();
        if needle.len() > len {
            return Err(len);
        }
        (start..=len - needle.len())
            .take_while(|&pos| pos < len)
            .find(|&pos| self.matches_at(pos, needle, match_case))
            .ok_or(len)
    }

    /// Last occurrence of `needle` ending at or before `start`.
    pub fn search_backward(&self, start: usize, needle: &str, match_case: bool) -> Result<usize, usize> {
        let start = start.min(self.len());
        let needle = needle.as_bytes();
        if needle.len() > start {
            return Err(0);
        }
        (needle.len()..=start)
            .rev()
            .filter(|&end| end > 0)
            .map(|end| end - needle.len())
            .find(|&pos| self.matches_at(pos, needle, match_case))
            .ok_or(0)
    }
}
