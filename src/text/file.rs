//! Moving text between a buffer and the filesystem in fixed-size chunks.
//!
//! Reads insert each chunk as raw bytes, so a chunk boundary inside a UTF-8
//! sequence is harmless. A failed transfer is not rolled back.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use super::buffer::TextBuffer;
use crate::error::{Error, Result};

/// Chunk size used when callers have no preference.
pub const DEFAULT_FILE_CHUNK: usize = 8192;

fn open_error(path: &Path, source: std::io::Error) -> Error {
    Error::Open {
        path: path.to_path_buf(),
        source,
    }
}

impl TextBuffer {
    /// Insert the contents of `path` at `pos`, `chunk_size` bytes at a time.
    pub fn insert_file(&mut self, path: impl AsRef<Path>, pos: usize, chunk_size: usize) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| open_error(path, e))?;
        let mut chunk = vec![0; chunk_size.max(1)];
        let mut pos = pos.min(self.len());
        loop {
            let n = match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.insert_bytes(pos, &chunk[..n]);
            pos += n;
        }
        Ok(())
    }

    /// Append the contents of `path`.
    pub fn append_file(&mut self, path: impl AsRef<Path>, chunk_size: usize) -> Result<()> {
        let end = self.len();
        self.insert_file(path, end, chunk_size)
    }

    /// Replace the contents with those of `path`.
    ///
    /// The old text is removed as an ordinary (undoable, notified) deletion
    /// before the file is read.
    pub fn load_file(&mut self, path: impl AsRef<Path>, chunk_size: usize) -> Result<()> {
        self.select(0, self.len());
        self.remove_selection();
        self.append_file(path, chunk_size)
    }

    /// Write `[start, end)` to `path`, creating or truncating it.
    pub fn output_file(
        &self,
        path: impl AsRef<Path>,
        start: usize,
        end: usize,
        chunk_size: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let (start, end) = self.clamp_range(start, end);
        let mut file = File::create(path).map_err(|e| open_error(path, e))?;
        let chunk_size = chunk_size.max(1);
        let mut pos = start;
        while pos < end {
            let next = (pos + chunk_size).min(end);
            file.write_all(&self.bytes_range(pos, next))?;
            pos = next;
        }
        file.flush()?;
        Ok(())
    }

    /// Write the whole text to `path`.
    pub fn save_file(&self, path: impl AsRef<Path>, chunk_size: usize) -> Result<()> {
        self.output_file(path, 0, self.len(), chunk_size)
    }
}
