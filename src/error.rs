//! Error types for gaptext.
//!
//! Editing operations never fail: out-of-range positions are clamped and
//! inverted ranges are reordered. Only file transfer can go wrong.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for gaptext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for file transfer into and out of a buffer.
#[derive(Debug)]
pub enum Error {
    /// The file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// Reading or writing failed part way through the transfer.
    Io(io::Error),
}

impl Error {
    /// The numeric status code used by callers that want a small integer:
    /// `1` when the file could not be opened, `2` for an I/O error mid-transfer.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Open { .. } => 1,
            Self::Io(_) => 2,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Open {
            path: PathBuf::from("/no/such/file"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/no/such/file"));
        assert_eq!(err.code(), 1);

        let err = Error::Io(io::Error::other("disk full"));
        assert!(err.to_string().contains("disk full"));
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
