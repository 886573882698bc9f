// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for FlashIO operations.
pub type FlashIOResult<T = ()> = core::result::Result<T, FlashIOError>;

/// Error type for FlashIO operations.
#[derive(Debug)]
pub enum FlashIOError {
    /// Underlying file or device error.
    Io(std::io::Error),

    /// Attempted to read or write past the end of the backing storage.
    OutOfBounds { offset: u64, len: usize, size: u64 },

    /// Caller passed an argument the backend cannot honor.
    Invalid(&'static str),
}

impl FlashIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            FlashIOError::Io(_) => "I/O error",
            FlashIOError::OutOfBounds { .. } => "Out of bounds",
            FlashIOError::Invalid(msg) => msg,
        }
    }
}

impl From<std::io::Error> for FlashIOError {
    #[cold]
    #[inline(never)]
    fn from(e: std::io::Error) -> Self {
        FlashIOError::Io(e)
    }
}

impl fmt::Display for FlashIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashIOError::Io(e) => write!(f, "{}: {e}", self.msg()),
            FlashIOError::OutOfBounds { offset, len, size } => write!(
                f,
                "{}: {len} bytes at 0x{offset:X} exceed storage of 0x{size:X} bytes",
                self.msg()
            ),
            FlashIOError::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FlashIOError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlashIOError::Io(e) => Some(e),
            _ => None,
        }
    }
}
