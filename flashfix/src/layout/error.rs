// SPDX-License-Identifier: MIT

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    ZeroSize(&'static str),
    Misaligned { flash_size: u64, chunk_size: u64 },
    ChunkCountMismatch { declared: usize, derived: u64 },
    TooLarge(u64),
    InvalidSize(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::ZeroSize(field) => write!(f, "{field} must be greater than zero"),
            LayoutError::Misaligned {
                flash_size,
                chunk_size,
            } => write!(
                f,
                "flash size 0x{flash_size:X} is not a multiple of chunk size 0x{chunk_size:X}"
            ),
            LayoutError::ChunkCountMismatch { declared, derived } => write!(
                f,
                "layout declares {declared} chunks but flash_size / chunk_size gives {derived}"
            ),
            LayoutError::TooLarge(size) => {
                write!(f, "flash size 0x{size:X} does not fit in memory on this host")
            }
            LayoutError::InvalidSize(value) => write!(
                f,
                "Invalid size format '{value}'. Use bytes, 0x hex, or a K, M or G suffix."
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
