// SPDX-License-Identifier: MIT

use core::fmt;

/// A chunk ordering that is not a permutation of `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// `index` at `position` is not below `len`.
    OutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },
    /// `index` appears at both `first` and `second`.
    Duplicate {
        index: usize,
        first: usize,
        second: usize,
    },
    /// Ordering length differs from the layout chunk count.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::OutOfRange {
                position,
                index,
                len,
            } => write!(
                f,
                "chunk index {index} at position {position} is out of range for {len} chunks"
            ),
            OrderError::Duplicate {
                index,
                first,
                second,
            } => write!(
                f,
                "chunk index {index} appears at positions {first} and {second}"
            ),
            OrderError::LengthMismatch { expected, actual } => {
                write!(f, "ordering has {actual} entries, layout has {expected} chunks")
            }
        }
    }
}

impl std::error::Error for OrderError {}
