// SPDX-License-Identifier: MIT

use core::fmt;

use flashio::prelude::*;

use crate::layout::FlashLayout;
use crate::order::{ChunkOrder, OrderError, invert_order};

#[derive(Debug)]
pub enum FixError {
    /// Input length differs from the configured flash size.
    SizeMismatch { expected: u64, actual: u64 },
    /// Chunk mapping does not fit the layout.
    Order(OrderError),
    IO(FlashIOError),
}

impl fmt::Display for FixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixError::SizeMismatch { expected, actual } => write!(
                f,
                "Expected flash image of 0x{expected:X} bytes, got 0x{actual:X}"
            ),
            FixError::Order(e) => write!(f, "Invalid chunk mapping: {e}"),
            FixError::IO(e) => write!(f, "Chunk copy failed: {e}"),
        }
    }
}

impl std::error::Error for FixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixError::SizeMismatch { .. } => None,
            FixError::Order(e) => Some(e),
            FixError::IO(e) => Some(e),
        }
    }
}

impl From<OrderError> for FixError {
    fn from(e: OrderError) -> Self {
        FixError::Order(e)
    }
}

impl From<FlashIOError> for FixError {
    fn from(e: FlashIOError) -> Self {
        FixError::IO(e)
    }
}

pub type FixResult<T = ()> = Result<T, FixError>;

/// One block moved from the scrambled image into place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMove {
    /// Destination chunk index.
    pub chunk: usize,
    /// Position the block was read from.
    pub input_pos: usize,
    pub crc32: u32,
}

impl ChunkMove {
    #[inline]
    pub fn moved(&self) -> bool {
        self.chunk != self.input_pos
    }
}

/// Copies chunks from `src` to `dst` so that destination chunk `i` holds
/// source chunk `mapping[i]`.
///
/// `mapping` must be a permutation of `0..chunk_count`; nothing is copied
/// otherwise. `on_chunk` sees every move in destination order.
pub fn permute_chunks<S, D, F>(
    src: &mut S,
    dst: &mut D,
    layout: &FlashLayout,
    mapping: &[usize],
    mut on_chunk: F,
) -> FixResult<Vec<ChunkMove>>
where
    S: FlashIO + ?Sized,
    D: FlashIO + ?Sized,
    F: FnMut(&ChunkMove),
{
    if mapping.len() != layout.chunk_count() {
        return Err(OrderError::LengthMismatch {
            expected: layout.chunk_count(),
            actual: mapping.len(),
        }
        .into());
    }
    // a duplicate would copy one chunk twice and drop another
    invert_order(mapping)?;

    let mut buf = vec![0u8; layout.chunk_len()];
    let mut moves = Vec::with_capacity(mapping.len());

    for (chunk, &input_pos) in mapping.iter().enumerate() {
        src.read_chunk(input_pos, &mut buf)?;
        dst.write_chunk(chunk, &buf)?;

        let mv = ChunkMove {
            chunk,
            input_pos,
            crc32: crc32fast::hash(&buf),
        };
        on_chunk(&mv);
        moves.push(mv);
    }

    dst.flush()?;
    Ok(moves)
}

/// Restores numeric chunk order of a scrambled image.
///
/// Returns the fixed image (freshly allocated, same size) and the moves in
/// chunk order.
pub fn reassemble_with<F>(
    scrambled: &[u8],
    layout: &FlashLayout,
    order: &ChunkOrder,
    on_chunk: F,
) -> FixResult<(Vec<u8>, Vec<ChunkMove>)>
where
    F: FnMut(&ChunkMove),
{
    check_size(scrambled, layout)?;

    let mut fixed = vec![0u8; layout.flash_len()];
    let moves = {
        let mut src = MemFlashReader::new(scrambled);
        let mut dst = MemFlashIO::new(&mut fixed);
        permute_chunks(&mut src, &mut dst, layout, order.inverse(), on_chunk)?
    };
    Ok((fixed, moves))
}

pub fn reassemble(
    scrambled: &[u8],
    layout: &FlashLayout,
    order: &ChunkOrder,
) -> FixResult<(Vec<u8>, Vec<ChunkMove>)> {
    reassemble_with(scrambled, layout, order, |_| {})
}

/// Reproduces the glob concatenation: position `p` receives chunk `order[p]`.
pub fn scramble(image: &[u8], layout: &FlashLayout, order: &ChunkOrder) -> FixResult<Vec<u8>> {
    check_size(image, layout)?;

    let mut scrambled = vec![0u8; layout.flash_len()];
    {
        let mut src = MemFlashReader::new(image);
        let mut dst = MemFlashIO::new(&mut scrambled);
        permute_chunks(&mut src, &mut dst, layout, order.order(), |_| {})?;
    }
    Ok(scrambled)
}

/// Fails with [`FixError::SizeMismatch`] unless `image` spans the whole flash.
pub fn check_size(image: &[u8], layout: &FlashLayout) -> FixResult {
    if image.len() as u64 != layout.flash_size() {
        return Err(FixError::SizeMismatch {
            expected: layout.flash_size(),
            actual: image.len() as u64,
        });
    }
    Ok(())
}
