// SPDX-License-Identifier: MIT

// Core modules
pub mod errors;
pub mod utils;

// Backend modules
mod mem;
mod std_io;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::FlashIO;
    pub use super::FlashIOExt;
    pub use super::errors::*;
    pub use super::mem::{MemFlashIO, MemFlashReader};
    pub use super::std_io::StdFlashIO;
}

use errors::*;

/// Size of the scratch buffer used by streamed helpers.
/// 64 KiB keeps a 256 KiB flash chunk at four round trips.
pub const STREAM_BUF_SIZE: usize = 64 * 1024;

/// Positional block IO.
///
/// Reads and writes happen at absolute offsets; backends may be RAM, files
/// or raw devices.
pub trait FlashIO {
    /// Writes `data` at `offset` (absolute).
    fn write_at(&mut self, offset: u64, data: &[u8]) -> FlashIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset` (absolute).
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FlashIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> FlashIOResult;

    /// Current size of the backing storage in bytes.
    fn len(&mut self) -> FlashIOResult<u64>;

    fn is_empty(&mut self) -> FlashIOResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Chunk-addressed helpers on top of [`FlashIO`].
///
/// A flash image is a sequence of equally sized chunks; these helpers turn a
/// chunk index into an absolute offset and check the arithmetic on the way.
pub trait FlashIOExt: FlashIO {
    /// Reads chunk `index` (of `buf.len()` bytes) into `buf`.
    #[inline]
    fn read_chunk(&mut self, index: usize, buf: &mut [u8]) -> FlashIOResult {
        let offset = chunk_offset(index, buf.len())?;
        self.read_at(offset, buf)
    }

    /// Writes `data` as chunk `index` (of `data.len()` bytes).
    #[inline]
    fn write_chunk(&mut self, index: usize, data: &[u8]) -> FlashIOResult {
        let offset = chunk_offset(index, data.len())?;
        self.write_at(offset, data)
    }

    /// Writes `buf` at `offset` in pieces of `piece` bytes or less.
    #[inline]
    fn write_in_pieces(&mut self, offset: u64, buf: &[u8], piece: usize) -> FlashIOResult {
        if piece == 0 {
            return Err(FlashIOError::Invalid("write_in_pieces: piece size is zero"));
        }
        let mut off = offset;
        for part in buf.chunks(piece) {
            self.write_at(off, part)?;
            off += part.len() as u64;
        }
        Ok(())
    }
}

impl<T: FlashIO + ?Sized> FlashIOExt for T {}

/// Absolute offset of chunk `index` for chunks of `chunk_size` bytes.
#[inline]
pub fn chunk_offset(index: usize, chunk_size: usize) -> FlashIOResult<u64> {
    (index as u64)
        .checked_mul(chunk_size as u64)
        .ok_or(FlashIOError::Invalid("chunk offset overflow"))
}
