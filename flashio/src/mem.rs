// SPDX-License-Identifier: MIT

use core::ops::Range;

use crate::{FlashIO, FlashIOError, FlashIOResult};

fn mem_range(size: usize, offset: u64, len: usize) -> FlashIOResult<Range<usize>> {
    let size = size as u64;
    match offset.checked_add(len as u64) {
        Some(end) if end <= size => Ok(offset as usize..end as usize),
        _ => Err(FlashIOError::OutOfBounds { offset, len, size }),
    }
}

/// In-memory implementation of `FlashIO`.
///
/// Backs the fixed output while a dump is repaired.
#[derive(Debug)]
pub struct MemFlashIO<'a> {
    buffer: &'a mut [u8],
}

impl<'a> MemFlashIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }
}

impl<'a> FlashIO for MemFlashIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> FlashIOResult {
        let range = mem_range(self.buffer.len(), offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FlashIOResult {
        let range = mem_range(self.buffer.len(), offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> FlashIOResult {
        Ok(())
    }

    #[inline]
    fn len(&mut self) -> FlashIOResult<u64> {
        Ok(self.buffer.len() as u64)
    }
}

/// Read-only view over a borrowed image, for scrambled input and
/// expected contents. Writes fail with [`FlashIOError::Invalid`].
#[derive(Debug, Clone, Copy)]
pub struct MemFlashReader<'a> {
    buffer: &'a [u8],
}

impl<'a> MemFlashReader<'a> {
    #[inline]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }
}

impl<'a> FlashIO for MemFlashReader<'a> {
    fn write_at(&mut self, _offset: u64, _data: &[u8]) -> FlashIOResult {
        Err(FlashIOError::Invalid("MemFlashReader is read-only"))
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FlashIOResult {
        let range = mem_range(self.buffer.len(), offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> FlashIOResult {
        Ok(())
    }

    #[inline]
    fn len(&mut self) -> FlashIOResult<u64> {
        Ok(self.buffer.len() as u64)
    }
}
