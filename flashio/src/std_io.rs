// SPDX-License-Identifier: MIT

use std::io::{Read, Seek, SeekFrom, Write};

use crate::{FlashIO, FlashIOResult};

/// `FlashIO` over any seekable std stream (usually a `File`).
#[derive(Debug)]
pub struct StdFlashIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdFlashIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }
}

impl<'a, T: Read + Write + Seek> FlashIO for StdFlashIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> FlashIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FlashIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> FlashIOResult {
        self.io.flush()?;
        Ok(())
    }

    fn len(&mut self) -> FlashIOResult<u64> {
        let pos = self.io.stream_position()?;
        let end = self.io.seek(SeekFrom::End(0))?;
        self.io.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }
}
