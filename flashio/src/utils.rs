// SPDX-License-Identifier: MIT

use crate::prelude::*;

/// Common range configuration for streamed comparisons.
#[derive(Clone, Copy, Debug)]
pub struct DiffRange {
    pub offset1: u64,
    pub offset2: u64,
    pub total_bytes: usize,
    pub chunk_size: usize,
}

impl DiffRange {
    /// Create a range config. Panics if `chunk_size == 0`.
    pub fn new(offset1: u64, offset2: u64, total_bytes: usize, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self {
            offset1,
            offset2,
            total_bytes,
            chunk_size,
        }
    }

    /// Whole-image range starting at offset 0 on both sides.
    pub fn whole(total_bytes: usize) -> Self {
        Self::new(0, 0, total_bytes, crate::STREAM_BUF_SIZE)
    }
}

//
// first_diff_bytes
//

/// Returns `(offset, byte1, byte2)` of the first mismatch, relative to the
/// start of the range.
pub fn first_diff_bytes<IO1, IO2>(
    io1: &mut IO1,
    io2: &mut IO2,
    range: DiffRange,
) -> FlashIOResult<Option<(u64, u8, u8)>>
where
    IO1: FlashIO + ?Sized,
    IO2: FlashIO + ?Sized,
{
    debug_assert!(range.chunk_size > 0, "chunk_size must be > 0");

    let DiffRange {
        offset1,
        offset2,
        total_bytes,
        chunk_size,
    } = range;

    let mut buf1 = vec![0u8; chunk_size];
    let mut buf2 = vec![0u8; chunk_size];

    let mut remaining = total_bytes;
    let mut pos1 = offset1;
    let mut pos2 = offset2;
    let mut global_offset = 0u64;

    while remaining > 0 {
        let to_read = remaining.min(chunk_size);

        io1.read_at(pos1, &mut buf1[..to_read])?;
        io2.read_at(pos2, &mut buf2[..to_read])?;

        if let Some(i) = buf1[..to_read]
            .iter()
            .zip(&buf2[..to_read])
            .position(|(a, b)| a != b)
        {
            return Ok(Some((global_offset + i as u64, buf1[i], buf2[i])));
        }

        pos1 += to_read as u64;
        pos2 += to_read as u64;
        global_offset += to_read as u64;
        remaining -= to_read;
    }

    Ok(None)
}
