// SPDX-License-Identifier: MIT

use colored::Colorize;
use std::path::PathBuf;

use crate::layout::FlashLayout;
use crate::order::ChunkOrder;
use crate::reassemble::ChunkMove;
use crate::utils;

/// Outcome of a fix run, printable as an audit table.
#[derive(Debug, Clone)]
pub struct FixReport {
    pub output: PathBuf,
    pub layout: FlashLayout,
    pub order: ChunkOrder,
    /// One entry per destination chunk, in chunk order.
    pub moves: Vec<ChunkMove>,
    pub written: bool,
    pub verified: bool,
}

impl FixReport {
    /// Name of the chunk file whose bytes were found at `mv.input_pos`.
    pub fn source_name(&self, mv: &ChunkMove) -> String {
        let index = self.order.order()[mv.input_pos];
        self.layout.naming().file_name(index)
    }

    /// Byte offset of the block in the scrambled input.
    pub fn input_offset(&self, mv: &ChunkMove) -> u64 {
        mv.input_pos as u64 * self.layout.chunk_size()
    }

    pub fn moved_count(&self) -> usize {
        self.moves.iter().filter(|mv| mv.moved()).count()
    }
}

impl core::fmt::Display for FixReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Reorder mapping (chunk_index <- input_chunk_position):")?;
        writeln!(
            f,
            "  ┌───────┬───────────┬────────────┬──────────────────────┬──────────┐"
        )?;
        writeln!(
            f,
            "  | Chunk | Input pos | Offset     | Source               | CRC32    |"
        )?;
        writeln!(
            f,
            "  ├───────┼───────────┼────────────┼──────────────────────┼──────────┤"
        )?;
        for mv in &self.moves {
            let name = self.source_name(mv);
            let row = format!(
                "  | {c:>5} | {p:>9} | 0x{o:08X} | {n:<20} | {crc:08X} |",
                c = mv.chunk,
                p = mv.input_pos,
                o = self.input_offset(mv),
                n = utils::truncate(&name, 20),
                crc = mv.crc32,
            );
            if mv.moved() {
                writeln!(f, "{}", row.yellow())?;
            } else {
                writeln!(f, "{row}")?;
            }
        }
        writeln!(
            f,
            "  └───────┴───────────┴────────────┴──────────────────────┴──────────┘"
        )?;
        write!(
            f,
            "  {} of {} chunks moved",
            self.moved_count(),
            self.moves.len()
        )
    }
}
