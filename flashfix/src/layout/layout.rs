// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::layout::{error::*, naming::*, size::*};
use crate::utils;

/// ESP8266 4 MiB flash.
pub const DEFAULT_FLASH_SIZE: u64 = 0x40_0000;
/// Size of each `part_N.bin` read back by the backup script.
pub const DEFAULT_CHUNK_SIZE: u64 = 0x4_0000;

/// Geometry of a flash dump split into equally sized chunks.
///
/// Only constructed through validated paths, so
/// `flash_size % chunk_size == 0` and `chunk_count() >= 1` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLayout {
    flash_size: u64,
    chunk_size: u64,
    naming: ChunkNaming,
}

/// On-disk form of a layout, every key optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    flash_size: Option<ByteSize>,
    chunk_size: Option<ByteSize>,
    chunks: Option<usize>,
    #[serde(default)]
    naming: ChunkNaming,
}

impl FlashLayout {
    pub fn new(flash_size: u64, chunk_size: u64) -> Result<Self, LayoutError> {
        Self::with_naming(flash_size, chunk_size, ChunkNaming::default())
    }

    pub fn with_naming(
        flash_size: u64,
        chunk_size: u64,
        naming: ChunkNaming,
    ) -> Result<Self, LayoutError> {
        let layout = Self {
            flash_size,
            chunk_size,
            naming,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read layout file {}", path.display()))?;
        let layout = Self::from_toml(&content)
            .with_context(|| format!("Invalid layout file {}", path.display()))?;
        crate::log_verbose!("Layout loaded from {}", path.display());
        Ok(layout)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let file: LayoutFile = toml::from_str(content)?;
        let layout = Self::with_naming(
            file.flash_size.map_or(DEFAULT_FLASH_SIZE, ByteSize::bytes),
            file.chunk_size.map_or(DEFAULT_CHUNK_SIZE, ByteSize::bytes),
            file.naming,
        )?;

        if let Some(declared) = file.chunks {
            let derived = layout.flash_size / layout.chunk_size;
            if declared as u64 != derived {
                return Err(LayoutError::ChunkCountMismatch { declared, derived }.into());
            }
        }

        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.flash_size == 0 {
            return Err(LayoutError::ZeroSize("flash_size"));
        }
        if self.chunk_size == 0 {
            return Err(LayoutError::ZeroSize("chunk_size"));
        }
        if self.flash_size % self.chunk_size != 0 {
            return Err(LayoutError::Misaligned {
                flash_size: self.flash_size,
                chunk_size: self.chunk_size,
            });
        }
        if usize::try_from(self.flash_size).is_err() {
            return Err(LayoutError::TooLarge(self.flash_size));
        }
        Ok(())
    }

    #[inline]
    pub fn flash_size(&self) -> u64 {
        self.flash_size
    }

    #[inline]
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    #[inline]
    pub fn naming(&self) -> &ChunkNaming {
        &self.naming
    }

    /// Number of chunks, `flash_size / chunk_size`.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        (self.flash_size / self.chunk_size) as usize
    }

    #[inline]
    pub fn flash_len(&self) -> usize {
        self.flash_size as usize
    }

    #[inline]
    pub fn chunk_len(&self) -> usize {
        self.chunk_size as usize
    }

    /// Byte range of chunk `index` inside the image.
    #[inline]
    pub fn chunk_range(&self, index: usize) -> Range<usize> {
        let start = index * self.chunk_len();
        start..start + self.chunk_len()
    }

    pub fn print_summary(&self) {
        crate::log_info!("Flash layout{}", self);
    }
}

impl Default for FlashLayout {
    fn default() -> Self {
        Self {
            flash_size: DEFAULT_FLASH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            naming: ChunkNaming::default(),
        }
    }
}

impl core::fmt::Display for FlashLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let rows = [
            (
                "Flash size",
                format!(
                    "0x{:X} ({})",
                    self.flash_size,
                    utils::pretty_bytes(self.flash_size)
                ),
            ),
            (
                "Chunk size",
                format!(
                    "0x{:X} ({})",
                    self.chunk_size,
                    utils::pretty_bytes(self.chunk_size)
                ),
            ),
            ("Chunks", self.chunk_count().to_string()),
            ("Naming", self.naming.to_string()),
        ];

        writeln!(f, "\n  ┌────────────┬──────────────────────────────┐")?;
        for (key, value) in rows {
            writeln!(
                f,
                "  | {key:<10} | {v:<28} |",
                v = utils::truncate(&value, 28)
            )?;
        }
        writeln!(f, "  └────────────┴──────────────────────────────┘")
    }
}
