// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use flashio::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Nothing is written, only the plan is logged.
    Plan,
    /// Written to a temporary file next to the destination, renamed on commit.
    Atomic,
}

/// Destination of the fixed image.
///
/// The destination path is only touched by `commit`; dropping an
/// uncommitted target removes the temporary file.
pub struct TargetImage {
    /// Temporary file in the destination directory (Atomic mode).
    tmp: Option<tempfile::NamedTempFile>,
    /// Final destination path.
    pub path: PathBuf,
    pub mode: WriteMode,
}

impl TargetImage {
    pub fn open(output: &Path, mode: WriteMode) -> anyhow::Result<Self> {
        match mode {
            WriteMode::Plan => Ok(Self {
                tmp: None,
                path: output.to_path_buf(),
                mode,
            }),
            WriteMode::Atomic => {
                let dir = match output.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                fs::create_dir_all(dir)
                    .with_context(|| format!("Cannot create directory {}", dir.display()))?;
                let tmp = tempfile::Builder::new()
                    .prefix(".flashfix-")
                    .suffix(".tmp")
                    .tempfile_in(dir)
                    .with_context(|| format!("Cannot create temporary file in {}", dir.display()))?;
                crate::log_verbose!("Staging output in {}", tmp.path().display());
                Ok(Self {
                    tmp: Some(tmp),
                    path: output.to_path_buf(),
                    mode,
                })
            }
        }
    }

    pub fn as_io(&mut self) -> anyhow::Result<StdFlashIO<'_, fs::File>> {
        let tmp = self
            .tmp
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("No file backing in Plan mode"))?;
        Ok(StdFlashIO::new(tmp.as_file_mut()))
    }

    /// Writes the whole image at offset 0 of the staged file.
    pub fn write_image(&mut self, image: &[u8]) -> anyhow::Result<()> {
        if self.mode == WriteMode::Plan {
            crate::log_verbose!("Plan mode: skipping write of {}", self.path.display());
            return Ok(());
        }
        let mut io = self.as_io()?;
        io.write_in_pieces(0, image, flashio::STREAM_BUF_SIZE)
            .context("Cannot write staged image")?;
        io.flush().context("Cannot flush staged image")?;
        Ok(())
    }

    /// Syncs the staged file and renames it over the destination.
    pub fn commit(self) -> anyhow::Result<PathBuf> {
        let Some(tmp) = self.tmp else {
            return Ok(self.path);
        };
        tmp.as_file()
            .sync_all()
            .context("Cannot sync staged image")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Cannot move fixed image to {}", self.path.display()))?;
        Ok(self.path)
    }
}
