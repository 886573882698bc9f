// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::layout::FlashLayout;
use crate::order::ChunkOrder;
use crate::out::{TargetImage, WriteMode, verify_written};
use crate::reassemble::{check_size, reassemble_with};
use crate::report::FixReport;
use crate::utils::{self, progress};

#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    /// Derive and report the mapping without writing the output.
    pub dry_run: bool,
    /// Read the output back after writing and compare.
    pub verify: bool,
}

/// Repairs the scrambled dump at `input` and writes the result to `output`.
///
/// The input size is checked before anything is created; the output is
/// staged and renamed into place, so on error `output` is left untouched.
pub fn fix_file(
    input: &Path,
    output: &Path,
    layout: &FlashLayout,
    opts: FixOptions,
) -> anyhow::Result<FixReport> {
    let t0 = Instant::now();

    let scrambled = fs::read(input)
        .with_context(|| format!("Cannot read input dump {}", input.display()))?;
    crate::log_verbose!(
        "Read {} from {}",
        utils::pretty_bytes(scrambled.len() as u64),
        input.display()
    );
    check_size(&scrambled, layout)?;

    let order = ChunkOrder::lexicographic(layout)?;
    if order.is_identity() {
        crate::log_info!(
            "{} chunks: lexicographic and numeric order agree, image is copied unchanged",
            order.len()
        );
    } else {
        crate::log_verbose!("Scrambled order: {:?}", order.order());
    }

    let pb = progress::chunk_progress(layout.flash_size(), "reordering chunks")?;
    let (fixed, moves) = reassemble_with(&scrambled, layout, &order, |_| {
        pb.inc(layout.chunk_size())
    })?;
    pb.finish_and_clear();

    let mode = if opts.dry_run {
        WriteMode::Plan
    } else {
        WriteMode::Atomic
    };

    let mut target = TargetImage::open(output, mode)?;
    target.write_image(&fixed)?;
    let path = target.commit()?;

    let written = mode == WriteMode::Atomic;
    let verified = written && opts.verify;
    if !written {
        crate::log_info!("Dry run: {} not written", path.display());
    } else if verified {
        verify_written(&path, &fixed)?;
    }

    crate::log_verbose!("Done in {:.2}s", t0.elapsed().as_secs_f32());

    Ok(FixReport {
        output: output.to_path_buf(),
        layout: layout.clone(),
        order,
        moves,
        written,
        verified,
    })
}
