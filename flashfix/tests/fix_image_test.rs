// SPDX-License-Identifier: MIT

use flashfix::layout::{FlashLayout, LayoutError};
use flashfix::{ChunkOrder, FixError, FixOptions, fix_file, scramble};
use std::fs;
use std::path::PathBuf;

/// 4 MiB image where chunk `c` is filled with byte `c`.
fn tagged_image(layout: &FlashLayout) -> Vec<u8> {
    let mut image = vec![0u8; layout.flash_len()];
    for c in 0..layout.chunk_count() {
        image[layout.chunk_range(c)].fill(c as u8);
    }
    image
}

fn write_scrambled(dir: &std::path::Path, layout: &FlashLayout) -> (PathBuf, Vec<u8>) {
    let order = ChunkOrder::lexicographic(layout).unwrap();
    let image = tagged_image(layout);
    let scrambled = scramble(&image, layout, &order).unwrap();
    let input = dir.join("backup_full.bin");
    fs::write(&input, &scrambled).unwrap();
    (input, image)
}

#[test]
fn fixes_scrambled_esp8266_dump() {
    let dir = tempfile::tempdir().unwrap();
    let layout = FlashLayout::default();
    let (input, _) = write_scrambled(dir.path(), &layout);
    let output = dir.path().join("backup_full_fixed.bin");

    let opts = FixOptions {
        dry_run: false,
        verify: true,
    };
    let report = fix_file(&input, &output, &layout, opts).unwrap();
    assert!(report.written);
    assert!(report.verified);
    assert_eq!(report.moves.len(), 16);

    let fixed = fs::read(&output).unwrap();
    assert_eq!(fixed.len(), 0x400000);
    for c in 0..16 {
        let chunk = &fixed[c * 0x40000..(c + 1) * 0x40000];
        assert!(chunk.iter().all(|&b| b == c as u8), "chunk {c} not restored");
    }
}

#[test]
fn wrong_size_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("short.bin");
    fs::write(&input, vec![0u8; 0x3C0000]).unwrap();
    let output = dir.path().join("out/fixed.bin");

    let err = fix_file(&input, &output, &FlashLayout::default(), FixOptions::default())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FixError>(),
        Some(FixError::SizeMismatch {
            expected: 0x400000,
            actual: 0x3C0000
        })
    ));
    assert!(err.to_string().contains("0x400000"));
    assert!(err.to_string().contains("0x3C0000"));
    assert!(!output.exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fixed.bin");

    let err = fix_file(
        &dir.path().join("nope.bin"),
        &output,
        &FlashLayout::default(),
        FixOptions::default(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("nope.bin"));
    assert!(!output.exists());
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = FlashLayout::default();
    let (input, _) = write_scrambled(dir.path(), &layout);
    let output = dir.path().join("fixed.bin");

    let opts = FixOptions {
        dry_run: true,
        verify: true,
    };
    let report = fix_file(&input, &output, &layout, opts).unwrap();

    assert!(!report.written);
    assert!(!report.verified);
    assert_eq!(report.moved_count(), 14);
    assert!(!output.exists());
}

#[test]
fn creates_output_directories() {
    let dir = tempfile::tempdir().unwrap();
    let layout = FlashLayout::new(0x3000, 0x200).unwrap();
    let (input, image) = write_scrambled(dir.path(), &layout);
    let output = dir.path().join("a/b/c/fixed.bin");

    fix_file(&input, &output, &layout, FixOptions::default()).unwrap();

    assert_eq!(fs::read(&output).unwrap(), image);
}

#[test]
fn fixing_twice_scrambles_again() {
    // the fix is a permutation, not an idempotent normalisation
    let dir = tempfile::tempdir().unwrap();
    let layout = FlashLayout::new(0x1000, 0x100).unwrap();
    let (input, image) = write_scrambled(dir.path(), &layout);
    let once = dir.path().join("once.bin");
    let twice = dir.path().join("twice.bin");

    fix_file(&input, &once, &layout, FixOptions::default()).unwrap();
    fix_file(&once, &twice, &layout, FixOptions::default()).unwrap();

    assert_eq!(fs::read(&once).unwrap(), image);
    assert_ne!(fs::read(&twice).unwrap(), image);
}

#[test]
fn bundled_layout_file_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("layouts/esp8266-4m.toml");
    let layout = FlashLayout::from_file(&path).unwrap();
    assert_eq!(layout, FlashLayout::default());
}

#[test]
fn layout_file_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "flash_size = \"4M\"\nchunk_size = \"3K\"\n").unwrap();

    let err = FlashLayout::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
    assert!(matches!(
        err.downcast_ref::<LayoutError>(),
        Some(LayoutError::Misaligned { .. })
    ));
}
