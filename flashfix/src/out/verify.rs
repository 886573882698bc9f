// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::fs::File;
use std::path::Path;

use flashio::prelude::*;
use flashio::utils::{DiffRange, first_diff_bytes};

/// Reads `path` back and checks it byte for byte against `expected`.
pub fn verify_written(path: &Path, expected: &[u8]) -> anyhow::Result<()> {
    let mut file =
        File::open(path).with_context(|| format!("Cannot reopen {}", path.display()))?;
    let mut disk = StdFlashIO::new(&mut file);

    let on_disk = disk.len()?;
    if on_disk != expected.len() as u64 {
        anyhow::bail!(
            "Verification failed: {} holds 0x{:X} bytes, expected 0x{:X}",
            path.display(),
            on_disk,
            expected.len()
        );
    }

    let total = expected.len();
    let mut mem = MemFlashReader::new(expected);
    if let Some((offset, got, want)) = first_diff_bytes(&mut disk, &mut mem, DiffRange::whole(total))?
    {
        anyhow::bail!(
            "Verification failed: {} differs at 0x{:X} (0x{:02X} on disk, expected 0x{:02X})",
            path.display(),
            offset,
            got,
            want
        );
    }

    crate::log_verbose!("Verified {} bytes in {}", total, path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        let data: Vec<u8> = (0..=255).collect();
        std::fs::write(&path, &data).unwrap();

        verify_written(&path, &data).unwrap();
    }

    #[test]
    fn reports_first_difference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        let data = vec![0u8; 4096];
        let mut on_disk = data.clone();
        on_disk[3000] = 0x5A;
        std::fs::write(&path, &on_disk).unwrap();

        let err = verify_written(&path, &data).unwrap_err().to_string();
        assert!(err.contains("differs at 0xBB8"), "{err}");
    }

    #[test]
    fn reports_length_difference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        std::fs::write(&path, [0u8; 10]).unwrap();

        let err = verify_written(&path, &[0u8; 12]).unwrap_err().to_string();
        assert!(err.contains("holds 0xA bytes, expected 0xC"), "{err}");
    }
}
