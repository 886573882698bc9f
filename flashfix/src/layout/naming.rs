// SPDX-License-Identifier: MIT

use serde::Deserialize;

pub const DEFAULT_PREFIX: &str = "part_";
pub const DEFAULT_SUFFIX: &str = ".bin";

/// File naming used when the dump was split: `{prefix}{index}{suffix}`,
/// index in plain decimal without zero padding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkNaming {
    pub prefix: String,
    pub suffix: String,
}

impl ChunkNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Name of the chunk file holding chunk `index`.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{index}{}", self.prefix, self.suffix)
    }
}

impl Default for ChunkNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}

impl std::fmt::Display for ChunkNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{i}}{}", self.prefix, self.suffix)
    }
}
