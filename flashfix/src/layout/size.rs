// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::layout::error::LayoutError;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

const SUFFIXES: [(&str, u64); 10] = [
    ("kib", KIB),
    ("kb", KIB),
    ("k", KIB),
    ("mib", MIB),
    ("mb", MIB),
    ("m", MIB),
    ("gib", GIB),
    ("gb", GIB),
    ("g", GIB),
    ("b", 1),
];

/// Byte count read from a layout file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub u64);

impl ByteSize {
    #[inline]
    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl From<u64> for ByteSize {
    fn from(n: u64) -> Self {
        ByteSize(n)
    }
}

impl FromStr for ByteSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_size(s).map(ByteSize)
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ByteSizeVisitor;

        impl<'de> serde::de::Visitor<'de> for ByteSizeVisitor {
            type Value = ByteSize;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a byte count or a size string like '0x40000', '256K' or '4M'")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ByteSize(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(value)
                    .map(ByteSize)
                    .map_err(|_| E::custom(format!("size must not be negative, got {value}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<ByteSize>().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ByteSizeVisitor)
    }
}

impl std::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

fn parse_size(size: &str) -> Result<u64, LayoutError> {
    let invalid = || LayoutError::InvalidSize(size.to_string());
    let lower = size.trim().to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        return u64::from_str_radix(hex.trim(), 16).map_err(|_| invalid());
    }

    for (suffix, unit) in SUFFIXES {
        if let Some(num) = lower.strip_suffix(suffix) {
            let n = num.trim().parse::<u64>().map_err(|_| invalid())?;
            return n.checked_mul(unit).ok_or_else(invalid);
        }
    }

    lower.parse::<u64>().map_err(|_| invalid())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_plain_and_hex() {
        assert_eq!(parse_size("4194304").unwrap(), 0x400000);
        assert_eq!(parse_size("0x40000").unwrap(), 256 * 1024);
        assert_eq!(parse_size(" 0X400000 ").unwrap(), 4 * 1024 * 1024);
    }

    #[test]
    fn parses_suffixes() {
        assert_eq!(parse_size("256K").unwrap(), 0x40000);
        assert_eq!(parse_size("256 KiB").unwrap(), 0x40000);
        assert_eq!(parse_size("4M").unwrap(), 0x400000);
        assert_eq!(parse_size("4mb").unwrap(), 0x400000);
        assert_eq!(parse_size("1G").unwrap(), 1 << 30);
        assert_eq!(parse_size("512b").unwrap(), 512);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("four megs").is_err());
        assert!(parse_size("0xZZ").is_err());
        assert!(parse_size("-4M").is_err());
        assert!(parse_size("99999999999999999999G").is_err());
        assert_eq!(
            parse_size("12T").unwrap_err(),
            LayoutError::InvalidSize("12T".to_string())
        );
    }

    #[test]
    fn deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Sizes {
            a: ByteSize,
            b: ByteSize,
            c: ByteSize,
        }

        let sizes: Sizes = toml::from_str("a = 4096\nb = \"0x1000\"\nc = \"4K\"").unwrap();
        assert_eq!(sizes.a, ByteSize(4096));
        assert_eq!(sizes.b, ByteSize(4096));
        assert_eq!(sizes.c, ByteSize(4096));

        assert!(toml::from_str::<Sizes>("a = -1\nb = 1\nc = 1").is_err());
    }
}
