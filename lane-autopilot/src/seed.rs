//! World seeds. A session is reproducible from its seed alone, so the seed
//! travels through configs and reports as its own type rather than a bare
//! integer.

use anyhow::{anyhow, Context, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Seed of one `TrackWorld`. Parses from decimal or `0x`-prefixed hex and
/// always displays in the fixed-width hex form, so a seed copied out of a
/// report feeds straight back into `--seed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u32);

impl Seed {
    pub fn value(self) -> u32 {
        self.0
    }

    /// The n-th seed of a sequential range starting here; wraps at u32::MAX.
    pub fn offset(self, n: u32) -> Seed {
        Seed(self.0.wrapping_add(n))
    }

    /// Sequential benchmark range: this seed and the `count - 1` following.
    pub fn range(self, count: u32) -> Vec<Seed> {
        (0..count).map(|i| self.offset(i)).collect()
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl FromStr for Seed {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16)
                .map(Seed)
                .with_context(|| format!("invalid hex seed '{token}'")),
            None if token.is_empty() => Err(anyhow!("empty seed")),
            None => token
                .parse::<u32>()
                .map(Seed)
                .with_context(|| format!("invalid decimal seed '{token}'")),
        }
    }
}

/// Comma-separated seed list as passed to `--seeds`.
pub fn seed_list(raw: &str) -> Result<Vec<Seed>> {
    let seeds: Vec<Seed> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Seed::from_str)
        .collect::<Result<_>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds in '{raw}'"));
    }
    Ok(seeds)
}

/// Seed file: one seed per line, blank lines and `#` comments skipped.
pub fn seed_file(path: &Path) -> Result<Vec<Seed>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let seeds: Vec<Seed> = data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(Seed::from_str)
        .collect::<Result<_>>()
        .with_context(|| format!("bad seed in {}", path.display()))?;
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}
