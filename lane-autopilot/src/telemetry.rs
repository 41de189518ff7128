//! Append-only telemetry logs, one file per role. Every append opens the
//! file, writes one line, and releases the handle; no handle is held across
//! calls, so a crash never strands an open log.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use lane_core::{FeatureVector, LogRecord, Move, Role};

pub struct TelemetryLogger {
    dir: PathBuf,
}

impl TelemetryLogger {
    /// Creates the log directory if needed; records land in
    /// `playerData.txt` / `simulatorData.txt` inside it.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed creating log directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, role: Role) -> PathBuf {
        self.dir.join(role.log_file_name())
    }

    /// Appends one record for this decision tick. Fires both for the
    /// fixed-period Stay samples and for explicit moves; the mixture is what
    /// the classifier trains on.
    pub fn record(&self, role: Role, features: &FeatureVector, mv: Move) -> Result<()> {
        let record = LogRecord::from_decision(features, mv);
        let path = self.path_for(role);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed opening {}", path.display()))?;
        writeln!(file, "{}", record.encode())
            .with_context(|| format!("failed appending to {}", path.display()))
    }
}

/// Reads every record of a role log back, with the offending line number on
/// failure.
pub fn read_log(path: &Path) -> Result<Vec<LogRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading telemetry log {}", path.display()))?;
    let mut records = Vec::new();
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = LogRecord::parse(line)
            .with_context(|| format!("{} line {}", path.display(), idx + 1))?;
        records.push(record);
    }
    Ok(records)
}
