//! Pluggable classification models. The engine consumes a model as a
//! black-box predictor: five real-valued inputs, one absolute target-lane
//! class out, or "unclassifiable".

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use lane_core::LogRecord;

/// Input order is fixed: `[currentLane+2, left, middle, right, elapsedTime]`.
pub const FEATURE_COUNT: usize = 5;

pub trait ClassifierModel {
    /// Returns an absolute target-lane class in 0..=4, or `None` when the
    /// model cannot classify the instance.
    fn classify(&self, input: &[f64; FEATURE_COUNT]) -> Option<u8>;
}

#[derive(Clone, Copy, Debug)]
struct TrainingRow {
    // Lane occupancy state only; logged rows carry no elapsed-time column.
    features: [f64; 4],
    target: u8,
}

/// Nearest-neighbour model trained from an existing telemetry log: each
/// logged (state, target-lane) pair becomes a training row, and a query
/// answers with the target of the closest stored state.
pub struct NearestNeighborModel {
    rows: Vec<TrainingRow>,
}

impl NearestNeighborModel {
    /// Loads training data at startup. A missing, unreadable, malformed, or
    /// empty log is fatal here: the session cannot run a classifier strategy
    /// without a model behind it.
    pub fn from_log_file(path: &Path) -> Result<Self> {
        let records = crate::telemetry::read_log(path)
            .with_context(|| format!("failed loading training data from {}", path.display()))?;
        Self::from_records(&records)
            .with_context(|| format!("training data in {} is unusable", path.display()))
    }

    pub fn from_records(records: &[LogRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(anyhow!("no training rows"));
        }
        let rows = records
            .iter()
            .map(|r| TrainingRow {
                features: [
                    r.current_lane.encoded() as f64,
                    r.left_distance,
                    r.middle_distance,
                    r.right_distance,
                ],
                target: r.target_lane.encoded(),
            })
            .collect();
        Ok(Self { rows })
    }
}

impl ClassifierModel for NearestNeighborModel {
    fn classify(&self, input: &[f64; FEATURE_COUNT]) -> Option<u8> {
        let query = [input[0], input[1], input[2], input[3]];
        let mut best: Option<(f64, u8)> = None;
        for row in &self.rows {
            let mut dist = 0.0;
            for (a, b) in row.features.iter().zip(query.iter()) {
                let d = a - b;
                dist += d * d;
            }
            match best {
                Some((best_dist, _)) if dist >= best_dist => {}
                _ => best = Some((dist, row.target)),
            }
        }
        best.map(|(_, target)| target)
    }
}
