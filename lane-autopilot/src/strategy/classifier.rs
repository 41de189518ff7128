//! Bridge from a black-box classification model to a lane move.
//!
//! The model answers with an *absolute* target-lane class in 0..=4; only an
//! adjacent class may become a move. Anything else — a jump of more than one
//! slot, an out-of-range class, or an unclassifiable instance — is absorbed
//! as Stay so a confused model can never corrupt the lane invariant.

use anyhow::Result;
use std::path::Path;

use lane_core::{FeatureVector, Move};

use crate::model::{ClassifierModel, NearestNeighborModel, FEATURE_COUNT};
use crate::strategy::DecisionStrategy;

pub struct ClassifierBridge {
    model: Box<dyn ClassifierModel>,
    unclassified: u64,
}

impl ClassifierBridge {
    pub fn new(model: Box<dyn ClassifierModel>) -> Self {
        Self {
            model,
            unclassified: 0,
        }
    }

    /// Trains the bundled nearest-neighbour model from an existing telemetry
    /// log. Fatal on a missing or unusable log; there is no degraded mode
    /// for a classifier without a model.
    pub fn from_training_log(path: &Path) -> Result<Self> {
        let model = NearestNeighborModel::from_log_file(path)?;
        Ok(Self::new(Box::new(model)))
    }

    /// Fixed encoding consumed by every model: encoded lane first, then the
    /// three lane distances, then session time.
    pub fn encode(features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        [
            features.current_lane.encoded() as f64,
            features.left_distance,
            features.middle_distance,
            features.right_distance,
            features.elapsed_time,
        ]
    }

    fn map_class(&mut self, features: &FeatureVector, class: Option<u8>) -> Move {
        let current = features.current_lane.encoded() as i32;
        match class {
            Some(c) if (0..=4).contains(&(c as i32)) => {
                let target = c as i32;
                if target == current {
                    Move::Stay
                } else if target == current - 1 {
                    Move::Left
                } else if target == current + 1 {
                    Move::Right
                } else {
                    self.unclassified += 1;
                    Move::Stay
                }
            }
            _ => {
                self.unclassified += 1;
                Move::Stay
            }
        }
    }
}

impl DecisionStrategy for ClassifierBridge {
    fn id(&self) -> &str {
        "classifier"
    }

    fn description(&self) -> &'static str {
        "Learned classifier mapped onto adjacent-lane moves."
    }

    fn decide(&mut self, features: &FeatureVector) -> Move {
        let class = self.model.classify(&Self::encode(features));
        self.map_class(features, class)
    }

    fn unclassified_count(&self) -> u64 {
        self.unclassified
    }
}
