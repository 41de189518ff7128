pub mod classifier;
pub mod heuristic;

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use lane_core::{FeatureVector, Move};

/// A decision strategy: one of these runs per entity per tick, never two at
/// once. The classifier and the hand-written heuristic are interchangeable
/// behind this contract.
pub trait DecisionStrategy {
    fn id(&self) -> &str;
    fn description(&self) -> &'static str;
    fn decide(&mut self, features: &FeatureVector) -> Move;
    /// Decisions the strategy had to absorb as Stay because the model output
    /// could not be mapped to an adjacent lane.
    fn unclassified_count(&self) -> u64 {
        0
    }
}

pub fn strategy_ids() -> Vec<&'static str> {
    vec!["heuristic", "heuristic-lanes", "classifier:<log-path>"]
}

pub fn describe_strategies() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "heuristic",
            "Rule-based fallback: vacates off-road lanes, otherwise stays.",
        ),
        (
            "heuristic-lanes",
            "Rule-based fallback with the on-road danger analysis enabled.",
        ),
        (
            "classifier:<log-path>",
            "Nearest-neighbour classifier trained from an existing telemetry log.",
        ),
    ]
}

/// Resolves a strategy id. `classifier:<path>` trains its model here, so a
/// missing or unusable training log fails the whole startup rather than one
/// tick.
pub fn create_strategy(id: &str) -> Result<Box<dyn DecisionStrategy>> {
    match id {
        "heuristic" => Ok(Box::new(heuristic::HeuristicPolicy::new())),
        "heuristic-lanes" => Ok(Box::new(heuristic::HeuristicPolicy::with_lane_analysis())),
        _ => {
            if let Some(path) = id.strip_prefix("classifier:") {
                let bridge =
                    classifier::ClassifierBridge::from_training_log(&PathBuf::from(path))?;
                Ok(Box::new(bridge))
            } else {
                Err(anyhow!(
                    "unknown strategy '{id}'. available: heuristic, heuristic-lanes, classifier:<log-path>"
                ))
            }
        }
    }
}
