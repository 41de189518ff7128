//! Hand-written fallback policy. Two phases over a single danger threshold:
//! vacate an off-road lane first; only then (and only when enabled) run the
//! on-road danger analysis. When every option is equally dangerous the
//! policy biases toward the higher-scoring lane on the left.

use lane_core::constants::DANGER_ZONE;
use lane_core::{FeatureVector, LaneIndex, Move};

use crate::strategy::DecisionStrategy;

pub struct HeuristicPolicy {
    danger_zone: f64,
    lane_analysis: bool,
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self {
            danger_zone: DANGER_ZONE,
            lane_analysis: false,
        }
    }

    /// Variant with the on-road avoidance rules wired in.
    pub fn with_lane_analysis() -> Self {
        Self {
            danger_zone: DANGER_ZONE,
            lane_analysis: true,
        }
    }

    fn in_danger(&self, distance: f64) -> bool {
        distance <= self.danger_zone
    }

    /// Phase 1: off-road correction. Always takes precedence; an off-road
    /// car re-enters the road as soon as the adjacent on-road lane is clear.
    fn prioritize(&self, fv: &FeatureVector) -> Option<Move> {
        match fv.current_lane {
            LaneIndex::LEFT_OFFROAD if !self.in_danger(fv.left_distance) => Some(Move::Right),
            LaneIndex::RIGHT_OFFROAD if !self.in_danger(fv.right_distance) => Some(Move::Left),
            _ => None,
        }
    }

    /// Phase 2: on-road avoidance, only consulted when phase 1 stayed quiet.
    fn analyze(&self, fv: &FeatureVector) -> Option<Move> {
        let left = self.in_danger(fv.left_distance);
        let middle = self.in_danger(fv.middle_distance);
        let right = self.in_danger(fv.right_distance);

        match fv.current_lane {
            // Left lane: move right if the middle is clear, otherwise trade
            // points for safety and go off-road left.
            LaneIndex::LEFT if left => Some(if middle { Move::Left } else { Move::Right }),
            // Middle lane: prefer left, fall back to right, and take left as
            // the last resort when everything is dangerous.
            LaneIndex::MIDDLE if middle => Some(if left {
                if right {
                    Move::Left
                } else {
                    Move::Right
                }
            } else {
                Move::Left
            }),
            // Right lane: mirror of the left lane.
            LaneIndex::RIGHT if right => Some(if middle { Move::Right } else { Move::Left }),
            _ => None,
        }
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionStrategy for HeuristicPolicy {
    fn id(&self) -> &str {
        if self.lane_analysis {
            "heuristic-lanes"
        } else {
            "heuristic"
        }
    }

    fn description(&self) -> &'static str {
        "Rule-based fallback over a single danger threshold."
    }

    fn decide(&mut self, features: &FeatureVector) -> Move {
        if let Some(mv) = self.prioritize(features) {
            return mv;
        }
        if self.lane_analysis {
            if let Some(mv) = self.analyze(features) {
                return mv;
            }
        }
        Move::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_core::constants::TRACK_TOP;

    fn features(lane: i32, left: f64, middle: f64, right: f64) -> FeatureVector {
        FeatureVector {
            left_distance: left,
            middle_distance: middle,
            right_distance: right,
            current_lane: LaneIndex::new(lane).unwrap(),
            elapsed_time: 0.0,
        }
    }

    #[test]
    fn vacates_left_offroad_when_the_left_lane_is_clear() {
        let mut policy = HeuristicPolicy::new();
        let fv = features(-2, TRACK_TOP, -3.0, -3.0);
        assert_eq!(policy.decide(&fv), Move::Right);
    }

    #[test]
    fn holds_left_offroad_while_the_left_lane_is_dangerous() {
        let mut policy = HeuristicPolicy::new();
        let fv = features(-2, -3.0, TRACK_TOP, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Stay);
    }

    #[test]
    fn vacates_right_offroad_when_the_right_lane_is_clear() {
        let mut policy = HeuristicPolicy::new();
        let fv = features(2, -3.0, -3.0, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Left);
    }

    #[test]
    fn base_variant_never_runs_the_lane_analysis() {
        let mut policy = HeuristicPolicy::new();
        let fv = features(-1, -3.5, TRACK_TOP, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Stay);
    }

    #[test]
    fn left_lane_prefers_right_when_the_middle_is_clear() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(-1, -3.5, TRACK_TOP, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Right);
    }

    #[test]
    fn left_lane_goes_offroad_when_the_middle_is_also_dangerous() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(-1, -3.5, -3.0, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Left);
    }

    #[test]
    fn middle_lane_prefers_left_when_clear() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(0, TRACK_TOP, -2.9, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Left);
    }

    #[test]
    fn middle_lane_falls_back_to_right_when_only_left_is_blocked() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(0, -3.5, -1.0, TRACK_TOP);
        // Own lane clear: the middle car only acts on its own danger.
        assert_eq!(policy.decide(&fv), Move::Stay);

        let fv = features(0, -3.5, -3.0, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Right);
    }

    #[test]
    fn middle_lane_takes_left_as_last_resort() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(0, -3.0, -3.0, -3.0);
        assert_eq!(policy.decide(&fv), Move::Left);
    }

    #[test]
    fn right_lane_prefers_left_when_the_middle_is_clear() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(1, TRACK_TOP, TRACK_TOP, -3.1);
        assert_eq!(policy.decide(&fv), Move::Left);
    }

    #[test]
    fn right_lane_goes_offroad_when_the_middle_is_dangerous() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(1, TRACK_TOP, -3.0, -3.1);
        assert_eq!(policy.decide(&fv), Move::Right);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        let fv = features(0, -3.0, -3.0, -1.0);
        let first = policy.decide(&fv);
        for _ in 0..10 {
            assert_eq!(policy.decide(&fv), first);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut policy = HeuristicPolicy::with_lane_analysis();
        // Exactly at the danger zone counts as dangerous.
        let fv = features(-1, DANGER_ZONE, TRACK_TOP, TRACK_TOP);
        assert_eq!(policy.decide(&fv), Move::Right);
    }
}
