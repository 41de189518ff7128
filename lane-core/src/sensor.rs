//! Obstacle summarization: reduces the raw obstacle field to the nearest
//! obstacle distance per on-road lane, relative to the deciding entity.

use serde::{Deserialize, Serialize};

use crate::constants::{LEFT_LANE_X, MIDDLE_LANE_X, RIGHT_LANE_X, TRACK_BOTTOM, TRACK_TOP};
use crate::lane::LaneIndex;

/// One obstacle car on the track. `x` is the exact lane coordinate it was
/// spawned at; bucketing relies on that exactness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
}

/// The fixed-shape numeric summary fed to either decision strategy.
///
/// Each distance is the lowest obstacle y in that lane, clamped to the
/// track extent; a lane with no live obstacle reports exactly
/// [`TRACK_TOP`] as the "lane is clear" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub left_distance: f64,
    pub middle_distance: f64,
    pub right_distance: f64,
    pub current_lane: LaneIndex,
    pub elapsed_time: f64,
}

/// Pure scan over the obstacle snapshot. An obstacle updates a lane minimum
/// only if it sits strictly below the current minimum and strictly above
/// the track bottom; anything at or below the bottom is already despawning
/// and is ignored.
pub fn summarize(obstacles: &[Obstacle], current_lane: LaneIndex, elapsed_time: f64) -> FeatureVector {
    let mut left = TRACK_TOP;
    let mut middle = TRACK_TOP;
    let mut right = TRACK_TOP;

    for obstacle in obstacles {
        let slot = if obstacle.x == LEFT_LANE_X {
            &mut left
        } else if obstacle.x == MIDDLE_LANE_X {
            &mut middle
        } else if obstacle.x == RIGHT_LANE_X {
            &mut right
        } else {
            continue;
        };
        if obstacle.y < *slot && obstacle.y > TRACK_BOTTOM {
            *slot = obstacle.y;
        }
    }

    FeatureVector {
        left_distance: left,
        middle_distance: middle,
        right_distance: right,
        current_lane,
        elapsed_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_reports_track_top_everywhere() {
        let fv = summarize(&[], LaneIndex::LEFT, 1.5);
        assert_eq!(fv.left_distance, TRACK_TOP);
        assert_eq!(fv.middle_distance, TRACK_TOP);
        assert_eq!(fv.right_distance, TRACK_TOP);
        assert_eq!(fv.current_lane, LaneIndex::LEFT);
        assert_eq!(fv.elapsed_time, 1.5);
    }

    #[test]
    fn picks_the_lowest_obstacle_per_lane() {
        let obstacles = [
            Obstacle { x: LEFT_LANE_X, y: 3.0 },
            Obstacle { x: LEFT_LANE_X, y: -1.0 },
            Obstacle { x: MIDDLE_LANE_X, y: 4.2 },
        ];
        let fv = summarize(&obstacles, LaneIndex::MIDDLE, 0.0);
        assert_eq!(fv.left_distance, -1.0);
        assert_eq!(fv.middle_distance, 4.2);
        assert_eq!(fv.right_distance, TRACK_TOP);
    }

    #[test]
    fn obstacles_at_or_below_track_bottom_are_excluded() {
        let obstacles = [
            Obstacle { x: RIGHT_LANE_X, y: TRACK_BOTTOM },
            Obstacle { x: RIGHT_LANE_X, y: TRACK_BOTTOM - 0.3 },
        ];
        let fv = summarize(&obstacles, LaneIndex::RIGHT, 0.0);
        assert_eq!(fv.right_distance, TRACK_TOP);
    }

    #[test]
    fn off_lane_x_coordinates_are_ignored() {
        let obstacles = [Obstacle { x: 0.0, y: -2.0 }];
        let fv = summarize(&obstacles, LaneIndex::MIDDLE, 0.0);
        assert_eq!(fv.middle_distance, TRACK_TOP);
    }

    #[test]
    fn deterministic_over_identical_snapshots() {
        let obstacles = [
            Obstacle { x: MIDDLE_LANE_X, y: 1.0 },
            Obstacle { x: RIGHT_LANE_X, y: -3.2 },
        ];
        let a = summarize(&obstacles, LaneIndex::MIDDLE, 2.0);
        let b = summarize(&obstacles, LaneIndex::MIDDLE, 2.0);
        assert_eq!(a, b);
    }
}
