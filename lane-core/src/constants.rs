//! Track geometry and timing constants shared by the sensor, the heuristic,
//! and the world simulation. Lane x-coordinates double as lane identity for
//! obstacle bucketing, so they must match spawn positions exactly.

/// X-coordinates of the three on-road lanes.
pub const LEFT_LANE_X: f64 = -5.69;
pub const MIDDLE_LANE_X: f64 = -5.09;
pub const RIGHT_LANE_X: f64 = -4.46;

/// Vertical extent of the track. A lane with no obstacle reports exactly
/// `TRACK_TOP`; obstacles at or below `TRACK_BOTTOM` count as despawned.
pub const TRACK_TOP: f64 = 5.7;
pub const TRACK_BOTTOM: f64 = -5.7;

/// Obstacles at or below this y are an imminent collision risk.
pub const DANGER_ZONE: f64 = -2.9;

/// Fixed period of the telemetry sampler and the decision tick.
pub const SAMPLE_PERIOD_S: f64 = 0.1;

/// Scoring cadence and per-lane point deltas.
pub const SCORE_PERIOD_S: f64 = 1.0;
pub const POINTS_OFFROAD: i64 = -2;
pub const POINTS_LEFT: i64 = 2;
pub const POINTS_MIDDLE: i64 = 1;
pub const POINTS_RIGHT: i64 = 0;

/// Obstacles enter above the visible track and travel down toward the cars.
pub const SPAWN_Y: f64 = 6.0;
pub const CAR_Y: f64 = -4.7;
pub const COLLISION_RADIUS: f64 = 0.45;
pub const OBSTACLE_SPEED: f64 = 3.0;

/// Spawn cadence: starts slow, tightens by the decrement after each spawn
/// until it reaches the floor.
pub const SPAWN_PERIOD_START_S: f64 = 1.2;
pub const SPAWN_PERIOD_FLOOR_S: f64 = 0.4;
pub const SPAWN_PERIOD_DECREMENT_S: f64 = 0.01;
