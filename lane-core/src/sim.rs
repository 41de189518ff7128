//! Deterministic track world: the external collaborators of the decision
//! engine (obstacle spawning, movement application, scoring, collision)
//! folded into one seeded simulation that a runner steps tick by tick.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CAR_Y, COLLISION_RADIUS, LEFT_LANE_X, MIDDLE_LANE_X, OBSTACLE_SPEED, POINTS_LEFT,
    POINTS_MIDDLE, POINTS_OFFROAD, POINTS_RIGHT, RIGHT_LANE_X, SCORE_PERIOD_S,
    SPAWN_PERIOD_DECREMENT_S, SPAWN_PERIOD_FLOOR_S, SPAWN_PERIOD_START_S, SPAWN_Y, TRACK_BOTTOM,
};
use crate::lane::{LaneIndex, Role};
use crate::rng::SeededRng;
use crate::sensor::Obstacle;

// Timers accumulate 0.1 s ticks; ten of those sum to just under 1.0 in f64,
// so cadence checks tolerate that rounding.
const TIMER_EPS: f64 = 1e-9;

/// Spawn cadence tuning; the defaults reproduce the stock difficulty ramp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnSettings {
    pub start_period_s: f64,
    pub floor_period_s: f64,
    pub decrement_s: f64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            start_period_s: SPAWN_PERIOD_START_S,
            floor_period_s: SPAWN_PERIOD_FLOOR_S,
            decrement_s: SPAWN_PERIOD_DECREMENT_S,
        }
    }
}

/// Per-car bookkeeping updated on the 1 s scoring cadence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarStats {
    pub points: i64,
    pub run_time_s: u64,
    pub time_in_left_s: u64,
    pub time_in_others_s: u64,
    pub time_in_offroad_s: u64,
}

#[derive(Clone, Copy, Debug)]
struct Car {
    lane: LaneIndex,
    collided: bool,
    stats: CarStats,
}

impl Car {
    fn new() -> Self {
        Self {
            // Both sprites start in the left lane.
            lane: LaneIndex::LEFT,
            collided: false,
            stats: CarStats::default(),
        }
    }
}

pub struct TrackWorld {
    rng: SeededRng,
    obstacles: Vec<Obstacle>,
    player: Car,
    simulator: Car,
    elapsed_s: f64,
    spawn_timer_s: f64,
    spawn_period_s: f64,
    spawn: SpawnSettings,
    score_timer_s: f64,
    overtakes: u64,
}

/// X-coordinate of an on-road lane; off-road lanes carry no obstacles.
pub fn lane_x(lane: LaneIndex) -> Option<f64> {
    match lane {
        LaneIndex::LEFT => Some(LEFT_LANE_X),
        LaneIndex::MIDDLE => Some(MIDDLE_LANE_X),
        LaneIndex::RIGHT => Some(RIGHT_LANE_X),
        _ => None,
    }
}

impl TrackWorld {
    pub fn new(seed: u32, spawn: SpawnSettings) -> Self {
        Self {
            rng: SeededRng::new(seed),
            obstacles: Vec::new(),
            player: Car::new(),
            simulator: Car::new(),
            elapsed_s: 0.0,
            spawn_timer_s: 0.0,
            spawn_period_s: spawn.start_period_s,
            spawn,
            score_timer_s: 0.0,
            overtakes: 0,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn overtakes(&self) -> u64 {
        self.overtakes
    }

    /// Entity discovery: current lane of a role's car.
    pub fn lane_of(&self, role: Role) -> LaneIndex {
        self.car(role).lane
    }

    pub fn stats_of(&self, role: Role) -> CarStats {
        self.car(role).stats
    }

    pub fn collided(&self, role: Role) -> bool {
        self.car(role).collided
    }

    /// The session is over once either car has hit an obstacle.
    pub fn any_collision(&self) -> bool {
        self.player.collided || self.simulator.collided
    }

    /// Movement collaborator: applies a lane delta already validated by the
    /// arbiter. Deltas that would leave the track are ignored defensively.
    pub fn apply_lane_delta(&mut self, role: Role, delta: i32) {
        let car = self.car_mut(role);
        debug_assert!(delta.abs() <= 1);
        if let Some(next) = LaneIndex::new(car.lane.value() + delta) {
            car.lane = next;
        }
    }

    /// Advances the world by one tick: obstacles move and despawn, new ones
    /// spawn on the cadence, collisions latch, and the 1 s scoring cadence
    /// updates points and time-in-lane counters.
    pub fn step(&mut self, dt: f64) {
        self.elapsed_s += dt;

        for obstacle in &mut self.obstacles {
            obstacle.y -= OBSTACLE_SPEED * dt;
        }
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.y > TRACK_BOTTOM);
        self.overtakes += (before - self.obstacles.len()) as u64;

        self.spawn_timer_s += dt;
        while self.spawn_timer_s >= self.spawn_period_s - TIMER_EPS {
            self.spawn_timer_s -= self.spawn_period_s;
            self.spawn_obstacle();
            if self.spawn_period_s > self.spawn.floor_period_s {
                self.spawn_period_s =
                    (self.spawn_period_s - self.spawn.decrement_s).max(self.spawn.floor_period_s);
            }
        }

        for role in Role::ALL {
            if self.hits_obstacle(self.car(role).lane) {
                self.car_mut(role).collided = true;
            }
        }

        self.score_timer_s += dt;
        while self.score_timer_s >= SCORE_PERIOD_S - TIMER_EPS {
            self.score_timer_s -= SCORE_PERIOD_S;
            for role in Role::ALL {
                if !self.car(role).collided {
                    Self::score_tick(self.car_mut(role));
                }
            }
        }
    }

    fn spawn_obstacle(&mut self) {
        let x = match self.rng.next_int(3) {
            0 => LEFT_LANE_X,
            1 => MIDDLE_LANE_X,
            _ => RIGHT_LANE_X,
        };
        self.obstacles.push(Obstacle { x, y: SPAWN_Y });
    }

    fn hits_obstacle(&self, lane: LaneIndex) -> bool {
        let Some(x) = lane_x(lane) else {
            return false;
        };
        self.obstacles
            .iter()
            .any(|o| o.x == x && (o.y - CAR_Y).abs() <= COLLISION_RADIUS)
    }

    fn score_tick(car: &mut Car) {
        car.stats.run_time_s += 1;
        if car.lane.is_offroad() {
            car.stats.points += POINTS_OFFROAD;
            car.stats.time_in_offroad_s += 1;
        } else if car.lane == LaneIndex::LEFT {
            car.stats.points += POINTS_LEFT;
            car.stats.time_in_left_s += 1;
        } else if car.lane == LaneIndex::MIDDLE {
            car.stats.points += POINTS_MIDDLE;
            car.stats.time_in_others_s += 1;
        } else {
            car.stats.points += POINTS_RIGHT;
            car.stats.time_in_others_s += 1;
        }
    }

    fn car(&self, role: Role) -> &Car {
        match role {
            Role::Player => &self.player,
            Role::Simulator => &self.simulator,
        }
    }

    fn car_mut(&mut self, role: Role) -> &mut Car {
        match role {
            Role::Player => &mut self.player,
            Role::Simulator => &mut self.simulator,
        }
    }
}
