//! Tick-driven session runner. One decision cycle runs to completion before
//! the next begins: the world steps, the fixed-period sampler logs a Stay
//! record for both roles, then each driven entity senses, decides, and has
//! its move arbitrated, applied, and logged. The session ends on the first
//! collision or at the tick budget, whichever comes first.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use lane_core::constants::SAMPLE_PERIOD_S;
use lane_core::sim::{SpawnSettings, TrackWorld};
use lane_core::{summarize, Move, Role};

use crate::arbiter::{MoveArbiter, MoveOutcome};
use crate::seed::Seed;
use crate::strategy::{create_strategy, DecisionStrategy};
use crate::telemetry::TelemetryLogger;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub strategy: String,
    /// Optional second agent driving the player entity; left stationary when
    /// absent (it is still sampled by the telemetry sampler).
    pub player_strategy: Option<String>,
    pub seed: Seed,
    pub max_ticks: u32,
    /// Telemetry directory; `None` disables logging (benchmark fan-out).
    pub log_dir: Option<PathBuf>,
    pub spawn: SpawnSettings,
}

impl SessionConfig {
    pub fn new(strategy: impl Into<String>, seed: impl Into<Seed>, max_ticks: u32) -> Self {
        Self {
            strategy: strategy.into(),
            player_strategy: None,
            seed: seed.into(),
            max_ticks,
            log_dir: None,
            spawn: SpawnSettings::default(),
        }
    }
}

/// Final statistics readout, produced once decisioning stops.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub strategy_id: String,
    pub seed: Seed,
    pub max_ticks: u32,
    pub ticks: u32,
    pub elapsed_s: f64,
    pub collision: bool,
    pub final_lane: i32,
    pub points: i64,
    pub run_time_s: u64,
    pub time_in_left_s: u64,
    pub time_in_others_s: u64,
    pub time_in_offroad_s: u64,
    pub overtakes: u64,
    pub moves_left: u64,
    pub moves_right: u64,
    pub stays: u64,
    pub clamped_moves: u64,
    pub rejected_moves: u64,
    pub unclassified_decisions: u64,
}

struct Agent {
    role: Role,
    strategy: Box<dyn DecisionStrategy>,
    arbiter: MoveArbiter,
    moves_left: u64,
    moves_right: u64,
    stays: u64,
    clamped: u64,
    rejected: u64,
}

impl Agent {
    fn new(role: Role, strategy: Box<dyn DecisionStrategy>) -> Self {
        Self {
            role,
            strategy,
            arbiter: MoveArbiter::new(role),
            moves_left: 0,
            moves_right: 0,
            stays: 0,
            clamped: 0,
            rejected: 0,
        }
    }

    /// One decision cycle for this entity: sense, decide, arbitrate, log.
    fn tick(&mut self, world: &mut TrackWorld, logger: Option<&TelemetryLogger>) -> Result<()> {
        let features = summarize(world.obstacles(), world.lane_of(self.role), world.elapsed_s());
        let requested = self.strategy.decide(&features);
        let outcome = self.arbiter.request(world, requested);

        match outcome {
            MoveOutcome::Applied { effective, .. } => match effective {
                Move::Left => self.moves_left += 1,
                Move::Right => self.moves_right += 1,
                Move::Stay => self.stays += 1,
            },
            MoveOutcome::Clamped { .. } => {
                self.clamped += 1;
                self.stays += 1;
            }
            MoveOutcome::RejectedBusy => self.rejected += 1,
        }

        if let (Some(logger), Some(effective)) = (logger, outcome.effective_move()) {
            logger.record(self.role, &features, effective)?;
        }
        Ok(())
    }
}

pub fn run_session(config: &SessionConfig) -> Result<SessionMetrics> {
    if config.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    let logger = match &config.log_dir {
        Some(dir) => Some(TelemetryLogger::new(dir.clone())?),
        None => None,
    };

    let mut world = TrackWorld::new(config.seed.value(), config.spawn);
    let mut simulator = Agent::new(Role::Simulator, create_strategy(&config.strategy)?);
    let mut player = match &config.player_strategy {
        Some(id) => Some(Agent::new(Role::Player, create_strategy(id)?)),
        None => None,
    };

    let mut ticks = 0u32;
    while ticks < config.max_ticks && !world.any_collision() {
        world.step(SAMPLE_PERIOD_S);
        ticks += 1;
        if world.any_collision() {
            break;
        }

        // Fixed-period sampler: both roles log an implicit "still here"
        // Stay sample every period, whether or not they move this tick.
        if let Some(logger) = &logger {
            for role in Role::ALL {
                let features =
                    summarize(world.obstacles(), world.lane_of(role), world.elapsed_s());
                logger.record(role, &features, Move::Stay)?;
            }
        }

        simulator.tick(&mut world, logger.as_ref())?;
        if let Some(player) = player.as_mut() {
            player.tick(&mut world, logger.as_ref())?;
        }
    }

    let stats = world.stats_of(Role::Simulator);
    Ok(SessionMetrics {
        strategy_id: simulator.strategy.id().to_string(),
        seed: config.seed,
        max_ticks: config.max_ticks,
        ticks,
        elapsed_s: world.elapsed_s(),
        collision: world.any_collision(),
        final_lane: world.lane_of(Role::Simulator).value(),
        points: stats.points,
        run_time_s: stats.run_time_s,
        time_in_left_s: stats.time_in_left_s,
        time_in_others_s: stats.time_in_others_s,
        time_in_offroad_s: stats.time_in_offroad_s,
        overtakes: world.overtakes(),
        moves_left: simulator.moves_left,
        moves_right: simulator.moves_right,
        stays: simulator.stays,
        clamped_moves: simulator.clamped,
        rejected_moves: simulator.rejected,
        unclassified_decisions: simulator.strategy.unclassified_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tick_budget_is_rejected() {
        let config = SessionConfig::new("heuristic", 1, 0);
        assert!(run_session(&config).is_err());
    }

    #[test]
    fn unknown_strategy_fails_before_the_first_tick() {
        let config = SessionConfig::new("random-tree", 1, 10);
        assert!(run_session(&config).is_err());
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let config = SessionConfig::new("heuristic-lanes", 0xC0FFEE, 400);
        let a = run_session(&config).unwrap();
        let b = run_session(&config).unwrap();
        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.points, b.points);
        assert_eq!(a.final_lane, b.final_lane);
        assert_eq!(a.overtakes, b.overtakes);
        assert_eq!(a.collision, b.collision);
    }

    #[test]
    fn session_stops_at_the_tick_budget_without_a_collision() {
        // Spawns far apart enough that nothing reaches the car line.
        let mut config = SessionConfig::new("heuristic", 7, 20);
        config.spawn = SpawnSettings {
            start_period_s: 1_000.0,
            floor_period_s: 1_000.0,
            decrement_s: 0.0,
        };
        let metrics = run_session(&config).unwrap();
        assert_eq!(metrics.ticks, 20);
        assert!(!metrics.collision);
        // Base heuristic on a clear track never leaves the starting lane.
        assert_eq!(metrics.final_lane, -1);
        assert_eq!(metrics.stays, 20);
        assert_eq!(metrics.moves_left + metrics.moves_right, 0);
    }
}
