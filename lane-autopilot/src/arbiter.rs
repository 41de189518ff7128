//! Move arbitration: the single authority that turns a requested move into
//! an effective, bounds-safe lane transition.

use lane_core::{LaneIndex, Move, Role};

/// Movement collaborator consumed by the arbiter; applying a validated
/// delta is assumed to always succeed.
pub trait LaneActuator {
    fn lane_of(&self, role: Role) -> LaneIndex;
    fn apply_lane_delta(&mut self, role: Role, delta: i32);
}

impl LaneActuator for lane_core::sim::TrackWorld {
    fn lane_of(&self, role: Role) -> LaneIndex {
        lane_core::sim::TrackWorld::lane_of(self, role)
    }

    fn apply_lane_delta(&mut self, role: Role, delta: i32) {
        lane_core::sim::TrackWorld::apply_lane_delta(self, role, delta)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move (including Stay) was applied; carries the resulting lane and
    /// the move as it took effect.
    Applied { lane: LaneIndex, effective: Move },
    /// Left/Right would have left the track; treated as Stay, not an error.
    Clamped { lane: LaneIndex },
    /// Another move for this entity was still in flight; request dropped.
    RejectedBusy,
}

impl MoveOutcome {
    /// The move as it actually took effect, if a record should be written.
    pub fn effective_move(self) -> Option<Move> {
        match self {
            Self::Applied { effective, .. } => Some(effective),
            Self::Clamped { .. } => Some(Move::Stay),
            Self::RejectedBusy => None,
        }
    }
}

/// One arbiter per entity. Holds the at-most-one-in-flight-move flag; the
/// lane itself lives with the movement collaborator.
#[derive(Debug)]
pub struct MoveArbiter {
    role: Role,
    in_flight: bool,
}

impl MoveArbiter {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            in_flight: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Validates and applies a requested move. Stay is always legal and a
    /// no-op on the lane; an out-of-bounds Left/Right is silently clamped to
    /// Stay; a request arriving while another is in flight is dropped.
    pub fn request(&mut self, actuator: &mut dyn LaneActuator, mv: Move) -> MoveOutcome {
        if self.in_flight {
            return MoveOutcome::RejectedBusy;
        }
        self.in_flight = true;

        let current = actuator.lane_of(self.role);
        let target = current.shifted(mv);
        let outcome = if mv != Move::Stay && target == current {
            MoveOutcome::Clamped { lane: current }
        } else {
            if target != current {
                actuator.apply_lane_delta(self.role, mv.delta());
            }
            MoveOutcome::Applied {
                lane: target,
                effective: mv,
            }
        };

        self.in_flight = false;
        outcome
    }

    /// Marks a move as still applying; used by schedulers that hand the
    /// actual position change to an asynchronous collaborator.
    pub fn set_in_flight(&mut self, busy: bool) {
        self.in_flight = busy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTrack {
        lane: LaneIndex,
        deltas: Vec<i32>,
    }

    impl FakeTrack {
        fn at(lane: i32) -> Self {
            Self {
                lane: LaneIndex::new(lane).unwrap(),
                deltas: Vec::new(),
            }
        }
    }

    impl LaneActuator for FakeTrack {
        fn lane_of(&self, _role: Role) -> LaneIndex {
            self.lane
        }

        fn apply_lane_delta(&mut self, _role: Role, delta: i32) {
            self.deltas.push(delta);
            self.lane = LaneIndex::new(self.lane.value() + delta).unwrap();
        }
    }

    #[test]
    fn stay_is_always_legal_and_never_moves() {
        for lane in -2..=2 {
            let mut track = FakeTrack::at(lane);
            let mut arbiter = MoveArbiter::new(Role::Simulator);
            let outcome = arbiter.request(&mut track, Move::Stay);
            assert_eq!(
                outcome,
                MoveOutcome::Applied {
                    lane: LaneIndex::new(lane).unwrap(),
                    effective: Move::Stay
                }
            );
            assert!(track.deltas.is_empty());
        }
    }

    #[test]
    fn legal_left_and_right_apply_exactly_one_delta() {
        let mut track = FakeTrack::at(0);
        let mut arbiter = MoveArbiter::new(Role::Simulator);
        arbiter.request(&mut track, Move::Left);
        assert_eq!(track.lane, LaneIndex::LEFT);
        arbiter.request(&mut track, Move::Right);
        assert_eq!(track.lane, LaneIndex::MIDDLE);
        assert_eq!(track.deltas, vec![-1, 1]);
    }

    #[test]
    fn left_at_track_edge_is_clamped_not_escalated() {
        let mut track = FakeTrack::at(-2);
        let mut arbiter = MoveArbiter::new(Role::Player);
        let outcome = arbiter.request(&mut track, Move::Left);
        assert_eq!(
            outcome,
            MoveOutcome::Clamped {
                lane: LaneIndex::LEFT_OFFROAD
            }
        );
        assert_eq!(outcome.effective_move(), Some(Move::Stay));
        assert!(track.deltas.is_empty());
    }

    #[test]
    fn right_at_track_edge_is_clamped() {
        let mut track = FakeTrack::at(2);
        let mut arbiter = MoveArbiter::new(Role::Player);
        let outcome = arbiter.request(&mut track, Move::Right);
        assert_eq!(
            outcome,
            MoveOutcome::Clamped {
                lane: LaneIndex::RIGHT_OFFROAD
            }
        );
    }

    #[test]
    fn request_while_in_flight_is_dropped() {
        let mut track = FakeTrack::at(0);
        let mut arbiter = MoveArbiter::new(Role::Simulator);
        arbiter.set_in_flight(true);
        let outcome = arbiter.request(&mut track, Move::Left);
        assert_eq!(outcome, MoveOutcome::RejectedBusy);
        assert_eq!(outcome.effective_move(), None);
        assert_eq!(track.lane, LaneIndex::MIDDLE);

        // Retrying on the next tick succeeds once the flag clears.
        arbiter.set_in_flight(false);
        let outcome = arbiter.request(&mut track, Move::Left);
        assert!(matches!(outcome, MoveOutcome::Applied { .. }));
    }
}
