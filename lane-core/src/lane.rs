use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseRoleError;

/// One of the five discrete track positions, -2..=2. Lanes -1/0/1 are
/// on-road; -2 and 2 are the off-road penalty lanes. The value only ever
/// changes by one per accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct LaneIndex(i32);

impl LaneIndex {
    pub const MIN: LaneIndex = LaneIndex(-2);
    pub const MAX: LaneIndex = LaneIndex(2);

    pub const LEFT_OFFROAD: LaneIndex = LaneIndex(-2);
    pub const LEFT: LaneIndex = LaneIndex(-1);
    pub const MIDDLE: LaneIndex = LaneIndex(0);
    pub const RIGHT: LaneIndex = LaneIndex(1);
    pub const RIGHT_OFFROAD: LaneIndex = LaneIndex(2);

    pub fn new(value: i32) -> Option<Self> {
        (-2..=2).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Shifted-by-two form used in the telemetry log and the classifier
    /// encoding, always 0..=4.
    pub fn encoded(self) -> u8 {
        (self.0 + 2) as u8
    }

    pub fn from_encoded(encoded: u8) -> Option<Self> {
        Self::new(encoded as i32 - 2)
    }

    pub fn is_offroad(self) -> bool {
        self.0 == -2 || self.0 == 2
    }

    /// Applies a move with the track bounds enforced: Stay and any move that
    /// would leave [-2, 2] return the lane unchanged.
    pub fn shifted(self, mv: Move) -> LaneIndex {
        match Self::new(self.0 + mv.delta()) {
            Some(next) => next,
            None => self,
        }
    }
}

impl TryFrom<i32> for LaneIndex {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("lane index out of range: {value}"))
    }
}

impl From<LaneIndex> for i32 {
    fn from(lane: LaneIndex) -> i32 {
        lane.0
    }
}

impl fmt::Display for LaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A requested lane transition. Stay requests no change but is still a
/// loggable event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Left,
    Right,
    Stay,
}

impl Move {
    pub fn delta(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Stay => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Stay => "stay",
        }
    }
}

/// The two entities a session tracks. A closed enum: an invalid role can
/// only appear at the parsing boundary, never inside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Simulator,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Player, Role::Simulator];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Simulator => "simulator",
        }
    }

    /// File name of this role's append-only telemetry log.
    pub fn log_file_name(self) -> &'static str {
        match self {
            Self::Player => "playerData.txt",
            Self::Simulator => "simulatorData.txt",
        }
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Self::Player),
            "simulator" => Ok(Self::Simulator),
            other => Err(ParseRoleError {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_stays_in_bounds_for_every_lane_and_move() {
        for value in -2..=2 {
            let lane = LaneIndex::new(value).unwrap();
            for mv in [Move::Left, Move::Right, Move::Stay] {
                let next = lane.shifted(mv);
                assert!((-2..=2).contains(&next.value()));
                match mv {
                    Move::Stay => assert_eq!(next, lane),
                    Move::Left => {
                        if value > -2 {
                            assert_eq!(next.value(), value - 1);
                        } else {
                            assert_eq!(next, lane);
                        }
                    }
                    Move::Right => {
                        if value < 2 {
                            assert_eq!(next.value(), value + 1);
                        } else {
                            assert_eq!(next, lane);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn encoded_roundtrip() {
        for value in -2..=2 {
            let lane = LaneIndex::new(value).unwrap();
            assert_eq!(LaneIndex::from_encoded(lane.encoded()), Some(lane));
        }
        assert_eq!(LaneIndex::from_encoded(5), None);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(LaneIndex::new(-3), None);
        assert_eq!(LaneIndex::new(3), None);
    }

    #[test]
    fn role_parses_only_known_tags() {
        assert_eq!("player".parse::<Role>(), Ok(Role::Player));
        assert_eq!("simulator".parse::<Role>(), Ok(Role::Simulator));
        assert!("driver".parse::<Role>().is_err());
    }
}
