//! Telemetry log codec.
//!
//! One record per line, append-only, UTF-8:
//! `<currentLane+2>,<leftDistance>,<middleDistance>,<rightDistance>,<targetLane+2>`
//!
//! Lane fields are shifted by +2 so they range 0..=4; distances use native
//! float formatting. There is no schema version: any format change breaks
//! every previously trained model.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::lane::{LaneIndex, Move};
use crate::sensor::FeatureVector;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub current_lane: LaneIndex,
    pub left_distance: f64,
    pub middle_distance: f64,
    pub right_distance: f64,
    pub target_lane: LaneIndex,
}

impl LogRecord {
    /// Builds the record for one decision tick. The target lane is the lane
    /// after the move, with the track bounds already enforced.
    pub fn from_decision(features: &FeatureVector, mv: Move) -> Self {
        Self {
            current_lane: features.current_lane,
            left_distance: features.left_distance,
            middle_distance: features.middle_distance,
            right_distance: features.right_distance,
            target_lane: features.current_lane.shifted(mv),
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.current_lane.encoded(),
            self.left_distance,
            self.middle_distance,
            self.right_distance,
            self.target_lane.encoded()
        )
    }

    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        if fields.len() != 5 {
            return Err(RecordError::FieldCount {
                found: fields.len(),
            });
        }

        Ok(Self {
            current_lane: parse_lane(fields[0], "current lane")?,
            left_distance: parse_distance(fields[1], "left distance")?,
            middle_distance: parse_distance(fields[2], "middle distance")?,
            right_distance: parse_distance(fields[3], "right distance")?,
            target_lane: parse_lane(fields[4], "target lane")?,
        })
    }
}

fn parse_lane(raw: &str, field: &'static str) -> Result<LaneIndex, RecordError> {
    let encoded: i64 = raw.parse().map_err(|_| RecordError::InvalidLaneField {
        field,
        raw: raw.to_string(),
    })?;
    if !(0..=4).contains(&encoded) {
        return Err(RecordError::LaneOutOfRange { field, encoded });
    }
    Ok(LaneIndex::from_encoded(encoded as u8).unwrap_or(LaneIndex::MIDDLE))
}

fn parse_distance(raw: &str, field: &'static str) -> Result<f64, RecordError> {
    raw.parse().map_err(|_| RecordError::InvalidDistance {
        field,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TRACK_TOP;

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
    fn clear_track_stay_encodes_as_sentinel_row() {
        let fv = features(-1, TRACK_TOP, TRACK_TOP, TRACK_TOP);
        let record = LogRecord::from_decision(&fv, Move::Stay);
        assert_eq!(record.encode(), "1,5.7,5.7,5.7,1");
    }

    #[test]
    fn clamped_left_at_track_edge_records_stay_target() {
        let fv = features(-2, TRACK_TOP, -1.25, TRACK_TOP);
        let record = LogRecord::from_decision(&fv, Move::Left);
        assert_eq!(record.target_lane, LaneIndex::LEFT_OFFROAD);
        assert!(record.encode().starts_with('0'));
        assert!(record.encode().ends_with(",0"));
    }

    #[test]
    fn encode_parse_roundtrip_preserves_every_field() {
        let record = LogRecord {
            current_lane: LaneIndex::MIDDLE,
            left_distance: -3.5,
            middle_distance: 0.125,
            right_distance: TRACK_TOP,
            target_lane: LaneIndex::LEFT,
        };
        assert_eq!(LogRecord::parse(&record.encode()), Ok(record));
    }

    #[test]
    fn parse_accepts_trailing_newline() {
        assert!(LogRecord::parse("2,5.7,5.7,5.7,1\n").is_ok());
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        assert_eq!(
            LogRecord::parse("1,2,3,4"),
            Err(RecordError::FieldCount { found: 4 })
        );
    }

    #[test]
    fn parse_rejects_non_integer_lane() {
        assert!(matches!(
            LogRecord::parse("one,5.7,5.7,5.7,1"),
            Err(RecordError::InvalidLaneField { .. })
        ));
    }

    #[test]
    fn parse_rejects_lane_out_of_encoded_range() {
        assert_eq!(
            LogRecord::parse("5,5.7,5.7,5.7,1"),
            Err(RecordError::LaneOutOfRange {
                field: "current lane",
                encoded: 5
            })
        );
    }

    #[test]
    fn parse_rejects_bad_distance() {
        assert!(matches!(
            LogRecord::parse("1,far,5.7,5.7,1"),
            Err(RecordError::InvalidDistance { .. })
        ));
    }
}
