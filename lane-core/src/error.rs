use core::fmt;

/// Failure while parsing a telemetry log line back into a [`crate::LogRecord`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordError {
    FieldCount { found: usize },
    InvalidLaneField { field: &'static str, raw: String },
    LaneOutOfRange { field: &'static str, encoded: i64 },
    InvalidDistance { field: &'static str, raw: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { found } => {
                write!(f, "expected 5 comma-separated fields, found {found}")
            }
            Self::InvalidLaneField { field, raw } => {
                write!(f, "{field} is not an integer lane value: '{raw}'")
            }
            Self::LaneOutOfRange { field, encoded } => {
                write!(f, "{field} out of range: {encoded} (allowed 0..=4)")
            }
            Self::InvalidDistance { field, raw } => {
                write!(f, "{field} is not a real number: '{raw}'")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// An operator-supplied role tag that is neither `player` nor `simulator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseRoleError {
    pub found: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "role must be 'player' or 'simulator', not '{}'",
            self.found
        )
    }
}

impl std::error::Error for ParseRoleError {}
