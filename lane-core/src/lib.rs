pub mod constants;
pub mod error;
pub mod lane;
pub mod record;
pub mod rng;
pub mod sensor;
pub mod sim;

pub use error::{ParseRoleError, RecordError};
pub use lane::{LaneIndex, Move, Role};
pub use record::LogRecord;
pub use sensor::{summarize, FeatureVector, Obstacle};
