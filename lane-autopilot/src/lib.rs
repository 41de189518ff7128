pub mod arbiter;
pub mod benchmark;
pub mod model;
pub mod seed;
pub mod session;
pub mod strategy;
pub mod telemetry;
