pub mod metrics;
pub mod outcome;
pub mod parameters;
