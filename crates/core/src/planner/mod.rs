//! Schedule planning: rules in, schedule lists out.

mod runner;

pub use runner::Planner;
