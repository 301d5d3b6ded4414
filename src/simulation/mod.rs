//! Environment simulator.
//!
//! Scores routes under randomized environmental conditions. Each named
//! [`ConditionFactor`] discounts node qualities by a random fraction of its
//! weight; [`MonteCarlo`] repeats the draw over independent, individually
//! seeded trials and reports mean and spread.
//!
//! Condition factors are an explicit value owned by the simulator, never
//! process-wide state, so simulators compose and test in isolation.

mod config;
mod runner;
mod types;

pub use config::{ConditionFactor, ConditionFactors, Exposure, FactorEntry, MonteCarloConfig};
pub use runner::{simulate, MonteCarlo};
pub use types::{RewardEstimate, RewardSimulator};
