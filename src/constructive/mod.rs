//! Constructive heuristic.
//!
//! Builds routes greedily by quality per cost, improves them on nominal
//! reward, then re-optimizes against simulated reward. Returns the
//! deterministic solution (OBD) and the stochastic solution (OBS).

mod config;
mod runner;

pub use config::ConstructiveConfig;
pub use runner::{
    greedy_construction, improve_nominal, two_opt, ConstructiveResult, ConstructiveRunner,
};
