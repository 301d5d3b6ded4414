//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! [`SaRunner`] maximizes any [`SaProblem`]; [`RouteAnnealing`] casts drone
//! route planning as one, scoring states by their simulated reward.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod problem;
mod runner;
mod types;

pub use config::SaConfig;
pub use problem::RouteAnnealing;
pub use runner::{SaResult, SaRunner};
pub use types::SaProblem;
