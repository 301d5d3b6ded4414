//! Reconnaissance route planning for drone fleets under uncertain
//! signal conditions.
//!
//! A mission [`Instance`](instance::Instance) lists candidate waypoints on a
//! gridded terrain, each with a signal quality score, plus a fleet size and
//! a per-route flight cost budget. The crate plans one closed route per
//! drone that maximizes the collected quality once environmental risk is
//! taken into account:
//!
//! - **Environment simulation**: a Monte Carlo estimator discounts every
//!   visited node by randomized condition factors (weather, unexplored
//!   area, signal strength) and reports the mean and spread of the reward.
//! - **Constructive heuristic**: greedy quality-per-cost construction and
//!   nominal improvement yield the deterministic solution (OBD), which a
//!   simulation-driven local search refines into the stochastic one (OBS).
//! - **Simulated Annealing (SA)**: a generic maximizing annealer with a
//!   route planning problem plugged into it.
//! - **Strategies**: both engines behind one `solve` capability, selected
//!   explicitly by the caller.
//!
//! # Architecture
//!
//! Every source of randomness is an explicit, seeded generator, so a run is
//! fully determined by its instance, condition factors and seeds. Engines
//! search over a mutable [`Assignment`](models::Assignment) and only
//! materialize immutable [`Solution`](models::Solution)s at the end.

pub mod constructive;
pub mod error;
pub mod instance;
pub mod map;
pub mod models;
pub mod neighborhood;
pub mod random;
pub mod sa;
pub mod simulation;
pub mod strategy;

pub use error::MissionError;
