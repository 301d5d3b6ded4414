//! Finished multi-drone solutions.

use std::fmt;

use crate::instance::Instance;
use crate::simulation::{RewardEstimate, RewardSimulator};

use super::{Assignment, Route};

/// A complete assignment of routes to the fleet, with its metrics.
///
/// Holds one route per drone (idle drones carry an empty route). Solutions
/// are immutable: engines search over an [`Assignment`] and only build a
/// `Solution` once they are done.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    routes: Vec<Route>,
    cost: f64,
    reward: f64,
    reward_after: f64,
    reward_std_dev: f64,
}

impl Solution {
    /// Assembles a solution from routes and their simulated reward.
    pub fn new(routes: Vec<Route>, estimate: &RewardEstimate) -> Self {
        Self {
            cost: routes.iter().map(|r| r.cost()).sum(),
            reward: routes.iter().map(|r| r.reward()).sum(),
            reward_after: estimate.mean(),
            reward_std_dev: estimate.std_dev(),
            routes,
        }
    }

    /// Materializes `assignment` and scores it with `simulator`.
    pub fn evaluate<S: RewardSimulator>(
        instance: &Instance,
        assignment: &Assignment,
        simulator: &S,
    ) -> Self {
        let routes = assignment.to_routes(instance);
        let estimate = simulator.estimate(&routes);
        Self::new(routes, &estimate)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Total flight cost across the fleet.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Nominal reward: summed quality of every visited node.
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Mean simulated reward.
    pub fn reward_after(&self) -> f64 {
        self.reward_after
    }

    /// Sample standard deviation of the simulated reward.
    pub fn reward_std_dev(&self) -> f64 {
        self.reward_std_dev
    }

    /// Number of drones that actually fly.
    pub fn num_active_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Number of visited nodes across all routes.
    pub fn num_visited(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Back to a working copy, e.g. to seed another engine.
    pub fn to_assignment(&self) -> Assignment {
        Assignment::from_tours(self.routes.iter().map(|r| r.node_ids()).collect())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cost: {:.3}", self.cost)?;
        writeln!(f, "reward: {:.3}", self.reward)?;
        writeln!(
            f,
            "reward after: {:.3} (std dev {:.3})",
            self.reward_after, self.reward_std_dev
        )?;
        write!(f, "routes:")?;
        for route in &self.routes {
            write!(f, "\n\t{route}")?;
        }
        Ok(())
    }
}
