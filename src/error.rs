//! Configuration errors raised while setting up a mission.
//!
//! Every variant is fatal and detected before any search starts. Expected
//! infeasibility (no node reachable within the budget) is not an error:
//! engines report it as empty routes.

use thiserror::Error;

/// Error raised when a mission, simulator or engine is misconfigured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissionError {
    /// The fleet has no drones.
    #[error("fleet_size must be positive")]
    ZeroFleet,

    /// The per-route cost budget is not a positive finite number.
    #[error("route_max_cost must be positive and finite, got {0}")]
    InvalidBudget(f64),

    /// No nodes were supplied (at least the depot is required).
    #[error("node_list must contain at least the depot node")]
    EmptyNodeList,

    /// `number_of_nodes` disagrees with the supplied node list.
    #[error("number_of_nodes is {declared} but node_list holds {actual} nodes")]
    NodeCountMismatch {
        /// Declared node count.
        declared: usize,
        /// Length of the node list.
        actual: usize,
    },

    /// A node quality lies outside `[0, 1]`.
    #[error("node {id} has quality {quality}, expected a value in [0, 1]")]
    InvalidQuality {
        /// Node id.
        id: usize,
        /// Offending quality.
        quality: f64,
    },

    /// Annealing parameters are inconsistent.
    #[error("invalid annealing parameters: {0}")]
    InvalidAnnealing(String),

    /// The annealing engine was asked to solve an instance without parameters.
    #[error("instance '{0}' carries no annealing parameters")]
    MissingAnnealingParams(String),

    /// A condition factor entry is malformed.
    #[error("condition factor '{name}': {reason}")]
    InvalidFactor {
        /// Factor name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Monte Carlo settings are unusable.
    #[error("invalid simulation settings: {0}")]
    InvalidSimulation(String),

    /// Local search settings are unusable.
    #[error("invalid search settings: {0}")]
    InvalidSearch(String),

    /// A search was asked to start from a solution that breaks a constraint.
    #[error("initial solution is infeasible")]
    InfeasibleStart,

    /// More nodes were requested than the grid has cells.
    #[error("a {grid_size}x{grid_size} grid cannot host {requested} nodes")]
    MapTooSmall {
        /// Side length of the grid.
        grid_size: usize,
        /// Requested node count.
        requested: usize,
    },

    /// The grid's cell count does not fit in `usize`.
    #[error("a {0}x{0} grid has more cells than can be addressed")]
    MapTooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = MissionError::InvalidQuality {
            id: 3,
            quality: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "node 3 has quality 1.5, expected a value in [0, 1]"
        );

        let err = MissionError::InvalidFactor {
            name: "weather".into(),
            reason: "factor must lie in [0, 1], got -0.2".into(),
        };
        assert!(err.to_string().starts_with("condition factor 'weather'"));
    }

    #[test]
    fn test_count_mismatch_message() {
        let err = MissionError::NodeCountMismatch {
            declared: 10,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "number_of_nodes is 10 but node_list holds 9 nodes"
        );
    }
}
