//! Interchangeable route planning strategies.
//!
//! Both engines answer the same question: given an [`Instance`] and a
//! [`RewardSimulator`], which routes should the fleet fly? The
//! [`Heuristic`] trait captures that single capability and [`Strategy`]
//! lets the caller pick an engine explicitly.
//!
//! # Examples
//!
//! ```
//! use drone_sweep::instance::Instance;
//! use drone_sweep::simulation::{ConditionFactors, MonteCarlo, MonteCarloConfig};
//! use drone_sweep::strategy::{Heuristic, SolutionLabel, Strategy};
//!
//! let instance = Instance::new(
//!     "demo",
//!     2,
//!     20.0,
//!     &[(0, 0, 0.0), (1, 2, 0.6), (4, 3, 0.9), (2, 5, 0.3)],
//! )
//! .unwrap();
//! let simulator = MonteCarlo::new(
//!     ConditionFactors::drone_sweep(),
//!     MonteCarloConfig::default().with_trials(50),
//! )
//! .unwrap();
//!
//! let solutions = Strategy::constructive().solve(&instance, &simulator).unwrap();
//! assert_eq!(solutions[0].label, SolutionLabel::Deterministic);
//! assert_eq!(solutions[1].label, SolutionLabel::Stochastic);
//! ```

use std::fmt;

use crate::constructive::{ConstructiveConfig, ConstructiveRunner};
use crate::error::MissionError;
use crate::instance::Instance;
use crate::models::Solution;
use crate::sa::{RouteAnnealing, SaConfig, SaRunner};
use crate::simulation::RewardSimulator;

/// Which objective a returned solution was optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionLabel {
    /// Best under nominal reward (OBD).
    Deterministic,
    /// Re-optimized against simulated reward (OBS).
    Stochastic,
    /// Best state visited by simulated annealing.
    Annealed,
}

impl SolutionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionLabel::Deterministic => "OBD",
            SolutionLabel::Stochastic => "OBS",
            SolutionLabel::Annealed => "SA",
        }
    }
}

impl fmt::Display for SolutionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A solution tagged with the objective it came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledSolution {
    pub label: SolutionLabel,
    pub solution: Solution,
}

impl LabeledSolution {
    pub fn new(label: SolutionLabel, solution: Solution) -> Self {
        Self { label, solution }
    }
}

/// A route planning engine.
pub trait Heuristic {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Plans routes for `instance`, scoring them with `simulator`.
    fn solve<S: RewardSimulator>(
        &self,
        instance: &Instance,
        simulator: &S,
    ) -> Result<Vec<LabeledSolution>, MissionError>;
}

/// Constructive heuristic: returns OBD followed by OBS.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructiveHeuristic {
    pub config: ConstructiveConfig,
}

impl ConstructiveHeuristic {
    pub fn new(config: ConstructiveConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for ConstructiveHeuristic {
    fn name(&self) -> &'static str {
        "constructive"
    }

    fn solve<S: RewardSimulator>(
        &self,
        instance: &Instance,
        simulator: &S,
    ) -> Result<Vec<LabeledSolution>, MissionError> {
        let result = ConstructiveRunner::run(instance, simulator, &self.config)?;
        Ok(vec![
            LabeledSolution::new(SolutionLabel::Deterministic, result.deterministic),
            LabeledSolution::new(SolutionLabel::Stochastic, result.stochastic),
        ])
    }
}

/// Simulated annealing over the instance's temperature schedule.
///
/// The schedule (initial temperature, cooling rate, minimum temperature)
/// always comes from [`Instance::annealing`]; this type only carries the
/// run settings the instance does not describe.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingHeuristic {
    /// Seed for construction, move choice and acceptance.
    pub seed: u64,

    /// Iterations per temperature level.
    pub iterations_per_temperature: usize,

    /// Hard iteration cap. 0 = none.
    pub max_iterations: usize,

    /// Perturbation attempts per iteration.
    pub max_neighbor_attempts: usize,
}

impl Default for AnnealingHeuristic {
    fn default() -> Self {
        let base = SaConfig::default();
        Self {
            seed: 0,
            iterations_per_temperature: base.iterations_per_temperature,
            max_iterations: base.max_iterations,
            max_neighbor_attempts: base.max_neighbor_attempts,
        }
    }
}

impl AnnealingHeuristic {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_neighbor_attempts(mut self, n: usize) -> Self {
        self.max_neighbor_attempts = n;
        self
    }

    /// Full runner configuration for `instance`.
    pub fn config_for(&self, instance: &Instance) -> Result<SaConfig, MissionError> {
        let params = instance
            .annealing()
            .ok_or_else(|| MissionError::MissingAnnealingParams(instance.id().to_string()))?;
        Ok(SaConfig::from_params(params)
            .with_iterations_per_temperature(self.iterations_per_temperature)
            .with_max_iterations(self.max_iterations)
            .with_max_neighbor_attempts(self.max_neighbor_attempts)
            .with_seed(self.seed))
    }
}

impl Heuristic for AnnealingHeuristic {
    fn name(&self) -> &'static str {
        "annealing"
    }

    #[tracing::instrument(level = "debug", name = "annealing", skip_all, fields(instance = instance.id()))]
    fn solve<S: RewardSimulator>(
        &self,
        instance: &Instance,
        simulator: &S,
    ) -> Result<Vec<LabeledSolution>, MissionError> {
        let config = self.config_for(instance)?;
        let problem = RouteAnnealing::new(instance, simulator, config.max_neighbor_attempts);
        let result = SaRunner::run(&problem, &config)?;
        let solution = Solution::evaluate(instance, &result.best, simulator);
        tracing::info!(
            initial_reward = result.initial_reward,
            reward_after = solution.reward_after(),
            levels = result.temperature_steps,
            "annealed solution ready"
        );
        Ok(vec![LabeledSolution::new(SolutionLabel::Annealed, solution)])
    }
}

/// Explicit engine selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Constructive(ConstructiveHeuristic),
    Annealing(AnnealingHeuristic),
}

impl Strategy {
    /// Constructive heuristic with default settings.
    pub fn constructive() -> Self {
        Strategy::Constructive(ConstructiveHeuristic::default())
    }

    /// Simulated annealing seeded with `seed`.
    pub fn annealing(seed: u64) -> Self {
        Strategy::Annealing(AnnealingHeuristic::default().with_seed(seed))
    }
}

impl Heuristic for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Constructive(h) => h.name(),
            Strategy::Annealing(h) => h.name(),
        }
    }

    fn solve<S: RewardSimulator>(
        &self,
        instance: &Instance,
        simulator: &S,
    ) -> Result<Vec<LabeledSolution>, MissionError> {
        match self {
            Strategy::Constructive(h) => h.solve(instance, simulator),
            Strategy::Annealing(h) => h.solve(instance, simulator),
        }
    }
}
