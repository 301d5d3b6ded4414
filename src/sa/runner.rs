//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::error::MissionError;
use crate::random::create_rng;
use rand::Rng;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Reward of the best solution.
    pub best_reward: f64,

    /// The solution the search started from.
    pub initial: S,

    /// Reward of the initial solution.
    pub initial_reward: f64,

    /// Total number of iterations, skipped ones included.
    pub iterations: usize,

    /// Number of temperature levels visited.
    pub temperature_steps: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted moves that did not lower the reward.
    pub improving_moves: usize,

    /// Iterations where no feasible neighbor was found.
    pub skipped_iterations: usize,

    /// Best reward at the end of each temperature level, starting with the
    /// initial reward.
    pub reward_history: Vec<f64>,

    /// Temperature of each visited level, in order.
    pub temperature_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    ///
    /// Seeds the generator from `config.seed`, or from entropy when unset.
    pub fn run<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution>, MissionError> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs SA with a caller-supplied generator.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        problem: &P,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution>, MissionError> {
        config.validate()?;
        let initial = problem.initial_solution(rng);
        Self::anneal(problem, initial, config, rng)
    }

    /// Runs SA starting from `initial` instead of a constructed solution.
    ///
    /// Fails with [`MissionError::InfeasibleStart`] when `initial` breaks
    /// the problem's constraints.
    pub fn run_from<P: SaProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution>, MissionError> {
        config.validate()?;
        if !problem.is_feasible(&initial) {
            return Err(MissionError::InfeasibleStart);
        }
        Self::anneal(problem, initial, config, rng)
    }

    fn anneal<P: SaProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution>, MissionError> {
        let initial_reward = problem.reward(&initial);
        let mut current = initial.clone();
        let mut current_reward = initial_reward;
        let mut best = initial.clone();
        let mut best_reward = initial_reward;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut skipped_iterations = 0usize;

        let mut reward_history = vec![best_reward];
        let mut temperature_history = Vec::with_capacity(config.temperature_steps());

        tracing::debug!(
            initial_reward,
            levels = config.temperature_steps(),
            "annealing started"
        );

        while temperature >= config.min_temperature {
            if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                break;
            }
            temperature_history.push(temperature);

            for _ in 0..config.iterations_per_temperature {
                if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                    break;
                }
                total_iterations += 1;

                let Some(neighbor) = problem.neighbor(&current, rng) else {
                    skipped_iterations += 1;
                    continue;
                };
                let neighbor_reward = problem.reward(&neighbor);
                let delta = neighbor_reward - current_reward;

                // Metropolis acceptance criterion
                let accept = if delta >= 0.0 {
                    improving_moves += 1;
                    true
                } else {
                    rng.random::<f64>() < (delta / temperature).exp()
                };

                if accept {
                    current = neighbor;
                    current_reward = neighbor_reward;
                    accepted_moves += 1;

                    if current_reward > best_reward {
                        best = current.clone();
                        best_reward = current_reward;
                    }
                }
            }

            reward_history.push(best_reward);
            tracing::debug!(
                temperature,
                current_reward,
                best_reward,
                "temperature level done"
            );

            temperature *= config.cooling_rate;
        }

        tracing::info!(
            iterations = total_iterations,
            levels = temperature_history.len(),
            accepted_moves,
            skipped_iterations,
            best_reward,
            "annealing finished"
        );

        Ok(SaResult {
            best,
            best_reward,
            initial,
            initial_reward,
            iterations: total_iterations,
            temperature_steps: temperature_history.len(),
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            skipped_iterations,
            reward_history,
            temperature_history,
        })
    }
}
