//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The implementor provides the initial state, the reward and the
/// perturbation operator. The runner handles temperature, acceptance and
/// cooling.
///
/// # Maximization
///
/// SA maximizes the reward. For a cost, negate it.
///
/// # Examples
///
/// ```ignore
/// struct Knapsack { values: Vec<f64>, weights: Vec<f64>, capacity: f64 }
///
/// impl SaProblem for Knapsack {
///     type Solution = Vec<bool>;
///
///     fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<bool> {
///         vec![false; self.values.len()]
///     }
///
///     fn reward(&self, picked: &Vec<bool>) -> f64 {
///         picked.iter().zip(&self.values).filter(|(p, _)| **p).map(|(_, v)| v).sum()
///     }
///
///     fn neighbor<R: Rng>(&self, picked: &Vec<bool>, rng: &mut R) -> Option<Vec<bool>> {
///         let mut next = picked.clone();
///         let i = rng.random_range(0..next.len());
///         next[i] = !next[i];
///         let load: f64 = next.iter().zip(&self.weights).filter(|(p, _)| **p).map(|(_, w)| w).sum();
///         (load <= self.capacity).then_some(next)
///     }
/// }
/// ```
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Creates an initial solution.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the reward of a solution. Higher is better.
    fn reward(&self, solution: &Self::Solution) -> f64;

    /// Generates a feasible neighbor of the current solution.
    ///
    /// Returns `None` when no feasible perturbation was found; the runner
    /// then skips the iteration and keeps the current solution.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Option<Self::Solution>;

    /// Whether a caller-supplied solution satisfies the problem's
    /// constraints. Problems without hard constraints keep the default.
    fn is_feasible(&self, _solution: &Self::Solution) -> bool {
        true
    }
}
