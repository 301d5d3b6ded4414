//! Drone route planning as an annealing problem.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::SaProblem;
use crate::instance::Instance;
use crate::models::Assignment;
use crate::neighborhood::random_neighbor;
use crate::simulation::RewardSimulator;

/// Route planning over an [`Instance`], scored by simulated reward.
///
/// Solutions are [`Assignment`]s. Every state the problem hands out keeps
/// each tour within the route budget.
#[derive(Debug, Clone)]
pub struct RouteAnnealing<'a, S> {
    instance: &'a Instance,
    simulator: &'a S,
    max_neighbor_attempts: usize,
}

impl<'a, S: RewardSimulator> RouteAnnealing<'a, S> {
    pub fn new(instance: &'a Instance, simulator: &'a S, max_neighbor_attempts: usize) -> Self {
        Self {
            instance,
            simulator,
            max_neighbor_attempts,
        }
    }
}

impl<S: RewardSimulator> SaProblem for RouteAnnealing<'_, S> {
    type Solution = Assignment;

    /// Random construction: candidates in shuffled order, each offered to
    /// the drones in a fresh random order and appended to the first tour
    /// it fits.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Assignment {
        let mut assignment = Assignment::new(self.instance.fleet_size());
        let mut nodes: Vec<usize> = self.instance.candidates().collect();
        nodes.shuffle(rng);
        let mut drones: Vec<usize> = (0..self.instance.fleet_size()).collect();

        for node in nodes {
            drones.shuffle(rng);
            for &drone in &drones {
                let tour = assignment.tour_mut(drone);
                tour.push(node);
                if self.instance.fits(tour) {
                    break;
                }
                tour.pop();
            }
        }
        assignment
    }

    fn reward(&self, assignment: &Assignment) -> f64 {
        self.simulator
            .estimate(&assignment.to_routes(self.instance))
            .mean()
    }

    fn neighbor<R: Rng>(&self, assignment: &Assignment, rng: &mut R) -> Option<Assignment> {
        random_neighbor(assignment, self.instance, rng, self.max_neighbor_attempts)
    }

    /// Right fleet size, every tour within budget, no node visited twice
    /// and no depot or unknown index among the stops.
    fn is_feasible(&self, assignment: &Assignment) -> bool {
        let nodes = self.instance.nodes().len();
        let mut seen = vec![false; nodes];
        let stops_ok = assignment.tours().iter().flatten().all(|&n| {
            let fresh = (1..nodes).contains(&n) && !seen[n];
            if fresh {
                seen[n] = true;
            }
            fresh
        });
        assignment.fleet_size() == self.instance.fleet_size()
            && stops_ok
            && assignment.is_feasible(self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::sa::{SaConfig, SaRunner};
    use crate::simulation::{ConditionFactors, MonteCarlo, MonteCarloConfig};

    fn instance() -> Instance {
        Instance::new(
            "grid",
            2,
            14.0,
            &[
                (0, 0, 0.0),
                (1, 2, 0.4),
                (3, 1, 0.8),
                (2, 4, 0.3),
                (5, 5, 0.9),
                (4, 0, 0.6),
                (9, 9, 1.0),
            ],
        )
        .unwrap()
    }

    fn simulator() -> MonteCarlo {
        MonteCarlo::new(
            ConditionFactors::drone_sweep(),
            MonteCarloConfig::default().with_trials(50).with_seed(5),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_solution_feasible() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        for seed in 0..20 {
            let a = problem.initial_solution(&mut create_rng(seed));
            assert_eq!(a.fleet_size(), 2);
            assert!(a.is_feasible(&inst));
            // (9, 9) is out of range for every drone
            assert!(!a.is_visited(6));
        }
    }

    #[test]
    fn test_neighbors_stay_feasible() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        let mut rng = create_rng(11);
        let mut current = problem.initial_solution(&mut rng);
        for _ in 0..200 {
            if let Some(next) = problem.neighbor(&current, &mut rng) {
                assert!(next.is_feasible(&inst));
                current = next;
            }
        }
    }

    #[test]
    fn test_reward_is_simulated_mean() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        let a = Assignment::from_tours(vec![vec![1, 2], vec![5]]);
        let expected = sim.estimate(&a.to_routes(&inst)).mean();
        assert_eq!(problem.reward(&a), expected);
        assert!(expected < a.nominal_reward(&inst));
    }

    #[test]
    fn test_feasibility_check() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        assert!(problem.is_feasible(&Assignment::from_tours(vec![vec![1, 2], vec![5]])));
        // over budget, duplicated stop, depot as a stop, wrong fleet size
        assert!(!problem.is_feasible(&Assignment::from_tours(vec![vec![6], vec![]])));
        assert!(!problem.is_feasible(&Assignment::from_tours(vec![vec![1], vec![1]])));
        assert!(!problem.is_feasible(&Assignment::from_tours(vec![vec![0, 1], vec![]])));
        assert!(!problem.is_feasible(&Assignment::from_tours(vec![vec![1]])));
    }

    #[test]
    fn test_run_from_rejects_over_budget_start() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        let config = SaConfig::default().with_seed(1);
        let start = Assignment::from_tours(vec![vec![6], vec![]]);

        let err = SaRunner::run_from(&problem, start, &config, &mut create_rng(1)).unwrap_err();
        assert_eq!(err, crate::error::MissionError::InfeasibleStart);
    }

    #[test]
    fn test_annealing_never_loses_initial() {
        let inst = instance();
        let sim = simulator();
        let problem = RouteAnnealing::new(&inst, &sim, 16);
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.9)
            .with_min_temperature(0.05)
            .with_seed(8634452);

        let result = SaRunner::run(&problem, &config).unwrap();

        assert!(result.best_reward >= result.initial_reward);
        assert!(result.best.is_feasible(&inst));
    }
}
