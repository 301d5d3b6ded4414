//! Constructive heuristic execution.
//!
//! # Algorithm
//!
//! 1. Greedy construction: the open drone with the most remaining budget
//!    takes the unvisited node with the best quality per incremental cost
//!    that still fits; a drone closes once nothing fits.
//! 2. Nominal improvement: 2-opt every tour to free budget, then insert
//!    remaining nodes at their best-ratio position; repeat until no node
//!    can be added. The result is the deterministic solution (OBD).
//! 3. Stochastic improvement: best-improvement local search from OBD over
//!    the full move neighborhood, scoring candidates by simulated reward
//!    (`mean - risk_aversion * std_dev`). The result is the stochastic
//!    solution (OBS).
//!
//! Ties are broken towards lower drone indices and lower node ids, so the
//! outcome depends only on the instance and the simulator.

use super::config::ConstructiveConfig;
use crate::error::MissionError;
use crate::instance::Instance;
use crate::models::{Assignment, Solution};
use crate::neighborhood::{enumerate, try_apply};
use crate::simulation::RewardSimulator;

/// Floor for incremental costs in quality-per-cost ratios.
const MIN_INCREMENT: f64 = 1e-9;

/// Smallest objective gain the stochastic search treats as improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-12;

/// Result of a constructive run.
#[derive(Debug, Clone)]
pub struct ConstructiveResult {
    /// Best solution under nominal reward (OBD).
    pub deterministic: Solution,

    /// Solution re-optimized against simulated reward (OBS).
    pub stochastic: Solution,

    /// Improvement passes made by the stochastic search.
    pub passes: usize,

    /// Moves the stochastic search accepted.
    pub improving_moves: usize,

    /// Stochastic objective after each accepted move, starting with OBD's.
    pub objective_history: Vec<f64>,
}

/// Executes the constructive heuristic.
pub struct ConstructiveRunner;

impl ConstructiveRunner {
    /// Builds the deterministic and the stochastic solution for `instance`.
    ///
    /// Nodes that cannot be reached within the budget stay unvisited and
    /// drones with nothing to do keep empty routes; neither is an error.
    #[tracing::instrument(level = "debug", name = "constructive", skip_all, fields(instance = instance.id()))]
    pub fn run<S: RewardSimulator>(
        instance: &Instance,
        simulator: &S,
        config: &ConstructiveConfig,
    ) -> Result<ConstructiveResult, MissionError> {
        config.validate()?;

        let greedy = greedy_construction(instance);
        tracing::debug!(
            visited = greedy.num_visited(),
            reward = greedy.nominal_reward(instance),
            "greedy construction done"
        );

        let nominal = improve_nominal(instance, greedy);
        let deterministic = Solution::evaluate(instance, &nominal, simulator);
        tracing::debug!(
            visited = nominal.num_visited(),
            reward = deterministic.reward(),
            reward_after = deterministic.reward_after(),
            "deterministic solution ready"
        );

        let search = stochastic_search(instance, simulator, nominal, config);
        let stochastic = Solution::evaluate(instance, &search.best, simulator);

        tracing::info!(
            obd_reward_after = deterministic.reward_after(),
            obs_reward_after = stochastic.reward_after(),
            passes = search.passes,
            improving_moves = search.improving_moves,
            "constructive heuristic finished"
        );

        Ok(ConstructiveResult {
            deterministic,
            stochastic,
            passes: search.passes,
            improving_moves: search.improving_moves,
            objective_history: search.history,
        })
    }
}

/// Greedy quality-per-cost construction.
pub fn greedy_construction(instance: &Instance) -> Assignment {
    let fleet = instance.fleet_size();
    let mut assignment = Assignment::new(fleet);
    let mut open = vec![true; fleet];
    let mut costs = vec![0.0; fleet];
    let mut visited = vec![false; instance.nodes().len()];
    let mut remaining = instance.candidates().len();

    while remaining > 0 {
        // Most remaining budget = least cost so far; strict < keeps the
        // lower index on ties.
        let mut pick: Option<usize> = None;
        for drone in (0..fleet).filter(|&d| open[d]) {
            if pick.is_none_or(|p| costs[drone] < costs[p]) {
                pick = Some(drone);
            }
        }
        let Some(drone) = pick else {
            break;
        };

        let tour = assignment.tour(drone);
        let last = tour.last().copied().unwrap_or(0);
        let mut best: Option<(usize, f64)> = None;
        for node in instance.candidates().filter(|&n| !visited[n]) {
            if !instance.fits_with(tour, tour.len(), node) {
                continue;
            }
            let inc = instance.distance(last, node) + instance.distance(node, 0)
                - instance.distance(last, 0);
            let ratio = instance.node(node).quality() / inc.max(MIN_INCREMENT);
            if best.is_none_or(|(_, r)| ratio > r) {
                best = Some((node, ratio));
            }
        }

        match best {
            Some((node, _)) => {
                assignment.tour_mut(drone).push(node);
                costs[drone] = instance.tour_cost(assignment.tour(drone));
                visited[node] = true;
                remaining -= 1;
            }
            None => open[drone] = false,
        }
    }

    assignment
}

/// 2-opt on a single tour; the tour's cost never increases.
pub fn two_opt(instance: &Instance, tour: &mut [usize]) {
    let len = tour.len();
    if len < 2 {
        return;
    }
    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..len - 1 {
            for j in i + 1..len {
                let prev = if i == 0 { 0 } else { tour[i - 1] };
                let next = if j + 1 == len { 0 } else { tour[j + 1] };
                let delta = instance.distance(prev, tour[j]) + instance.distance(tour[i], next)
                    - instance.distance(prev, tour[i])
                    - instance.distance(tour[j], next);
                if delta < -1e-10 {
                    tour[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }
}

/// Alternates 2-opt and best-ratio insertion until no node can be added.
pub fn improve_nominal(instance: &Instance, mut assignment: Assignment) -> Assignment {
    loop {
        for drone in 0..assignment.fleet_size() {
            two_opt(instance, assignment.tour_mut(drone));
        }

        let mut inserted = false;
        loop {
            let mut best: Option<(f64, usize, usize, usize)> = None;
            for node in assignment.unvisited(instance) {
                for (drone, tour) in assignment.tours().iter().enumerate() {
                    for at in 0..=tour.len() {
                        if !instance.fits_with(tour, at, node) {
                            continue;
                        }
                        let prev = if at == 0 { 0 } else { tour[at - 1] };
                        let next = if at == tour.len() { 0 } else { tour[at] };
                        let inc = instance.distance(prev, node) + instance.distance(node, next)
                            - instance.distance(prev, next);
                        let ratio = instance.node(node).quality() / inc.max(MIN_INCREMENT);
                        if best.is_none_or(|(r, ..)| ratio > r) {
                            best = Some((ratio, node, drone, at));
                        }
                    }
                }
            }

            match best {
                Some((_, node, drone, at)) => {
                    assignment.tour_mut(drone).insert(at, node);
                    inserted = true;
                }
                None => break,
            }
        }

        if !inserted {
            return assignment;
        }
    }
}

struct SearchOutcome {
    best: Assignment,
    passes: usize,
    improving_moves: usize,
    history: Vec<f64>,
}

fn stochastic_search<S: RewardSimulator>(
    instance: &Instance,
    simulator: &S,
    start: Assignment,
    config: &ConstructiveConfig,
) -> SearchOutcome {
    let objective = |a: &Assignment| {
        simulator
            .estimate(&a.to_routes(instance))
            .risk_adjusted(config.risk_aversion)
    };

    let mut current_value = objective(&start);
    let mut current = start;
    let mut history = vec![current_value];
    let mut passes = 0;
    let mut improving_moves = 0;

    while passes < config.max_passes {
        passes += 1;

        let mut best: Option<(Assignment, f64)> = None;
        for mv in enumerate(&current, instance) {
            let Some(candidate) = try_apply(&mv, &current, instance) else {
                continue;
            };
            let value = objective(&candidate);
            if value > current_value + IMPROVEMENT_EPSILON
                && best.as_ref().is_none_or(|(_, v)| value > *v)
            {
                best = Some((candidate, value));
            }
        }

        let Some((next, value)) = best else {
            break;
        };
        tracing::debug!(pass = passes, objective = value, "stochastic improvement");
        current = next;
        current_value = value;
        improving_moves += 1;
        history.push(value);
    }

    SearchOutcome {
        best: current,
        passes,
        improving_moves,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;
    use crate::simulation::{ConditionFactors, MonteCarlo, MonteCarloConfig, RewardEstimate};
    use rand::Rng;

    /// Deterministic stand-in: simulated reward equals nominal reward.
    struct Nominal;

    impl RewardSimulator for Nominal {
        fn sample<R: Rng>(&self, route: &Route, _rng: &mut R) -> f64 {
            route.reward()
        }

        fn estimate(&self, routes: &[Route]) -> RewardEstimate {
            RewardEstimate::from_samples(vec![routes.iter().map(|r| r.reward()).sum()])
        }
    }

    fn line_instance(fleet: usize, budget: f64) -> Instance {
        // depot at origin, nodes along the x axis
        Instance::new(
            "line",
            fleet,
            budget,
            &[
                (0, 0, 0.0),
                (1, 0, 0.2),
                (2, 0, 0.9),
                (3, 0, 0.4),
                (8, 0, 1.0),
            ],
        )
        .unwrap()
    }

    fn mc() -> MonteCarlo {
        MonteCarlo::new(
            ConditionFactors::drone_sweep(),
            MonteCarloConfig::default().with_trials(64).with_seed(5),
        )
        .unwrap()
    }

    #[test]
    fn test_greedy_respects_budget() {
        let inst = line_instance(1, 6.0);
        let a = greedy_construction(&inst);
        assert!(a.is_feasible(&inst));
        // node 4 (x = 8) needs 16 and can never fit
        assert!(!a.is_visited(4));
        // 0 -> 2 -> 1 -> 0 costs 4; appending node 3 would cost 8
        assert_eq!(a.tour(0), &[2, 1]);
    }

    #[test]
    fn test_greedy_prefers_ratio() {
        // Budget 4 reaches x <= 2. Node 2 has ratio 0.9/4 vs node 1's 0.2/2,
        // then node 1 on the way back costs nothing extra.
        let inst = line_instance(1, 4.0);
        let a = greedy_construction(&inst);
        assert_eq!(a.tour(0)[0], 2);
        assert!(a.is_visited(1));
    }

    #[test]
    fn test_greedy_tie_breaks_by_lower_id() {
        let inst = Instance::new(
            "tie",
            1,
            2.0,
            &[(2, 2, 0.0), (1, 2, 0.5), (3, 2, 0.5), (2, 1, 0.5)],
        )
        .unwrap();
        let a = greedy_construction(&inst);
        assert_eq!(a.tour(0), &[1]);
    }

    #[test]
    fn test_greedy_spreads_over_fleet() {
        let inst = line_instance(2, 4.0);
        let a = greedy_construction(&inst);
        assert!(a.is_feasible(&inst));
        assert!(a.tours().iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_infeasible_instance_gives_empty_routes() {
        let inst = line_instance(3, 1.0);
        let result = ConstructiveRunner::run(&inst, &Nominal, &ConstructiveConfig::default()).unwrap();
        assert_eq!(result.deterministic.routes().len(), 3);
        assert_eq!(result.deterministic.num_active_routes(), 0);
        assert_eq!(result.stochastic.num_active_routes(), 0);
        assert_eq!(result.deterministic.reward(), 0.0);
    }

    #[test]
    fn test_budget_just_below_round_trip() {
        let inst = Instance::new("tight", 1, 2.82842712474, &[(0, 0, 0.0), (1, 1, 0.9)]).unwrap();
        let result = ConstructiveRunner::run(&inst, &Nominal, &ConstructiveConfig::default()).unwrap();
        for solution in [&result.deterministic, &result.stochastic] {
            assert_eq!(solution.num_visited(), 0);
            assert!(solution.routes().iter().all(|r| r.cost() <= inst.route_max_cost()));
        }
    }

    #[test]
    fn test_two_opt_uncrosses() {
        let inst = Instance::new(
            "square",
            1,
            100.0,
            &[(0, 0, 0.0), (0, 4, 0.5), (4, 0, 0.5), (4, 4, 0.5)],
        )
        .unwrap();
        let mut tour = vec![1, 2, 3];
        let before = inst.tour_cost(&tour);
        two_opt(&inst, &mut tour);
        assert!(inst.tour_cost(&tour) < before);
        assert!((inst.tour_cost(&tour) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_improve_nominal_never_loses_reward() {
        let inst = line_instance(2, 6.0);
        let greedy = greedy_construction(&inst);
        let improved = improve_nominal(&inst, greedy.clone());
        assert!(improved.is_feasible(&inst));
        assert!(improved.nominal_reward(&inst) >= greedy.nominal_reward(&inst));
    }

    #[test]
    fn test_improve_nominal_inserts_freed_budget() {
        // Greedy stops at [2, 1]; inserting node 3 before node 2 makes the
        // full 0 -> 3 -> 2 -> 1 -> 0 sweep of cost 6.
        let inst = line_instance(1, 6.0);
        let improved = improve_nominal(&inst, greedy_construction(&inst));
        assert_eq!(improved.tour(0), &[3, 2, 1]);
        assert!((inst.tour_cost(improved.tour(0)) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_with_monte_carlo() {
        let inst = line_instance(2, 6.0);
        let sim = mc();
        let result = ConstructiveRunner::run(&inst, &sim, &ConstructiveConfig::default()).unwrap();
        for sol in [&result.deterministic, &result.stochastic] {
            assert!(sol.routes().len() <= 2);
            for route in sol.routes() {
                assert!(route.cost() <= 6.0);
                assert!(route.is_connected());
            }
        }
        // the stochastic objective never decreases
        for w in result.objective_history.windows(2) {
            assert!(w[1] > w[0]);
        }
        let obd = sim.estimate(result.deterministic.routes()).risk_adjusted(0.5);
        let obs = sim.estimate(result.stochastic.routes()).risk_adjusted(0.5);
        assert!(obs >= obd);
    }

    #[test]
    fn test_run_is_deterministic() {
        let inst = line_instance(2, 7.0);
        let sim = mc();
        let config = ConstructiveConfig::default();
        let a = ConstructiveRunner::run(&inst, &sim, &config).unwrap();
        let b = ConstructiveRunner::run(&inst, &sim, &config).unwrap();
        assert_eq!(a.deterministic, b.deterministic);
        assert_eq!(a.stochastic, b.stochastic);
        assert_eq!(a.objective_history, b.objective_history);
    }

    #[test]
    fn test_run_rejects_bad_config() {
        let inst = line_instance(1, 6.0);
        let config = ConstructiveConfig::default().with_max_passes(0);
        assert!(ConstructiveRunner::run(&inst, &Nominal, &config).is_err());
    }
}
