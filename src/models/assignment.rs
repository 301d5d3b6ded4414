//! Mutable working copy searched by the engines.

use crate::instance::Instance;

use super::Route;

/// Per-drone ordered lists of node indices, depot excluded.
///
/// Engines mutate assignments freely while searching and only turn the
/// final one into a [`Solution`](super::Solution).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    tours: Vec<Vec<usize>>,
}

impl Assignment {
    /// An assignment with every drone idle.
    pub fn new(fleet_size: usize) -> Self {
        Self {
            tours: vec![Vec::new(); fleet_size],
        }
    }

    pub fn from_tours(tours: Vec<Vec<usize>>) -> Self {
        Self { tours }
    }

    pub fn fleet_size(&self) -> usize {
        self.tours.len()
    }

    pub fn tours(&self) -> &[Vec<usize>] {
        &self.tours
    }

    pub fn tour(&self, drone: usize) -> &[usize] {
        &self.tours[drone]
    }

    pub(crate) fn tour_mut(&mut self, drone: usize) -> &mut Vec<usize> {
        &mut self.tours[drone]
    }

    /// Number of visited nodes across all drones.
    pub fn num_visited(&self) -> usize {
        self.tours.iter().map(|t| t.len()).sum()
    }

    pub fn is_visited(&self, node: usize) -> bool {
        self.tours.iter().any(|t| t.contains(&node))
    }

    /// Candidate nodes no drone visits, in ascending id order.
    pub fn unvisited(&self, instance: &Instance) -> Vec<usize> {
        let mut seen = vec![false; instance.nodes().len()];
        for &n in self.tours.iter().flatten() {
            seen[n] = true;
        }
        instance.candidates().filter(|&n| !seen[n]).collect()
    }

    /// Whether every tour stays within the route budget.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.tours.iter().all(|t| instance.fits(t))
    }

    /// Summed quality of every visited node.
    pub fn nominal_reward(&self, instance: &Instance) -> f64 {
        self.tours.iter().map(|t| instance.tour_reward(t)).sum()
    }

    /// Materializes one [`Route`] per drone.
    pub fn to_routes(&self, instance: &Instance) -> Vec<Route> {
        let depot = *instance.depot();
        self.tours
            .iter()
            .enumerate()
            .map(|(drone, tour)| {
                let stops: Vec<_> = tour.iter().map(|&n| *instance.node(n)).collect();
                Route::through(drone, depot, &stops)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::new(
            "t",
            2,
            12.0,
            &[(0, 0, 0.0), (3, 4, 0.9), (0, 4, 0.2), (8, 8, 0.6)],
        )
        .unwrap()
    }

    #[test]
    fn test_new_is_idle() {
        let a = Assignment::new(3);
        assert_eq!(a.fleet_size(), 3);
        assert_eq!(a.num_visited(), 0);
        assert!(a.tours().iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_unvisited_sorted() {
        let inst = instance();
        let a = Assignment::from_tours(vec![vec![2], vec![]]);
        assert_eq!(a.unvisited(&inst), vec![1, 3]);
        assert!(a.is_visited(2));
        assert!(!a.is_visited(1));
    }

    #[test]
    fn test_feasibility() {
        let inst = instance();
        assert!(Assignment::from_tours(vec![vec![1, 2], vec![]]).is_feasible(&inst));
        assert!(!Assignment::from_tours(vec![vec![3], vec![]]).is_feasible(&inst));
    }

    #[test]
    fn test_to_routes() {
        let inst = instance();
        let a = Assignment::from_tours(vec![vec![1, 2], vec![]]);
        let routes = a.to_routes(&inst);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].node_ids(), vec![1, 2]);
        assert_eq!(routes[0].cost(), inst.tour_cost(&[1, 2]));
        assert!(routes[1].is_empty());
        assert!((a.nominal_reward(&inst) - 1.1).abs() < 1e-12);
    }
}
