//! Mission instance model.
//!
//! An [`Instance`] is built once per mission from [`InstanceData`] (the
//! configuration surface handed over by mission setup) and is read-only to
//! every engine. Node 0 of the node list is the launch site: every route
//! starts there and returns there, and it yields no reward.

use std::ops::Range;

use std::iter;

use crate::error::MissionError;
use crate::models::Node;

/// Temperature schedule consumed by the annealing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingParams {
    /// Starting temperature.
    pub initial_temp: f64,
    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,
    /// The search stops once the temperature drops below this value.
    pub min_temp: f64,
}

impl AnnealingParams {
    pub fn new(initial_temp: f64, cooling_rate: f64, min_temp: f64) -> Self {
        Self {
            initial_temp,
            cooling_rate,
            min_temp,
        }
    }

    /// Validates the schedule.
    pub fn validate(&self) -> Result<(), MissionError> {
        if !(self.initial_temp.is_finite() && self.initial_temp > 0.0) {
            return Err(MissionError::InvalidAnnealing(format!(
                "initial_temp must be positive, got {}",
                self.initial_temp
            )));
        }
        if !(self.min_temp.is_finite() && self.min_temp > 0.0) {
            return Err(MissionError::InvalidAnnealing(format!(
                "min_temp must be positive, got {}",
                self.min_temp
            )));
        }
        if self.min_temp >= self.initial_temp {
            return Err(MissionError::InvalidAnnealing(
                "min_temp must be less than initial_temp".into(),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(MissionError::InvalidAnnealing(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }
}

/// Raw mission parameters as produced by mission setup.
///
/// # Examples
///
/// ```
/// use drone_sweep::instance::{Instance, InstanceData};
///
/// let data = InstanceData::new(
///     "drone_sweep",
///     2,
///     42.5,
///     vec![(0, 0, 0.1), (3, 4, 0.9), (6, 8, 0.4)],
/// )
/// .with_annealing(1000.0, 0.95, 0.1);
///
/// let instance = Instance::from_data(&data).unwrap();
/// assert_eq!(instance.fleet_size(), 2);
/// assert_eq!(instance.candidates().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceData {
    /// Mission identifier.
    pub instance_id: String,
    /// Number of drones.
    pub fleet_size: usize,
    /// Cost budget of every single route.
    pub route_max_cost: f64,
    /// Candidate nodes as `(x, y, quality)`; the first one is the depot.
    pub node_list: Vec<(usize, usize, f64)>,
    /// Declared length of `node_list`.
    pub number_of_nodes: usize,
    /// Annealing start temperature.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_temp: Option<f64>,
    /// Annealing cooling factor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooling_rate: Option<f64>,
    /// Annealing stop temperature.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_temp: Option<f64>,
}

impl InstanceData {
    /// Creates mission data without annealing parameters.
    pub fn new(
        instance_id: impl Into<String>,
        fleet_size: usize,
        route_max_cost: f64,
        node_list: Vec<(usize, usize, f64)>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            fleet_size,
            route_max_cost,
            number_of_nodes: node_list.len(),
            node_list,
            initial_temp: None,
            cooling_rate: None,
            min_temp: None,
        }
    }

    pub fn with_annealing(mut self, initial_temp: f64, cooling_rate: f64, min_temp: f64) -> Self {
        self.initial_temp = Some(initial_temp);
        self.cooling_rate = Some(cooling_rate);
        self.min_temp = Some(min_temp);
        self
    }

    pub fn with_fleet_size(mut self, fleet_size: usize) -> Self {
        self.fleet_size = fleet_size;
        self
    }

    fn annealing(&self) -> Result<Option<AnnealingParams>, MissionError> {
        match (self.initial_temp, self.cooling_rate, self.min_temp) {
            (None, None, None) => Ok(None),
            (Some(initial_temp), Some(cooling_rate), Some(min_temp)) => {
                Ok(Some(AnnealingParams::new(initial_temp, cooling_rate, min_temp)))
            }
            _ => Err(MissionError::InvalidAnnealing(
                "initial_temp, cooling_rate and min_temp must be given together".into(),
            )),
        }
    }
}

/// Validated, immutable mission instance.
#[derive(Debug, Clone)]
pub struct Instance {
    id: String,
    fleet_size: usize,
    route_max_cost: f64,
    nodes: Vec<Node>,
    distances: Vec<Vec<f64>>,
    annealing: Option<AnnealingParams>,
}

impl Instance {
    /// Builds an instance from `(x, y, quality)` tuples.
    ///
    /// Fails on a zero fleet, a non-positive budget, an empty node list or
    /// a quality outside `[0, 1]`. Values are never clamped.
    pub fn new(
        id: impl Into<String>,
        fleet_size: usize,
        route_max_cost: f64,
        node_list: &[(usize, usize, f64)],
    ) -> Result<Self, MissionError> {
        if fleet_size == 0 {
            return Err(MissionError::ZeroFleet);
        }
        if !(route_max_cost.is_finite() && route_max_cost > 0.0) {
            return Err(MissionError::InvalidBudget(route_max_cost));
        }
        if node_list.is_empty() {
            return Err(MissionError::EmptyNodeList);
        }

        let nodes = node_list
            .iter()
            .enumerate()
            .map(|(id, &(x, y, quality))| {
                if (0.0..=1.0).contains(&quality) {
                    Ok(Node::new(id, x, y, quality))
                } else {
                    Err(MissionError::InvalidQuality { id, quality })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let distances = nodes
            .iter()
            .map(|a| nodes.iter().map(|b| a.distance_to(b)).collect())
            .collect();

        Ok(Self {
            id: id.into(),
            fleet_size,
            route_max_cost,
            nodes,
            distances,
            annealing: None,
        })
    }

    /// Builds an instance from mission data, checking `number_of_nodes`
    /// and the annealing parameters.
    pub fn from_data(data: &InstanceData) -> Result<Self, MissionError> {
        if data.number_of_nodes != data.node_list.len() {
            return Err(MissionError::NodeCountMismatch {
                declared: data.number_of_nodes,
                actual: data.node_list.len(),
            });
        }
        let instance = Self::new(
            data.instance_id.clone(),
            data.fleet_size,
            data.route_max_cost,
            &data.node_list,
        )?;
        match data.annealing()? {
            Some(params) => instance.with_annealing(params),
            None => Ok(instance),
        }
    }

    /// Attaches an annealing schedule.
    pub fn with_annealing(mut self, params: AnnealingParams) -> Result<Self, MissionError> {
        params.validate()?;
        self.annealing = Some(params);
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }

    pub fn route_max_cost(&self) -> f64 {
        self.route_max_cost
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// The launch site every route starts from and returns to.
    pub fn depot(&self) -> &Node {
        &self.nodes[0]
    }

    /// Indices of the nodes drones may visit (everything but the depot).
    pub fn candidates(&self) -> Range<usize> {
        1..self.nodes.len()
    }

    pub fn annealing(&self) -> Option<&AnnealingParams> {
        self.annealing.as_ref()
    }

    /// Euclidean distance between two nodes.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }

    /// Cost of flying depot → `tour` → depot.
    ///
    /// Legs are summed in flight order, the same order [`Route`] uses, so
    /// the two costs agree bit for bit.
    ///
    /// [`Route`]: crate::models::Route
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        self.path_cost(tour.iter().copied())
    }

    /// Cost of `tour` with `node` inserted at position `at`.
    pub fn insertion_cost(&self, tour: &[usize], at: usize, node: usize) -> f64 {
        let (head, tail) = tour.split_at(at);
        self.path_cost(
            head.iter()
                .copied()
                .chain(iter::once(node))
                .chain(tail.iter().copied()),
        )
    }

    fn path_cost(&self, stops: impl Iterator<Item = usize>) -> f64 {
        let mut cost = 0.0;
        let mut at = None;
        for stop in stops {
            cost += self.distance(at.unwrap_or(0), stop);
            at = Some(stop);
        }
        match at {
            Some(last) => cost + self.distance(last, 0),
            None => 0.0,
        }
    }

    /// Whether `tour` stays within the route budget.
    pub fn fits(&self, tour: &[usize]) -> bool {
        self.tour_cost(tour) <= self.route_max_cost
    }

    /// Whether inserting `node` at `at` keeps `tour` within the budget.
    pub fn fits_with(&self, tour: &[usize], at: usize, node: usize) -> bool {
        self.insertion_cost(tour, at, node) <= self.route_max_cost
    }

    /// Whether `node` is reachable at all: depot → node → depot within budget.
    pub fn is_reachable(&self, node: usize) -> bool {
        self.fits(&[node])
    }

    /// Sum of the qualities along a tour.
    pub fn tour_reward(&self, tour: &[usize]) -> f64 {
        tour.iter().map(|&n| self.nodes[n].quality()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<(usize, usize, f64)> {
        vec![(0, 0, 0.5), (3, 4, 0.9), (0, 4, 0.2)]
    }

    #[test]
    fn test_instance_basic() {
        let inst = Instance::new("t", 2, 20.0, &nodes()).unwrap();
        assert_eq!(inst.id(), "t");
        assert_eq!(inst.fleet_size(), 2);
        assert_eq!(inst.depot().id(), 0);
        assert_eq!(inst.candidates(), 1..3);
        assert!((inst.distance(0, 1) - 5.0).abs() < 1e-12);
        assert!((inst.distance(1, 2) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_tour_cost_closes_loop() {
        let inst = Instance::new("t", 1, 20.0, &nodes()).unwrap();
        assert_eq!(inst.tour_cost(&[]), 0.0);
        assert!((inst.tour_cost(&[1]) - 10.0).abs() < 1e-12);
        // 0 -> 1 (5) -> 2 (3) -> 0 (4)
        assert!((inst.tour_cost(&[1, 2]) - 12.0).abs() < 1e-12);
        assert!(inst.fits(&[1, 2]));
        assert!((inst.tour_reward(&[1, 2]) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_reachability() {
        let inst = Instance::new("t", 1, 9.0, &nodes()).unwrap();
        assert!(!inst.is_reachable(1));
        assert!(inst.is_reachable(2));
    }

    #[test]
    fn test_budget_has_no_slack() {
        // round trip to (1, 1) is 2 * sqrt(2) = 2.8284271247461903
        let nodes = [(0, 0, 0.0), (1, 1, 0.9)];
        let below = Instance::new("t", 1, 2.82842712474, &nodes).unwrap();
        assert!(!below.is_reachable(1));
        assert!(!below.fits_with(&[], 0, 1));

        let exact = Instance::new("t", 1, 2.0 * 2f64.sqrt(), &nodes).unwrap();
        assert!(exact.is_reachable(1));
    }

    #[test]
    fn test_insertion_cost_matches_tour_cost() {
        let inst = Instance::new("t", 1, 20.0, &nodes()).unwrap();
        assert_eq!(inst.insertion_cost(&[], 0, 2), inst.tour_cost(&[2]));
        assert_eq!(inst.insertion_cost(&[1], 0, 2), inst.tour_cost(&[2, 1]));
        assert_eq!(inst.insertion_cost(&[1], 1, 2), inst.tour_cost(&[1, 2]));
    }

    #[test]
    fn test_rejects_zero_fleet() {
        let err = Instance::new("t", 0, 20.0, &nodes()).unwrap_err();
        assert_eq!(err, MissionError::ZeroFleet);
    }

    #[test]
    fn test_rejects_bad_budget() {
        assert!(matches!(
            Instance::new("t", 1, -1.0, &nodes()),
            Err(MissionError::InvalidBudget(_))
        ));
        assert!(matches!(
            Instance::new("t", 1, f64::NAN, &nodes()),
            Err(MissionError::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_rejects_quality_out_of_range() {
        let err = Instance::new("t", 1, 10.0, &[(0, 0, 0.0), (1, 1, 1.2)]).unwrap_err();
        assert_eq!(
            err,
            MissionError::InvalidQuality {
                id: 1,
                quality: 1.2
            }
        );
    }

    #[test]
    fn test_rejects_empty_nodes() {
        assert_eq!(
            Instance::new("t", 1, 10.0, &[]).unwrap_err(),
            MissionError::EmptyNodeList
        );
    }

    #[test]
    fn test_from_data_count_mismatch() {
        let mut data = InstanceData::new("t", 1, 10.0, nodes());
        data.number_of_nodes = 5;
        assert!(matches!(
            Instance::from_data(&data),
            Err(MissionError::NodeCountMismatch {
                declared: 5,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_data_annealing() {
        let data = InstanceData::new("t", 1, 10.0, nodes()).with_annealing(1000.0, 0.95, 0.1);
        let inst = Instance::from_data(&data).unwrap();
        let params = inst.annealing().unwrap();
        assert_eq!(params.cooling_rate, 0.95);
    }

    #[test]
    fn test_from_data_partial_annealing() {
        let mut data = InstanceData::new("t", 1, 10.0, nodes());
        data.initial_temp = Some(100.0);
        assert!(matches!(
            Instance::from_data(&data),
            Err(MissionError::InvalidAnnealing(_))
        ));
    }

    #[test]
    fn test_annealing_validation() {
        assert!(AnnealingParams::new(1000.0, 0.95, 0.1).validate().is_ok());
        assert!(AnnealingParams::new(1000.0, 1.0, 0.1).validate().is_err());
        assert!(AnnealingParams::new(1000.0, 0.0, 0.1).validate().is_err());
        assert!(AnnealingParams::new(0.1, 0.95, 1000.0).validate().is_err());
        assert!(AnnealingParams::new(-5.0, 0.95, 0.1).validate().is_err());
    }
}
