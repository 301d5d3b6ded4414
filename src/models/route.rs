//! Drone routes.

use std::fmt;

use super::{Edge, Node};

/// An ordered flight path for one drone.
///
/// A non-empty route starts at the depot, visits its stops in order and
/// ends with an explicit return edge to the depot, so consecutive edges
/// always share endpoints. An idle drone has an empty route.
///
/// # Examples
///
/// ```
/// use drone_sweep::models::{Node, Route};
///
/// let depot = Node::new(0, 0, 0, 0.3);
/// let stops = [Node::new(1, 3, 4, 0.9), Node::new(2, 0, 4, 0.2)];
/// let route = Route::through(0, depot, &stops);
///
/// assert_eq!(route.edges().len(), 3);
/// assert!((route.cost() - 12.0).abs() < 1e-12);
/// assert!((route.reward() - 1.1).abs() < 1e-12);
/// assert_eq!(route.node_ids(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    drone: usize,
    edges: Vec<Edge>,
    cost: f64,
    reward: f64,
}

impl Route {
    /// An empty route for a drone that stays on the ground.
    pub fn idle(drone: usize) -> Self {
        Self {
            drone,
            edges: Vec::new(),
            cost: 0.0,
            reward: 0.0,
        }
    }

    /// Builds the closed path depot → `stops` → depot.
    pub fn through(drone: usize, depot: Node, stops: &[Node]) -> Self {
        if stops.is_empty() {
            return Self::idle(drone);
        }

        let mut edges = Vec::with_capacity(stops.len() + 1);
        let mut at = depot;
        for &stop in stops {
            edges.push(Edge::new(at, stop));
            at = stop;
        }
        edges.push(Edge::new(at, depot));

        Self {
            drone,
            cost: edges.iter().map(|e| e.cost()).sum(),
            reward: stops.iter().map(|n| n.quality()).sum(),
            edges,
        }
    }

    /// Drone flying this route.
    pub fn drone(&self) -> usize {
        self.drone
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Total flight cost, return leg included.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Nominal reward: the summed quality of the visited nodes.
    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of visited nodes (depot excluded).
    pub fn len(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Launch site of the route, if the drone flies at all.
    pub fn depot(&self) -> Option<&Node> {
        self.edges.first().map(|e| e.origin())
    }

    /// Visited nodes in flight order.
    pub fn stops(&self) -> impl Iterator<Item = &Node> + '_ {
        let n = self.len();
        self.edges.iter().take(n).map(|e| e.end())
    }

    /// Ids of the visited nodes in flight order.
    pub fn node_ids(&self) -> Vec<usize> {
        self.stops().map(|n| n.id()).collect()
    }

    /// Whether every edge starts where the previous one ended and the
    /// path returns to its origin.
    pub fn is_connected(&self) -> bool {
        let chained = self
            .edges
            .windows(2)
            .all(|w| w[0].end().id() == w[1].origin().id());
        let closed = match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => first.origin().id() == last.end().id(),
            _ => true,
        };
        chained && closed
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drone {}: ", self.drone)?;
        match self.edges.first() {
            None => write!(f, "idle")?,
            Some(first) => {
                write!(f, "{}", first.origin().id())?;
                for edge in &self.edges {
                    write!(f, " -> {}", edge.end().id())?;
                }
            }
        }
        write!(f, " (cost {:.3}, reward {:.3})", self.cost, self.reward)
    }
}
