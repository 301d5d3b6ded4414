//! Waypoint and edge types.

/// A candidate waypoint on the signal grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    id: usize,
    x: usize,
    y: usize,
    quality: f64,
}

impl Node {
    /// Creates a node. Quality is expected in `[0, 1]`; [`Instance`]
    /// enforces it.
    ///
    /// [`Instance`]: crate::instance::Instance
    pub fn new(id: usize, x: usize, y: usize, quality: f64) -> Self {
        Self { id, x, y, quality }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    /// Static signal quality of the cell.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Euclidean distance between grid cells.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// A directed flight leg between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    origin: Node,
    end: Node,
    cost: f64,
}

impl Edge {
    /// Creates a leg whose cost is the grid distance between its ends.
    pub fn new(origin: Node, end: Node) -> Self {
        Self {
            cost: origin.distance_to(&end),
            origin,
            end,
        }
    }

    pub fn origin(&self) -> &Node {
        &self.origin
    }

    pub fn end(&self) -> &Node {
        &self.end
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}
