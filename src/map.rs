//! Signal quality maps and candidate node generation.
//!
//! A [`SignalMap`] is a square grid whose cells carry a signal quality in
//! `[0, 1)`. Candidate nodes are distinct cells picked at random; the first
//! one is the launch site once the node list becomes an
//! [`Instance`](crate::instance::Instance).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MissionError;

/// A square signal quality grid plus the cells chosen as nodes.
///
/// # Examples
///
/// ```
/// use drone_sweep::map::SignalMap;
/// use drone_sweep::random::create_rng;
///
/// let map = SignalMap::generate(10, 10, &mut create_rng(1025747)).unwrap();
/// assert_eq!(map.grid_size(), 10);
/// assert_eq!(map.node_list().len(), 10);
/// for &(x, y, q) in map.node_list() {
///     assert_eq!(map.quality_at(x, y), q);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalMap {
    grid: Vec<Vec<f64>>,
    nodes: Vec<(usize, usize, f64)>,
}

impl SignalMap {
    /// Draws a `grid_size` × `grid_size` map and `node_count` distinct cells.
    ///
    /// Cell qualities are drawn row by row, then the cell coordinates are
    /// shuffled and the first `node_count` become nodes.
    pub fn generate<R: Rng>(
        grid_size: usize,
        node_count: usize,
        rng: &mut R,
    ) -> Result<Self, MissionError> {
        let cells = grid_size
            .checked_mul(grid_size)
            .ok_or(MissionError::MapTooLarge(grid_size))?;
        if node_count > cells {
            return Err(MissionError::MapTooSmall {
                grid_size,
                requested: node_count,
            });
        }

        let grid: Vec<Vec<f64>> = (0..grid_size)
            .map(|_| (0..grid_size).map(|_| rng.random::<f64>()).collect())
            .collect();

        let mut coords: Vec<(usize, usize)> = (0..grid_size)
            .flat_map(|x| (0..grid_size).map(move |y| (x, y)))
            .collect();
        coords.shuffle(rng);

        let nodes = coords
            .into_iter()
            .take(node_count)
            .map(|(x, y)| (x, y, grid[x][y]))
            .collect();

        Ok(Self { grid, nodes })
    }

    /// Quality grid indexed `[x][y]`.
    pub fn grid(&self) -> &[Vec<f64>] {
        &self.grid
    }

    pub fn grid_size(&self) -> usize {
        self.grid.len()
    }

    /// Node tuples `(x, y, quality)` in selection order.
    pub fn node_list(&self) -> &[(usize, usize, f64)] {
        &self.nodes
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn quality_at(&self, x: usize, y: usize) -> f64 {
        self.grid[x][y]
    }
}
